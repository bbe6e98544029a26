//! Dialog registry and the dialog stack interpreter
//!
//! A [`DialogSet`] holds every dialog definition the bot can run. Each turn
//! it hands out a [`DialogContext`], which owns the conversation's
//! [`DialogStack`] for the duration of the turn and drives it: beginning
//! dialogs, feeding user input to prompts, resuming waterfalls by step index
//! and cancelling.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::state::TurnContext;
use crate::utils::errors::{BotError, Result};
use crate::utils::logging::{log_dialog_event, log_prompt_retry};
use super::collect_info::{age_prompt, collect_info_dialog, name_prompt};
use super::greet_user::greet_user_dialog;
use super::prompts::{Prompt, PromptValidation};
use super::stack::{dialog_state, DialogId, DialogInstance, DialogStack, InstanceState, PromptOptions};

/// A waterfall step; receives the previous step's (or child prompt's) result
pub type StepFn = fn(&mut DialogContext<'_>, StepContext) -> Result<DialogTurnStatus>;

/// One entry of a waterfall's step table
#[derive(Clone)]
pub struct WaterfallStep {
    pub name: &'static str,
    pub run: StepFn,
}

impl WaterfallStep {
    pub fn new(name: &'static str, run: StepFn) -> Self {
        Self { name, run }
    }
}

impl std::fmt::Debug for WaterfallStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WaterfallStep")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// A fixed, ordered sequence of steps
#[derive(Debug, Clone)]
pub struct WaterfallDialog {
    pub id: DialogId,
    /// Description of what this dialog does
    pub description: &'static str,
    pub steps: Vec<WaterfallStep>,
}

impl WaterfallDialog {
    pub fn new(id: DialogId, description: &'static str, steps: Vec<WaterfallStep>) -> Self {
        Self { id, description, steps }
    }
}

/// Any dialog that can sit on the stack
#[derive(Debug, Clone)]
pub enum Dialog {
    Waterfall(WaterfallDialog),
    Prompt(Prompt),
}

impl Dialog {
    pub fn id(&self) -> DialogId {
        match self {
            Dialog::Waterfall(waterfall) => waterfall.id,
            Dialog::Prompt(prompt) => prompt.id,
        }
    }
}

/// Input to a waterfall step
#[derive(Debug, Clone)]
pub struct StepContext {
    /// Position of this step in the waterfall
    pub index: usize,
    /// Result of the previous step, if it produced one
    pub result: Option<Value>,
}

impl StepContext {
    /// The previous result, deserialized into `T`
    pub fn result_as<T: DeserializeOwned>(&self) -> Result<T> {
        match &self.result {
            Some(value) => Ok(serde_json::from_value(value.clone())?),
            None => Err(BotError::InvalidInput(format!(
                "Waterfall step {} expected a result from the previous step",
                self.index
            ))),
        }
    }
}

/// What happened to the dialog stack during a call
#[derive(Debug, Clone, PartialEq)]
pub enum DialogTurnStatus {
    /// Nothing was active
    Empty,
    /// A dialog is suspended awaiting the next user input
    Waiting,
    /// The outermost dialog ended with this result
    Complete(Option<Value>),
    /// Active dialogs were cancelled
    Cancelled,
}

/// Registry of all dialogs the bot can run
#[derive(Debug, Clone, Default)]
pub struct DialogSet {
    dialogs: HashMap<DialogId, Dialog>,
}

impl DialogSet {
    /// Create an empty dialog set
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a dialog set holding the name/age prompts and both waterfalls
    pub fn with_default_dialogs() -> Self {
        let mut set = Self::new();
        set.register_default_dialogs();
        set
    }

    fn register_default_dialogs(&mut self) {
        self.add(Dialog::Prompt(name_prompt()));
        self.add(Dialog::Prompt(age_prompt()));
        self.add(Dialog::Waterfall(collect_info_dialog()));
        self.add(Dialog::Waterfall(greet_user_dialog()));
    }

    /// Register a dialog, replacing any existing one with the same id
    pub fn add(&mut self, dialog: Dialog) -> &mut Self {
        self.dialogs.insert(dialog.id(), dialog);
        self
    }

    pub fn get(&self, id: DialogId) -> Option<&Dialog> {
        self.dialogs.get(&id)
    }

    pub fn contains(&self, id: DialogId) -> bool {
        self.dialogs.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.dialogs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dialogs.is_empty()
    }

    /// Load the conversation's stack and wrap it with the turn
    pub fn create_context<'a>(&'a self, turn: &'a mut TurnContext) -> Result<DialogContext<'a>> {
        let stack = dialog_state().get(turn)?.unwrap_or_default();
        Ok(DialogContext {
            dialogs: self,
            turn,
            stack,
        })
    }
}

/// A turn's view of the dialog stack
///
/// Every stack mutation is written back to conversation state immediately,
/// so whatever the caller does afterwards the saved stack matches what the
/// user has seen.
pub struct DialogContext<'a> {
    dialogs: &'a DialogSet,
    turn: &'a mut TurnContext,
    stack: DialogStack,
}

impl<'a> DialogContext<'a> {
    pub fn context(&self) -> &TurnContext {
        &*self.turn
    }

    pub fn context_mut(&mut self) -> &mut TurnContext {
        &mut *self.turn
    }

    pub fn stack(&self) -> &DialogStack {
        &self.stack
    }

    /// The dialog that will receive the next input
    pub fn active_dialog(&self) -> Option<&DialogInstance> {
        self.stack.active()
    }

    /// Push a waterfall dialog and run its first step
    pub fn begin(&mut self, id: DialogId) -> Result<DialogTurnStatus> {
        let description = match self.dialogs.get(id) {
            Some(Dialog::Waterfall(waterfall)) => waterfall.description,
            Some(Dialog::Prompt(_)) => {
                return Err(BotError::InvalidStateTransition {
                    from: "begin".to_string(),
                    to: id.to_string(),
                });
            }
            None => return Err(BotError::UnknownDialog(id.to_string())),
        };

        self.stack.push(DialogInstance::waterfall(id));
        self.log_event(id, "begin");
        debug!(dialog = %id, description = description, "Beginning waterfall");
        self.run_step(0, None)
    }

    /// Push a prompt dialog and send its prompt text
    pub fn prompt(&mut self, id: DialogId, options: PromptOptions) -> Result<DialogTurnStatus> {
        match self.dialogs.get(id) {
            Some(Dialog::Prompt(_)) => {}
            Some(Dialog::Waterfall(_)) => {
                return Err(BotError::InvalidStateTransition {
                    from: "prompt".to_string(),
                    to: id.to_string(),
                });
            }
            None => return Err(BotError::UnknownDialog(id.to_string())),
        }

        self.turn.send_activity(options.prompt.clone());
        self.stack.push(DialogInstance::prompt(id, options));
        self.log_event(id, "prompt");
        self.persist()?;
        Ok(DialogTurnStatus::Waiting)
    }

    /// Deliver the current input to the active dialog
    pub fn continue_dialog(&mut self) -> Result<DialogTurnStatus> {
        let active = match self.stack.active() {
            Some(active) => active.clone(),
            None => return Ok(DialogTurnStatus::Empty),
        };

        match active.state {
            InstanceState::Prompt { options, attempts } => {
                self.continue_prompt(active.dialog, options, attempts)
            }
            InstanceState::Waterfall { step } => {
                let input = self
                    .turn
                    .activity()
                    .text()
                    .map(|text| Value::String(text.to_string()));
                self.run_step(step + 1, input)
            }
        }
    }

    /// Pop the active dialog and resume its parent with `result`
    pub fn end_dialog(&mut self, result: Option<Value>) -> Result<DialogTurnStatus> {
        if let Some(ended) = self.stack.pop() {
            self.log_event(ended.dialog, "end");
        }

        match self.stack.active() {
            Some(parent) => match parent.state {
                InstanceState::Waterfall { step } => self.run_step(step + 1, result),
                InstanceState::Prompt { .. } => Err(BotError::InvalidStateTransition {
                    from: parent.dialog.to_string(),
                    to: "resume".to_string(),
                }),
            },
            None => {
                self.persist()?;
                Ok(DialogTurnStatus::Complete(result))
            }
        }
    }

    /// Drop every active dialog
    pub fn cancel_all(&mut self) -> Result<DialogTurnStatus> {
        if self.stack.is_empty() {
            return Ok(DialogTurnStatus::Empty);
        }

        let cancelled = self.stack.clear();
        log_dialog_event(&self.turn.activity().conversation.id, "*", "cancel_all", cancelled);
        self.persist()?;
        Ok(DialogTurnStatus::Cancelled)
    }

    fn continue_prompt(
        &mut self,
        id: DialogId,
        options: PromptOptions,
        attempts: u32,
    ) -> Result<DialogTurnStatus> {
        let dialogs = self.dialogs;
        let prompt = match dialogs.get(id) {
            Some(Dialog::Prompt(prompt)) => prompt,
            Some(Dialog::Waterfall(_)) => {
                return Err(BotError::InvalidStateTransition {
                    from: id.to_string(),
                    to: "prompt".to_string(),
                });
            }
            None => return Err(BotError::UnknownDialog(id.to_string())),
        };

        match prompt.evaluate(&mut *self.turn) {
            PromptValidation::Accept(value) => self.end_dialog(Some(value)),
            PromptValidation::Retry => {
                let attempts = attempts.saturating_add(1);
                log_prompt_retry(&self.turn.activity().conversation.id, id.as_str(), attempts);

                self.turn.send_activity(options.retry_text().to_string());
                if let Some(frame) = self.stack.active_mut() {
                    frame.state = InstanceState::Prompt { options, attempts };
                }
                self.persist()?;
                Ok(DialogTurnStatus::Waiting)
            }
        }
    }

    /// Run step `index` of the active waterfall, ending it past the last step
    fn run_step(&mut self, index: usize, result: Option<Value>) -> Result<DialogTurnStatus> {
        let dialog_id = match self.stack.active() {
            Some(frame) => frame.dialog,
            None => {
                return Err(BotError::InvalidStateTransition {
                    from: "empty_stack".to_string(),
                    to: format!("step {}", index),
                });
            }
        };

        let dialogs = self.dialogs;
        let waterfall = match dialogs.get(dialog_id) {
            Some(Dialog::Waterfall(waterfall)) => waterfall,
            Some(Dialog::Prompt(_)) => {
                return Err(BotError::InvalidStateTransition {
                    from: dialog_id.to_string(),
                    to: format!("step {}", index),
                });
            }
            None => return Err(BotError::UnknownDialog(dialog_id.to_string())),
        };

        let step = match waterfall.steps.get(index) {
            Some(step) => step,
            None => return self.end_dialog(result),
        };

        if let Some(frame) = self.stack.active_mut() {
            frame.state = InstanceState::Waterfall { step: index };
        }
        self.persist()?;

        debug!(dialog = %dialog_id, step = index, name = step.name, "Running waterfall step");
        (step.run)(self, StepContext { index, result })
    }

    fn persist(&mut self) -> Result<()> {
        dialog_state().set(&mut *self.turn, self.stack.clone())
    }

    fn log_event(&self, id: DialogId, event: &str) {
        log_dialog_event(
            &self.turn.activity().conversation.id,
            id.as_str(),
            event,
            self.stack.depth(),
        );
    }
}
