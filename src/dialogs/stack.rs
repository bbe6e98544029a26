//! Dialog stack
//!
//! The per-conversation stack of active dialog frames. The stack is stored
//! in the conversation property `dialogState` and rebuilt every turn, so a
//! frame records everything needed to resume: which dialog it belongs to and
//! where that dialog stopped.

use serde::{Deserialize, Serialize};

use crate::state::{StatePropertyAccessor, StateScope};

/// Conversation-scoped property holding the dialog stack
pub const DIALOG_STATE_PROPERTY: &str = "dialogState";

/// Accessor for the persisted dialog stack
pub const fn dialog_state() -> StatePropertyAccessor<DialogStack> {
    StatePropertyAccessor::new(StateScope::Conversation, DIALOG_STATE_PROPERTY)
}

/// Every dialog the bot can run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogId {
    /// Asks for name, then age
    CollectInfo,
    /// Greets a user whose profile is complete
    GreetUser,
    NamePrompt,
    AgePrompt,
}

impl DialogId {
    pub fn as_str(&self) -> &'static str {
        match self {
            DialogId::CollectInfo => "collect_info",
            DialogId::GreetUser => "greet_user",
            DialogId::NamePrompt => "name_prompt",
            DialogId::AgePrompt => "age_prompt",
        }
    }
}

impl std::fmt::Display for DialogId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Text shown when a prompt starts and when it rejects input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptOptions {
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_prompt: Option<String>,
}

impl PromptOptions {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            retry_prompt: None,
        }
    }

    pub fn with_retry(mut self, retry_prompt: impl Into<String>) -> Self {
        self.retry_prompt = Some(retry_prompt.into());
        self
    }

    /// Message to send after rejected input; falls back to the prompt itself
    pub fn retry_text(&self) -> &str {
        self.retry_prompt.as_deref().unwrap_or(&self.prompt)
    }
}

/// Where a suspended dialog will resume
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InstanceState {
    /// Index of the waterfall step that ran last
    Waterfall { step: usize },
    /// Prompt waiting for a valid reply
    Prompt { options: PromptOptions, attempts: u32 },
}

/// One frame of the dialog stack
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogInstance {
    pub dialog: DialogId,
    pub state: InstanceState,
}

impl DialogInstance {
    pub fn waterfall(dialog: DialogId) -> Self {
        Self {
            dialog,
            state: InstanceState::Waterfall { step: 0 },
        }
    }

    pub fn prompt(dialog: DialogId, options: PromptOptions) -> Self {
        Self {
            dialog,
            state: InstanceState::Prompt { options, attempts: 0 },
        }
    }
}

/// Stack of active dialogs, top of stack last
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogStack {
    #[serde(rename = "dialogStack", default)]
    frames: Vec<DialogInstance>,
}

impl DialogStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, instance: DialogInstance) {
        self.frames.push(instance);
    }

    pub fn pop(&mut self) -> Option<DialogInstance> {
        self.frames.pop()
    }

    /// The dialog that receives the next user input
    pub fn active(&self) -> Option<&DialogInstance> {
        self.frames.last()
    }

    pub fn active_mut(&mut self) -> Option<&mut DialogInstance> {
        self.frames.last_mut()
    }

    /// Remove every frame, returning how many were dropped
    pub fn clear(&mut self) -> usize {
        let count = self.frames.len();
        self.frames.clear();
        count
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frames(&self) -> &[DialogInstance] {
        &self.frames
    }
}
