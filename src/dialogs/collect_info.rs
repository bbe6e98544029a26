//! Collect-info dialog
//!
//! Three steps: ask for the user's name, store it and ask for their age,
//! store the age and confirm.

use serde_json::Value;

use crate::models::profile::{user_age, user_name};
use crate::state::TurnContext;
use crate::utils::errors::Result;
use super::dialog_set::{DialogContext, DialogTurnStatus, StepContext, WaterfallDialog, WaterfallStep};
use super::prompts::{NumberValidator, Prompt, PromptValidation};
use super::stack::{DialogId, PromptOptions};

pub const NAME_PROMPT_TEXT: &str = "What is your name, human?";
pub const AGE_RETRY_TEXT: &str = "Sorry, please specify your age as a positive number or say cancel.";
pub const NEGATIVE_AGE_TEXT: &str = "Your age can't be less than zero.";

pub fn age_prompt_text(name: &str) -> String {
    format!("And what is your age, {}?", name)
}

pub fn age_confirmation_text(age: u32) -> String {
    format!("I will remember that you are {} years old.", age)
}

/// Free-text prompt for the user's name
pub fn name_prompt() -> Prompt {
    Prompt::text(DialogId::NamePrompt)
}

/// Number prompt for the user's age
pub fn age_prompt() -> Prompt {
    Prompt::number(DialogId::AgePrompt, Some(validate_age as NumberValidator))
}

/// Accepts whole, non-negative ages that fit in a `u32`
fn validate_age(turn: &mut TurnContext, value: f64) -> PromptValidation {
    if value < 0.0 {
        turn.send_activity(NEGATIVE_AGE_TEXT);
        return PromptValidation::Retry;
    }

    if value.fract() != 0.0 || value > f64::from(u32::MAX) {
        return PromptValidation::Retry;
    }

    PromptValidation::Accept(Value::from(value as u32))
}

pub fn collect_info_dialog() -> WaterfallDialog {
    WaterfallDialog::new(
        DialogId::CollectInfo,
        "Asks the user for their name and age and remembers both",
        vec![
            WaterfallStep::new("ask_name", ask_name),
            WaterfallStep::new("ask_age", ask_age),
            WaterfallStep::new("confirm_age", confirm_age),
        ],
    )
}

fn ask_name(dc: &mut DialogContext<'_>, _step: StepContext) -> Result<DialogTurnStatus> {
    dc.prompt(DialogId::NamePrompt, PromptOptions::new(NAME_PROMPT_TEXT))
}

fn ask_age(dc: &mut DialogContext<'_>, step: StepContext) -> Result<DialogTurnStatus> {
    let name: String = step.result_as()?;
    user_name().set(dc.context_mut(), name.clone())?;

    dc.prompt(
        DialogId::AgePrompt,
        PromptOptions::new(age_prompt_text(&name)).with_retry(AGE_RETRY_TEXT),
    )
}

fn confirm_age(dc: &mut DialogContext<'_>, step: StepContext) -> Result<DialogTurnStatus> {
    let age: u32 = step.result_as()?;
    user_age().set(dc.context_mut(), age)?;

    dc.context_mut().send_activity(age_confirmation_text(age));
    dc.end_dialog(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Activity;

    fn turn() -> TurnContext {
        TurnContext::new(Activity::message("console", "c", "u", ""))
    }

    #[test]
    fn test_validate_age() {
        let mut ctx = turn();
        assert_eq!(validate_age(&mut ctx, 30.0), PromptValidation::Accept(Value::from(30u32)));
        assert_eq!(validate_age(&mut ctx, 0.0), PromptValidation::Accept(Value::from(0u32)));
        assert!(!ctx.responded());

        assert_eq!(validate_age(&mut ctx, 2.5), PromptValidation::Retry);
        assert_eq!(validate_age(&mut ctx, 1e12), PromptValidation::Retry);
        assert!(!ctx.responded());

        assert_eq!(validate_age(&mut ctx, -5.0), PromptValidation::Retry);
        assert_eq!(ctx.responses(), [NEGATIVE_AGE_TEXT]);
    }

    #[test]
    fn test_messages() {
        assert_eq!(age_prompt_text("Ada"), "And what is your age, Ada?");
        assert_eq!(age_confirmation_text(5), "I will remember that you are 5 years old.");
    }

    #[test]
    fn test_dialog_shape() {
        let dialog = collect_info_dialog();
        let names: Vec<&str> = dialog.steps.iter().map(|s| s.name).collect();
        assert_eq!(names, ["ask_name", "ask_age", "confirm_age"]);
        assert!(!dialog.description.is_empty());
    }
}
