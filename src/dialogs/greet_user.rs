//! Greet-known-user dialog

use crate::models::UserProfile;
use crate::utils::errors::{BotError, Result};
use super::dialog_set::{DialogContext, DialogTurnStatus, StepContext, WaterfallDialog, WaterfallStep};
use super::stack::DialogId;

pub fn greeting_text(name: &str, age: u32) -> String {
    format!("Your name is {} and you are {} years old.", name, age)
}

pub fn greet_user_dialog() -> WaterfallDialog {
    WaterfallDialog::new(
        DialogId::GreetUser,
        "Repeats the stored name and age back to the user",
        vec![WaterfallStep::new("greet", greet)],
    )
}

fn greet(dc: &mut DialogContext<'_>, _step: StepContext) -> Result<DialogTurnStatus> {
    let profile = UserProfile::load(dc.context())?;
    let (name, age) = match (profile.name, profile.age) {
        (Some(name), Some(age)) => (name, age),
        _ => {
            return Err(BotError::InvalidStateTransition {
                from: "incomplete_profile".to_string(),
                to: DialogId::GreetUser.to_string(),
            });
        }
    };

    dc.context_mut().send_activity(greeting_text(&name, age));
    dc.end_dialog(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogs::DialogSet;
    use crate::models::profile::{user_age, user_name};
    use crate::models::Activity;
    use crate::state::TurnContext;
    use assert_matches::assert_matches;

    #[test]
    fn test_greets_and_ends() {
        let set = DialogSet::with_default_dialogs();
        let mut ctx = TurnContext::new(Activity::message("console", "c", "u", "hi"));
        user_name().set(&mut ctx, "Ada".to_string()).unwrap();
        user_age().set(&mut ctx, 30).unwrap();

        let mut dc = set.create_context(&mut ctx).unwrap();
        assert_eq!(dc.begin(DialogId::GreetUser).unwrap(), DialogTurnStatus::Complete(None));
        assert!(dc.active_dialog().is_none());
        assert_eq!(ctx.responses(), ["Your name is Ada and you are 30 years old."]);
    }

    #[test]
    fn test_incomplete_profile_is_an_error() {
        let set = DialogSet::with_default_dialogs();
        let mut ctx = TurnContext::new(Activity::message("console", "c", "u", "hi"));
        user_name().set(&mut ctx, "Ada".to_string()).unwrap();

        let mut dc = set.create_context(&mut ctx).unwrap();
        assert_matches!(
            dc.begin(DialogId::GreetUser),
            Err(BotError::InvalidStateTransition { .. })
        );
    }
}
