//! Message handlers module
//!
//! Handles incoming text messages and members joining a conversation.

use tracing::debug;

use crate::config::BotConfig;
use crate::dialogs::{DialogId, DialogSet};
use crate::models::UserProfile;
use crate::state::TurnContext;
use crate::utils::errors::Result;
use crate::utils::helpers::normalize_utterance;

/// Utterance that abandons whatever dialog is running
pub const CANCEL_KEYWORD: &str = "cancel";
pub const CANCELLED_TEXT: &str = "Ok... Cancelled.";
pub const NOTHING_TO_CANCEL_TEXT: &str = "Nothing to cancel.";

/// Sent when the conversation starts
pub const BOT_DESCRIPTION: &str = "I am a bot that demonstrates the TextPrompt and NumberPrompt classes \
to collect your name and age, then store those values in UserState for later use. \
Say anything to continue.";

/// Handle incoming text messages
///
/// Cancel wins over everything else; otherwise the active dialog gets the
/// input, and only a turn that is still silent starts a new dialog.
pub fn handle_message(dialogs: &DialogSet, turn: &mut TurnContext) -> Result<()> {
    let utterance = normalize_utterance(turn.activity().text());
    let mut dc = dialogs.create_context(turn)?;

    if utterance == CANCEL_KEYWORD {
        if dc.active_dialog().is_some() {
            dc.cancel_all()?;
            dc.context_mut().send_activity(CANCELLED_TEXT);
        } else {
            dc.context_mut().send_activity(NOTHING_TO_CANCEL_TEXT);
        }
    }

    if !dc.context().responded() {
        let status = dc.continue_dialog()?;
        debug!(status = ?status, "Continued active dialog");
    }

    if !dc.context().responded() {
        let profile = UserProfile::load(dc.context())?;
        let dialog = if profile.is_complete() {
            DialogId::GreetUser
        } else {
            DialogId::CollectInfo
        };

        debug!(dialog = %dialog, "Starting dialog");
        dc.begin(dialog)?;
    }

    Ok(())
}

/// Handle members joining the conversation
///
/// Only the first added member is inspected; the description is sent when
/// it is the configured sentinel member.
pub fn handle_members_added(config: &BotConfig, turn: &mut TurnContext) -> Result<()> {
    let first_member = turn.activity().members_added.first().map(|m| m.id.clone());

    match first_member {
        Some(member_id) if member_id == config.description_member_id => {
            debug!(member_id = %member_id, "Sending bot description");
            turn.send_activity(BOT_DESCRIPTION);
        }
        Some(member_id) => {
            debug!(member_id = %member_id, "Ignoring members added");
        }
        None => {
            debug!("Conversation update without added members");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogs::dialog_state;
    use crate::models::profile::{user_age, user_name};
    use crate::models::{Activity, ChannelAccount};

    fn message(text: &str) -> TurnContext {
        TurnContext::new(Activity::message("console", "conv", "user", text))
    }

    #[test]
    fn test_nothing_to_cancel() {
        let dialogs = DialogSet::with_default_dialogs();
        let mut turn = message("  CANCEL ");
        handle_message(&dialogs, &mut turn).unwrap();

        assert_eq!(turn.responses(), [NOTHING_TO_CANCEL_TEXT]);
        assert!(dialog_state().get(&turn).unwrap().is_none());
    }

    #[test]
    fn test_new_user_is_asked_for_name() {
        let dialogs = DialogSet::with_default_dialogs();
        let mut turn = message("hello");
        handle_message(&dialogs, &mut turn).unwrap();

        assert_eq!(turn.responses(), ["What is your name, human?"]);
        let stack = dialog_state().get(&turn).unwrap().unwrap();
        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.active().unwrap().dialog, DialogId::NamePrompt);
    }

    #[test]
    fn test_known_user_is_greeted() {
        let dialogs = DialogSet::with_default_dialogs();
        let mut turn = message("hello");
        user_name().set(&mut turn, "Ada".to_string()).unwrap();
        user_age().set(&mut turn, 30).unwrap();

        handle_message(&dialogs, &mut turn).unwrap();
        assert_eq!(turn.responses(), ["Your name is Ada and you are 30 years old."]);
        assert!(dialog_state().get(&turn).unwrap().unwrap().is_empty());
    }

    #[test]
    fn test_description_for_sentinel_member() {
        let config = BotConfig::default();
        let mut turn = TurnContext::new(Activity::conversation_update(
            "console",
            "conv",
            "default-user",
            vec![ChannelAccount::new("default-user"), ChannelAccount::new("bot")],
        ));

        handle_members_added(&config, &mut turn).unwrap();
        assert_eq!(turn.responses(), [BOT_DESCRIPTION]);
        assert!(BOT_DESCRIPTION.starts_with("I am a bot that demonstrates"));
        assert!(BOT_DESCRIPTION.ends_with("Say anything to continue."));
    }

    #[test]
    fn test_other_members_are_ignored() {
        let config = BotConfig::default();
        let mut turn = TurnContext::new(Activity::conversation_update(
            "console",
            "conv",
            "someone",
            vec![ChannelAccount::new("bot"), ChannelAccount::new("default-user")],
        ));
        handle_members_added(&config, &mut turn).unwrap();
        assert!(!turn.responded());

        let mut empty = TurnContext::new(Activity::conversation_update("console", "conv", "x", vec![]));
        handle_members_added(&config, &mut empty).unwrap();
        assert!(!empty.responded());
    }
}
