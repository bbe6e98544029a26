//! Bot handlers module
//!
//! Routes each activity to its handler by activity type:
//! - messages drive the dialog stack
//! - conversation updates may trigger the bot description
//! - everything else is ignored

pub mod messages;

use tracing::debug;

use crate::config::BotConfig;
use crate::dialogs::DialogSet;
use crate::models::ActivityKind;
use crate::state::TurnContext;
use crate::utils::errors::Result;

pub use messages::{handle_members_added, handle_message};

/// Dispatch one activity
pub fn handle_activity(config: &BotConfig, dialogs: &DialogSet, turn: &mut TurnContext) -> Result<()> {
    let kind = turn.activity().kind.clone();
    match kind {
        ActivityKind::Message => handle_message(dialogs, turn),
        ActivityKind::ConversationUpdate => handle_members_added(config, turn),
        ActivityKind::Other(kind) => {
            debug!(kind = %kind, "Ignoring activity");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Activity;

    #[test]
    fn test_other_activity_kinds_are_ignored() {
        let mut activity = Activity::message("console", "conv", "user", "hello");
        activity.kind = ActivityKind::Other("typing".to_string());

        let mut turn = TurnContext::new(activity);
        handle_activity(&BotConfig::default(), &DialogSet::with_default_dialogs(), &mut turn).unwrap();
        assert!(!turn.responded());
    }
}
