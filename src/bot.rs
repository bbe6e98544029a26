//! Turn processing
//!
//! `PromptBot` owns the state scopes and the dialog set and runs one
//! activity at a time through load, route and save.

use std::sync::Arc;

use tracing::{info, instrument};

use crate::config::BotConfig;
use crate::dialogs::DialogSet;
use crate::handlers::handle_activity;
use crate::middleware::LoggingMiddleware;
use crate::models::Activity;
use crate::state::{BotState, Storage, TurnContext};
use crate::utils::errors::Result;
use crate::utils::logging::log_turn_started;

/// Multi-turn prompting bot
pub struct PromptBot {
    config: BotConfig,
    user_state: BotState,
    conversation_state: BotState,
    dialogs: DialogSet,
    middleware: LoggingMiddleware,
}

impl PromptBot {
    pub fn new(storage: Arc<dyn Storage>, config: BotConfig) -> Self {
        info!(bot = %config.name, "Creating bot");

        Self {
            config,
            user_state: BotState::user(Arc::clone(&storage)),
            conversation_state: BotState::conversation(storage),
            dialogs: DialogSet::with_default_dialogs(),
            middleware: LoggingMiddleware::default(),
        }
    }

    /// Replace the logging middleware
    pub fn with_middleware(mut self, middleware: LoggingMiddleware) -> Self {
        self.middleware = middleware;
        self
    }

    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    pub fn dialogs(&self) -> &DialogSet {
        &self.dialogs
    }

    /// Process one activity and return the replies it produced, in order
    ///
    /// State is saved only after the turn logic succeeds; a failed turn
    /// leaves storage as it was.
    #[instrument(skip(self, activity), fields(conversation_id = %activity.conversation.id))]
    pub async fn process_activity(&self, activity: Activity) -> Result<Vec<String>> {
        self.middleware.log_activity(&activity);
        log_turn_started(&activity.conversation.id, &activity.from.id, activity.kind.as_str());

        let tracker = self.middleware.create_performance_span("turn");
        let conversation_id = activity.conversation.id.clone();
        let mut turn = TurnContext::new(activity);

        let result = self.run_turn(&mut turn).await;

        if let Some(tracker) = tracker {
            tracker.complete(result.is_ok());
        }

        if let Err(e) = result {
            self.middleware.log_error(&e, "process_activity", Some(&conversation_id));
            return Err(e);
        }

        self.middleware.log_replies(turn.activity(), turn.responses(), turn.started_at());
        Ok(turn.into_responses())
    }

    async fn run_turn(&self, turn: &mut TurnContext) -> Result<()> {
        self.user_state.load(turn).await?;
        self.conversation_state.load(turn).await?;

        handle_activity(&self.config, &self.dialogs, turn)?;

        self.user_state.save_changes(turn).await?;
        self.conversation_state.save_changes(turn).await?;
        Ok(())
    }
}

impl std::fmt::Debug for PromptBot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptBot")
            .field("config", &self.config)
            .field("dialogs", &self.dialogs.len())
            .finish_non_exhaustive()
    }
}
