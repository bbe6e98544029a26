//! Test context for driving conversations
//!
//! Wraps a `PromptBot` over a shared `MemoryStorage` so tests can talk to
//! the bot turn by turn and inspect what ended up in storage.

use std::sync::Arc;

use multiturn_prompts_bot::config::BotConfig;
use multiturn_prompts_bot::dialogs::DialogStack;
use multiturn_prompts_bot::{MemoryStorage, PromptBot, Storage, UserProfile};

use super::test_data::{members_added, message};

/// One user talking to one bot in one conversation
pub struct TestContext {
    pub bot: PromptBot,
    pub storage: MemoryStorage,
    pub conversation_id: String,
    pub user_id: String,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_storage(MemoryStorage::new())
    }

    /// Context over existing storage, as if the bot had been restarted
    pub fn with_storage(storage: MemoryStorage) -> Self {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();

        let bot = PromptBot::new(Arc::new(storage.clone()), BotConfig::default());
        Self {
            bot,
            storage,
            conversation_id: "test-conversation".to_string(),
            user_id: "test-user".to_string(),
        }
    }

    pub fn with_user(mut self, user_id: &str) -> Self {
        self.user_id = user_id.to_string();
        self
    }

    pub fn with_conversation(mut self, conversation_id: &str) -> Self {
        self.conversation_id = conversation_id.to_string();
        self
    }

    /// Send a message and return the bot's replies
    pub async fn say(&self, text: &str) -> Vec<String> {
        self.bot
            .process_activity(message(&self.conversation_id, &self.user_id, text))
            .await
            .expect("turn should succeed")
    }

    /// Announce members joining the conversation
    pub async fn join(&self, members: &[&str]) -> Vec<String> {
        self.bot
            .process_activity(members_added(&self.conversation_id, members))
            .await
            .expect("turn should succeed")
    }

    /// Walk through the whole collect-info flow
    pub async fn complete_profile(&self, name: &str, age: u32) {
        self.say("hi").await;
        self.say(name).await;
        self.say(&age.to_string()).await;
    }

    /// The user's profile as persisted
    pub async fn stored_profile(&self) -> UserProfile {
        let key = format!("console/users/{}", self.user_id);
        let document = self.storage.read(&key).await.expect("storage read");
        let properties = document
            .as_ref()
            .and_then(|doc| doc.get("properties"))
            .cloned()
            .unwrap_or_default();

        UserProfile {
            name: properties
                .get("user_name")
                .and_then(|v| v.as_str())
                .map(str::to_string),
            age: properties
                .get("user_age")
                .and_then(|v| v.as_u64())
                .map(|age| age as u32),
        }
    }

    /// The conversation's dialog stack as persisted
    pub async fn stored_stack(&self) -> DialogStack {
        let key = format!("console/conversations/{}", self.conversation_id);
        let document = self.storage.read(&key).await.expect("storage read");
        document
            .as_ref()
            .and_then(|doc| doc.get("properties"))
            .and_then(|props| props.get("dialogState"))
            .map(|stack| serde_json::from_value(stack.clone()).expect("valid dialog stack"))
            .unwrap_or_default()
    }
}
