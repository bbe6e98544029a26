//! Multi-turn prompts bot
//!
//! A conversational bot that asks a user for their name and age across
//! several turns, remembers both in user state and greets the user with
//! them afterwards. Dialog progress lives in conversation state, so a
//! conversation can resume on any turn.

pub mod adapter;
pub mod bot;
pub mod config;
pub mod dialogs;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod state;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{BotError, Result};

// Re-export main components for easy access
pub use bot::PromptBot;
pub use dialogs::DialogSet;
pub use models::{Activity, UserProfile};
pub use state::{MemoryStorage, Storage};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
