//! State management module
//!
//! This module handles per-turn context, scoped user and conversation state,
//! and the storage backends that persist it between turns.

pub mod bot_state;
pub mod context;
pub mod redis_store;
pub mod storage;

// Re-export commonly used state components
pub use bot_state::{BotState, StatePropertyAccessor};
pub use context::{StateBag, StateScope, TurnContext};
pub use redis_store::RedisStorage;
pub use storage::{create_storage, MemoryStorage, Storage};
