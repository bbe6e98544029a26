//! Data models
//!
//! Inbound activities and the user profile collected by the bot.

pub mod activity;
pub mod profile;

pub use activity::{Activity, ActivityKind, ChannelAccount, ConversationAccount};
pub use profile::UserProfile;
