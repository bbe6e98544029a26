//! Activity model
//!
//! Inbound turn events, shaped after the Bot Framework activity schema for
//! the fields this bot reads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::helpers::generate_uuid;

/// Activity type discriminator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActivityKind {
    Message,
    ConversationUpdate,
    Other(String),
}

impl ActivityKind {
    pub fn as_str(&self) -> &str {
        match self {
            ActivityKind::Message => "message",
            ActivityKind::ConversationUpdate => "conversationUpdate",
            ActivityKind::Other(kind) => kind,
        }
    }
}

impl From<String> for ActivityKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "message" => ActivityKind::Message,
            "conversationUpdate" => ActivityKind::ConversationUpdate,
            _ => ActivityKind::Other(value),
        }
    }
}

impl From<ActivityKind> for String {
    fn from(kind: ActivityKind) -> Self {
        kind.as_str().to_string()
    }
}

impl std::fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user or bot taking part in a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelAccount {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ChannelAccount {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), name: None }
    }
}

/// Conversation identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationAccount {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub channel_id: String,
    pub from: ChannelAccount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<ChannelAccount>,
    pub conversation: ConversationAccount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members_added: Vec<ChannelAccount>,
    pub timestamp: DateTime<Utc>,
}

impl Activity {
    /// Build a text message from `user_id` in `conversation_id`
    pub fn message(
        channel_id: &str,
        conversation_id: &str,
        user_id: &str,
        text: impl Into<String>,
    ) -> Self {
        Self {
            id: generate_uuid(),
            kind: ActivityKind::Message,
            channel_id: channel_id.to_string(),
            from: ChannelAccount::new(user_id),
            recipient: None,
            conversation: ConversationAccount { id: conversation_id.to_string() },
            text: Some(text.into()),
            members_added: Vec::new(),
            timestamp: Utc::now(),
        }
    }

    /// Build a conversation update announcing `members_added`
    pub fn conversation_update(
        channel_id: &str,
        conversation_id: &str,
        user_id: &str,
        members_added: Vec<ChannelAccount>,
    ) -> Self {
        Self {
            id: generate_uuid(),
            kind: ActivityKind::ConversationUpdate,
            channel_id: channel_id.to_string(),
            from: ChannelAccount::new(user_id),
            recipient: None,
            conversation: ConversationAccount { id: conversation_id.to_string() },
            text: None,
            members_added,
            timestamp: Utc::now(),
        }
    }

    pub fn is_message(&self) -> bool {
        self.kind == ActivityKind::Message
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }
}
