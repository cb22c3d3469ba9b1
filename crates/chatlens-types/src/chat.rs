//! Conversation views returned by the messaging client.

use serde::{Deserialize, Serialize};

/// Name shown for chats without a display name.
pub const UNKNOWN_CHAT_NAME: &str = "Unknown";

/// A conversation listed for the linked account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSummary {
    /// Platform-serialized chat identifier.
    pub id: String,
    pub name: String,
}

impl ChatSummary {
    /// Build a summary, falling back to [`UNKNOWN_CHAT_NAME`] for blank names.
    pub fn new(id: impl Into<String>, name: Option<String>) -> Self {
        let name = name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_CHAT_NAME.to_string());
        Self { id: id.into(), name }
    }
}

/// A single message as retrieved from a chat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Sender identifier.
    pub from: String,
    /// Text body; empty for media-only messages.
    #[serde(default)]
    pub body: String,
    /// Unix timestamp in seconds.
    pub timestamp: i64,
}
