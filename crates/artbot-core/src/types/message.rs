//! Chat message types exchanged with a channel.

use serde::{Deserialize, Serialize};

/// Incoming message from a channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomingMessage {
    /// Target the message was addressed to (`#channel` or our own nick).
    pub target: String,
    pub sender: String,
    pub content: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl IncomingMessage {
    pub fn new(
        target: impl Into<String>,
        sender: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            target: target.into(),
            sender: sender.into(),
            content: content.into(),
            timestamp: chrono::Utc::now(),
        }
    }
}

/// Outgoing line of text to a channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingMessage {
    pub target: String,
    pub content: String,
}

impl OutgoingMessage {
    pub fn new(target: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            content: content.into(),
        }
    }
}
