//! Message types
//!
//! Defines chat message structures and roles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::timestamp;

/// Role of a message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Message from the user
    User,
    /// Message from the AI assistant
    Assistant,
    /// System prompt
    System,
}

/// A single chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// The role of the message sender
    pub role: Role,
    /// The content of the message, with reasoning blocks removed
    #[serde(default)]
    pub content: String,
    /// When the message was created
    #[serde(default = "Utc::now", deserialize_with = "timestamp::deserialize")]
    pub timestamp: DateTime<Utc>,
    /// Reasoning produced before the answer, assistant messages only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thinking: Option<String>,
}

impl ChatMessage {
    /// Create a new message
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
            thinking: None,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn has_thinking(&self) -> bool {
        self.thinking.as_deref().is_some_and(|t| !t.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_creation() {
        let msg = ChatMessage::new(Role::User, "Hello, world!");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.content, "Hello, world!");
        assert!(msg.timestamp <= Utc::now());
        assert!(!msg.has_thinking());
    }

    #[test]
    fn test_role_equality() {
        assert_eq!(Role::User, Role::User);
        assert_ne!(Role::User, Role::Assistant);
    }

    #[test]
    fn test_wire_format() {
        // The backend writes naive ISO timestamps
        let json = r#"{"role":"assistant","content":"Oi","timestamp":"2025-06-01T12:00:00.250000","thinking":"hmm"}"#;
        let msg: ChatMessage = serde_json::from_str(json).unwrap();
        assert_eq!(msg.role, Role::Assistant);
        assert_eq!(msg.timestamp.to_rfc3339(), "2025-06-01T12:00:00.250+00:00");
        assert!(msg.has_thinking());

        let json = r#"{"role":"user","content":"Oi"}"#;
        let msg: ChatMessage = serde_json::from_str(json).unwrap();
        assert_eq!(msg.thinking, None);

        let out = serde_json::to_value(ChatMessage::user("x")).unwrap();
        assert_eq!(out["role"], "user");
        assert!(out.get("thinking").is_none());
    }
}
