//! Chat records
//!
//! Wire-compatible shapes of the backend's `/api/chats` documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::message::{ChatMessage, Role};
use crate::types::timestamp;

/// Placeholder title used until a real one is derived
pub const DEFAULT_TITLE: &str = "Nova Conversa";

/// A saved conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ChatRecordWire")]
pub struct ChatRecord {
    pub id: String,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    /// Thinking mode at the time of the last save
    pub thinking_mode: bool,
    #[serde(default)]
    pub is_pinned: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    /// The title is a quick local one and should be refined by the backend
    #[serde(default)]
    pub needs_ai_title: bool,
    /// Listing-only summary computed by the backend
    #[serde(default, skip_serializing)]
    pub preview: Option<ChatPreview>,
    /// Listing-only message count, present when `messages` is not loaded
    #[serde(default, skip_serializing)]
    pub message_count: Option<usize>,
}

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

/// `ChatRecord` as the backend stores it.
///
/// The backend's own saves write a legacy `thinking` key next to (or instead
/// of) `thinking_mode`, holding either a flag or the last reasoning text.
#[derive(Deserialize)]
struct ChatRecordWire {
    id: String,
    #[serde(default = "default_title")]
    title: String,
    #[serde(default)]
    messages: Vec<ChatMessage>,
    #[serde(default = "Utc::now", deserialize_with = "timestamp::deserialize")]
    created_at: DateTime<Utc>,
    #[serde(default = "Utc::now", deserialize_with = "timestamp::deserialize")]
    updated_at: DateTime<Utc>,
    #[serde(default)]
    session_id: Option<String>,
    #[serde(default)]
    thinking_mode: Option<bool>,
    #[serde(default)]
    thinking: Option<Value>,
    #[serde(default)]
    is_pinned: bool,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    needs_ai_title: bool,
    #[serde(default)]
    preview: Option<ChatPreview>,
    #[serde(default)]
    message_count: Option<usize>,
}

fn legacy_thinking_flag(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(enabled)) => *enabled,
        Some(Value::String(text)) => !text.trim().is_empty(),
        _ => false,
    }
}

impl From<ChatRecordWire> for ChatRecord {
    fn from(wire: ChatRecordWire) -> Self {
        let thinking_mode = wire
            .thinking_mode
            .unwrap_or_else(|| legacy_thinking_flag(wire.thinking.as_ref()));
        Self {
            id: wire.id,
            title: wire.title,
            messages: wire.messages,
            created_at: wire.created_at,
            updated_at: wire.updated_at,
            session_id: wire.session_id,
            thinking_mode,
            is_pinned: wire.is_pinned,
            tags: wire.tags,
            needs_ai_title: wire.needs_ai_title,
            preview: wire.preview,
            message_count: wire.message_count,
        }
    }
}

impl ChatRecord {
    /// Create an empty record with a fresh id
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            title: title.into(),
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
            session_id: None,
            thinking_mode: false,
            is_pinned: false,
            tags: Vec::new(),
            needs_ai_title: false,
            preview: None,
            message_count: None,
        }
    }

    /// First message sent by the user, if any
    pub fn first_user_message(&self) -> Option<&ChatMessage> {
        self.messages.iter().find(|m| m.role == Role::User)
    }

    /// Number of messages, falling back to the listing count when the
    /// messages were not loaded
    pub fn len(&self) -> usize {
        if self.messages.is_empty() {
            self.message_count
                .or_else(|| self.preview.as_ref().map(|p| p.message_count))
                .unwrap_or(0)
        } else {
            self.messages.len()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Sidebar preview of a chat
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatPreview {
    #[serde(default)]
    pub first_user_message: String,
    #[serde(default)]
    pub last_assistant_message: String,
    #[serde(default)]
    pub message_count: usize,
    #[serde(default)]
    pub has_thinking: bool,
}

/// Message counters for the context viewer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationStats {
    #[serde(default)]
    pub total_messages: usize,
    #[serde(default)]
    pub user_messages: usize,
    #[serde(default)]
    pub assistant_messages: usize,
    #[serde(default)]
    pub has_thinking: bool,
}

/// Full context of one chat, as shown by the context viewer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatContext {
    pub chat_id: String,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    #[serde(default, deserialize_with = "optional_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "optional_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub thinking_enabled: bool,
    #[serde(default)]
    pub context_summary: String,
    #[serde(default)]
    pub conversation_stats: ConversationStats,
}

fn optional_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(timestamp::parse))
}
