//! Shared data types

pub mod chat;
pub mod message;
pub mod timestamp;

pub use chat::{ChatContext, ChatPreview, ChatRecord, ConversationStats, DEFAULT_TITLE};
pub use message::{ChatMessage, Role};
