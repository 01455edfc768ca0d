//! Backend API
//!
//! Typed access to the chat server's REST and SSE endpoints. The controller
//! talks to the server only through [`ChatBackend`], which [`ChatClient`]
//! implements over HTTP.

pub mod client;
pub mod session;
pub mod types;

#[cfg(test)]
pub mod mock;

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc::Receiver;

use crate::stream::StreamEvent;
use crate::types::chat::{ChatContext, ChatRecord};

pub use client::ChatClient;
pub use session::{ensure_session, RetryPolicy};
pub use types::{
    ChatStreamRequest, DebugSession, Feedback, SavedChat, ServerStatus, SessionInfo,
};

/// Errors returned by backend calls
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApiError {
    #[error("Connection failed: {0}")]
    Transport(String),

    #[error("Server returned {status}: {message}")]
    Http { status: u16, message: String },

    #[error("{message}")]
    RateLimited {
        message: String,
        action_required: Option<String>,
    },

    #[error("Feature not available on the current plan: {0}")]
    FeatureRestricted(String),

    #[error("Server is busy, try again shortly")]
    Busy,

    #[error("Session not found, start a new chat")]
    SessionMissing,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Request rejected: {0}")]
    Rejected(String),

    #[error("Invalid response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Whether repeating the same request later may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Transport(_) | ApiError::Busy => true,
            ApiError::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            ApiError::Http {
                status: status.as_u16(),
                message: e.to_string(),
            }
        } else {
            ApiError::Transport(e.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}

/// Operations the chat server offers
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn server_status(&self) -> Result<ServerStatus, ApiError>;

    /// Ask the server for a fresh session, which becomes the cookie session
    async fn new_session(&self) -> Result<SessionInfo, ApiError>;

    async fn debug_session(&self) -> Result<DebugSession, ApiError>;

    /// Start streaming a response.
    ///
    /// Events arrive on the returned receiver until a terminal event, the end
    /// of the body, or until `stop` is set.
    async fn chat_stream(
        &self,
        request: ChatStreamRequest,
        stop: Arc<AtomicBool>,
    ) -> Result<Receiver<StreamEvent>, ApiError>;

    async fn cancel_request(&self) -> Result<(), ApiError>;

    async fn clear_chat_history(&self) -> Result<(), ApiError>;

    async fn get_thinking_mode(&self) -> Result<bool, ApiError>;

    async fn set_thinking_mode(&self, enabled: bool) -> Result<(), ApiError>;

    async fn list_chats(&self) -> Result<Vec<ChatRecord>, ApiError>;

    async fn save_chat(&self, chat: &ChatRecord) -> Result<SavedChat, ApiError>;

    async fn auto_save_chat(&self, chat: &ChatRecord) -> Result<SavedChat, ApiError>;

    async fn load_chat(&self, id: &str) -> Result<ChatRecord, ApiError>;

    async fn delete_chat(&self, id: &str) -> Result<(), ApiError>;

    async fn chat_context(&self, id: &str) -> Result<ChatContext, ApiError>;

    /// Let the server derive a better title. Returns the title it settled on.
    async fn update_chat_title(&self, id: &str) -> Result<String, ApiError>;

    async fn send_feedback(&self, feedback: &Feedback) -> Result<(), ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(ApiError::Transport("reset".into()).is_retryable());
        assert!(ApiError::Busy.is_retryable());
        assert!(ApiError::Http {
            status: 502,
            message: "bad gateway".into()
        }
        .is_retryable());

        assert!(!ApiError::Http {
            status: 400,
            message: "bad request".into()
        }
        .is_retryable());
        assert!(!ApiError::SessionMissing.is_retryable());
        assert!(!ApiError::Rejected("no".into()).is_retryable());
    }

    #[test]
    fn test_rate_limit_message_is_shown_verbatim() {
        let err = ApiError::RateLimited {
            message: "Limite de mensagens atingido".into(),
            action_required: Some("upgrade".into()),
        };
        assert_eq!(err.to_string(), "Limite de mensagens atingido");
    }
}
