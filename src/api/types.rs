//! Request and response bodies of the backend's REST endpoints
//!
//! Field names follow the backend's JSON, which mixes Portuguese and English.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::chat::{ChatContext, ChatRecord};

pub const STATUS_OK: &str = "sucesso";

/// Body of `POST /chat-stream`
#[derive(Debug, Clone, Serialize)]
pub struct ChatStreamRequest {
    #[serde(rename = "mensagem")]
    pub message: String,
    pub thinking_mode: bool,
}

/// Common `{status, message}` envelope. Errors may use `erro` or `error`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusEnvelope {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub erro: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub action_required: Option<String>,
}

impl StatusEnvelope {
    pub fn is_ok(&self) -> bool {
        self.status.as_deref() == Some(STATUS_OK)
    }

    /// Best human-readable explanation the backend gave
    pub fn reason(&self) -> String {
        self.error
            .clone()
            .or_else(|| self.erro.clone())
            .or_else(|| self.message.clone())
            .unwrap_or_else(|| "Erro desconhecido".to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub session_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewSessionResponse {
    #[serde(flatten)]
    pub envelope: StatusEnvelope,
    #[serde(default)]
    pub session_id: Option<String>,
}

/// `GET /debug-session`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DebugSession {
    #[serde(default)]
    pub flask_session_id: Option<String>,
    #[serde(default)]
    pub session_exists_in_manager: bool,
}

impl DebugSession {
    /// The backend knows this session and it matches ours
    pub fn confirms(&self, session_id: &str) -> bool {
        self.session_exists_in_manager && self.flask_session_id.as_deref() == Some(session_id)
    }
}

/// `GET /status`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ServerStatus {
    #[serde(default)]
    pub status: String,
    #[serde(default, rename = "usuarios_ativos")]
    pub active_users: u32,
    #[serde(default, rename = "maximo_usuarios")]
    pub max_users: u32,
    #[serde(default, rename = "disponivel")]
    pub available: bool,
    #[serde(default, rename = "fila_espera")]
    pub queue: Value,
}

impl ServerStatus {
    pub fn label(&self) -> String {
        if self.available {
            format!("Online • {}/{}", self.active_users, self.max_users)
        } else {
            format!("Ocupado • {}/{}", self.active_users, self.max_users)
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ThinkingModeResponse {
    #[serde(default)]
    pub thinking_mode: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ThinkingModeRequest {
    pub enabled: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatListResponse {
    #[serde(flatten)]
    pub envelope: StatusEnvelope,
    #[serde(default)]
    pub chats: Vec<ChatRecord>,
}

/// Result of `POST /api/chats` and `POST /api/chats/auto-save`
#[derive(Debug, Clone, Deserialize)]
pub struct SaveChatResponse {
    #[serde(flatten)]
    pub envelope: StatusEnvelope,
    #[serde(default)]
    pub chat_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

/// Id and title the backend settled on for a saved chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedChat {
    pub chat_id: String,
    pub title: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoadChatResponse {
    #[serde(flatten)]
    pub envelope: StatusEnvelope,
    pub chat: Option<ChatRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatContextResponse {
    #[serde(flatten)]
    pub envelope: StatusEnvelope,
    pub context: Option<ChatContext>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTitleResponse {
    #[serde(flatten)]
    pub envelope: StatusEnvelope,
    #[serde(default)]
    pub title: Option<String>,
}

/// Body of `POST /api/feedback`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feedback {
    #[serde(rename = "tipo")]
    pub kind: String,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descricao")]
    pub description: String,
    pub thinking_mode: bool,
}

impl Feedback {
    /// The backend rejects titles under 5 and descriptions under 10 characters
    pub fn is_valid(&self) -> bool {
        self.title.trim().chars().count() >= 5 && self.description.trim().chars().count() >= 10
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_request_uses_backend_keys() {
        let body = serde_json::to_value(ChatStreamRequest {
            message: "oi /think".to_string(),
            thinking_mode: true,
        })
        .unwrap();
        assert_eq!(body["mensagem"], "oi /think");
        assert_eq!(body["thinking_mode"], true);
    }

    #[test]
    fn test_envelope_reason_precedence() {
        let envelope: StatusEnvelope =
            serde_json::from_str(r#"{"status":"erro","message":"m","erro":"e"}"#).unwrap();
        assert!(!envelope.is_ok());
        assert_eq!(envelope.reason(), "e");

        let envelope: StatusEnvelope = serde_json::from_str(r#"{"status":"sucesso"}"#).unwrap();
        assert!(envelope.is_ok());
    }

    #[test]
    fn test_server_status_label() {
        let status: ServerStatus = serde_json::from_str(
            r#"{"status":"online","usuarios_ativos":3,"maximo_usuarios":50,"disponivel":true,"fila_espera":0,"stats":{}}"#,
        )
        .unwrap();
        assert_eq!(status.label(), "Online • 3/50");
    }

    #[test]
    fn test_debug_session_confirms() {
        let debug: DebugSession = serde_json::from_str(
            r#"{"flask_session_id":"abc","session_exists_in_manager":true,"manager_status":{}}"#,
        )
        .unwrap();
        assert!(debug.confirms("abc"));
        assert!(!debug.confirms("xyz"));
    }

    #[test]
    fn test_feedback_validation() {
        let mut feedback = Feedback {
            kind: "geral".to_string(),
            title: "Bug".to_string(),
            description: "Algo quebrou no chat".to_string(),
            thinking_mode: false,
        };
        assert!(!feedback.is_valid());
        feedback.title = "Bug no envio".to_string();
        assert!(feedback.is_valid());

        let body = serde_json::to_value(&feedback).unwrap();
        assert_eq!(body["titulo"], "Bug no envio");
        assert_eq!(body["tipo"], "geral");
    }
}
