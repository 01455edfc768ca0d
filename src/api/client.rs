//! HTTP client for the chat server
//!
//! The server keys its session on a cookie, so one [`ChatClient`] (and its
//! cookie store) must be used for the whole lifetime of a session.

use std::fmt::Display;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::{Stream, StreamExt};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tokio::sync::mpsc::{self, Receiver};

use crate::api::types::{
    ChatContextResponse, ChatListResponse, ChatStreamRequest, DebugSession, Feedback,
    LoadChatResponse, NewSessionResponse, SaveChatResponse, SavedChat, ServerStatus,
    SessionInfo, StatusEnvelope, ThinkingModeRequest, ThinkingModeResponse, UpdateTitleResponse,
};
use crate::api::{ApiError, ChatBackend};
use crate::stream::{SseDecoder, StreamEvent};
use crate::types::chat::{ChatContext, ChatRecord};

/// Buffered events between the reader task and the consumer
const STREAM_CHANNEL_CAPACITY: usize = 256;
/// How often a waiting stream reader looks at the stop flag
const STOP_CHECK_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone)]
pub struct ChatClient {
    http: Client,
    base_url: String,
}

impl ChatClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let http = Client::builder()
            .cookie_store(true)
            .connect_timeout(timeout)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn chat_url(&self, id: &str, suffix: &str) -> String {
        format!("{}/api/chats/{}{}", self.base_url, id, suffix)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        tracing::debug!(url = %url, "GET");
        let response = self.http.get(url).send().await?;
        read_json(response).await
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        url: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<T, ApiError> {
        tracing::debug!(url = %url, "POST");
        let mut request = self.http.post(url);
        if let Some(body) = body {
            request = request.json(body);
        }
        read_json(request.send().await?).await
    }

    /// POST whose only meaningful answer is the status envelope
    async fn post_expect_ok(&self, url: &str, body: Option<&serde_json::Value>) -> Result<(), ApiError> {
        let envelope: StatusEnvelope = self.post_json(url, body).await?;
        check_envelope(&envelope)
    }
}

/// Turn a non-success status into the matching [`ApiError`]
pub fn map_http_status(status: StatusCode, body: &str) -> ApiError {
    let envelope: StatusEnvelope = serde_json::from_str(body).unwrap_or_default();
    let message = if envelope.error.is_some() || envelope.erro.is_some() || envelope.message.is_some() {
        envelope.reason()
    } else {
        status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string()
    };

    match status.as_u16() {
        401 => ApiError::SessionMissing,
        402 => ApiError::FeatureRestricted(message),
        404 => ApiError::NotFound(message),
        429 => ApiError::RateLimited {
            message,
            action_required: envelope.action_required,
        },
        503 => ApiError::Busy,
        code => ApiError::Http {
            status: code,
            message,
        },
    }
}

fn check_envelope(envelope: &StatusEnvelope) -> Result<(), ApiError> {
    match envelope.status.as_deref() {
        Some(status) if status != crate::api::types::STATUS_OK => {
            Err(ApiError::Rejected(envelope.reason()))
        }
        _ => Ok(()),
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    let text = response.text().await?;
    if !status.is_success() {
        return Err(map_http_status(status, &text));
    }
    Ok(serde_json::from_str(&text)?)
}

fn saved_chat(response: SaveChatResponse, fallback: &ChatRecord) -> Result<SavedChat, ApiError> {
    check_envelope(&response.envelope)?;
    Ok(SavedChat {
        chat_id: response.chat_id.unwrap_or_else(|| fallback.id.clone()),
        title: response.title.unwrap_or_else(|| fallback.title.clone()),
    })
}

/// Read an SSE body into `tx` until it ends, the receiver goes away or `stop` is set.
///
/// The receiver and the stop flag are watched while waiting on the body, so a
/// stalled server does not keep the connection open after either fires.
async fn pump_events<S, B, E>(body: S, tx: mpsc::Sender<StreamEvent>, stop: Arc<AtomicBool>)
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: Display,
{
    tokio::pin!(body);
    let mut decoder = SseDecoder::new();
    let mut stop_check = tokio::time::interval(STOP_CHECK_INTERVAL);
    let mut chunks = 0usize;

    loop {
        if stop.load(Ordering::Relaxed) {
            tracing::debug!("Stream stopped by user after {} chunks", chunks);
            return;
        }

        let next = tokio::select! {
            next = body.next() => next,
            _ = tx.closed() => {
                tracing::debug!("Stream receiver dropped");
                return;
            }
            _ = stop_check.tick() => continue,
        };

        let bytes = match next {
            Some(Ok(bytes)) => bytes,
            Some(Err(e)) => {
                tracing::error!("Stream interrupted: {}", e);
                let _ = tx.send(StreamEvent::transport_error(e.to_string())).await;
                return;
            }
            None => break,
        };
        chunks += 1;

        for event in decoder.feed(bytes.as_ref()) {
            let terminal = event.is_terminal();
            if tx.send(event).await.is_err() {
                tracing::debug!("Stream receiver dropped");
                return;
            }
            if terminal {
                return;
            }
        }
    }

    for event in decoder.finish() {
        if tx.send(event).await.is_err() {
            return;
        }
    }
    tracing::debug!("Stream body ended after {} chunks", chunks);
}

#[async_trait]
impl ChatBackend for ChatClient {
    async fn server_status(&self) -> Result<ServerStatus, ApiError> {
        self.get_json(&self.url("/status")).await
    }

    async fn new_session(&self) -> Result<SessionInfo, ApiError> {
        let response: NewSessionResponse = self.post_json(&self.url("/new-session"), None).await?;
        check_envelope(&response.envelope)?;
        let session_id = response
            .session_id
            .ok_or_else(|| ApiError::Decode("missing session_id".to_string()))?;
        Ok(SessionInfo { session_id })
    }

    async fn debug_session(&self) -> Result<DebugSession, ApiError> {
        self.get_json(&self.url("/debug-session")).await
    }

    async fn chat_stream(
        &self,
        request: ChatStreamRequest,
        stop: Arc<AtomicBool>,
    ) -> Result<Receiver<StreamEvent>, ApiError> {
        let url = self.url("/chat-stream");
        tracing::debug!(url = %url, thinking = request.thinking_mode, "Opening chat stream");

        let response = self
            .http
            .post(&url)
            .header("Accept", "text/event-stream")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_http_status(status, &body));
        }

        let (tx, rx) = mpsc::channel(STREAM_CHANNEL_CAPACITY);
        tokio::spawn(pump_events(response.bytes_stream(), tx, stop));
        Ok(rx)
    }

    async fn cancel_request(&self) -> Result<(), ApiError> {
        let body = serde_json::json!({ "action": "cancel" });
        self.post_expect_ok(&self.url("/cancel-request"), Some(&body)).await
    }

    async fn clear_chat_history(&self) -> Result<(), ApiError> {
        self.post_expect_ok(&self.url("/clear-chat-history"), None).await
    }

    async fn get_thinking_mode(&self) -> Result<bool, ApiError> {
        let response: ThinkingModeResponse = self.get_json(&self.url("/thinking-mode")).await?;
        response
            .thinking_mode
            .ok_or_else(|| ApiError::Decode("missing thinking_mode".to_string()))
    }

    async fn set_thinking_mode(&self, enabled: bool) -> Result<(), ApiError> {
        let body = serde_json::to_value(ThinkingModeRequest { enabled })?;
        self.post_expect_ok(&self.url("/thinking-mode"), Some(&body)).await
    }

    async fn list_chats(&self) -> Result<Vec<ChatRecord>, ApiError> {
        let response: ChatListResponse = self.get_json(&self.url("/api/chats")).await?;
        check_envelope(&response.envelope)?;
        Ok(response.chats)
    }

    async fn save_chat(&self, chat: &ChatRecord) -> Result<SavedChat, ApiError> {
        let body = serde_json::to_value(chat)?;
        let response: SaveChatResponse = self.post_json(&self.url("/api/chats"), Some(&body)).await?;
        saved_chat(response, chat)
    }

    async fn auto_save_chat(&self, chat: &ChatRecord) -> Result<SavedChat, ApiError> {
        let body = serde_json::to_value(chat)?;
        let response: SaveChatResponse = self
            .post_json(&self.url("/api/chats/auto-save"), Some(&body))
            .await?;
        saved_chat(response, chat)
    }

    async fn load_chat(&self, id: &str) -> Result<ChatRecord, ApiError> {
        let response: LoadChatResponse = self.get_json(&self.chat_url(id, "/load")).await?;
        check_envelope(&response.envelope)?;
        response.chat.ok_or_else(|| ApiError::NotFound(id.to_string()))
    }

    async fn delete_chat(&self, id: &str) -> Result<(), ApiError> {
        let url = self.chat_url(id, "");
        tracing::debug!(url = %url, "DELETE");
        let response = self.http.delete(&url).send().await?;
        let envelope: StatusEnvelope = read_json(response).await?;
        check_envelope(&envelope)
    }

    async fn chat_context(&self, id: &str) -> Result<ChatContext, ApiError> {
        let response: ChatContextResponse = self.get_json(&self.chat_url(id, "/context")).await?;
        check_envelope(&response.envelope)?;
        response.context.ok_or_else(|| ApiError::NotFound(id.to_string()))
    }

    async fn update_chat_title(&self, id: &str) -> Result<String, ApiError> {
        let response: UpdateTitleResponse = self
            .post_json(&self.chat_url(id, "/update-title"), None)
            .await?;
        check_envelope(&response.envelope)?;
        response
            .title
            .ok_or_else(|| ApiError::Decode("missing title".to_string()))
    }

    async fn send_feedback(&self, feedback: &Feedback) -> Result<(), ApiError> {
        let body = serde_json::to_value(feedback)?;
        self.post_expect_ok(&self.url("/api/feedback"), Some(&body)).await
    }
}
