//! Chat controller
//!
//! Owns the application state and drives every user action against the
//! backend: initialization, streamed turns, auto-save and history
//! management.
//!
//! # Concurrency
//!
//! The UI keeps the controller behind an async mutex that a turn holds until
//! it completes. The stop flag returned by [`ChatController::stop_handle`] is
//! shared outside that lock so a turn can be cancelled while it runs.

pub mod state;
pub mod validation;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use thiserror::Error;

use crate::api::{
    ensure_session, ApiError, ChatBackend, ChatStreamRequest, Feedback, RetryPolicy, SavedChat,
    ServerStatus, SessionInfo,
};
use crate::history::{build_context, preview, smart_title};
use crate::stream::{ResponseTurn, ResponseView, TurnProgress};
use crate::thinking::{apply_thinking_command, detect_inline_command, ThinkingMode};
use crate::types::chat::{ChatContext, ChatRecord, DEFAULT_TITLE};
use crate::types::message::ChatMessage;

pub use state::ChatState;
pub use validation::{validate_input, InputProblem, MAX_MESSAGE_CHARS};

/// How often a waiting turn checks the stop flag
const STOP_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Errors from controller operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ChatError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("{0}")]
    InvalidInput(InputProblem),

    #[error("No active session")]
    NoSession,

    #[error("A response is already being generated")]
    AlreadyGenerating,

    #[error("Generation cancelled")]
    Cancelled,

    #[error("{message}")]
    Stream {
        message: String,
        action_required: Option<String>,
    },
}

pub struct ChatController<B> {
    backend: B,
    state: ChatState,
    policy: RetryPolicy,
    stop: Arc<AtomicBool>,
}

impl<B: ChatBackend> ChatController<B> {
    pub fn new(backend: B, policy: RetryPolicy, thinking_enabled: bool) -> Self {
        Self {
            backend,
            state: ChatState::new(thinking_enabled),
            policy,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn state(&self) -> &ChatState {
        &self.state
    }

    /// Flag that cancels the running turn when set
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        self.stop.clone()
    }

    /// Create a session, then load the server's thinking mode and the saved chats.
    ///
    /// Only the session is required; the rest falls back to local state.
    pub async fn initialize(&mut self) -> Result<SessionInfo, ChatError> {
        let session = ensure_session(&self.backend, &self.policy).await?;
        self.state.session = Some(session.clone());

        match self.backend.get_thinking_mode().await {
            Ok(enabled) => self.state.thinking = ThinkingMode::new(enabled),
            Err(e) => tracing::warn!("Could not read thinking mode, keeping local: {}", e),
        }

        if let Err(e) = self.refresh_history().await {
            tracing::warn!("Could not load chat history: {}", e);
        }

        tracing::info!(
            "Controller initialized (thinking: {}, chats: {})",
            self.state.thinking.enabled,
            self.state.history.len()
        );
        Ok(session)
    }

    pub async fn server_status(&self) -> Result<ServerStatus, ChatError> {
        Ok(self.backend.server_status().await?)
    }

    /// Send a message and stream the reply.
    ///
    /// `on_update` sees the response after every stream event. On success the
    /// assistant message is appended and the conversation is auto-saved. A
    /// cancelled turn keeps whatever answer text had arrived.
    pub async fn send_message<F>(&mut self, text: &str, mut on_update: F) -> Result<ChatMessage, ChatError>
    where
        F: FnMut(&ResponseView),
    {
        let text = validate_input(text).map_err(ChatError::InvalidInput)?.to_string();
        if self.state.generating {
            return Err(ChatError::AlreadyGenerating);
        }
        let session_id = self.state.session_id().ok_or(ChatError::NoSession)?.to_string();

        let show_thinking = detect_inline_command(&text).unwrap_or(self.state.thinking.enabled);
        let request = ChatStreamRequest {
            message: apply_thinking_command(&text, self.state.thinking.enabled),
            thinking_mode: show_thinking,
        };

        self.begin_turn(&text, session_id);
        tracing::info!(
            "Sending message ({} chars, thinking: {})",
            text.chars().count(),
            show_thinking
        );

        self.state.generating = true;
        let mut turn = ResponseTurn::new(show_thinking);
        let outcome = self.stream_turn(request, &mut turn, &mut on_update).await;
        self.state.generating = false;
        // a stop pressed before the turn started still applies to it
        self.stop.store(false, Ordering::Relaxed);

        match outcome {
            Ok(()) => {
                if let Some(stats) = turn.stats() {
                    tracing::debug!("Response complete: {} chunks, {} chars", stats.chunks, stats.length);
                }
                let message = turn.into_message();
                self.push_message(message.clone());
                if let Err(e) = self.auto_save().await {
                    tracing::warn!("Auto-save failed: {}", e);
                }
                Ok(message)
            }
            Err(ChatError::Cancelled) => {
                if !turn.view().answer.is_empty() {
                    self.push_message(turn.into_message());
                }
                Err(ChatError::Cancelled)
            }
            Err(e) => Err(e),
        }
    }

    fn begin_turn(&mut self, text: &str, session_id: String) {
        let conversation = &mut self.state.conversation;
        if conversation.messages.is_empty() && conversation.title == DEFAULT_TITLE {
            conversation.title = smart_title(text);
            conversation.needs_ai_title = true;
        }
        conversation.session_id = Some(session_id);
        conversation.thinking_mode = self.state.thinking.enabled;
        self.push_message(ChatMessage::user(text));
    }

    fn push_message(&mut self, message: ChatMessage) {
        self.state.conversation.messages.push(message);
        self.state.conversation.updated_at = Utc::now();
    }

    async fn stream_turn<F>(
        &self,
        request: ChatStreamRequest,
        turn: &mut ResponseTurn,
        on_update: &mut F,
    ) -> Result<(), ChatError>
    where
        F: FnMut(&ResponseView),
    {
        let mut rx = self.backend.chat_stream(request, self.stop.clone()).await?;

        loop {
            if self.stop.load(Ordering::Relaxed) {
                tracing::info!("Generation stopped by user");
                return Err(ChatError::Cancelled);
            }

            let event = match tokio::time::timeout(STOP_POLL_INTERVAL, rx.recv()).await {
                Ok(Some(event)) => event,
                Ok(None) => break,
                Err(_) => continue,
            };

            match turn.apply(event) {
                TurnProgress::Streaming(view) => on_update(&view),
                TurnProgress::Finished(view) => {
                    on_update(&view);
                    return Ok(());
                }
                TurnProgress::Failed {
                    message,
                    action_required,
                } => {
                    tracing::error!("Stream failed: {}", message);
                    return Err(ChatError::Stream {
                        message,
                        action_required,
                    });
                }
            }
        }

        if turn.raw_text().is_empty() {
            Err(ChatError::Stream {
                message: "Conexão encerrada sem resposta".to_string(),
                action_required: None,
            })
        } else {
            tracing::warn!("Stream ended without a done event");
            Ok(())
        }
    }

    /// Stop the running turn locally
    pub fn cancel(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    /// Stop the running turn and ask the server to abandon it
    pub async fn cancel_remote(&self) -> Result<(), ChatError> {
        self.cancel();
        Ok(self.backend.cancel_request().await?)
    }

    /// Save the open conversation.
    ///
    /// The session is confirmed with the server first, retrying while it is
    /// not yet registered. A quick local title is then refined by the server.
    /// Returns `None` when there is nothing to save.
    pub async fn auto_save(&mut self) -> Result<Option<SavedChat>, ChatError> {
        if self.state.conversation.messages.is_empty() {
            return Ok(None);
        }
        let session_id = self.state.session_id().ok_or(ChatError::NoSession)?.to_string();
        self.validate_session(&session_id).await?;

        let mut record = self.state.conversation.clone();
        record.session_id = Some(session_id);
        record.thinking_mode = self.state.thinking.enabled;

        let saved = self.backend.auto_save_chat(&record).await?;
        record.id = saved.chat_id.clone();
        record.title = saved.title.clone();
        self.state.conversation.id = record.id.clone();
        self.state.conversation.title = record.title.clone();
        self.remember(record);
        tracing::info!("Auto-saved chat {} ({})", saved.chat_id, saved.title);

        if self.state.conversation.needs_ai_title {
            self.refine_title().await;
        }
        Ok(Some(saved))
    }

    async fn validate_session(&self, session_id: &str) -> Result<(), ChatError> {
        let attempts = self.policy.max_attempts.max(1);
        for attempt in 1..=attempts {
            match self.backend.debug_session().await {
                Ok(debug) if debug.confirms(session_id) => return Ok(()),
                Ok(_) => tracing::warn!(
                    "Session {} not registered yet ({}/{})",
                    crate::truncate_str(session_id, 8),
                    attempt,
                    attempts
                ),
                Err(e) if e.is_retryable() => {
                    tracing::warn!("Session check failed ({}/{}): {}", attempt, attempts, e)
                }
                Err(e) => return Err(e.into()),
            }
            if attempt < attempts {
                tokio::time::sleep(self.policy.backoff(attempt - 1)).await;
            }
        }
        Err(ApiError::SessionMissing.into())
    }

    async fn refine_title(&mut self) {
        let id = self.state.conversation.id.clone();
        match self.backend.update_chat_title(&id).await {
            Ok(title) => {
                tracing::debug!("Title refined for {}: {}", id, title);
                self.state.conversation.title = title.clone();
                self.state.conversation.needs_ai_title = false;
                self.state.history.rename(&id, &title);
            }
            Err(e) => tracing::warn!("Title refinement failed for {}: {}", id, e),
        }
    }

    /// Put a full record into the history list and select it
    fn remember(&mut self, mut record: ChatRecord) {
        record.preview = Some(preview(&record));
        record.message_count = Some(record.messages.len());
        let id = record.id.clone();
        self.state.history.upsert(record);
        self.state.history.select(&id);
    }

    /// Save the open conversation if needed and start an empty one.
    ///
    /// The server's per-session memory is cleared so the new chat starts
    /// without context.
    pub async fn start_new_chat(&mut self) -> Result<(), ChatError> {
        if self.state.generating {
            return Err(ChatError::AlreadyGenerating);
        }
        if let Err(e) = self.auto_save().await {
            tracing::warn!("Could not save chat before starting a new one: {}", e);
        }
        if let Err(e) = self.backend.clear_chat_history().await {
            tracing::warn!("Could not clear server conversation memory: {}", e);
        }
        self.state.reset_conversation();
        tracing::info!("Started new chat {}", self.state.conversation.id);
        Ok(())
    }

    pub async fn open_chat(&mut self, id: &str) -> Result<&ChatRecord, ChatError> {
        if self.state.generating {
            return Err(ChatError::AlreadyGenerating);
        }
        let record = self.backend.load_chat(id).await?;
        tracing::info!("Opened chat {} ({} messages)", id, record.messages.len());
        self.state.conversation = record.clone();
        self.remember(record);
        Ok(&self.state.conversation)
    }

    pub async fn delete_chat(&mut self, id: &str) -> Result<(), ChatError> {
        match self.backend.delete_chat(id).await {
            Ok(()) => {}
            Err(ApiError::NotFound(_)) => tracing::warn!("Chat {} was already gone on the server", id),
            Err(e) => return Err(e.into()),
        }
        self.state.history.remove(id);
        if self.state.conversation.id == id {
            self.state.reset_conversation();
        }
        Ok(())
    }

    /// Reload the chat list from the server. Returns the number of chats.
    pub async fn refresh_history(&mut self) -> Result<usize, ChatError> {
        let chats = self.backend.list_chats().await?;
        tracing::debug!("Loaded {} chats", chats.len());
        self.state.history.replace_all(chats);
        if self.state.is_saved() {
            let id = self.state.conversation.id.clone();
            self.state.history.select(&id);
        }
        Ok(self.state.history.len())
    }

    pub async fn rename_chat(&mut self, id: &str, title: &str) -> Result<(), ChatError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ChatError::InvalidInput(InputProblem::Empty));
        }
        let mut record = self.full_record(id).await?;
        record.title = title.to_string();
        record.needs_ai_title = false;
        self.store(record).await
    }

    /// Flip the pin flag of a chat, returning the new value
    pub async fn toggle_pin(&mut self, id: &str) -> Result<bool, ChatError> {
        let mut record = self.full_record(id).await?;
        record.is_pinned = !record.is_pinned;
        let pinned = record.is_pinned;
        self.store(record).await?;
        Ok(pinned)
    }

    /// Record with its messages loaded, suitable for a full save
    async fn full_record(&self, id: &str) -> Result<ChatRecord, ChatError> {
        if self.state.conversation.id == id {
            let mut record = self.state.conversation.clone();
            if let Some(listed) = self.state.history.get(id) {
                record.is_pinned = listed.is_pinned;
            }
            return Ok(record);
        }
        match self.state.history.get(id) {
            Some(listed) if !listed.messages.is_empty() => Ok(listed.clone()),
            _ => Ok(self.backend.load_chat(id).await?),
        }
    }

    async fn store(&mut self, mut record: ChatRecord) -> Result<(), ChatError> {
        record.updated_at = Utc::now();
        self.backend.save_chat(&record).await?;

        let selected = self.state.history.current_id().map(str::to_string);
        if self.state.conversation.id == record.id {
            self.state.conversation.title = record.title.clone();
            self.state.conversation.is_pinned = record.is_pinned;
            self.state.conversation.needs_ai_title = record.needs_ai_title;
        }
        record.preview = Some(preview(&record));
        record.message_count = Some(record.messages.len());
        self.state.history.upsert(record);
        if let Some(id) = selected {
            self.state.history.select(&id);
        }
        Ok(())
    }

    /// Context of a chat for the context viewer.
    ///
    /// Falls back to computing it locally for the open conversation when the
    /// server cannot provide it.
    pub async fn chat_context(&self, id: &str) -> Result<ChatContext, ChatError> {
        match self.backend.chat_context(id).await {
            Ok(context) => Ok(context),
            Err(e) if self.state.conversation.id == id => {
                tracing::warn!("Context request failed, computing locally: {}", e);
                Ok(build_context(&self.state.conversation))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Delete every saved chat. Returns how many were deleted.
    pub async fn clear_all_history(&mut self) -> Result<usize, ChatError> {
        if self.state.generating {
            return Err(ChatError::AlreadyGenerating);
        }
        let ids: Vec<String> = self.state.history.iter().map(|c| c.id.clone()).collect();
        let mut deleted = 0;
        for id in &ids {
            match self.backend.delete_chat(id).await {
                Ok(()) | Err(ApiError::NotFound(_)) => deleted += 1,
                Err(e) => tracing::warn!("Could not delete chat {}: {}", id, e),
            }
        }
        tracing::info!("Deleted {}/{} chats", deleted, ids.len());
        self.state.history.clear();
        self.state.reset_conversation();
        Ok(deleted)
    }

    /// Set thinking mode locally and on the server.
    ///
    /// A server failure is logged and the local mode still changes.
    pub async fn set_thinking_mode(&mut self, enabled: bool) -> bool {
        self.state.thinking = ThinkingMode::new(enabled);
        if let Err(e) = self.backend.set_thinking_mode(enabled).await {
            tracing::warn!("Could not sync thinking mode with server: {}", e);
        }
        tracing::info!("Thinking mode {}", self.state.thinking.status_label());
        enabled
    }

    pub async fn toggle_thinking_mode(&mut self) -> bool {
        let mut mode = self.state.thinking;
        let enabled = mode.toggle();
        self.set_thinking_mode(enabled).await
    }

    pub async fn send_feedback(&self, mut feedback: Feedback) -> Result<(), ChatError> {
        if !feedback.is_valid() {
            return Err(ChatError::InvalidInput(InputProblem::FeedbackTooShort));
        }
        feedback.thinking_mode = self.state.thinking.enabled;
        Ok(self.backend.send_feedback(&feedback).await?)
    }
}
