//! In-memory backend for tests

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc::{self, Receiver};

use crate::api::types::{ChatStreamRequest, DebugSession, Feedback, SavedChat, ServerStatus, SessionInfo};
use crate::api::{ApiError, ChatBackend};
use crate::history::build_context;
use crate::stream::StreamEvent;
use crate::types::chat::{ChatContext, ChatRecord};

#[derive(Default)]
struct MockState {
    calls: HashMap<&'static str, usize>,
    new_session_failures: VecDeque<ApiError>,
    stream_error: Option<ApiError>,
    script: Vec<StreamEvent>,
    hold_open: bool,
    session_confirmed: bool,
    debug_failures: usize,
    thinking: bool,
    chats: Vec<ChatRecord>,
    requests: Vec<ChatStreamRequest>,
    refined_title: Option<String>,
}

/// Scriptable [`ChatBackend`] that records every call
#[derive(Clone)]
pub struct MockBackend {
    state: Arc<Mutex<MockState>>,
}

pub const MOCK_SESSION_ID: &str = "session-test";

impl MockBackend {
    pub fn new() -> Self {
        let state = MockState {
            session_confirmed: true,
            ..MockState::default()
        };
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    fn with<R>(&self, f: impl FnOnce(&mut MockState) -> R) -> R {
        let mut state = self.state.lock().unwrap();
        f(&mut state)
    }

    fn record(&self, name: &'static str) {
        self.with(|s| *s.calls.entry(name).or_default() += 1);
    }

    pub fn calls(&self, name: &str) -> usize {
        self.with(|s| s.calls.get(name).copied().unwrap_or(0))
    }

    pub fn fail_new_session(&self, errors: Vec<ApiError>) {
        self.with(|s| s.new_session_failures = errors.into());
    }

    pub fn fail_stream(&self, error: ApiError) {
        self.with(|s| s.stream_error = Some(error));
    }

    /// Events the next streams replay
    pub fn script(&self, events: Vec<StreamEvent>) {
        self.with(|s| s.script = events);
    }

    /// Keep the stream open after the script until the stop flag is set
    pub fn hold_stream_open(&self) {
        self.with(|s| s.hold_open = true);
    }

    pub fn set_session_confirmed(&self, confirmed: bool) {
        self.with(|s| s.session_confirmed = confirmed);
    }

    /// Make the next `n` debug-session calls fail with a transport error
    pub fn fail_debug_session(&self, n: usize) {
        self.with(|s| s.debug_failures = n);
    }

    pub fn set_refined_title(&self, title: &str) {
        self.with(|s| s.refined_title = Some(title.to_string()));
    }

    pub fn seed_chats(&self, chats: Vec<ChatRecord>) {
        self.with(|s| s.chats = chats);
    }

    pub fn stored_chat(&self, id: &str) -> Option<ChatRecord> {
        self.with(|s| s.chats.iter().find(|c| c.id == id).cloned())
    }

    pub fn stored_count(&self) -> usize {
        self.with(|s| s.chats.len())
    }

    pub fn with_thinking(&self, enabled: bool) {
        self.with(|s| s.thinking = enabled);
    }

    pub fn thinking(&self) -> bool {
        self.with(|s| s.thinking)
    }

    pub fn requests(&self) -> Vec<ChatStreamRequest> {
        self.with(|s| s.requests.clone())
    }

    fn store(&self, chat: &ChatRecord) -> SavedChat {
        self.with(|s| {
            match s.chats.iter_mut().find(|c| c.id == chat.id) {
                Some(existing) => *existing = chat.clone(),
                None => s.chats.push(chat.clone()),
            }
            SavedChat {
                chat_id: chat.id.clone(),
                title: chat.title.clone(),
            }
        })
    }
}

#[async_trait]
impl ChatBackend for MockBackend {
    async fn server_status(&self) -> Result<ServerStatus, ApiError> {
        self.record("server_status");
        Ok(ServerStatus {
            status: "online".to_string(),
            active_users: 1,
            max_users: 50,
            available: true,
            queue: serde_json::Value::Null,
        })
    }

    async fn new_session(&self) -> Result<SessionInfo, ApiError> {
        self.record("new_session");
        match self.with(|s| s.new_session_failures.pop_front()) {
            Some(e) => Err(e),
            None => Ok(SessionInfo {
                session_id: MOCK_SESSION_ID.to_string(),
            }),
        }
    }

    async fn debug_session(&self) -> Result<DebugSession, ApiError> {
        self.record("debug_session");
        self.with(|s| {
            if s.debug_failures > 0 {
                s.debug_failures -= 1;
                return Err(ApiError::Transport("unreachable".into()));
            }
            Ok(DebugSession {
                flask_session_id: Some(MOCK_SESSION_ID.to_string()),
                session_exists_in_manager: s.session_confirmed,
            })
        })
    }

    async fn chat_stream(
        &self,
        request: ChatStreamRequest,
        stop: Arc<AtomicBool>,
    ) -> Result<Receiver<StreamEvent>, ApiError> {
        self.record("chat_stream");
        let (error, script, hold_open) = self.with(|s| {
            s.requests.push(request);
            (s.stream_error.take(), s.script.clone(), s.hold_open)
        });
        if let Some(e) = error {
            return Err(e);
        }

        let (tx, rx) = mpsc::channel(script.len().max(1));
        tokio::spawn(async move {
            for event in script {
                if tx.send(event).await.is_err() {
                    return;
                }
            }
            if hold_open {
                while !stop.load(Ordering::Relaxed) && !tx.is_closed() {
                    tokio::time::sleep(Duration::from_millis(1)).await;
                }
            }
        });
        Ok(rx)
    }

    async fn cancel_request(&self) -> Result<(), ApiError> {
        self.record("cancel_request");
        Ok(())
    }

    async fn clear_chat_history(&self) -> Result<(), ApiError> {
        self.record("clear_chat_history");
        Ok(())
    }

    async fn get_thinking_mode(&self) -> Result<bool, ApiError> {
        self.record("get_thinking_mode");
        Ok(self.thinking())
    }

    async fn set_thinking_mode(&self, enabled: bool) -> Result<(), ApiError> {
        self.record("set_thinking_mode");
        self.with(|s| s.thinking = enabled);
        Ok(())
    }

    async fn list_chats(&self) -> Result<Vec<ChatRecord>, ApiError> {
        self.record("list_chats");
        Ok(self.with(|s| s.chats.clone()))
    }

    async fn save_chat(&self, chat: &ChatRecord) -> Result<SavedChat, ApiError> {
        self.record("save_chat");
        Ok(self.store(chat))
    }

    async fn auto_save_chat(&self, chat: &ChatRecord) -> Result<SavedChat, ApiError> {
        self.record("auto_save_chat");
        if chat.messages.is_empty() {
            return Err(ApiError::Rejected("Chat vazio".into()));
        }
        Ok(self.store(chat))
    }

    async fn load_chat(&self, id: &str) -> Result<ChatRecord, ApiError> {
        self.record("load_chat");
        self.stored_chat(id)
            .ok_or_else(|| ApiError::NotFound(id.to_string()))
    }

    async fn delete_chat(&self, id: &str) -> Result<(), ApiError> {
        self.record("delete_chat");
        self.with(|s| {
            let before = s.chats.len();
            s.chats.retain(|c| c.id != id);
            if s.chats.len() == before {
                Err(ApiError::NotFound(id.to_string()))
            } else {
                Ok(())
            }
        })
    }

    async fn chat_context(&self, id: &str) -> Result<ChatContext, ApiError> {
        self.record("chat_context");
        self.stored_chat(id)
            .map(|chat| build_context(&chat))
            .ok_or_else(|| ApiError::NotFound(id.to_string()))
    }

    async fn update_chat_title(&self, id: &str) -> Result<String, ApiError> {
        self.record("update_chat_title");
        self.with(|s| {
            let title = s
                .refined_title
                .clone()
                .ok_or_else(|| ApiError::Rejected("sem título".into()))?;
            let chat = s
                .chats
                .iter_mut()
                .find(|c| c.id == id)
                .ok_or_else(|| ApiError::NotFound(id.to_string()))?;
            chat.title = title.clone();
            chat.needs_ai_title = false;
            Ok(title)
        })
    }

    async fn send_feedback(&self, _feedback: &Feedback) -> Result<(), ApiError> {
        self.record("send_feedback");
        Ok(())
    }
}
