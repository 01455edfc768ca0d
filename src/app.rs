//! Root Dioxus application component
//!
//! This module contains the main App component that serves as the root of the UI tree.

use crate::api::{ApiError, ChatClient, RetryPolicy};
use crate::controller::ChatController;
use crate::history::ChatHistory;
use crate::storage::settings::{load_settings, AppSettings};
use crate::stream::ResponseView;
use crate::types::chat::ChatContext;
use crate::types::message::ChatMessage;
use crate::ui::{actions, Layout};
use dioxus::prelude::*;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Connection to the chat server
#[derive(Clone, PartialEq, Debug)]
pub enum ConnectionState {
    Connecting,
    /// Holds a short form of the session id
    Ready(String),
    Failed(String),
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum ToastKind {
    Info,
    Success,
    Error,
}

#[derive(Clone, PartialEq, Debug)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum View {
    Chat,
    Settings,
}

/// Global application state shared across components
#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<Mutex<ChatController<ChatClient>>>,
    /// Second handle on the server, usable while a turn holds the controller
    pub client: ChatClient,
    pub stop_signal: Arc<AtomicBool>,
    pub messages: Signal<Vec<ChatMessage>>,
    pub streaming: Signal<Option<ResponseView>>,
    pub stream_error: Signal<Option<String>>,
    pub history: Signal<ChatHistory>,
    pub current_chat_id: Signal<String>,
    pub current_title: Signal<String>,
    pub thinking: Signal<bool>,
    pub generating: Signal<bool>,
    pub connection: Signal<ConnectionState>,
    pub server_label: Signal<Option<String>>,
    pub settings: Signal<AppSettings>,
    pub toast: Signal<Option<Toast>>,
    pub context_view: Signal<Option<ChatContext>>,
    pub view: Signal<View>,
}

impl AppState {
    pub fn new(settings: AppSettings) -> Result<Self, ApiError> {
        let client = ChatClient::new(
            &settings.effective_server_url(),
            Duration::from_secs(settings.request_timeout_secs),
        )?;
        let controller = ChatController::new(
            client.clone(),
            RetryPolicy::from_settings(&settings),
            settings.thinking_by_default,
        );
        let stop_signal = controller.stop_handle();
        let conversation = controller.state().conversation.clone();

        tracing::info!("AppState initialized for {}", client.base_url());
        Ok(Self {
            controller: Arc::new(Mutex::new(controller)),
            client,
            stop_signal,
            messages: Signal::new(Vec::new()),
            streaming: Signal::new(None),
            stream_error: Signal::new(None),
            history: Signal::new(ChatHistory::new()),
            current_chat_id: Signal::new(conversation.id),
            current_title: Signal::new(conversation.title),
            thinking: Signal::new(settings.thinking_by_default),
            generating: Signal::new(false),
            connection: Signal::new(ConnectionState::Connecting),
            server_label: Signal::new(None),
            settings: Signal::new(settings),
            toast: Signal::new(None),
            context_view: Signal::new(None),
            view: Signal::new(View::Chat),
        })
    }

    /// Copy the controller's state into the UI signals
    pub fn sync(&self, controller: &ChatController<ChatClient>) {
        let state = controller.state();
        let mut messages = self.messages;
        let mut history = self.history;
        let mut current_chat_id = self.current_chat_id;
        let mut current_title = self.current_title;
        let mut thinking = self.thinking;
        let mut generating = self.generating;

        messages.set(state.conversation.messages.clone());
        history.set(state.history.clone());
        current_chat_id.set(state.conversation.id.clone());
        current_title.set(state.conversation.title.clone());
        thinking.set(state.thinking.enabled);
        generating.set(state.generating);
    }

    pub fn notify(&self, kind: ToastKind, message: impl Into<String>) {
        let mut toast = self.toast;
        toast.set(Some(Toast {
            message: message.into(),
            kind,
        }));
    }
}

#[component]
pub fn App() -> Element {
    let state = use_hook(|| AppState::new(load_settings()));

    match state {
        Ok(app_state) => {
            use_context_provider(|| app_state.clone());
            use_hook(|| actions::initialize(app_state.clone()));
            rsx! {
                Layout {}
            }
        }
        Err(e) => rsx! {
            div {
                class: "flex h-screen w-screen items-center justify-center p-8 text-center",
                "Não foi possível iniciar o cliente: {e}"
            }
        },
    }
}
