//! User actions
//!
//! Each action spawns a task that locks the controller, runs one operation
//! and mirrors the result into the UI signals.

use std::sync::atomic::Ordering;

use dioxus::prelude::*;

use crate::api::{ChatBackend, Feedback};
use crate::app::{AppState, ConnectionState, ToastKind};
use crate::controller::ChatError;
use crate::types::message::ChatMessage;

pub fn initialize(state: AppState) {
    spawn(async move {
        let mut connection = state.connection;
        let mut server_label = state.server_label;

        match state.client.server_status().await {
            Ok(status) => server_label.set(Some(status.label())),
            Err(e) => tracing::warn!("Server status unavailable: {}", e),
        }

        let mut controller = state.controller.lock().await;
        match controller.initialize().await {
            Ok(session) => {
                connection.set(ConnectionState::Ready(
                    crate::truncate_str(&session.session_id, 8).to_string(),
                ));
            }
            Err(e) => {
                tracing::error!("Could not connect: {}", e);
                connection.set(ConnectionState::Failed(e.to_string()));
                state.notify(ToastKind::Error, format!("Sem conexão com o servidor: {e}"));
            }
        }
        state.sync(&controller);
    });
}

pub fn send_message(state: AppState, text: String) {
    let mut messages = state.messages;
    let mut streaming = state.streaming;
    let mut stream_error = state.stream_error;
    let mut generating = state.generating;

    // shown right away; replaced by the controller's copy when the turn ends
    messages.write().push(ChatMessage::user(text.trim()));
    stream_error.set(None);
    streaming.set(Some(Default::default()));
    generating.set(true);
    state.stop_signal.store(false, Ordering::Relaxed);

    spawn(async move {
        let mut controller = state.controller.lock().await;
        let result = controller
            .send_message(&text, |view| streaming.set(Some(view.clone())))
            .await;
        streaming.set(None);

        match result {
            Ok(_) => {}
            Err(ChatError::Cancelled) => state.notify(ToastKind::Info, "🛑 Geração cancelada"),
            Err(ChatError::Stream { message, action_required }) => {
                if let Some(action) = action_required {
                    tracing::info!("Server asks for action: {}", action);
                }
                stream_error.set(Some(message));
            }
            Err(ChatError::InvalidInput(problem)) => {
                state.notify(ToastKind::Error, problem.to_string())
            }
            Err(e) => stream_error.set(Some(e.to_string())),
        }
        state.sync(&controller);
    });
}

/// Stop the running turn and tell the server to drop it
pub fn stop_generation(state: AppState) {
    state.stop_signal.store(true, Ordering::Relaxed);
    spawn(async move {
        if let Err(e) = state.client.cancel_request().await {
            tracing::warn!("Backend cancel failed: {}", e);
        }
    });
}

pub fn new_chat(state: AppState) {
    spawn(async move {
        let mut controller = state.controller.lock().await;
        match controller.start_new_chat().await {
            Ok(()) => {
                let mut stream_error = state.stream_error;
                stream_error.set(None);
            }
            Err(e) => state.notify(ToastKind::Error, e.to_string()),
        }
        state.sync(&controller);
    });
}

pub fn open_chat(state: AppState, id: String) {
    spawn(async move {
        let mut controller = state.controller.lock().await;
        if let Err(e) = controller.open_chat(&id).await {
            state.notify(ToastKind::Error, format!("Erro ao carregar conversa: {e}"));
        }
        let mut view = state.view;
        view.set(crate::app::View::Chat);
        state.sync(&controller);
    });
}

pub fn delete_chat(state: AppState, id: String) {
    spawn(async move {
        let mut controller = state.controller.lock().await;
        match controller.delete_chat(&id).await {
            Ok(()) => state.notify(ToastKind::Success, "Conversa excluída"),
            Err(e) => state.notify(ToastKind::Error, format!("Erro ao excluir: {e}")),
        }
        state.sync(&controller);
    });
}

pub fn toggle_pin(state: AppState, id: String) {
    spawn(async move {
        let mut controller = state.controller.lock().await;
        match controller.toggle_pin(&id).await {
            Ok(true) => state.notify(ToastKind::Info, "📌 Conversa fixada"),
            Ok(false) => state.notify(ToastKind::Info, "📌 Conversa desfixada"),
            Err(e) => state.notify(ToastKind::Error, e.to_string()),
        }
        state.sync(&controller);
    });
}

pub fn rename_chat(state: AppState, id: String, title: String) {
    spawn(async move {
        let mut controller = state.controller.lock().await;
        if let Err(e) = controller.rename_chat(&id, &title).await {
            state.notify(ToastKind::Error, format!("Erro ao renomear: {e}"));
        }
        state.sync(&controller);
    });
}

pub fn show_context(state: AppState, id: String) {
    spawn(async move {
        let controller = state.controller.lock().await;
        match controller.chat_context(&id).await {
            Ok(context) => {
                let mut context_view = state.context_view;
                context_view.set(Some(context));
            }
            Err(e) => state.notify(ToastKind::Error, format!("Erro ao carregar contexto: {e}")),
        }
    });
}

pub fn refresh_history(state: AppState) {
    spawn(async move {
        let mut controller = state.controller.lock().await;
        if let Err(e) = controller.refresh_history().await {
            state.notify(ToastKind::Error, format!("Erro ao carregar histórico: {e}"));
        }
        state.sync(&controller);
    });
}

pub fn clear_all_history(state: AppState) {
    spawn(async move {
        let mut controller = state.controller.lock().await;
        match controller.clear_all_history().await {
            Ok(0) => state.notify(ToastKind::Info, "Histórico já está vazio"),
            Ok(n) => state.notify(ToastKind::Success, format!("{n} conversas excluídas")),
            Err(e) => state.notify(ToastKind::Error, e.to_string()),
        }
        state.sync(&controller);
    });
}

pub fn toggle_thinking(state: AppState) {
    spawn(async move {
        let mut controller = state.controller.lock().await;
        let enabled = controller.toggle_thinking_mode().await;
        let label = if enabled {
            "🧠 Thinking mode ativado"
        } else {
            "Thinking mode desativado"
        };
        state.notify(ToastKind::Info, label);
        state.sync(&controller);
    });
}

/// Submit feedback; `sent` flips to true once the server accepts it
pub fn send_feedback(state: AppState, feedback: Feedback, mut sent: Signal<bool>) {
    spawn(async move {
        let controller = state.controller.lock().await;
        match controller.send_feedback(feedback).await {
            Ok(()) => {
                sent.set(true);
                state.notify(ToastKind::Success, "✅ Feedback enviado. Obrigado!");
            }
            Err(e) => state.notify(ToastKind::Error, format!("Erro ao enviar feedback: {e}")),
        }
    });
}
