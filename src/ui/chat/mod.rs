//! Chat interface components
//!
//! Contains the main chat view, message display, and input components.

pub mod input;
pub mod message;

use dioxus::prelude::*;
use input::ChatInput;
use message::{MessageBubble, StreamingBubble};

use crate::app::{AppState, ConnectionState};
use crate::ui::actions;
use crate::ui::components::loading::SkeletonLines;

#[component]
pub fn ChatView() -> Element {
    let app_state = use_context::<AppState>();
    let thinking = (app_state.thinking)();
    let generating = (app_state.generating)();
    let connection = (app_state.connection)();
    let title = (app_state.current_title)();
    let messages = app_state.messages.read().clone();
    let streaming = (app_state.streaming)();
    let stream_error = (app_state.stream_error)();

    let ready = matches!(connection, ConnectionState::Ready(_));

    let handle_send = {
        let app_state = app_state.clone();
        move |text: String| actions::send_message(app_state.clone(), text)
    };

    let handle_stop = {
        let app_state = app_state.clone();
        move |_| actions::stop_generation(app_state.clone())
    };

    let app_state_toggle = app_state.clone();

    rsx! {
        div { class: "flex flex-col h-full bg-[var(--bg-main)] relative",

            // Header
            div {
                class: "h-12 border-b border-[var(--border-subtle)] flex items-center gap-3 px-4",
                div { class: "flex-1 truncate text-sm font-medium", "{title}" }
                button {
                    class: if thinking {
                        "px-3 py-1 text-xs rounded-full border border-[var(--accent-primary)] text-[var(--accent-primary)] disabled:opacity-40"
                    } else {
                        "px-3 py-1 text-xs rounded-full border border-[var(--border-subtle)] text-[var(--text-secondary)] disabled:opacity-40"
                    },
                    disabled: generating,
                    title: "Alternar thinking mode",
                    onclick: move |_| actions::toggle_thinking(app_state_toggle.clone()),
                    if thinking { "🧠 Thinking ON" } else { "Thinking OFF" }
                }
            }

            // Messages Area
            div { class: "flex-1 overflow-y-auto p-4 space-y-2 custom-scrollbar scroll-smooth",
                match &connection {
                    ConnectionState::Connecting => rsx! {
                        SkeletonLines { widths: vec!["60%", "100%", "80%"] }
                    },
                    ConnectionState::Failed(reason) => rsx! {
                        div { class: "max-w-2xl mx-auto mt-8 p-4 rounded-xl border border-red-500/40 text-sm text-red-500",
                            "Não foi possível conectar ao servidor: {reason}"
                        }
                    },
                    ConnectionState::Ready(_) if messages.is_empty() && streaming.is_none() => rsx! {
                        div { class: "max-w-2xl mx-auto mt-16 text-center text-[var(--text-secondary)]",
                            h2 { class: "text-2xl font-semibold mb-2 text-[var(--text-primary)]", "Olá! Eu sou o Titan." }
                            p { class: "text-sm", "Pergunte qualquer coisa. Use /think para ver o raciocínio do modelo." }
                        }
                    },
                    ConnectionState::Ready(_) => rsx! {},
                }

                for (idx, msg) in messages.iter().enumerate() {
                    MessageBubble { key: "{idx}", message: msg.clone(), show_thinking: true }
                }

                if let Some(view) = streaming {
                    StreamingBubble { view }
                }

                if let Some(error) = stream_error {
                    div { class: "max-w-4xl mx-auto px-4 py-2 text-sm rounded-lg bg-[var(--bg-error-subtle)] text-[var(--text-error)]",
                        "❌ {error}"
                    }
                }

                div { class: "h-4" }
            }

            ChatInput {
                on_send: handle_send,
                on_stop: handle_stop,
                is_generating: generating,
                disabled: !ready,
            }
        }
    }
}
