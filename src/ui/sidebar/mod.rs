pub mod history_list;

use crate::app::{AppState, ConnectionState, View};
use crate::thinking::ThinkingMode;
use crate::ui::actions;
use crate::ui::sidebar::history_list::HistoryList;
use dioxus::prelude::*;

#[component]
pub fn Sidebar() -> Element {
    let app_state = use_context::<AppState>();
    let thinking_label = ThinkingMode::new((app_state.thinking)()).status_label();
    let connection = (app_state.connection)();
    let server_label = (app_state.server_label)();
    let generating = (app_state.generating)();

    let app_state_new = app_state.clone();
    let mut view = app_state.view;

    let (status_dot, status_text) = match &connection {
        ConnectionState::Connecting => ("bg-yellow-400", "Conectando...".to_string()),
        ConnectionState::Ready(session) => ("bg-green-500", format!("Sessão {session}")),
        ConnectionState::Failed(_) => ("bg-red-500", "Desconectado".to_string()),
    };

    rsx! {
        aside {
            class: "flex flex-col w-[280px] h-full bg-[var(--bg-sidebar)] border-r border-[var(--border-subtle)] transition-colors duration-300",

            // Header: New Chat
            div {
                class: "p-3",
                button {
                    class: "w-full flex items-center gap-3 px-3 py-3 text-sm text-[var(--text-primary)] border border-[var(--border-subtle)] rounded-md hover:bg-[var(--bg-hover)] transition-colors duration-200 text-left shadow-sm disabled:opacity-40",
                    disabled: generating,
                    onclick: move |_| {
                        view.set(View::Chat);
                        actions::new_chat(app_state_new.clone());
                    },

                    svg {
                        width: "16",
                        height: "16",
                        view_box: "0 0 24 24",
                        fill: "none",
                        stroke: "currentColor",
                        stroke_width: "2",
                        stroke_linecap: "round",
                        stroke_linejoin: "round",
                        path { d: "M12 5v14M5 12h14" }
                    }
                    "Nova Conversa"
                }
            }

            HistoryList {}

            // Footer: status / settings
            div {
                class: "p-3 border-t border-[var(--border-subtle)] space-y-2",

                div {
                    class: "flex items-center gap-2 px-3 text-xs text-[var(--text-tertiary)]",
                    span { class: "w-2 h-2 rounded-full {status_dot}" }
                    span { class: "truncate", "{status_text}" }
                    if let Some(label) = server_label {
                        span { class: "ml-auto", "{label}" }
                    }
                }

                div {
                    class: "px-3 text-xs text-[var(--text-tertiary)]",
                    "🧠 Thinking: {thinking_label}"
                }

                button {
                    class: "w-full flex items-center gap-3 px-3 py-3 text-sm text-[var(--text-secondary)] rounded-md hover:bg-[var(--bg-hover)] hover:text-[var(--text-primary)] transition-colors duration-200",
                    onclick: move |_| {
                        let next = if view() == View::Settings { View::Chat } else { View::Settings };
                        view.set(next);
                    },

                    svg {
                        width: "16",
                        height: "16",
                        view_box: "0 0 24 24",
                        fill: "none",
                        stroke: "currentColor",
                        stroke_width: "2",
                        stroke_linecap: "round",
                        stroke_linejoin: "round",
                        circle { cx: "12", cy: "12", r: "3" }
                        path { d: "M19.4 15a1.65 1.65 0 0 0 .33 1.82l.06.06a2 2 0 0 1 0 2.83 2 2 0 0 1-2.83 0l-.06-.06a1.65 1.65 0 0 0-1.82-.33 1.65 1.65 0 0 0-1 1.51V21a2 2 0 0 1-2 2 2 2 0 0 1-2-2v-.09A1.65 1.65 0 0 0 9 19.4a1.65 1.65 0 0 0-1.82.33l-.06.06a2 2 0 0 1-2.83 0 2 2 0 0 1 0-2.83l.06-.06a1.65 1.65 0 0 0 .33-1.82 1.65 1.65 0 0 0-1.51-1H3a2 2 0 0 1-2-2 2 2 0 0 1 2-2h.09A1.65 1.65 0 0 0 5 9.4a1.65 1.65 0 0 0-.33-1.82l-.06-.06a2 2 0 0 1 0-2.83 2 2 0 0 1 2.83 0l.06.06a1.65 1.65 0 0 0 1.82.33H9a1.65 1.65 0 0 0 1-1.51V3a2 2 0 0 1 2-2 2 2 0 0 1 2 2v.09a1.65 1.65 0 0 0 1 1.51 1.65 1.65 0 0 0 1.82-.33l.06-.06a2 2 0 0 1 2.83 0 2 2 0 0 1 0 2.83l-.06.06a1.65 1.65 0 0 0-.33 1.82V9a1.65 1.65 0 0 0 1.51 1H21a2 2 0 0 1 2 2 2 2 0 0 1-2 2h-.09a1.65 1.65 0 0 0-1.51 1z" }
                    }
                    "Configurações"
                }
            }
        }
    }
}
