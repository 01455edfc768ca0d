use dioxus::prelude::*;

use crate::stream::ResponseView;
use crate::ui::components::loading::{Spinner, TypingDots};
use crate::types::message::{ChatMessage, Role};

/// Collapsible chain-of-thought block shown above an answer
#[component]
pub fn ReasoningPanel(thinking: String, live: bool) -> Element {
    let mut open = use_signal(|| true);
    let label = if live { "🧠 Pensando..." } else { "🧠 Raciocínio" };

    rsx! {
        div {
            class: "thinking-panel mb-2 rounded-xl border border-[var(--border-subtle)] bg-[var(--bg-subtle)] text-sm",
            button {
                class: "w-full flex items-center gap-2 px-3 py-2 text-left text-[var(--text-secondary)] hover:text-[var(--text-primary)]",
                onclick: move |_| open.toggle(),
                span { if open() { "▾" } else { "▸" } }
                span { "{label}" }
                if live {
                    Spinner { size: 12 }
                }
            }
            if open() {
                div {
                    class: "px-3 pb-3 whitespace-pre-wrap break-words italic text-[var(--text-tertiary)]",
                    "{thinking}"
                }
            }
        }
    }
}

#[component]
pub fn MessageBubble(message: ChatMessage, show_thinking: bool) -> Element {
    let is_user = message.role == Role::User;

    let container_class = if is_user {
        "flex flex-row-reverse items-start gap-4 mb-6 group"
    } else {
        "flex flex-row items-start gap-4 mb-6 group"
    };

    let bubble_class = if is_user {
        "bg-[var(--accent-primary)] text-[var(--accent-text)] rounded-2xl rounded-tr-sm px-5 py-3.5 shadow-md max-w-[85%] leading-relaxed"
    } else {
        "bg-[var(--bg-hover)] text-[var(--text-primary)] rounded-2xl rounded-tl-sm px-5 py-3.5 shadow-sm max-w-[85%] leading-relaxed border border-[var(--border-subtle)]"
    };

    let author = match message.role {
        Role::User => "Você",
        Role::Assistant => "Titan",
        Role::System => "Sistema",
    };
    let time = message.timestamp.format("%H:%M").to_string();
    let thinking = message.thinking.clone().filter(|_| show_thinking);

    rsx! {
        div { class: "{container_class}",
            Avatar { is_user }

            div {
                class: if is_user { "flex flex-col items-end" } else { "flex flex-col items-start" },

                if let Some(thinking) = thinking {
                    ReasoningPanel { thinking, live: false }
                }

                div {
                    class: "{bubble_class}",
                    div {
                        class: "whitespace-pre-wrap break-words",
                        "{message.content}"
                    }
                }

                div {
                    class: "text-[10px] text-[var(--text-tertiary)] mt-1 opacity-0 group-hover:opacity-100 transition-opacity px-1",
                    "{author} • {time}"
                }
            }
        }
    }
}

/// Assistant answer while it is still streaming
#[component]
pub fn StreamingBubble(view: ResponseView) -> Element {
    let waiting = view.answer.is_empty() && view.thinking.is_none();

    rsx! {
        div { class: "flex flex-row items-start gap-4 mb-6",
            Avatar { is_user: false }

            div {
                class: "flex flex-col items-start max-w-[85%]",

                if let Some(thinking) = view.thinking.clone() {
                    ReasoningPanel { thinking, live: view.inside_thinking }
                }

                if waiting {
                    TypingDots { label: "Titan está digitando..." }
                } else if !view.answer.is_empty() {
                    div {
                        class: "bg-[var(--bg-hover)] text-[var(--text-primary)] rounded-2xl rounded-tl-sm px-5 py-3.5 shadow-sm leading-relaxed border border-[var(--border-subtle)]",
                        div {
                            class: "whitespace-pre-wrap break-words",
                            "{view.answer}"
                            span { class: "streaming-cursor animate-pulse", "▍" }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn Avatar(is_user: bool) -> Element {
    rsx! {
        div {
            class: "flex-shrink-0 mt-1",
            div {
                class: if is_user {
                    "w-8 h-8 rounded-full flex items-center justify-center shadow-sm text-xs font-bold bg-[var(--accent-hover)] text-white"
                } else {
                    "w-8 h-8 rounded-full flex items-center justify-center shadow-sm text-xs font-bold bg-gradient-to-br from-[var(--accent-primary)] to-purple-600 text-white"
                },

                if is_user {
                    "U"
                } else {
                    svg { width: "16", height: "16", view_box: "0 0 24 24", fill: "none", stroke: "currentColor", stroke_width: "2", path { d: "M21 15a2 2 0 0 1-2 2H7l-4 4V5a2 2 0 0 1 2-2h14a2 2 0 0 1 2 2z" } }
                }
            }
        }
    }
}
