//! Chat context dialog
//!
//! Shows the summary and counters of a saved conversation.

use dioxus::prelude::*;

use crate::app::AppState;
use crate::types::timestamp;

#[component]
pub fn ContextModal() -> Element {
    let app_state = use_context::<AppState>();
    let mut context_view = app_state.context_view;

    let Some(context) = context_view() else {
        return rsx! {};
    };

    let stats = &context.conversation_stats;
    let created = context
        .created_at
        .map(timestamp::display)
        .unwrap_or_else(|| "-".to_string());
    let updated = context
        .updated_at
        .map(timestamp::display)
        .unwrap_or_else(|| "-".to_string());
    let thinking_label = if context.thinking_enabled { "Ativado" } else { "Desativado" };

    rsx! {
        // Backdrop
        div {
            class: "fixed inset-0 bg-black/60 backdrop-blur-sm z-50 flex items-center justify-center p-4",
            onclick: move |_| context_view.set(None),

            // Dialog
            div {
                class: "w-full max-w-lg max-h-[80vh] flex flex-col bg-[var(--bg-secondary)] rounded-2xl border border-[var(--border-subtle)] shadow-2xl overflow-hidden",
                onclick: move |evt| evt.stop_propagation(),

                // Header
                div {
                    class: "p-6 border-b border-[var(--border-subtle)]",
                    h2 {
                        class: "text-lg font-semibold text-[var(--text-primary)] truncate",
                        "{context.title}"
                    }
                    p {
                        class: "text-xs text-[var(--text-tertiary)] mt-1",
                        "Criada em {created} • Atualizada em {updated}"
                    }
                }

                // Content
                div {
                    class: "p-6 space-y-4 overflow-y-auto",

                    div {
                        class: "p-4 rounded-lg bg-[var(--bg-tertiary)] border border-[var(--border-subtle)] text-sm text-[var(--text-secondary)] whitespace-pre-wrap",
                        if context.context_summary.is_empty() {
                            "Sem resumo disponível"
                        } else {
                            "{context.context_summary}"
                        }
                    }

                    div {
                        class: "grid grid-cols-2 gap-3 text-sm",
                        Stat { label: "Mensagens", value: stats.total_messages.to_string() }
                        Stat { label: "Do usuário", value: stats.user_messages.to_string() }
                        Stat { label: "Do assistente", value: stats.assistant_messages.to_string() }
                        Stat { label: "Thinking", value: thinking_label.to_string() }
                    }

                    if stats.has_thinking {
                        p { class: "text-xs text-[var(--text-tertiary)]", "🧠 Contém raciocínio do modelo" }
                    }
                }

                // Footer
                div {
                    class: "p-4 border-t border-[var(--border-subtle)] flex justify-end",
                    button {
                        class: "px-4 py-2 rounded-lg text-sm border border-[var(--border-subtle)] hover:bg-[var(--bg-hover)]",
                        onclick: move |_| context_view.set(None),
                        "Fechar"
                    }
                }
            }
        }
    }
}

#[component]
fn Stat(label: String, value: String) -> Element {
    rsx! {
        div {
            class: "p-3 rounded-lg bg-[var(--bg-tertiary)] border border-[var(--border-subtle)]",
            div { class: "text-xs text-[var(--text-tertiary)]", "{label}" }
            div { class: "font-medium text-[var(--text-primary)]", "{value}" }
        }
    }
}
