use chrono::Utc;
use dioxus::prelude::*;

use crate::app::AppState;
use crate::history::HistoryFilter;
use crate::ui::actions;

const FILTERS: [HistoryFilter; 3] = [
    HistoryFilter::All,
    HistoryFilter::Pinned,
    HistoryFilter::Recent,
];

#[component]
pub fn HistoryList() -> Element {
    let app_state = use_context::<AppState>();
    let mut query = use_signal(String::new);
    let mut filter = use_signal(HistoryFilter::default);
    let mut editing = use_signal(|| None::<String>);
    let mut draft = use_signal(String::new);
    let mut confirm_clear = use_signal(|| false);

    let history = app_state.history.read().clone();
    let current_id = (app_state.current_chat_id)();
    let generating = (app_state.generating)();
    let rows: Vec<_> = history
        .filter(&query(), filter(), Utc::now())
        .into_iter()
        .cloned()
        .collect();

    let app_state_clear = app_state.clone();
    let app_state_refresh = app_state.clone();

    rsx! {
        div {
            class: "flex-1 flex flex-col min-h-0",

            // Search
            div {
                class: "px-3 pb-2",
                input {
                    class: "w-full px-3 py-2 text-sm rounded-md bg-[var(--bg-input)] border border-[var(--border-subtle)] text-[var(--text-primary)] placeholder-[var(--text-tertiary)] focus:outline-none",
                    placeholder: "Buscar conversas...",
                    value: "{query}",
                    oninput: move |evt| query.set(evt.value()),
                }
            }

            // Filter tabs
            div {
                class: "flex gap-1 px-3 pb-2",
                for tab in FILTERS {
                    button {
                        key: "{tab.label()}",
                        class: if filter() == tab {
                            "flex-1 px-2 py-1 text-xs rounded-md bg-[var(--bg-hover)] text-[var(--text-primary)]"
                        } else {
                            "flex-1 px-2 py-1 text-xs rounded-md text-[var(--text-tertiary)] hover:text-[var(--text-primary)]"
                        },
                        onclick: move |_| filter.set(tab),
                        "{tab.label()}"
                    }
                }
                button {
                    class: "px-2 py-1 text-xs rounded-md text-[var(--text-tertiary)] hover:text-[var(--text-primary)]",
                    title: "Atualizar",
                    onclick: move |_| actions::refresh_history(app_state_refresh.clone()),
                    "↻"
                }
            }

            div {
                class: "flex-1 overflow-y-auto px-2 py-2 space-y-1",
                style: "scrollbar-width: thin;",

                if rows.is_empty() {
                    div {
                        class: "px-3 py-4 text-xs text-[var(--text-tertiary)]",
                        if history.is_empty() { "Nenhuma conversa salva" } else { "Nenhuma conversa encontrada" }
                    }
                } else {
                    {rows.into_iter().map(|chat| {
                        let is_selected = chat.id == current_id;
                        let row_class = if is_selected {
                            "flex items-center gap-2 px-3 py-3 text-sm rounded-md cursor-pointer transition-colors duration-200 bg-[var(--bg-hover)] text-[var(--text-primary)]"
                        } else {
                            "flex items-center gap-2 px-3 py-3 text-sm rounded-md cursor-pointer transition-colors duration-200 hover:bg-[var(--bg-hover)] text-[var(--text-secondary)] hover:text-[var(--text-primary)]"
                        };
                        let is_editing = editing().as_deref() == Some(chat.id.as_str());
                        let pin_label = if chat.is_pinned { "Desafixar" } else { "Fixar" };
                        let subtitle = chat
                            .preview
                            .as_ref()
                            .map(|p| crate::truncate_chars(&p.first_user_message, 40).to_string())
                            .unwrap_or_default();

                        let id_open = chat.id.clone();
                        let id_pin = chat.id.clone();
                        let id_rename = chat.id.clone();
                        let id_commit = chat.id.clone();
                        let id_context = chat.id.clone();
                        let id_delete = chat.id.clone();
                        let title_for_edit = chat.title.clone();
                        let state_open = app_state.clone();
                        let state_pin = app_state.clone();
                        let state_rename = app_state.clone();
                        let state_context = app_state.clone();
                        let state_delete = app_state.clone();

                        rsx! {
                            div {
                                key: "{chat.id}",
                                class: "group relative",

                                div {
                                    class: row_class,
                                    onclick: move |_| {
                                        if !generating {
                                            actions::open_chat(state_open.clone(), id_open.clone());
                                        }
                                    },

                                    if chat.is_pinned {
                                        span { class: "shrink-0 text-xs", "📌" }
                                    }

                                    if is_editing {
                                        input {
                                            class: "flex-1 min-w-0 px-2 py-1 text-sm rounded bg-[var(--bg-input)] border border-[var(--border-subtle)]",
                                            value: "{draft}",
                                            autofocus: true,
                                            onclick: move |evt| evt.stop_propagation(),
                                            oninput: move |evt| draft.set(evt.value()),
                                            onkeydown: move |evt| {
                                                match evt.key() {
                                                    Key::Enter => {
                                                        let title = draft().trim().to_string();
                                                        if !title.is_empty() {
                                                            actions::rename_chat(state_rename.clone(), id_commit.clone(), title);
                                                        }
                                                        editing.set(None);
                                                    }
                                                    Key::Escape => editing.set(None),
                                                    _ => {}
                                                }
                                            },
                                        }
                                    } else {
                                        div {
                                            class: "flex-1 min-w-0",
                                            div { class: "truncate", "{chat.title}" }
                                            if !subtitle.is_empty() {
                                                div { class: "truncate text-xs text-[var(--text-tertiary)]", "{subtitle}" }
                                            }
                                        }
                                    }

                                    // Row actions
                                    div {
                                        class: "flex gap-1 opacity-0 group-hover:opacity-100 transition-opacity text-[var(--text-tertiary)]",
                                        button {
                                            class: "hover:text-[var(--text-primary)]",
                                            title: pin_label,
                                            onclick: move |evt| {
                                                evt.stop_propagation();
                                                actions::toggle_pin(state_pin.clone(), id_pin.clone());
                                            },
                                            "📌"
                                        }
                                        button {
                                            class: "hover:text-[var(--text-primary)]",
                                            title: "Renomear",
                                            onclick: move |evt| {
                                                evt.stop_propagation();
                                                draft.set(title_for_edit.clone());
                                                editing.set(Some(id_rename.clone()));
                                            },
                                            "✏️"
                                        }
                                        button {
                                            class: "hover:text-[var(--text-primary)]",
                                            title: "Ver contexto",
                                            onclick: move |evt| {
                                                evt.stop_propagation();
                                                actions::show_context(state_context.clone(), id_context.clone());
                                            },
                                            "ℹ️"
                                        }
                                        button {
                                            class: "hover:text-red-500",
                                            title: "Excluir",
                                            disabled: generating,
                                            onclick: move |evt| {
                                                evt.stop_propagation();
                                                actions::delete_chat(state_delete.clone(), id_delete.clone());
                                            },
                                            svg {
                                                width: "14",
                                                height: "14",
                                                view_box: "0 0 24 24",
                                                fill: "none",
                                                stroke: "currentColor",
                                                stroke_width: "2",
                                                stroke_linecap: "round",
                                                stroke_linejoin: "round",
                                                path { d: "M3 6h18" }
                                                path { d: "M19 6l-1 14a2 2 0 0 1-2 2H8a2 2 0 0 1-2-2L5 6" }
                                                path { d: "M10 6V4a2 2 0 0 1 2-2h0a2 2 0 0 1 2 2v2" }
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    })}
                }
            }

            // Clear all
            if !history.is_empty() {
                div {
                    class: "px-3 pb-2",
                    if confirm_clear() {
                        div {
                            class: "flex items-center gap-2 text-xs",
                            span { class: "flex-1 text-[var(--text-secondary)]", "Excluir todas as conversas?" }
                            button {
                                class: "px-2 py-1 rounded-md bg-red-600 text-white",
                                onclick: move |_| {
                                    confirm_clear.set(false);
                                    actions::clear_all_history(app_state_clear.clone());
                                },
                                "Sim"
                            }
                            button {
                                class: "px-2 py-1 rounded-md border border-[var(--border-subtle)]",
                                onclick: move |_| confirm_clear.set(false),
                                "Não"
                            }
                        }
                    } else {
                        button {
                            class: "w-full px-3 py-2 text-xs text-left rounded-md text-[var(--text-tertiary)] hover:text-red-500 hover:bg-[var(--bg-hover)] disabled:opacity-40",
                            disabled: generating,
                            onclick: move |_| confirm_clear.set(true),
                            "🗑️ Limpar histórico"
                        }
                    }
                }
            }
        }
    }
}
