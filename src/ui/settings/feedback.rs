use crate::api::Feedback;
use crate::app::AppState;
use crate::ui::actions;
use dioxus::prelude::*;

const KINDS: [(&str, &str); 3] = [("geral", "Geral"), ("bug", "Bug"), ("sugestao", "Sugestão")];

pub fn FeedbackForm() -> Element {
    let app_state = use_context::<AppState>();
    let mut kind = use_signal(|| "geral".to_string());
    let mut title = use_signal(String::new);
    let mut description = use_signal(String::new);
    let mut sent = use_signal(|| false);

    let draft = Feedback {
        kind: kind(),
        title: title(),
        description: description(),
        thinking_mode: (app_state.thinking)(),
    };
    let ready = draft.is_valid();

    use_effect(move || {
        if sent() {
            title.set(String::new());
            description.set(String::new());
            sent.set(false);
        }
    });

    rsx! {
        div {
            class: "space-y-6 max-w-3xl mx-auto animate-fade-in",

            h3 {
                class: "text-xl font-semibold pb-2",
                style: "color: var(--text-primary); border-bottom: 1px solid var(--border-subtle);",
                "Enviar feedback"
            }

            div { class: "flex gap-2",
                for (value, label) in KINDS {
                    button {
                        key: "{value}",
                        class: if kind() == value {
                            "px-3 py-1 text-sm rounded-full border border-[var(--accent-primary)] text-[var(--accent-primary)]"
                        } else {
                            "px-3 py-1 text-sm rounded-full border border-[var(--border-subtle)] text-[var(--text-secondary)]"
                        },
                        onclick: move |_| kind.set(value.to_string()),
                        "{label}"
                    }
                }
            }

            input {
                class: "w-full px-3 py-2 rounded-lg bg-[var(--bg-input)] border border-[var(--border-subtle)] text-[var(--text-primary)]",
                placeholder: "Título (mínimo 5 caracteres)",
                value: "{title}",
                oninput: move |evt| title.set(evt.value()),
            }
            textarea {
                class: "w-full min-h-[140px] px-3 py-2 rounded-lg bg-[var(--bg-input)] border border-[var(--border-subtle)] text-[var(--text-primary)] resize-y",
                placeholder: "Descrição (mínimo 10 caracteres)",
                value: "{description}",
                oninput: move |evt| description.set(evt.value()),
            }

            button {
                class: "px-4 py-2 rounded-lg bg-[var(--accent-primary)] text-[var(--accent-text)] hover:bg-[var(--accent-hover)] disabled:opacity-30",
                disabled: !ready,
                onclick: move |_| actions::send_feedback(app_state.clone(), draft.clone(), sent),
                "Enviar"
            }
        }
    }
}
