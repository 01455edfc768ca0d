use crate::app::{AppState, ToastKind};
use crate::storage::settings::{save_settings, AppSettings};
use dioxus::prelude::*;

pub fn ConnectionSettings() -> Element {
    let app_state = use_context::<AppState>();
    let saved = app_state.settings.read().clone();

    let mut server_url = use_signal(|| saved.server_url.clone());
    let mut timeout = use_signal(|| saved.request_timeout_secs.to_string());
    let mut attempts = use_signal(|| saved.session_retry_attempts.to_string());
    let mut backoff = use_signal(|| saved.session_retry_backoff_ms.to_string());
    let mut thinking_default = use_signal(|| saved.thinking_by_default);

    let handle_save = move |_| {
        let current = app_state.settings.read().clone();
        let mut updated = AppSettings {
            server_url: server_url().trim().to_string(),
            request_timeout_secs: timeout().trim().parse().unwrap_or(current.request_timeout_secs),
            thinking_by_default: thinking_default(),
            session_retry_attempts: attempts().trim().parse().unwrap_or(current.session_retry_attempts),
            session_retry_backoff_ms: backoff().trim().parse().unwrap_or(current.session_retry_backoff_ms),
            ..current.clone()
        };
        updated.validate();

        // reflect clamped values back into the form
        server_url.set(updated.server_url.clone());
        timeout.set(updated.request_timeout_secs.to_string());
        attempts.set(updated.session_retry_attempts.to_string());
        backoff.set(updated.session_retry_backoff_ms.to_string());

        match save_settings(&updated) {
            Ok(()) => {
                // the client and retry policy are built once at startup
                let restart = updated != current;
                let mut settings = app_state.settings;
                settings.set(updated);
                if restart {
                    app_state.notify(ToastKind::Info, "Configurações salvas. Reinicie para aplicar.");
                } else {
                    app_state.notify(ToastKind::Success, "Nada a alterar");
                }
            }
            Err(e) => {
                tracing::error!("Failed to save settings: {}", e);
                app_state.notify(ToastKind::Error, format!("Erro ao salvar: {e}"));
            }
        }
    };

    rsx! {
        div {
            class: "space-y-6 max-w-3xl mx-auto animate-fade-in",
            style: "padding-bottom: 2rem;",

            h3 {
                class: "text-xl font-semibold pb-2",
                style: "color: var(--text-primary); border-bottom: 1px solid var(--border-subtle);",
                "Servidor"
            }

            Field {
                label: "Endereço do servidor",
                hint: "Também pode ser definido pela variável TITAN_SERVER_URL",
                input {
                    class: "w-full px-3 py-2 rounded-lg bg-[var(--bg-input)] border border-[var(--border-subtle)] text-[var(--text-primary)]",
                    value: "{server_url}",
                    oninput: move |evt| server_url.set(evt.value()),
                }
            }

            div { class: "grid grid-cols-3 gap-4",
                Field {
                    label: "Timeout (s)",
                    hint: "1 a 300",
                    input {
                        class: "w-full px-3 py-2 rounded-lg bg-[var(--bg-input)] border border-[var(--border-subtle)] text-[var(--text-primary)]",
                        r#type: "number",
                        value: "{timeout}",
                        oninput: move |evt| timeout.set(evt.value()),
                    }
                }
                Field {
                    label: "Tentativas de sessão",
                    hint: "1 a 10",
                    input {
                        class: "w-full px-3 py-2 rounded-lg bg-[var(--bg-input)] border border-[var(--border-subtle)] text-[var(--text-primary)]",
                        r#type: "number",
                        value: "{attempts}",
                        oninput: move |evt| attempts.set(evt.value()),
                    }
                }
                Field {
                    label: "Espera inicial (ms)",
                    hint: "Dobra a cada tentativa",
                    input {
                        class: "w-full px-3 py-2 rounded-lg bg-[var(--bg-input)] border border-[var(--border-subtle)] text-[var(--text-primary)]",
                        r#type: "number",
                        value: "{backoff}",
                        oninput: move |evt| backoff.set(evt.value()),
                    }
                }
            }

            div {
                class: "flex items-center justify-between py-4",
                style: "border-top: 1px solid var(--border-subtle);",
                div {
                    div { class: "font-medium", style: "color: var(--text-primary);", "Thinking mode por padrão" }
                    div { class: "text-sm", style: "color: var(--text-secondary);", "Usado até o servidor informar o modo atual" }
                }
                input {
                    r#type: "checkbox",
                    checked: thinking_default(),
                    onchange: move |evt| thinking_default.set(evt.checked()),
                }
            }

            button {
                class: "px-4 py-2 rounded-lg bg-[var(--accent-primary)] text-[var(--accent-text)] hover:bg-[var(--accent-hover)]",
                onclick: handle_save,
                "Salvar"
            }
        }
    }
}

#[component]
fn Field(label: String, hint: String, children: Element) -> Element {
    rsx! {
        label { class: "block space-y-1",
            div { class: "text-sm font-medium", style: "color: var(--text-primary);", "{label}" }
            {children}
            div { class: "text-xs", style: "color: var(--text-tertiary);", "{hint}" }
        }
    }
}
