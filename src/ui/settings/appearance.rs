use crate::app::AppState;
use crate::storage::settings::save_settings;
use dioxus::prelude::*;

const FONT_SIZES: [(&str, &str, &str); 3] = [
    ("small", "Pequena", "font-size: 0.875rem; color: var(--text-tertiary);"),
    ("medium", "Média", "font-size: 1rem; color: var(--text-tertiary);"),
    ("large", "Grande", "font-size: 1.25rem; color: var(--text-tertiary);"),
];

pub fn AppearanceSettings() -> Element {
    let app_state = use_context::<AppState>();
    let settings = app_state.settings.read().clone();
    let dark_mode = settings.theme == "dark";
    let selected_font_size = settings.font_size.to_lowercase();
    let app_state_theme = app_state.clone();
    let app_state_font_size = app_state.clone();

    rsx! {
        div {
            class: "space-y-8 max-w-3xl mx-auto animate-fade-in",
            style: "padding-bottom: 2rem;",

            h3 {
                class: "text-xl font-semibold pb-2",
                style: "color: var(--text-primary); border-bottom: 1px solid var(--border-subtle);",
                "Aparência"
            }

            // Theme Toggle
            div {
                class: "flex items-center justify-between py-4",
                style: "border-bottom: 1px solid var(--border-subtle);",

                div {
                    div { class: "font-medium", style: "color: var(--text-primary);", "Modo escuro" }
                    div { class: "text-sm", style: "color: var(--text-secondary);", "Alterna o tema de cores do aplicativo" }
                }
                button {
                    onclick: move |_| {
                        let mut settings = app_state_theme.settings;
                        let mut settings = settings.write();
                        settings.theme = if dark_mode { "light".to_string() } else { "dark".to_string() };
                        if let Err(error) = save_settings(&settings) {
                            tracing::error!("Failed to save settings: {}", error);
                        }
                    },
                    class: "relative inline-flex h-7 w-12 items-center rounded-full transition-colors focus:outline-none focus:ring-2 focus:ring-offset-2",
                    style: format!(
                        "background-color: {}; --tw-ring-color: var(--accent-primary);",
                        if dark_mode { "var(--accent-primary)" } else { "var(--bg-active)" }
                    ),
                    span {
                        class: "inline-block h-5 w-5 transform rounded-full bg-white transition-transform shadow-sm",
                        style: format!(
                            "transform: translateX({});",
                            if dark_mode { "1.5rem" } else { "0.25rem" }
                        )
                    }
                }
            }

            // Font Size Selection
            div { class: "space-y-4", style: "gap: 1rem; display: flex; flex-direction: column;",
                div {
                    div { class: "font-medium", style: "color: var(--text-primary);", "Tamanho da fonte" }
                    div { class: "text-sm", style: "color: var(--text-secondary);", "Ajusta o tamanho do texto da conversa" }
                }
                div { class: "grid grid-cols-3 gap-4", style: "gap: 1rem; display: grid; grid-template-columns: repeat(3, minmax(0, 1fr));",
                    for (value, label, sample_style) in FONT_SIZES {
                        button {
                            key: "{value}",
                            onclick: {
                                let mut settings = app_state_font_size.settings;
                                move |_| {
                                    let mut settings = settings.write();
                                    settings.font_size = value.to_string();
                                    if let Err(error) = save_settings(&settings) {
                                        tracing::error!("Failed to save settings: {}", error);
                                    }
                                }
                            },
                            class: "p-4 rounded-xl border-2 text-center transition-all",
                            style: if selected_font_size == value {
                                "border-color: var(--accent-primary); background-color: var(--bg-active); color: var(--accent-primary); box-shadow: var(--shadow-sm);"
                            } else {
                                "border-color: var(--border-subtle); background-color: var(--bg-input); color: var(--text-secondary);"
                            },
                            div { class: "font-semibold", "{label}" }
                            div {
                                class: "mt-1",
                                style: sample_style,
                                "Aa"
                            }
                        }
                    }
                }
            }
        }
    }
}
