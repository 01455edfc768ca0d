#![allow(non_snake_case)]

pub mod appearance;
pub mod connection;
pub mod feedback;

use crate::ui::settings::appearance::AppearanceSettings;
use crate::ui::settings::connection::ConnectionSettings;
use crate::ui::settings::feedback::FeedbackForm;
use dioxus::prelude::*;

#[derive(PartialEq, Clone, Copy)]
enum SettingsTab {
    Connection,
    Appearance,
    Feedback,
}

pub fn Settings() -> Element {
    let mut active_tab = use_signal(|| SettingsTab::Connection);

    rsx! {
        div {
            class: "flex flex-col h-full bg-[var(--bg-primary)]",

            // Header with glass effect
            div {
                class: "flex-none px-8 py-6 border-b border-[var(--border-subtle)] bg-[var(--bg-secondary)]/50 backdrop-blur-xl",

                div {
                    class: "max-w-3xl mx-auto w-full",

                    h2 {
                        class: "text-2xl font-bold tracking-tight mb-6 text-[var(--text-primary)]",
                        "Configurações"
                    }

                    // Tabs
                    div {
                        class: "flex gap-2 p-1 bg-white/[0.03] rounded-xl",

                        TabButton {
                            active: active_tab() == SettingsTab::Connection,
                            onclick: move |_| active_tab.set(SettingsTab::Connection),
                            label: "Conexão",
                            icon: rsx! {
                                svg { class: "w-5 h-5 mr-2", fill: "none", stroke: "currentColor", view_box: "0 0 24 24", stroke_width: "2",
                                    path { stroke_linecap: "round", stroke_linejoin: "round", d: "M13 10V3L4 14h7v7l9-11h-7z" }
                                }
                            }
                        }
                        TabButton {
                            active: active_tab() == SettingsTab::Appearance,
                            onclick: move |_| active_tab.set(SettingsTab::Appearance),
                            label: "Aparência",
                            icon: rsx! {
                                svg { class: "w-5 h-5 mr-2", fill: "none", stroke: "currentColor", view_box: "0 0 24 24", stroke_width: "2",
                                    path { stroke_linecap: "round", stroke_linejoin: "round", d: "M7 21a4 4 0 01-4-4V5a2 2 0 012-2h4a2 2 0 012-2h4a2 2 0 012 2v12a4 4 0 01-4 4zm0 0h12a2 2 0 002-2v-4a2 2 0 00-2-2h-2.343M11 7.343l1.657-1.657a2 2 0 012.828 0l2.829 2.829a2 2 0 010 2.828l-8.486 8.485M7 17h.01" }
                                }
                            }
                        }
                        TabButton {
                            active: active_tab() == SettingsTab::Feedback,
                            onclick: move |_| active_tab.set(SettingsTab::Feedback),
                            label: "Feedback",
                            icon: rsx! {
                                svg { class: "w-5 h-5 mr-2", fill: "none", stroke: "currentColor", view_box: "0 0 24 24", stroke_width: "2",
                                    path { stroke_linecap: "round", stroke_linejoin: "round", d: "M21 15a2 2 0 0 1-2 2H7l-4 4V5a2 2 0 0 1 2-2h14a2 2 0 0 1 2 2z" }
                                }
                            }
                        }
                    }
                }
            }

            // Content Area
            div {
                class: "flex-1 overflow-y-auto p-8",
                match active_tab() {
                    SettingsTab::Connection => rsx! { ConnectionSettings {} },
                    SettingsTab::Appearance => rsx! { AppearanceSettings {} },
                    SettingsTab::Feedback => rsx! { FeedbackForm {} },
                }
            }
        }
    }
}

#[component]
fn TabButton(
    active: bool,
    onclick: EventHandler<MouseEvent>,
    label: String,
    icon: Element,
) -> Element {
    let classes = if active {
        "bg-white/[0.08] text-[var(--accent-primary)] shadow-sm"
    } else {
        "text-[var(--text-secondary)] hover:text-[var(--text-primary)] hover:bg-white/[0.04]"
    };

    rsx! {
        button {
            class: "flex-1 flex items-center justify-center py-2.5 px-4 rounded-lg text-sm font-medium transition-all duration-200 {classes}",
            onclick: onclick,
            {icon}
            "{label}"
        }
    }
}
