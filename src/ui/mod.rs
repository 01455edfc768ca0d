//! UI components for Titan Chat
//!
//! This module contains all user interface components built with Dioxus.

pub mod actions;
pub mod chat;
pub mod components;
pub mod settings;
pub mod sidebar;

use crate::app::{AppState, View};
use crate::thinking::theme_class;
use crate::ui::chat::ChatView;
use crate::ui::components::context_modal::ContextModal;
use crate::ui::components::toast::ToastBanner;
use crate::ui::settings::Settings;
use crate::ui::sidebar::Sidebar;
use dioxus::prelude::*;

fn font_size_class(font_size: &str) -> &'static str {
    match font_size {
        "small" => "text-sm",
        "large" => "text-lg",
        _ => "text-base",
    }
}

/// Main Application Layout
#[component]
pub fn Layout() -> Element {
    let app_state = use_context::<AppState>();
    let settings = app_state.settings.read().clone();
    let thinking_class = theme_class((app_state.thinking)());
    let font_class = font_size_class(&settings.font_size);

    rsx! {
        // Theme wrapper
        div {
            "data-theme": "{settings.theme}",
            class: "flex h-screen w-screen bg-[var(--bg-main)] text-[var(--text-primary)] transition-colors duration-300 overflow-hidden font-sans {thinking_class} {font_class}",

            link { rel: "stylesheet", href: "assets/styles.css" }

            Sidebar {}

            // Main Content Area
            main {
                class: "flex-1 flex flex-col h-full relative min-w-0 bg-[var(--bg-main)]",
                match (app_state.view)() {
                    View::Chat => rsx! { ChatView {} },
                    View::Settings => rsx! { Settings {} },
                }
            }

            ContextModal {}
            ToastBanner {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_size_class() {
        assert_eq!(font_size_class("small"), "text-sm");
        assert_eq!(font_size_class("large"), "text-lg");
        assert_eq!(font_size_class("medium"), "text-base");
        assert_eq!(font_size_class("weird"), "text-base");
    }
}
