//! Progress indicators
//!
//! Colours come from `--accent-primary`, so they turn purple under
//! `.thinking-theme`. Keyframes live in `assets/styles.css`.

use dioxus::prelude::*;

/// Small ring shown next to a reasoning block while it is still growing
#[component]
pub fn Spinner(#[props(default = 16)] size: u32) -> Element {
    rsx! {
        span {
            class: "titan-spinner inline-block shrink-0 rounded-full",
            style: "width: {size}px; height: {size}px;",
        }
    }
}

/// Three bouncing dots with a caption, shown before the first token arrives
#[component]
pub fn TypingDots(label: String) -> Element {
    rsx! {
        div { class: "flex items-center gap-2 text-[var(--text-tertiary)] text-sm mt-2 animate-fade-in",
            for delay in ["0ms", "150ms", "300ms"] {
                span {
                    key: "{delay}",
                    class: "titan-dot w-2 h-2 rounded-full",
                    style: "animation-delay: {delay};",
                }
            }
            span { "{label}" }
        }
    }
}

/// Placeholder lines while the session is being set up
#[component]
pub fn SkeletonLines(widths: Vec<&'static str>) -> Element {
    rsx! {
        div { class: "max-w-2xl mx-auto space-y-3 mt-8",
            for (idx, width) in widths.into_iter().enumerate() {
                div {
                    key: "{idx}",
                    class: "titan-skeleton h-4",
                    style: "width: {width};",
                }
            }
        }
    }
}
