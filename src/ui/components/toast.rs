use std::time::Duration;

use dioxus::prelude::*;

use crate::app::{AppState, ToastKind};

const TOAST_DURATION: Duration = Duration::from_secs(3);

/// Bottom-right notification, dismissed after a few seconds
#[component]
pub fn ToastBanner() -> Element {
    let app_state = use_context::<AppState>();
    let mut toast = app_state.toast;

    use_effect(move || {
        let shown = toast();
        if shown.is_some() {
            spawn(async move {
                tokio::time::sleep(TOAST_DURATION).await;
                // a newer toast may have replaced this one
                if toast.peek().as_ref() == shown.as_ref() {
                    toast.set(None);
                }
            });
        }
    });

    let Some(current) = toast() else {
        return rsx! {};
    };

    let tone = match current.kind {
        ToastKind::Info => "border-[var(--border-subtle)] text-[var(--text-primary)]",
        ToastKind::Success => "border-green-500/50 text-green-500",
        ToastKind::Error => "border-red-500/50 text-red-500",
    };

    rsx! {
        div {
            class: "fixed bottom-6 right-6 z-50 max-w-sm px-4 py-3 rounded-xl shadow-2xl bg-[var(--bg-secondary)] border text-sm animate-fade-in {tone}",
            onclick: move |_| toast.set(None),
            "{current.message}"
        }
    }
}
