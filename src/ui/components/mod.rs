//! Shared UI components
//!
//! Reusable components like spinners, toasts, and dialogs.

pub mod context_modal;
pub mod loading;
pub mod toast;
