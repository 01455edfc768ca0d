//! Thinking mode
//!
//! Whether the assistant's chain-of-thought is requested and displayed. The
//! backend reads inline `/think` and `/no_think` commands from the message
//! text, so outgoing messages carry one explicitly.

use serde::{Deserialize, Serialize};

pub const THINK_COMMAND: &str = "/think";
pub const NO_THINK_COMMAND: &str = "/no_think";

/// CSS class applied to the app root while thinking mode is on
pub const THINKING_THEME_CLASS: &str = "thinking-theme";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThinkingMode {
    pub enabled: bool,
}

impl ThinkingMode {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        self.enabled
    }

    pub fn theme_class(&self) -> &'static str {
        theme_class(self.enabled)
    }

    pub fn status_label(&self) -> &'static str {
        if self.enabled {
            "Ativado"
        } else {
            "Desativado"
        }
    }
}

pub fn theme_class(enabled: bool) -> &'static str {
    if enabled {
        THINKING_THEME_CLASS
    } else {
        ""
    }
}

/// Mode requested by an inline command, if the message has one.
///
/// `/think` wins when both are present, matching the backend.
pub fn detect_inline_command(message: &str) -> Option<bool> {
    if message.contains(THINK_COMMAND) {
        Some(true)
    } else if message.contains(NO_THINK_COMMAND) {
        Some(false)
    } else {
        None
    }
}

/// Trim the message and append the command for `enabled` unless the user
/// already typed one.
pub fn apply_thinking_command(message: &str, enabled: bool) -> String {
    let message = message.trim();
    if message.contains(THINK_COMMAND) || message.contains(NO_THINK_COMMAND) {
        return message.to_string();
    }
    let command = if enabled { THINK_COMMAND } else { NO_THINK_COMMAND };
    format!("{message} {command}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle() {
        let mut mode = ThinkingMode::default();
        assert!(!mode.enabled);
        assert_eq!(mode.theme_class(), "");
        assert!(mode.toggle());
        assert_eq!(mode.theme_class(), THINKING_THEME_CLASS);
        assert_eq!(mode.status_label(), "Ativado");
        assert!(!mode.toggle());
    }

    #[test]
    fn test_apply_command() {
        assert_eq!(apply_thinking_command("  oi  ", true), "oi /think");
        assert_eq!(apply_thinking_command("oi", false), "oi /no_think");
        assert_eq!(apply_thinking_command("oi /think", false), "oi /think");
        assert_eq!(apply_thinking_command("oi /no_think", true), "oi /no_think");
    }

    #[test]
    fn test_detect_inline_command() {
        assert_eq!(detect_inline_command("plain"), None);
        assert_eq!(detect_inline_command("x /think"), Some(true));
        assert_eq!(detect_inline_command("x /no_think"), Some(false));
        assert_eq!(detect_inline_command("/no_think then /think"), Some(true));
    }
}
