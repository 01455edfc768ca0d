//! Application state owned by the controller

use crate::api::SessionInfo;
use crate::history::{generate_chat_id, ChatHistory};
use crate::thinking::ThinkingMode;
use crate::types::chat::{ChatRecord, DEFAULT_TITLE};
use crate::types::message::ChatMessage;

#[derive(Debug, Clone, PartialEq)]
pub struct ChatState {
    pub session: Option<SessionInfo>,
    pub thinking: ThinkingMode,
    /// The open conversation. Not necessarily saved yet.
    pub conversation: ChatRecord,
    pub history: ChatHistory,
    pub generating: bool,
}

impl ChatState {
    pub fn new(thinking_enabled: bool) -> Self {
        Self {
            session: None,
            thinking: ThinkingMode::new(thinking_enabled),
            conversation: blank_conversation(),
            history: ChatHistory::new(),
            generating: false,
        }
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.session_id.as_str())
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.conversation.messages
    }

    /// Whether the open conversation exists in the history list
    pub fn is_saved(&self) -> bool {
        self.history.get(&self.conversation.id).is_some()
    }

    /// Replace the open conversation with an empty one
    pub fn reset_conversation(&mut self) {
        self.conversation = blank_conversation();
        self.history.clear_selection();
    }
}

pub(crate) fn blank_conversation() -> ChatRecord {
    ChatRecord::new(generate_chat_id(), DEFAULT_TITLE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state() {
        let state = ChatState::new(true);
        assert!(state.thinking.enabled);
        assert!(state.session_id().is_none());
        assert!(state.messages().is_empty());
        assert_eq!(state.conversation.title, DEFAULT_TITLE);
        assert!(!state.is_saved());
    }

    #[test]
    fn test_reset_gives_fresh_id() {
        let mut state = ChatState::new(false);
        state.conversation.messages.push(ChatMessage::user("oi"));
        let old_id = state.conversation.id.clone();
        state.reset_conversation();
        assert!(state.messages().is_empty());
        assert_ne!(state.conversation.id, old_id);
    }
}
