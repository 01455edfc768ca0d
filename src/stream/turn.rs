//! Per-response streaming state
//!
//! Combines the raw-text assembler with the backend's out-of-band
//! `thinking_done` / `done` events and the thinking display policy.

use crate::stream::assembler::{strip_thinking_blocks, StreamBuffer, StreamSnapshot};
use crate::stream::events::{StreamEvent, StreamStats};
use crate::types::message::{ChatMessage, Role};

/// What the UI renders for a response
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseView {
    /// Reasoning text. `None` when thinking is hidden or absent.
    pub thinking: Option<String>,
    pub answer: String,
    pub inside_thinking: bool,
}

/// Outcome of applying one event to a turn
#[derive(Debug, Clone, PartialEq)]
pub enum TurnProgress {
    Streaming(ResponseView),
    Finished(ResponseView),
    Failed {
        message: String,
        action_required: Option<String>,
    },
}

/// State of one in-flight response
#[derive(Debug, Clone)]
pub struct ResponseTurn {
    buffer: StreamBuffer,
    show_thinking: bool,
    thinking_done: Option<String>,
    final_content: Option<String>,
    stats: Option<StreamStats>,
    finished: bool,
}

impl ResponseTurn {
    /// `show_thinking` is the thinking-mode flag at the time the message was sent
    pub fn new(show_thinking: bool) -> Self {
        Self {
            buffer: StreamBuffer::new(),
            show_thinking,
            thinking_done: None,
            final_content: None,
            stats: None,
            finished: false,
        }
    }

    pub fn apply(&mut self, event: StreamEvent) -> TurnProgress {
        match event {
            StreamEvent::Content(fragment) => {
                let snapshot = self.buffer.push(&fragment);
                TurnProgress::Streaming(self.view_of(&snapshot))
            }
            StreamEvent::ThinkingDone(thinking) => {
                self.thinking_done = Some(thinking);
                TurnProgress::Streaming(self.view())
            }
            StreamEvent::Done {
                final_content,
                stats,
            } => {
                self.final_content = final_content;
                self.stats = stats;
                self.finished = true;
                TurnProgress::Finished(self.view())
            }
            StreamEvent::Error {
                message,
                action_required,
            } => TurnProgress::Failed {
                message,
                action_required,
            },
        }
    }

    pub fn view(&self) -> ResponseView {
        self.view_of(&self.buffer.snapshot())
    }

    fn view_of(&self, snapshot: &StreamSnapshot) -> ResponseView {
        let thinking = if self.show_thinking {
            self.thinking_done.clone().or_else(|| {
                (snapshot.inside_thinking || !snapshot.thinking_text.is_empty())
                    .then(|| snapshot.thinking_text.clone())
            })
        } else {
            None
        };

        let answer = if self.finished && snapshot.answer_text.is_empty() {
            self.final_answer()
        } else {
            snapshot.answer_text.clone()
        };

        ResponseView {
            thinking,
            answer,
            inside_thinking: snapshot.inside_thinking,
        }
    }

    /// True once a `done` event was applied
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn stats(&self) -> Option<&StreamStats> {
        self.stats.as_ref()
    }

    pub fn raw_text(&self) -> &str {
        self.buffer.accumulated()
    }

    fn final_answer(&self) -> String {
        let stripped = strip_thinking_blocks(self.buffer.accumulated());
        if stripped.is_empty() {
            self.final_content.clone().unwrap_or_default()
        } else {
            stripped
        }
    }

    /// Build the assistant message stored in the conversation.
    ///
    /// Reasoning is kept on the message regardless of the display flag so
    /// a later view with thinking enabled can still show it.
    pub fn into_message(self) -> ChatMessage {
        let thinking = self.thinking_done.clone().or_else(|| {
            let snapshot = self.buffer.snapshot();
            let text = snapshot.thinking_text.trim();
            (!text.is_empty()).then(|| text.to_string())
        });

        let mut message = ChatMessage::new(Role::Assistant, self.final_answer());
        message.thinking = thinking;
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content(s: &str) -> StreamEvent {
        StreamEvent::Content(s.to_string())
    }

    fn done() -> StreamEvent {
        StreamEvent::Done {
            final_content: None,
            stats: None,
        }
    }

    #[test]
    fn test_thinking_visible_when_enabled() {
        let mut turn = ResponseTurn::new(true);
        let progress = turn.apply(content("<think>pondering"));
        assert_eq!(
            progress,
            TurnProgress::Streaming(ResponseView {
                thinking: Some("pondering".to_string()),
                answer: String::new(),
                inside_thinking: true,
            })
        );
    }

    #[test]
    fn test_thinking_hidden_when_disabled() {
        let mut turn = ResponseTurn::new(false);
        turn.apply(content("<think>pondering</think>"));
        let progress = turn.apply(content(" Answer"));
        assert_eq!(
            progress,
            TurnProgress::Streaming(ResponseView {
                thinking: None,
                answer: "Answer".to_string(),
                inside_thinking: false,
            })
        );
    }

    #[test]
    fn test_no_markers_shows_no_panel() {
        let mut turn = ResponseTurn::new(true);
        match turn.apply(content("Just text")) {
            TurnProgress::Streaming(view) => {
                assert_eq!(view.thinking, None);
                assert_eq!(view.answer, "Just text");
            }
            other => panic!("unexpected progress: {other:?}"),
        }
    }

    #[test]
    fn test_thinking_done_overrides_live_text() {
        let mut turn = ResponseTurn::new(true);
        turn.apply(content("<think> raw plan </think>ok"));
        turn.apply(StreamEvent::ThinkingDone("raw plan".to_string()));
        assert_eq!(turn.view().thinking.as_deref(), Some("raw plan"));
    }

    #[test]
    fn test_finished_message_carries_thinking() {
        let mut turn = ResponseTurn::new(false);
        turn.apply(content("<think>step</think>"));
        turn.apply(content("\n\nFinal"));
        assert!(matches!(turn.apply(done()), TurnProgress::Finished(_)));
        assert!(turn.is_finished());

        let message = turn.into_message();
        assert_eq!(message.role, Role::Assistant);
        assert_eq!(message.content, "Final");
        assert_eq!(message.thinking.as_deref(), Some("step"));
    }

    #[test]
    fn test_final_content_fallback() {
        let mut turn = ResponseTurn::new(true);
        let progress = turn.apply(StreamEvent::Done {
            final_content: Some("From server".to_string()),
            stats: Some(StreamStats { chunks: 0, length: 0 }),
        });
        match progress {
            TurnProgress::Finished(view) => assert_eq!(view.answer, "From server"),
            other => panic!("unexpected progress: {other:?}"),
        }
        assert_eq!(turn.stats().map(|s| s.chunks), Some(0));
        assert_eq!(turn.into_message().content, "From server");
    }

    #[test]
    fn test_error_fails_turn() {
        let mut turn = ResponseTurn::new(true);
        turn.apply(content("partial"));
        let progress = turn.apply(StreamEvent::transport_error("connection reset"));
        assert_eq!(
            progress,
            TurnProgress::Failed {
                message: "connection reset".to_string(),
                action_required: None,
            }
        );
        assert_eq!(turn.raw_text(), "partial");
    }
}
