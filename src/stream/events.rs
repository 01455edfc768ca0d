//! Stream events
//!
//! Typed view of the JSON payloads carried by the backend's `/chat-stream`
//! server-sent events.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Counters reported by the backend when a stream completes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamStats {
    #[serde(default)]
    pub chunks: u64,
    #[serde(default)]
    pub length: u64,
}

/// An event emitted during a streamed response.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// A fragment of raw model output (may contain thinking markers)
    Content(String),
    /// The backend's extracted reasoning, sent once after the last fragment
    ThinkingDone(String),
    /// Generation completed
    Done {
        final_content: Option<String>,
        stats: Option<StreamStats>,
    },
    /// The backend or the transport reported an error
    Error {
        message: String,
        action_required: Option<String>,
    },
}

/// Wire shape shared by every payload. The backend's error payloads may
/// omit `type` entirely.
#[derive(Debug, Deserialize)]
struct RawEvent {
    #[serde(rename = "type")]
    kind: Option<String>,
    content: Option<String>,
    thinking: Option<String>,
    final_content: Option<String>,
    stats: Option<StreamStats>,
    error: Option<Value>,
    action_required: Option<String>,
}

impl StreamEvent {
    /// Decode one `data:` payload.
    ///
    /// Returns `None` for payloads that carry nothing to act on (unknown
    /// types, empty fragments) or that are not valid JSON.
    pub fn from_payload(payload: &str) -> Option<Self> {
        let raw: RawEvent = match serde_json::from_str(payload) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("Skipping malformed stream payload: {}", e);
                return None;
            }
        };

        if let Some(error) = raw.error {
            let message = match error {
                Value::String(s) => s,
                other => other.to_string(),
            };
            return Some(StreamEvent::Error {
                message,
                action_required: raw.action_required,
            });
        }

        match raw.kind.as_deref() {
            Some("content") => raw
                .content
                .filter(|c| !c.is_empty())
                .map(StreamEvent::Content),
            Some("thinking_done") => raw
                .thinking
                .filter(|t| !t.is_empty())
                .map(StreamEvent::ThinkingDone),
            Some("done") => Some(StreamEvent::Done {
                final_content: raw.final_content,
                stats: raw.stats,
            }),
            other => {
                tracing::debug!("Ignoring stream event of type {:?}", other);
                None
            }
        }
    }

    /// Build a transport-level error event
    pub fn transport_error(message: impl Into<String>) -> Self {
        StreamEvent::Error {
            message: message.into(),
            action_required: None,
        }
    }

    /// Returns true if generation is complete
    pub fn is_done(&self) -> bool {
        matches!(self, StreamEvent::Done { .. })
    }

    /// Returns true if an error occurred
    pub fn is_error(&self) -> bool {
        matches!(self, StreamEvent::Error { .. })
    }

    /// Returns true if no further events follow this one
    pub fn is_terminal(&self) -> bool {
        self.is_done() || self.is_error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_payload() {
        let event = StreamEvent::from_payload(r#"{"type":"content","content":"Olá"}"#).unwrap();
        assert!(!event.is_terminal());
        assert_eq!(event, StreamEvent::Content("Olá".to_string()));
    }

    #[test]
    fn test_empty_content_is_skipped() {
        assert_eq!(StreamEvent::from_payload(r#"{"type":"content","content":""}"#), None);
    }

    #[test]
    fn test_thinking_done_payload() {
        let event =
            StreamEvent::from_payload(r#"{"type":"thinking_done","thinking":"plan"}"#).unwrap();
        assert_eq!(event, StreamEvent::ThinkingDone("plan".to_string()));
    }

    #[test]
    fn test_done_payload_with_stats() {
        let event = StreamEvent::from_payload(
            r#"{"type":"done","final_content":"Hi","stats":{"chunks":3,"length":12}}"#,
        )
        .unwrap();
        assert!(event.is_done());
        assert_eq!(
            event,
            StreamEvent::Done {
                final_content: Some("Hi".to_string()),
                stats: Some(StreamStats { chunks: 3, length: 12 }),
            }
        );
    }

    #[test]
    fn test_untyped_error_payload() {
        let event = StreamEvent::from_payload(r#"{"error":"Ollama erro 500"}"#).unwrap();
        assert!(event.is_terminal());
        assert_eq!(event, StreamEvent::transport_error("Ollama erro 500"));
    }

    #[test]
    fn test_typed_error_with_action() {
        let event = StreamEvent::from_payload(
            r#"{"type":"error","error":"limit","action_required":"create_account"}"#,
        )
        .unwrap();
        assert_eq!(
            event,
            StreamEvent::Error {
                message: "limit".to_string(),
                action_required: Some("create_account".to_string()),
            }
        );
    }

    #[test]
    fn test_unknown_and_malformed_payloads() {
        assert_eq!(StreamEvent::from_payload(r#"{"type":"heartbeat"}"#), None);
        assert_eq!(StreamEvent::from_payload("not json"), None);
    }
}
