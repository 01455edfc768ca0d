//! Server-sent events decoding
//!
//! Incremental `text/event-stream` parser. Bytes arrive in arbitrary chunks
//! from the HTTP body; complete lines are decoded and each finished event's
//! `data:` payload is mapped to a [`StreamEvent`].

use crate::stream::events::StreamEvent;

/// Incremental SSE decoder
#[derive(Debug, Default)]
pub struct SseDecoder {
    /// Bytes of the current incomplete line. Kept as bytes so a multi-byte
    /// character split between chunks is decoded only once whole.
    pending: Vec<u8>,
    /// `data:` lines collected for the event being built
    data_lines: Vec<String>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk of body bytes and return the events it completed
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<StreamEvent> {
        self.pending.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some(newline) = self.pending.iter().position(|&b| b == b'\n') {
            let line_bytes: Vec<u8> = self.pending.drain(..=newline).collect();
            let line = String::from_utf8_lossy(&line_bytes[..line_bytes.len() - 1]);
            let line = line.strip_suffix('\r').unwrap_or(&line);
            if let Some(event) = self.process_line(line) {
                events.push(event);
            }
        }
        events
    }

    /// Flush whatever is buffered at end of stream
    pub fn finish(&mut self) -> Vec<StreamEvent> {
        let mut events = Vec::new();
        if !self.pending.is_empty() {
            let bytes = std::mem::take(&mut self.pending);
            let line = String::from_utf8_lossy(&bytes);
            let line = line.strip_suffix('\r').unwrap_or(&line).to_string();
            if let Some(event) = self.process_line(&line) {
                events.push(event);
            }
        }
        if let Some(event) = self.dispatch() {
            events.push(event);
        }
        events
    }

    fn process_line(&mut self, line: &str) -> Option<StreamEvent> {
        if line.is_empty() {
            return self.dispatch();
        }
        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };

        // event/id/retry carry nothing this client uses
        if field == "data" {
            self.data_lines.push(value.to_string());
        }
        None
    }

    fn dispatch(&mut self) -> Option<StreamEvent> {
        if self.data_lines.is_empty() {
            return None;
        }
        let payload = self.data_lines.join("\n");
        self.data_lines.clear();
        StreamEvent::from_payload(&payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_all(decoder: &mut SseDecoder, chunks: &[&[u8]]) -> Vec<StreamEvent> {
        let mut events = Vec::new();
        for chunk in chunks {
            events.extend(decoder.feed(chunk));
        }
        events.extend(decoder.finish());
        events
    }

    #[test]
    fn test_single_event() {
        let mut decoder = SseDecoder::new();
        let events = decoder.feed(b"data: {\"type\":\"content\",\"content\":\"Hi\"}\n\n");
        assert_eq!(events, vec![StreamEvent::Content("Hi".to_string())]);
    }

    #[test]
    fn test_event_split_across_chunks() {
        let mut decoder = SseDecoder::new();
        let chunks = [
            "da",
            "ta: {\"type\":\"con",
            "tent\",\"content\":\"A\"}\n",
            "\ndata: {\"type\":\"done\"}\n\n",
        ];
        let chunks: Vec<&[u8]> = chunks.iter().map(|c| c.as_bytes()).collect();
        let events = feed_all(&mut decoder, &chunks);
        assert_eq!(
            events,
            vec![
                StreamEvent::Content("A".to_string()),
                StreamEvent::Done {
                    final_content: None,
                    stats: None
                },
            ]
        );
    }

    #[test]
    fn test_multibyte_split_between_chunks() {
        let body = "data: {\"type\":\"content\",\"content\":\"ação 🤔\"}\n\n".as_bytes();
        // Split inside the emoji's four-byte sequence
        let split = body.len() - 6;
        let mut decoder = SseDecoder::new();
        let events = feed_all(&mut decoder, &[&body[..split], &body[split..]]);
        assert_eq!(events, vec![StreamEvent::Content("ação 🤔".to_string())]);
    }

    #[test]
    fn test_crlf_and_comments() {
        let mut decoder = SseDecoder::new();
        let events = decoder.feed(
            b": keep-alive\r\nevent: message\r\ndata:{\"type\":\"content\",\"content\":\"x\"}\r\n\r\n",
        );
        assert_eq!(events, vec![StreamEvent::Content("x".to_string())]);
    }

    #[test]
    fn test_multiline_data_is_joined() {
        let mut decoder = SseDecoder::new();
        let events = decoder.feed(b"data: {\"type\":\"content\",\ndata: \"content\":\"y\"}\n\n");
        assert_eq!(events, vec![StreamEvent::Content("y".to_string())]);
    }

    #[test]
    fn test_unterminated_event_flushed_on_finish() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.feed(b"data: {\"error\":\"boom\"}").is_empty());
        let events = decoder.finish();
        assert_eq!(events, vec![StreamEvent::transport_error("boom")]);
    }

    #[test]
    fn test_malformed_payload_skipped() {
        let mut decoder = SseDecoder::new();
        let events = decoder.feed(b"data: nope\n\ndata: {\"type\":\"content\",\"content\":\"ok\"}\n\n");
        assert_eq!(events, vec![StreamEvent::Content("ok".to_string())]);
    }
}
