//! Thinking/answer split for streamed responses
//!
//! The backend brackets chain-of-thought with literal `<think>` / `</think>`
//! markers inside an otherwise plain-text stream. Every call re-derives the
//! split from the full accumulated text, so calling it redundantly is harmless.

/// Opening marker for the reasoning span
pub const OPEN_MARKER: &str = "<think>";
/// Closing marker for the reasoning span
pub const CLOSE_MARKER: &str = "</think>";

/// Decoded state of the accumulated text at one point in the stream
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamSnapshot {
    /// An opening marker was seen and no closing marker follows it yet
    pub inside_thinking: bool,
    /// Text between the opening marker and the closing marker (or end of input)
    pub thinking_text: String,
    /// Text after the closing marker, trimmed. Whole input when no opening marker exists.
    pub answer_text: String,
}

/// Split accumulated stream text into thinking and answer parts.
///
/// Only the first opening marker is honoured, and the closing marker is only
/// searched for after it. A closing marker that precedes the opening one is
/// ordinary text.
pub fn assemble(accumulated: &str) -> StreamSnapshot {
    let Some(open) = accumulated.find(OPEN_MARKER) else {
        return StreamSnapshot {
            inside_thinking: false,
            thinking_text: String::new(),
            answer_text: accumulated.to_string(),
        };
    };

    let after_open = &accumulated[open + OPEN_MARKER.len()..];
    match after_open.find(CLOSE_MARKER) {
        Some(close) => StreamSnapshot {
            inside_thinking: false,
            thinking_text: after_open[..close].to_string(),
            answer_text: after_open[close + CLOSE_MARKER.len()..].trim().to_string(),
        },
        None => StreamSnapshot {
            inside_thinking: true,
            thinking_text: after_open.to_string(),
            answer_text: String::new(),
        },
    }
}

/// Remove every complete `<think>...</think>` block and trim the rest.
///
/// An opening marker without a closing one is kept verbatim.
pub fn strip_thinking_blocks(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut rest = content;

    while let Some(open) = rest.find(OPEN_MARKER) {
        let after_open = &rest[open + OPEN_MARKER.len()..];
        match after_open.find(CLOSE_MARKER) {
            Some(close) => {
                out.push_str(&rest[..open]);
                rest = &after_open[close + CLOSE_MARKER.len()..];
            }
            None => break,
        }
    }
    out.push_str(rest);

    out.trim().to_string()
}

/// Caller-side buffer for one in-flight response.
///
/// Owns the accumulated text and hands back a fresh snapshot after each
/// fragment.
#[derive(Debug, Clone, Default)]
pub struct StreamBuffer {
    accumulated: String,
}

impl StreamBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fragment and return the snapshot of everything received so far
    pub fn push(&mut self, fragment: &str) -> StreamSnapshot {
        self.accumulated.push_str(fragment);
        self.snapshot()
    }

    pub fn snapshot(&self) -> StreamSnapshot {
        assemble(&self.accumulated)
    }

    pub fn accumulated(&self) -> &str {
        &self.accumulated
    }

    pub fn is_empty(&self) -> bool {
        self.accumulated.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn snap(inside: bool, thinking: &str, answer: &str) -> StreamSnapshot {
        StreamSnapshot {
            inside_thinking: inside,
            thinking_text: thinking.to_string(),
            answer_text: answer.to_string(),
        }
    }

    #[test]
    fn test_plain_text_is_all_answer() {
        assert_eq!(assemble("Hello world"), snap(false, "", "Hello world"));
    }

    #[test]
    fn test_open_marker_without_close() {
        assert_eq!(assemble("<think>step one"), snap(true, "step one", ""));
    }

    #[test]
    fn test_complete_thinking_span() {
        assert_eq!(
            assemble("<think>step one</think>Final answer"),
            snap(false, "step one", "Final answer")
        );
    }

    #[test]
    fn test_answer_is_trimmed() {
        assert_eq!(assemble("<think>a</think>  padded  ").answer_text, "padded");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(assemble(""), snap(false, "", ""));
    }

    #[test]
    fn test_plain_text_keeps_surrounding_whitespace() {
        // Only the post-marker answer is trimmed
        assert_eq!(assemble("  spaced \n").answer_text, "  spaced \n");
    }

    #[test]
    fn test_prefix_before_open_marker_is_dropped() {
        assert_eq!(assemble("intro <think>mid"), snap(true, "mid", ""));
        assert_eq!(
            assemble("intro <think>mid</think> tail"),
            snap(false, "mid", "tail")
        );
    }

    #[test]
    fn test_close_marker_before_open_is_ordinary_text() {
        assert_eq!(assemble("a</think>b"), snap(false, "", "a</think>b"));
        assert_eq!(
            assemble("a</think>b<think>c"),
            snap(true, "c", "")
        );
        assert_eq!(
            assemble("</think><think>x</think>y"),
            snap(false, "x", "y")
        );
    }

    #[test]
    fn test_only_first_span_is_honoured() {
        let s = assemble("<think>one</think>ans <think>two</think> more");
        assert_eq!(s.thinking_text, "one");
        assert_eq!(s.answer_text, "ans <think>two</think> more");
        assert!(!s.inside_thinking);
    }

    #[test]
    fn test_nested_open_marker_is_literal() {
        let s = assemble("<think>a<think>b</think>c");
        assert_eq!(s.thinking_text, "a<think>b");
        assert_eq!(s.answer_text, "c");
    }

    #[test]
    fn test_partial_marker_is_plain_text() {
        assert_eq!(assemble("<thi"), snap(false, "", "<thi"));
        assert_eq!(assemble("<think>x</thi"), snap(true, "x</thi", ""));
    }

    #[test]
    fn test_multibyte_content() {
        let s = assemble("<think>raciocínio 🤔</think>  Olá, mundo!  ");
        assert_eq!(s.thinking_text, "raciocínio 🤔");
        assert_eq!(s.answer_text, "Olá, mundo!");
    }

    #[test]
    fn test_idempotent() {
        let input = "<think>a</think>b";
        assert_eq!(assemble(input), assemble(input));
    }

    #[test]
    fn test_closed_span_never_reopens() {
        let mut buffer = StreamBuffer::new();
        let mut closed = false;
        for fragment in ["<thi", "nk>plan", "ning</th", "ink>", " The", " answer", " <think>", "again"] {
            let snapshot = buffer.push(fragment);
            if closed {
                assert!(!snapshot.inside_thinking, "reopened after {fragment:?}");
            }
            // Plain text may still grow into an opening marker, so only a
            // span that has actually closed counts.
            if !snapshot.inside_thinking && buffer.accumulated().contains(OPEN_MARKER) {
                closed = true;
            }
        }
        assert!(closed);
        let last = buffer.snapshot();
        assert_eq!(last.thinking_text, "planning");
        assert_eq!(last.answer_text, "The answer <think>again");
    }

    #[test]
    fn test_buffer_tracks_each_phase() {
        let mut buffer = StreamBuffer::new();
        assert!(buffer.is_empty());

        assert_eq!(buffer.push("<think>"), snap(true, "", ""));
        assert_eq!(buffer.push("weighing"), snap(true, "weighing", ""));
        assert_eq!(buffer.push("</think>"), snap(false, "weighing", ""));
        assert_eq!(buffer.push("\nYes."), snap(false, "weighing", "Yes."));
        assert_eq!(buffer.accumulated(), "<think>weighing</think>\nYes.");
    }

    #[test]
    fn test_strip_thinking_blocks() {
        assert_eq!(strip_thinking_blocks("<think>x</think> Answer "), "Answer");
        assert_eq!(
            strip_thinking_blocks("a<think>1</think>b<think>2</think>c"),
            "abc"
        );
        assert_eq!(strip_thinking_blocks("no markers"), "no markers");
        assert_eq!(strip_thinking_blocks("<think>open only"), "<think>open only");
        assert_eq!(strip_thinking_blocks(""), "");
    }

    fn marker_free() -> impl Strategy<Value = String> {
        "[a-z <>/é]{0,20}"
            .prop_filter("no markers", |s| !s.contains(OPEN_MARKER) && !s.contains(CLOSE_MARKER))
    }

    /// Cut `text` at the char boundaries selected by `cuts`
    fn split_at_boundaries(text: &str, cuts: &[prop::sample::Index]) -> Vec<String> {
        let boundaries: Vec<usize> = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(text.len()))
            .collect();
        let mut points: Vec<usize> = cuts.iter().map(|c| *c.get(&boundaries)).collect();
        points.push(0);
        points.push(text.len());
        points.sort_unstable();
        points.dedup();
        points.windows(2).map(|w| text[w[0]..w[1]].to_string()).collect()
    }

    proptest! {
        #[test]
        fn marker_free_text_is_all_answer(s in marker_free()) {
            prop_assert_eq!(assemble(&s), snap(false, "", &s));
        }

        #[test]
        fn open_marker_alone_keeps_thinking(prefix in marker_free(), mid in marker_free()) {
            let text = format!("{prefix}{OPEN_MARKER}{mid}");
            prop_assert_eq!(assemble(&text), snap(true, &mid, ""));
        }

        #[test]
        fn closed_span_splits_thinking_and_answer(
            prefix in marker_free(),
            mid in marker_free(),
            suffix in marker_free()
        ) {
            let text = format!("{prefix}{OPEN_MARKER}{mid}{CLOSE_MARKER}{suffix}");
            let snapshot = assemble(&text);
            prop_assert_eq!(&snapshot, &snap(false, &mid, suffix.trim()));
            prop_assert_eq!(assemble(&text), snapshot);
        }

        #[test]
        fn fragmented_stream_never_reopens(
            mid in marker_free(),
            suffix in marker_free(),
            cuts in prop::collection::vec(any::<prop::sample::Index>(), 0..8)
        ) {
            let text = format!("{OPEN_MARKER}{mid}{CLOSE_MARKER}{suffix}");
            let mut buffer = StreamBuffer::new();
            let mut closed = false;
            for fragment in split_at_boundaries(&text, &cuts) {
                let snapshot = buffer.push(&fragment);
                if closed {
                    prop_assert!(!snapshot.inside_thinking, "reopened after {:?}", fragment);
                }
                if !snapshot.inside_thinking && buffer.accumulated().contains(OPEN_MARKER) {
                    closed = true;
                }
            }
            prop_assert!(closed);
            prop_assert_eq!(buffer.accumulated(), text.as_str());
            prop_assert_eq!(buffer.snapshot(), assemble(&text));
        }
    }
}
