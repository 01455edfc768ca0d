//! Streamed response handling
//!
//! Turns the backend's `/chat-stream` body into typed events and splits the
//! accumulated model output into reasoning and answer.

pub mod assembler;
pub mod events;
pub mod sse;
pub mod turn;

// Re-export main types for convenience
pub use assembler::{assemble, strip_thinking_blocks, StreamBuffer, StreamSnapshot};
pub use events::{StreamEvent, StreamStats};
pub use sse::SseDecoder;
pub use turn::{ResponseTurn, ResponseView, TurnProgress};
