//! Per-connection protocol state machines.
//!
//! One session per accepted connection, owning its buffer state outright.
//! Sessions are transport-agnostic: they consume decoded messages and
//! return ordered outbound events, so the WebSocket glue in `service` stays
//! a thin adapter and the protocol logic is testable without sockets.

pub mod asr;
pub mod message;
pub mod tts;

pub use asr::AsrSession;
pub use message::{AsrControl, AsrEvent, TtsControl};
pub use tts::TtsSession;
