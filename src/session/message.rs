//! JSON control and event messages exchanged with connected clients.
//!
//! Every message carries a `"type"` tag. Unknown tags deserialize into the
//! `Ignored` variant so clients running a newer protocol revision don't get
//! their connection torn down; only malformed JSON is a hard error.

use serde::{Deserialize, Serialize};

/// Inbound text messages on a recognition connection.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AsrControl {
    /// Discard all accumulated audio, including the carried overlap.
    Reset,
    /// Any unrecognized message type. Logged and skipped.
    #[serde(other)]
    Ignored,
}

/// Inbound text messages on a synthesis connection.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TtsControl {
    /// A chunk of text to synthesize into speech.
    TextChunk {
        #[serde(default)]
        text: String,
        /// Client-side correlation id, echoed back in logs only.
        #[serde(default)]
        text_id: u64,
    },
    /// End-of-utterance marker. The engine synthesizes each chunk in full,
    /// so there is never buffered tail audio to emit; acknowledged as a no-op.
    Flush,
    /// Any unrecognized message type. Logged and skipped.
    #[serde(other)]
    Ignored,
}

/// Outbound events on a recognition connection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AsrEvent {
    /// One finalized transcription for one extracted window.
    AsrResult {
        /// Always empty: windows are transcribed whole, never incrementally.
        partial: String,
        r#final: String,
        confidence: f64,
    },
}

impl AsrEvent {
    pub fn result(text: impl Into<String>, confidence: f64) -> Self {
        AsrEvent::AsrResult {
            partial: String::new(),
            r#final: text.into(),
            confidence,
        }
    }
}
