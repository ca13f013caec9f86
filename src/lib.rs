//! vostream - streaming speech services over persistent WebSockets
//!
//! Live audio in, transcriptions out; text chunks in, synthesized speech
//! out. One orchestrator process supervises both services.

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod audio;
pub mod cli;
pub mod config;
pub mod defaults;
pub mod engine;
pub mod error;
pub mod llm;
pub mod orchestrator;
pub mod service;
pub mod session;
pub mod voices;

// Audio plumbing
pub use audio::{StreamBuffer, WindowConfig, decode_pcm16, encode_pcm16, frame_pcm};

// Inference seams
pub use engine::{SpeechRecognizer, SpeechSynthesizer, Transcription};

// Services and supervision
pub use orchestrator::{Orchestrator, ShutdownHandle};
pub use service::{AsrService, TtsService};

// Error handling
pub use error::{Result, VostreamError};

// Config
pub use config::Config;

/// Build version string with optional git commit hash.
///
/// Returns `"0.1.0+abc1234"` when git hash is available, `"0.1.0"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}
