//! Inference engine seams.
//!
//! The actual transcription and synthesis backends are injected
//! collaborators. Each direction is a capability trait with a real
//! implementation plumbed in at startup and a degraded stand-in selected
//! when no backend can be loaded, so callers never branch on nullability.

pub mod recognizer;
pub mod synthesizer;

pub use recognizer::{
    DegradedRecognizer, MockRecognizer, SpeechRecognizer, Transcription, load_recognizer,
};
pub use synthesizer::{
    DegradedSynthesizer, MockSynthesizer, SpeechSynthesizer, load_synthesizer,
};
