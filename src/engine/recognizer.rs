//! Speech recognition capability.

use crate::config::AsrConfig;
use crate::defaults;
use crate::error::{Result, VostreamError};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use tracing::warn;

/// One transcribed window.
#[derive(Debug, Clone, PartialEq)]
pub struct Transcription {
    /// Full text for the completed window.
    pub text: String,
    /// Confidence in [0, 1]; 0.0 marks a degraded result.
    pub confidence: f64,
}

/// Trait for speech-to-text over one inference window.
///
/// Implementations may be slow; callers await them off the connection's
/// receive path. Allows swapping a real backend for the degraded stand-in
/// or a mock.
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Transcribe one window of normalized 16kHz mono samples.
    async fn transcribe(&self, samples: &[f32]) -> Result<Transcription>;

    /// Name of the loaded model.
    fn model_name(&self) -> &str;

    /// True when this is the degraded stand-in rather than a real backend.
    fn is_degraded(&self) -> bool {
        false
    }
}

/// Stand-in used when no recognition backend could be loaded.
///
/// Produces the fixed sentinel with zero confidence so clients can detect
/// degraded mode programmatically. Never fails.
#[derive(Debug, Default)]
pub struct DegradedRecognizer;

#[async_trait]
impl SpeechRecognizer for DegradedRecognizer {
    async fn transcribe(&self, _samples: &[f32]) -> Result<Transcription> {
        Ok(Transcription {
            text: defaults::DEGRADED_ASR_TEXT.to_string(),
            confidence: 0.0,
        })
    }

    fn model_name(&self) -> &str {
        "degraded"
    }

    fn is_degraded(&self) -> bool {
        true
    }
}

/// Mock recognizer for testing.
#[derive(Debug, Clone)]
pub struct MockRecognizer {
    model_name: String,
    response: String,
    confidence: f64,
    should_fail: bool,
}

impl MockRecognizer {
    /// Create a new mock recognizer with default settings.
    pub fn new(model_name: &str) -> Self {
        Self {
            model_name: model_name.to_string(),
            response: "mock transcription".to_string(),
            confidence: 0.95,
            should_fail: false,
        }
    }

    /// Configure the mock to return a specific response.
    pub fn with_response(mut self, response: &str) -> Self {
        self.response = response.to_string();
        self
    }

    /// Configure the reported confidence.
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    /// Configure the mock to fail on transcribe.
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }
}

#[async_trait]
impl SpeechRecognizer for MockRecognizer {
    async fn transcribe(&self, _samples: &[f32]) -> Result<Transcription> {
        if self.should_fail {
            Err(VostreamError::Inference {
                message: "mock transcription failure".to_string(),
            })
        } else {
            Ok(Transcription {
                text: self.response.clone(),
                confidence: self.confidence,
            })
        }
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

/// Select a recognizer at startup, degrading instead of erroring.
///
/// A real backend would be loaded from `config.model_path`; with no path
/// configured, or a path that does not exist, the service logs the reason
/// and continues with the degraded stand-in. This never fails; inference
/// availability must not decide whether the service runs.
pub fn load_recognizer(config: &AsrConfig) -> Arc<dyn SpeechRecognizer> {
    if config.model_path.is_empty() {
        warn!("no ASR model configured, running degraded");
        return Arc::new(DegradedRecognizer);
    }
    if !Path::new(&config.model_path).exists() {
        warn!(path = %config.model_path, "ASR model not found, running degraded");
        return Arc::new(DegradedRecognizer);
    }

    // Backend integration is injected by the embedder; the stock binary
    // treats a present-but-unloadable model the same as a missing one.
    warn!(
        path = %config.model_path,
        "no recognition backend linked for model, running degraded"
    );
    Arc::new(DegradedRecognizer)
}
