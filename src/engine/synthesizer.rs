//! Speech synthesis capability.

use crate::config::TtsConfig;
use crate::defaults;
use crate::error::{Result, VostreamError};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use tracing::warn;

/// Trait for text-to-speech.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize text into normalized 16kHz mono samples.
    async fn synthesize(&self, text: &str) -> Result<Vec<f32>>;

    /// Name of the loaded model.
    fn model_name(&self) -> &str;

    /// True when this is the degraded stand-in rather than a real backend.
    fn is_degraded(&self) -> bool {
        false
    }
}

/// Stand-in used when no synthesis backend could be loaded.
///
/// Produces a fixed-duration silent clip so the wire contract (a nonempty,
/// in-order frame sequence per text chunk) holds in degraded mode.
#[derive(Debug, Default)]
pub struct DegradedSynthesizer;

impl DegradedSynthesizer {
    fn silence() -> Vec<f32> {
        let samples = (defaults::SAMPLE_RATE as f64 * defaults::DEGRADED_TTS_SECS) as usize;
        vec![0.0; samples]
    }
}

#[async_trait]
impl SpeechSynthesizer for DegradedSynthesizer {
    async fn synthesize(&self, _text: &str) -> Result<Vec<f32>> {
        Ok(Self::silence())
    }

    fn model_name(&self) -> &str {
        "degraded"
    }

    fn is_degraded(&self) -> bool {
        true
    }
}

/// Mock synthesizer for testing.
#[derive(Debug, Clone)]
pub struct MockSynthesizer {
    model_name: String,
    samples_per_call: usize,
    should_fail: bool,
}

impl MockSynthesizer {
    /// Create a new mock synthesizer producing a fixed number of samples.
    pub fn new(model_name: &str) -> Self {
        Self {
            model_name: model_name.to_string(),
            samples_per_call: 800,
            should_fail: false,
        }
    }

    /// Configure how many samples each call produces.
    pub fn with_samples(mut self, samples: usize) -> Self {
        self.samples_per_call = samples;
        self
    }

    /// Configure the mock to fail on synthesize.
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }
}

#[async_trait]
impl SpeechSynthesizer for MockSynthesizer {
    async fn synthesize(&self, _text: &str) -> Result<Vec<f32>> {
        if self.should_fail {
            Err(VostreamError::Synthesis {
                message: "mock synthesis failure".to_string(),
            })
        } else {
            // Nonzero ramp so tests can tell synthesized audio from padding
            Ok((0..self.samples_per_call)
                .map(|i| (i % 100) as f32 / 200.0)
                .collect())
        }
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

/// Select a synthesizer at startup, degrading instead of erroring.
///
/// Same contract as recognizer loading: never fails, logs why it degraded.
pub fn load_synthesizer(config: &TtsConfig) -> Arc<dyn SpeechSynthesizer> {
    if config.base_model_path.is_empty() {
        warn!("no TTS model configured, running degraded");
        return Arc::new(DegradedSynthesizer);
    }
    if !Path::new(&config.base_model_path).exists() {
        warn!(path = %config.base_model_path, "TTS model not found, running degraded");
        return Arc::new(DegradedSynthesizer);
    }

    warn!(
        path = %config.base_model_path,
        "no synthesis backend linked for model, running degraded"
    );
    Arc::new(DegradedSynthesizer)
}
