//! Synthesis session: text chunks in, ordered PCM frames out.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::audio::{encode_pcm16, frame_pcm};
use crate::defaults;
use crate::engine::SpeechSynthesizer;
use crate::error::Result;
use crate::session::message::TtsControl;

/// State for one synthesis connection.
///
/// Text chunks are synthesized one at a time in arrival order; the audio
/// for a chunk is fully framed before the next chunk is consumed, so frames
/// from different chunks never interleave.
pub struct TtsSession {
    synthesizer: Arc<dyn SpeechSynthesizer>,
    frame_size: usize,
}

impl TtsSession {
    pub fn new(synthesizer: Arc<dyn SpeechSynthesizer>, frame_size: usize) -> Self {
        Self {
            synthesizer,
            frame_size,
        }
    }

    /// Handle one inbound text message, returning the binary frames to send.
    /// Malformed JSON is returned as an error so the caller can close the
    /// connection; a failing synthesizer call substitutes silence and the
    /// session keeps serving.
    pub async fn handle_text(&self, text: &str) -> Result<Vec<Vec<u8>>> {
        match serde_json::from_str::<TtsControl>(text)? {
            TtsControl::TextChunk { text, text_id } => {
                let samples = match self.synthesizer.synthesize(&text).await {
                    Ok(samples) => samples,
                    Err(err) => {
                        warn!(error = %err, text_id, "synthesis failed, substituting silence");
                        silence_samples()
                    }
                };
                let frames = frame_pcm(&encode_pcm16(&samples), self.frame_size);
                debug!(text_id, frames = frames.len(), "text chunk synthesized");
                Ok(frames)
            }
            TtsControl::Flush => {
                debug!("flush acknowledged");
                Ok(Vec::new())
            }
            TtsControl::Ignored => {
                debug!(message = text, "ignoring unknown control message");
                Ok(Vec::new())
            }
        }
    }
}

/// Half a second of silence at the native sample rate, the stand-in audio
/// for a failed synthesis call.
fn silence_samples() -> Vec<f32> {
    let count = (defaults::SAMPLE_RATE as f64 * defaults::DEGRADED_TTS_SECS) as usize;
    vec![0.0; count]
}
