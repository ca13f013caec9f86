//! Recognition session: PCM in, ordered transcription events out.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::audio::{StreamBuffer, decode_pcm16};
use crate::defaults;
use crate::engine::SpeechRecognizer;
use crate::error::Result;
use crate::session::message::{AsrControl, AsrEvent};

/// State for one recognition connection.
///
/// Each session owns its own [`StreamBuffer`], so concurrent clients never
/// share overlap state. Binary frames feed the buffer; every window that
/// becomes ready is transcribed before the next frame is consumed, which
/// keeps results strictly ordered per connection.
pub struct AsrSession {
    buffer: StreamBuffer,
    recognizer: Arc<dyn SpeechRecognizer>,
}

impl AsrSession {
    pub fn new(recognizer: Arc<dyn SpeechRecognizer>, buffer: StreamBuffer) -> Self {
        Self { buffer, recognizer }
    }

    /// Ingest one binary PCM16LE frame and transcribe every window it
    /// completes. An odd-length payload is a protocol violation and closes
    /// the connection; a failing recognizer call degrades that one result
    /// and the session keeps serving.
    pub async fn handle_binary(&mut self, payload: &[u8]) -> Result<Vec<AsrEvent>> {
        let samples = decode_pcm16(payload)?;
        self.buffer.push(&samples);

        let mut events = Vec::new();
        while let Some(window) = self.buffer.try_extract_window() {
            let event = match self.recognizer.transcribe(&window).await {
                Ok(t) => {
                    debug!(len = t.text.len(), confidence = t.confidence, "window transcribed");
                    AsrEvent::result(t.text, t.confidence)
                }
                Err(err) => {
                    warn!(error = %err, "transcription failed, substituting error text");
                    AsrEvent::result(defaults::ASR_ERROR_TEXT, 0.0)
                }
            };
            events.push(event);
        }
        Ok(events)
    }

    /// Handle one inbound text message. Malformed JSON is returned as an
    /// error so the caller can close the connection.
    pub fn handle_text(&mut self, text: &str) -> Result<()> {
        match serde_json::from_str::<AsrControl>(text)? {
            AsrControl::Reset => {
                debug!(discarded = self.buffer.len(), "buffer reset by client");
                self.buffer.reset();
            }
            AsrControl::Ignored => {
                debug!(message = text, "ignoring unknown control message");
            }
        }
        Ok(())
    }
}
