//! Default configuration constants for vostream.
//!
//! Shared constants used across the services and configuration types
//! to ensure consistency and eliminate duplication.

/// Audio sample rate in Hz.
///
/// 16kHz is the standard for speech recognition and a good balance between
/// quality and computational cost for voice applications. Both endpoints
/// speak PCM16LE mono at this rate.
pub const SAMPLE_RATE: u32 = 16000;

/// Default transcription window duration in seconds.
///
/// Each inference request covers this much audio. 2.5s keeps latency
/// acceptable while giving the model enough context.
pub const WINDOW_SECS: f64 = 2.5;

/// Default overlap between consecutive transcription windows in seconds.
///
/// The trailing 0.5s of each window is retained as leading context for the
/// next one, so words straddling a window boundary are seen twice.
pub const OVERLAP_SECS: f64 = 0.5;

/// Default synthesis wire frame size in bytes.
///
/// 640 bytes = 320 PCM16 samples = 20ms of audio at 16kHz.
pub const FRAME_SIZE: usize = 640;

/// Default host for both services.
pub const HOST: &str = "127.0.0.1";

/// Default transcription service port.
pub const ASR_PORT: u16 = 8765;

/// Default synthesis service port.
pub const TTS_PORT: u16 = 8766;

/// Duration of the silent placeholder clip emitted when the synthesis
/// engine is unavailable or fails, in seconds.
pub const DEGRADED_TTS_SECS: f64 = 0.5;

/// Sentinel transcription text emitted when no recognition engine is loaded.
///
/// Clients detect degraded mode by this exact string plus `confidence: 0.0`,
/// not by log output.
pub const DEGRADED_ASR_TEXT: &str = "[Mock transcription: model not loaded]";

/// Sentinel transcription text emitted when a loaded engine fails on one
/// request. The connection stays up; only that window degrades.
pub const ASR_ERROR_TEXT: &str = "[Transcription error]";

/// Resource monitor polling interval in seconds.
pub const MONITOR_INTERVAL_SECS: u64 = 30;

/// Bounded grace period for unit shutdown in seconds.
///
/// After the shutdown broadcast fires, each unit gets this long to unwind
/// (including any in-flight inference call) before it is aborted and
/// reported as a timeout failure.
pub const SHUTDOWN_GRACE_SECS: u64 = 10;

/// Default voice identifier for synthesis.
pub const DEFAULT_VOICE: &str = "custom_voice";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_is_longer_than_overlap() {
        assert!(OVERLAP_SECS < WINDOW_SECS);
    }

    #[test]
    fn frame_size_is_whole_samples() {
        // PCM16 frames must hold an integral number of samples
        assert_eq!(FRAME_SIZE % 2, 0);
    }
}
