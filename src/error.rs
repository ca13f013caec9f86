//! Error types for vostream.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VostreamError {
    // Wire-level errors (connection-local)
    #[error("Malformed audio frame: {message}")]
    MalformedFrame { message: String },

    // Inference collaborator errors
    #[error("Inference engine unavailable: {name}")]
    EngineUnavailable { name: String },

    #[error("Transcription inference failed: {message}")]
    Inference { message: String },

    #[error("Speech synthesis failed: {message}")]
    Synthesis { message: String },

    // Service errors
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Service unit '{name}' failed: {message}")]
    UnitFailed { name: String, message: String },

    #[error("Service unit '{name}' did not stop within the grace period")]
    ShutdownTimeout { name: String },

    // Voice store errors
    #[error("Voice already exists: {name}")]
    VoiceExists { name: String },

    #[error("Voice not found: {name}")]
    VoiceNotFound { name: String },

    #[error("Voice source not found: {path}")]
    VoiceSourceMissing { path: String },

    // Configuration errors
    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Generic error for cases not covered above
    #[error("{0}")]
    Other(String),
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, VostreamError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_malformed_frame_display() {
        let error = VostreamError::MalformedFrame {
            message: "odd byte count: 641".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Malformed audio frame: odd byte count: 641"
        );
    }

    #[test]
    fn test_engine_unavailable_display() {
        let error = VostreamError::EngineUnavailable {
            name: "asr".to_string(),
        };
        assert_eq!(error.to_string(), "Inference engine unavailable: asr");
    }

    #[test]
    fn test_inference_display() {
        let error = VostreamError::Inference {
            message: "out of memory".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Transcription inference failed: out of memory"
        );
    }

    #[test]
    fn test_bind_display() {
        let error = VostreamError::Bind {
            addr: "127.0.0.1:8765".to_string(),
            source: io::Error::new(io::ErrorKind::AddrInUse, "address in use"),
        };
        assert!(error.to_string().contains("127.0.0.1:8765"));
    }

    #[test]
    fn test_unit_failed_display() {
        let error = VostreamError::UnitFailed {
            name: "tts".to_string(),
            message: "task panicked".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Service unit 'tts' failed: task panicked"
        );
    }

    #[test]
    fn test_shutdown_timeout_display() {
        let error = VostreamError::ShutdownTimeout {
            name: "monitor".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Service unit 'monitor' did not stop within the grace period"
        );
    }

    #[test]
    fn test_voice_errors_display() {
        assert_eq!(
            VostreamError::VoiceExists {
                name: "alto".to_string()
            }
            .to_string(),
            "Voice already exists: alto"
        );
        assert_eq!(
            VostreamError::VoiceNotFound {
                name: "alto".to_string()
            }
            .to_string(),
            "Voice not found: alto"
        );
    }

    #[test]
    fn test_from_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let error: VostreamError = io_error.into();
        assert!(error.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_toml_error() {
        let toml_error = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let error: VostreamError = toml_error.into();
        assert!(error.to_string().contains("Configuration error"));
    }

    #[test]
    fn test_from_json_error() {
        let json_error = serde_json::from_str::<serde_json::Value>("{bad").unwrap_err();
        let error: VostreamError = json_error.into();
        assert!(error.to_string().contains("JSON error"));
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<VostreamError>();
        assert_sync::<VostreamError>();
    }
}
