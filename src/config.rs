use crate::defaults;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub asr: AsrConfig,
    pub tts: TtsConfig,
    pub voices: VoicesConfig,
}

/// Process-wide settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeneralConfig {
    pub log_level: String,
    pub shutdown_grace_secs: u64,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            shutdown_grace_secs: defaults::SHUTDOWN_GRACE_SECS,
        }
    }
}

/// Transcription service configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AsrConfig {
    pub host: String,
    pub port: u16,
    /// Path to recognition model weights; empty means none configured and
    /// the service runs degraded.
    pub model_path: String,
    pub device: String,
    pub fp16: bool,
    pub window_secs: f64,
    pub overlap_secs: f64,
}

/// Synthesis service configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TtsConfig {
    pub host: String,
    pub port: u16,
    pub base_model_path: String,
    pub custom_model_path: String,
    pub device: String,
    pub fp16: bool,
    pub default_voice: String,
    /// Wire frame size in bytes for outbound audio.
    pub frame_size: usize,
    /// Command to run the synthesis service as an external child process.
    /// Empty means run it in-process.
    pub tts_exec: String,
}

/// Voice store configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct VoicesConfig {
    /// Voice reference directory; empty means the per-user data dir.
    pub dir: String,
}

impl Default for AsrConfig {
    fn default() -> Self {
        Self {
            host: defaults::HOST.to_string(),
            port: defaults::ASR_PORT,
            model_path: String::new(),
            device: "auto".to_string(),
            fp16: true,
            window_secs: defaults::WINDOW_SECS,
            overlap_secs: defaults::OVERLAP_SECS,
        }
    }
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            host: defaults::HOST.to_string(),
            port: defaults::TTS_PORT,
            base_model_path: String::new(),
            custom_model_path: String::new(),
            device: "auto".to_string(),
            fp16: true,
            default_voice: defaults::DEFAULT_VOICE.to_string(),
            frame_size: defaults::FRAME_SIZE,
            tts_exec: String::new(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Returns an error if the file contains invalid TOML.
    /// Missing fields will use default values.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a file or return defaults if file doesn't exist
    ///
    /// Only returns defaults if the file is missing.
    /// Returns errors for invalid TOML.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        match Self::load(path) {
            Ok(config) => Ok(config),
            Err(e) => {
                if e.downcast_ref::<std::io::Error>()
                    .map(|io_err| io_err.kind() == std::io::ErrorKind::NotFound)
                    .unwrap_or(false)
                {
                    Ok(Self::default())
                } else {
                    Err(e)
                }
            }
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - VOSTREAM_ASR_PORT → asr.port
    /// - VOSTREAM_TTS_PORT → tts.port
    /// - VOSTREAM_TTS_EXEC → tts.tts_exec
    /// - VOSTREAM_LOG → general.log_level
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(port) = std::env::var("VOSTREAM_ASR_PORT")
            && let Ok(port) = port.parse()
        {
            self.asr.port = port;
        }

        if let Ok(port) = std::env::var("VOSTREAM_TTS_PORT")
            && let Ok(port) = port.parse()
        {
            self.tts.port = port;
        }

        if let Ok(exec) = std::env::var("VOSTREAM_TTS_EXEC")
            && !exec.is_empty()
        {
            self.tts.tts_exec = exec;
        }

        if let Ok(level) = std::env::var("VOSTREAM_LOG")
            && !level.is_empty()
        {
            self.general.log_level = level;
        }

        self
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/vostream/vostream.toml on Linux
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vostream")
            .join("vostream.toml")
    }

    /// Resolve the voice store directory.
    ///
    /// An explicitly configured dir wins; otherwise the per-user data dir.
    pub fn voices_dir(&self) -> PathBuf {
        if self.voices.dir.is_empty() {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("vostream")
                .join("voices")
        } else {
            PathBuf::from(&self.voices.dir)
        }
    }

    /// Transcription service listen address.
    pub fn asr_addr(&self) -> String {
        format!("{}:{}", self.asr.host, self.asr.port)
    }

    /// Synthesis service listen address.
    pub fn tts_addr(&self) -> String {
        format!("{}:{}", self.tts.host, self.tts.port)
    }
}
