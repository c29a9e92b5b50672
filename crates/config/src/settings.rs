//! Engine settings

use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Default locations probed when no explicit config path is given
static DEFAULT_CONFIG_PATHS: Lazy<Vec<PathBuf>> = Lazy::new(|| {
    vec![
        PathBuf::from("interview-voice.toml"),
        PathBuf::from("config/interview-voice.toml"),
    ]
});

/// Top-level settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Coaching backend API
    #[serde(default)]
    pub api: ApiSettings,

    /// Capture device
    #[serde(default)]
    pub audio: AudioSettings,

    /// Synthesis voice
    #[serde(default)]
    pub voice: VoiceSettings,

    /// Session policies
    #[serde(default)]
    pub session: SessionSettings,
}

/// Coaching backend API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Base URL of the coaching backend
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout (seconds)
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Maximum retry attempts for transient failures
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Initial backoff duration, doubles each retry (milliseconds)
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}
fn default_timeout_seconds() -> u64 {
    30
}
fn default_max_retries() -> u32 {
    3
}
fn default_initial_backoff_ms() -> u64 {
    100
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout_seconds(),
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_backoff_ms(),
        }
    }
}

/// Capture device settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioSettings {
    /// Preferred capture sample rate (Hz); the device default is used
    /// when it cannot honor this
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Preferred channel count
    #[serde(default = "default_channels")]
    pub channels: u16,
}

fn default_sample_rate() -> u32 {
    16_000
}
fn default_channels() -> u16 {
    1
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
            channels: default_channels(),
        }
    }
}

/// Synthesis voice settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceSettings {
    /// Voice id sent to the text-to-speech endpoint
    #[serde(default = "default_voice")]
    pub voice: String,

    /// Fall back to local synthesis when remote synthesis or playback
    /// fails
    #[serde(default = "default_true")]
    pub fallback_enabled: bool,
}

fn default_voice() -> String {
    "alloy".to_string()
}
fn default_true() -> bool {
    true
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            voice: default_voice(),
            fallback_enabled: true,
        }
    }
}

/// Session policies
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Transcript substituted when a listening turn captured no audio
    #[serde(default = "default_fallback_transcript")]
    pub fallback_transcript: String,
}

fn default_fallback_transcript() -> String {
    "I wasn't able to record my answer clearly.".to_string()
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            fallback_transcript: default_fallback_transcript(),
        }
    }
}

/// Load settings from an optional file plus `INTERVIEW_` environment
/// overrides
///
/// With no explicit path, the default locations are probed and missing
/// files are skipped silently. `INTERVIEW_API__BASE_URL` overrides
/// `[api] base_url`, and so on.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let mut builder = config::Config::builder();

    match path {
        Some(path) => {
            if !path.exists() {
                return Err(ConfigError::FileNotFound(path.display().to_string()));
            }
            builder = builder.add_source(config::File::from(path));
        }
        None => {
            for candidate in DEFAULT_CONFIG_PATHS.iter() {
                builder = builder.add_source(config::File::from(candidate.clone()).required(false));
            }
        }
    }

    let config = builder
        .add_source(config::Environment::with_prefix("INTERVIEW").separator("__"))
        .build()?;

    let settings: Settings = config.try_deserialize()?;
    settings.validate()?;
    Ok(settings)
}

impl Settings {
    /// Reject values the engine cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.base_url.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "api.base_url".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        if self.api.timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "api.timeout_seconds".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        if self.audio.channels == 0 {
            return Err(ConfigError::InvalidValue {
                field: "audio.channels".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}
