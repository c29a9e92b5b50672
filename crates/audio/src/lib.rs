//! Microphone capture and speech playback adapters
//!
//! Device-facing implementations of the core audio traits:
//! - `CpalCapture` - chunked capture from the default input device
//! - `RodioPlayer` - clip playback through the default output device
//! - `CadenceSpeech` - local synthesis fallback

pub mod capture;
pub mod fallback;
pub mod playback;

pub use capture::{CaptureConfig, CpalCapture};
pub use fallback::CadenceSpeech;
pub use playback::RodioPlayer;

use thiserror::Error;

/// Audio device errors
#[derive(Error, Debug)]
pub enum AudioError {
    #[error("No audio input device found")]
    NoInputDevice,

    #[error("No supported audio configuration")]
    NoSupportedConfig,

    #[error("Audio stream error: {0}")]
    Stream(String),

    #[error("Failed to encode audio: {0}")]
    Encode(String),

    #[error("Playback error: {0}")]
    Playback(String),

    #[error("Capture not set up")]
    NotReady,
}

impl From<AudioError> for interview_voice_core::Error {
    fn from(err: AudioError) -> Self {
        match err {
            AudioError::Playback(msg) => interview_voice_core::Error::Playback(msg),
            other => interview_voice_core::Error::Audio(other.to_string()),
        }
    }
}
