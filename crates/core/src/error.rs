//! Shared error type for the interview practice engine

use crate::phase::SessionPhase;
use thiserror::Error;

/// Result alias used throughout the engine
pub type Result<T> = std::result::Result<T, Error>;

/// Engine errors
#[derive(Error, Debug)]
pub enum Error {
    #[error("Audio device error: {0}")]
    Audio(String),

    #[error("Transcription error: {0}")]
    Transcription(String),

    #[error("Coaching backend error: {0}")]
    Coach(String),

    #[error("Speech synthesis error: {0}")]
    Synthesis(String),

    #[error("Playback error: {0}")]
    Playback(String),

    #[error("Illegal phase transition: {from} -> {to}")]
    InvalidTransition { from: SessionPhase, to: SessionPhase },

    #[error("No job context selected")]
    NoJobContext,

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl Error {
    /// Whether the turn loop may continue after this error.
    ///
    /// Mid-session call failures put the machine back into listening;
    /// device and configuration errors tear the session down.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::Transcription(_) | Error::Coach(_) | Error::Synthesis(_) | Error::Playback(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(Error::Transcription("503".into()).is_retryable());
        assert!(Error::Playback("decoder".into()).is_retryable());
        assert!(!Error::Audio("no input device".into()).is_retryable());
        assert!(!Error::NoJobContext.is_retryable());
    }
}
