//! REST client for the career-coaching backend
//!
//! Features:
//! - Transcription, question generation, answer analysis, text-to-speech
//! - Job application listing for job-context selection
//! - Bounded retry with exponential backoff for transient failures

pub mod api;
pub mod wire;

pub use api::{ClientConfig, CoachClient};
pub use wire::JobApplication;

use thiserror::Error;

/// Client errors
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ClientError {
    /// Whether a retry may succeed
    ///
    /// Network errors, timeouts and 5xx responses are transient; 4xx
    /// responses are not.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ClientError::Network(_) | ClientError::Timeout)
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else {
            ClientError::Network(err.to_string())
        }
    }
}
