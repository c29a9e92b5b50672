//! Interview session engine
//!
//! The turn-taking core of the practice tool:
//! - Dialogue state machine over the session phases
//! - Append-only transcript
//! - Session orchestration (start/answer/end lifecycle)
//! - Event broadcast for frontends

pub mod engine;
pub mod events;
pub mod machine;
pub mod transcript;

pub use engine::{InterviewSession, SessionOptions};
pub use events::{EndReason, SessionEvent};
pub use machine::DialogueMachine;
pub use transcript::Transcript;

use interview_voice_core::SessionPhase;
use thiserror::Error;

/// Session errors
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Session already active")]
    AlreadyActive,

    #[error("Expected {expected} phase, session is {actual}")]
    WrongPhase {
        expected: SessionPhase,
        actual: SessionPhase,
    },

    #[error("Engine error: {0}")]
    Engine(#[from] interview_voice_core::Error),
}
