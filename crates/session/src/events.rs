//! Session events

use interview_voice_core::SessionPhase;

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// The coach flagged the final answer and the interview wrapped up
    Completed,
    /// The candidate ended the session
    UserEnded,
    /// The opening question could not be generated
    StartFailed,
}

/// Events broadcast by the session engine
///
/// Frontends subscribe to drive their rendering; the engine never
/// blocks on slow or absent subscribers.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// The phase value changed
    PhaseChanged {
        from: SessionPhase,
        to: SessionPhase,
    },
    /// The interviewer spoke a line (opening question, follow-up, or
    /// closing words)
    InterviewerLine(String),
    /// The candidate's answer was transcribed and appended
    AnswerTranscribed(String),
    /// Final feedback arrived with the closing turn
    FeedbackReady(String),
    /// A retryable failure occurred; the floor went back to the candidate
    Warning(String),
    /// The session reached idle
    Ended(EndReason),
}
