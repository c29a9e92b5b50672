//! Session phases and the turn-taking transition table

use serde::{Deserialize, Serialize};

/// Phase of the interview turn loop
///
/// Exactly one phase is active per session. The loop runs
/// `Idle -> Thinking -> Speaking -> Listening -> Thinking -> ...`
/// until the final answer is analyzed, then returns to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// No session in progress
    #[default]
    Idle,
    /// Microphone armed, waiting for the candidate to answer
    Listening,
    /// A backend call is outstanding (question generation or analysis)
    Thinking,
    /// Synthesized speech is playing
    Speaking,
}

impl SessionPhase {
    /// Get allowed transitions from the current phase
    pub fn allowed_transitions(&self) -> Vec<SessionPhase> {
        match self {
            // A session always opens with the first question request.
            SessionPhase::Idle => vec![SessionPhase::Thinking],
            // Listening ends when a recording completes, or when the
            // session is torn down.
            SessionPhase::Listening => vec![SessionPhase::Thinking, SessionPhase::Idle],
            // A failed call reverts to Listening; a successful one is
            // spoken; initial-question failure ends the session.
            SessionPhase::Thinking => vec![
                SessionPhase::Speaking,
                SessionPhase::Listening,
                SessionPhase::Idle,
            ],
            // Playback end hands the floor back, or closes the session
            // after the final question.
            SessionPhase::Speaking => vec![SessionPhase::Listening, SessionPhase::Idle],
        }
    }

    /// Check if a transition to the target phase is allowed
    pub fn can_transition_to(&self, target: SessionPhase) -> bool {
        self.allowed_transitions().contains(&target)
    }

    /// Whether a session is in progress
    pub fn is_active(&self) -> bool {
        !matches!(self, SessionPhase::Idle)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionPhase::Idle => "idle",
            SessionPhase::Listening => "listening",
            SessionPhase::Thinking => "thinking",
            SessionPhase::Speaking => "speaking",
        }
    }
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
