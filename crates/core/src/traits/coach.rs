//! Interview coaching trait

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{ConversationMessage, JobContext, Result};

/// Result of analyzing one candidate answer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerAnalysis {
    /// The interviewer's next line (follow-up question or closing words)
    pub reply: Option<String>,
    /// Whether the interview is over after this answer
    pub is_last_question: bool,
    /// Overall feedback, present on the final turn
    pub feedback: Option<String>,
}

impl AnswerAnalysis {
    /// A plain follow-up question
    pub fn follow_up(reply: impl Into<String>) -> Self {
        Self {
            reply: Some(reply.into()),
            is_last_question: false,
            feedback: None,
        }
    }

    /// A closing turn carrying feedback
    pub fn closing(reply: impl Into<String>, feedback: impl Into<String>) -> Self {
        Self {
            reply: Some(reply.into()),
            is_last_question: true,
            feedback: Some(feedback.into()),
        }
    }
}

/// Question generation and answer analysis
///
/// Implementations:
/// - `CoachClient` - remote coaching backend (interview-voice-client)
/// - test mocks with scripted interviews
#[async_trait]
pub trait InterviewCoach: Send + Sync + 'static {
    /// Generate the opening question for a job context
    ///
    /// Failure here ends the session: there is nothing to fall back to
    /// before the first question has been asked.
    async fn opening_question(
        &self,
        job: &JobContext,
        history: &[ConversationMessage],
    ) -> Result<String>;

    /// Analyze a candidate answer and produce the next interviewer turn
    async fn analyze_answer(
        &self,
        job: &JobContext,
        answer: &str,
        history: &[ConversationMessage],
    ) -> Result<AnswerAnalysis>;
}
