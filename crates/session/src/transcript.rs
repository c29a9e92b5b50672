//! Append-only session transcript

use interview_voice_core::{ConversationMessage, MessageRole};

/// The conversation so far
///
/// Only grows within a session; reset happens on session start, so the
/// transcript of a finished interview stays readable until the next one
/// begins.
#[derive(Debug, Default)]
pub struct Transcript {
    messages: Vec<ConversationMessage>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an interviewer line
    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.messages.push(ConversationMessage::assistant(content));
    }

    /// Append a candidate answer
    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(ConversationMessage::user(content));
    }

    /// All messages in order
    pub fn messages(&self) -> &[ConversationMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&ConversationMessage> {
        self.messages.last()
    }

    /// Number of candidate answers given so far
    pub fn answer_count(&self) -> usize {
        self.messages
            .iter()
            .filter(|m| m.role == MessageRole::User)
            .count()
    }

    /// Clear everything; called at session start
    pub fn reset(&mut self) {
        self.messages.clear();
    }
}
