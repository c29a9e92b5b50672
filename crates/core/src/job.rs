//! Job context the interview questions are tailored to

use serde::{Deserialize, Serialize};

/// Job application metadata selected once per session
///
/// Immutable for the lifetime of a session; a session cannot start
/// without one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobContext {
    /// Position title (e.g. "Software Engineer")
    pub title: String,
    /// Hiring company
    pub company: String,
    /// Job description the questions draw from
    #[serde(default)]
    pub description: String,
}

impl JobContext {
    pub fn new(title: impl Into<String>, company: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            company: company.into(),
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Short label for logs and UI lists
    pub fn label(&self) -> String {
        format!("{} at {}", self.title, self.company)
    }
}

impl std::fmt::Display for JobContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
