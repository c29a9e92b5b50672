//! Wire types for the coaching backend
//!
//! Field names follow the backend's JSON contract (camelCase).

use serde::{Deserialize, Serialize};

use interview_voice_core::{ConversationMessage, JobContext};

/// One conversation entry as the backend expects it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireMessage {
    pub role: String,
    pub content: String,
}

impl From<&ConversationMessage> for WireMessage {
    fn from(msg: &ConversationMessage) -> Self {
        Self {
            role: msg.role.as_str().to_string(),
            content: msg.content.clone(),
        }
    }
}

/// Convert a transcript slice into the wire representation
pub fn wire_history(history: &[ConversationMessage]) -> Vec<WireMessage> {
    history.iter().map(WireMessage::from).collect()
}

/// `POST /api/interview/transcribe` request
#[derive(Debug, Serialize)]
pub struct TranscribeRequest {
    /// Base64-encoded audio
    pub audio: String,
}

/// `POST /api/interview/transcribe` response
#[derive(Debug, Deserialize)]
pub struct TranscribeResponse {
    pub text: String,
}

/// `POST /api/interview/generate-question` request
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRequest {
    pub job_title: String,
    pub company: String,
    pub job_description: String,
    pub conversation: Vec<WireMessage>,
}

impl QuestionRequest {
    pub fn new(job: &JobContext, history: &[ConversationMessage]) -> Self {
        Self {
            job_title: job.title.clone(),
            company: job.company.clone(),
            job_description: job.description.clone(),
            conversation: wire_history(history),
        }
    }
}

/// `POST /api/interview/generate-question` response
///
/// Backend revisions spell the field either `aiResponse` or `question`;
/// both are accepted.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResponse {
    #[serde(default)]
    pub ai_response: Option<String>,
    #[serde(default)]
    pub question: Option<String>,
}

impl QuestionResponse {
    /// The generated question, whichever field carried it
    pub fn into_text(self) -> Option<String> {
        self.ai_response.or(self.question).filter(|s| !s.is_empty())
    }
}

/// `POST /api/interview/analyze-response` request
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub job_title: String,
    pub company: String,
    pub job_description: String,
    pub user_response: String,
    pub conversation: Vec<WireMessage>,
}

impl AnalyzeRequest {
    pub fn new(job: &JobContext, answer: &str, history: &[ConversationMessage]) -> Self {
        Self {
            job_title: job.title.clone(),
            company: job.company.clone(),
            job_description: job.description.clone(),
            user_response: answer.to_string(),
            conversation: wire_history(history),
        }
    }
}

/// `POST /api/interview/analyze-response` response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    #[serde(default)]
    pub ai_response: Option<String>,
    #[serde(default)]
    pub is_last_question: bool,
    #[serde(default)]
    pub feedback: Option<String>,
}

/// `POST /api/interview/text-to-speech` request
#[derive(Debug, Serialize)]
pub struct SpeechRequest {
    pub text: String,
    pub voice: String,
}

/// `POST /api/interview/text-to-speech` response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechResponse {
    pub audio_url: String,
}

/// One entry from `GET /api/job-applications`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobApplication {
    #[serde(default)]
    pub id: Option<String>,
    pub job_title: String,
    pub company: String,
    #[serde(default)]
    pub job_description: String,
    #[serde(default)]
    pub status: Option<String>,
}

impl JobApplication {
    /// Build the session job context from this application
    pub fn context(&self) -> JobContext {
        JobContext::new(&self.job_title, &self.company).with_description(&self.job_description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_request_field_names() {
        let job = JobContext::new("Software Engineer", "Acme").with_description("Rust services");
        let history = vec![ConversationMessage::assistant("Tell me about yourself.")];
        let json = serde_json::to_value(QuestionRequest::new(&job, &history)).unwrap();

        assert_eq!(json["jobTitle"], "Software Engineer");
        assert_eq!(json["company"], "Acme");
        assert_eq!(json["jobDescription"], "Rust services");
        assert_eq!(json["conversation"][0]["role"], "assistant");
        assert_eq!(json["conversation"][0]["content"], "Tell me about yourself.");
    }

    #[test]
    fn test_question_response_accepts_both_spellings() {
        let r: QuestionResponse = serde_json::from_str(r#"{"aiResponse": "Why Rust?"}"#).unwrap();
        assert_eq!(r.into_text().as_deref(), Some("Why Rust?"));

        let r: QuestionResponse = serde_json::from_str(r#"{"question": "Why Rust?"}"#).unwrap();
        assert_eq!(r.into_text().as_deref(), Some("Why Rust?"));

        let r: QuestionResponse = serde_json::from_str("{}").unwrap();
        assert!(r.into_text().is_none());
    }

    #[test]
    fn test_analyze_response_defaults() {
        let r: AnalyzeResponse = serde_json::from_str(r#"{"aiResponse": "And your weaknesses?"}"#).unwrap();
        assert!(!r.is_last_question);
        assert!(r.feedback.is_none());

        let r: AnalyzeResponse = serde_json::from_str(
            r#"{"isLastQuestion": true, "feedback": "Good depth, watch pacing."}"#,
        )
        .unwrap();
        assert!(r.is_last_question);
        assert_eq!(r.feedback.as_deref(), Some("Good depth, watch pacing."));
    }

    #[test]
    fn test_job_application_context() {
        let app: JobApplication = serde_json::from_str(
            r#"{"id": "42", "jobTitle": "Data Analyst", "company": "Initech", "jobDescription": "SQL"}"#,
        )
        .unwrap();
        let job = app.context();
        assert_eq!(job.title, "Data Analyst");
        assert_eq!(job.company, "Initech");
        assert_eq!(job.description, "SQL");
    }
}
