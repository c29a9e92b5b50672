//! Coaching backend client
//!
//! Thin request/response wrappers over the backend REST endpoints, with
//! bounded exponential-backoff retry for transient failures.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;

use interview_voice_core::{
    AnswerAnalysis, AudioClip, AudioFormat, ConversationMessage, Error as CoreError,
    InterviewCoach, JobContext, Result as CoreResult, SpeechSynthesizer, Transcriber,
};

use crate::ClientError;
use crate::wire::{
    AnalyzeRequest, AnalyzeResponse, JobApplication, QuestionRequest, QuestionResponse,
    SpeechRequest, SpeechResponse, TranscribeRequest, TranscribeResponse,
};

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the coaching backend
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// Maximum retry attempts for transient failures
    pub max_retries: u32,
    /// Initial backoff duration (doubles each retry)
    pub initial_backoff: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            timeout: Duration::from_secs(30),
            max_retries: 3,
            initial_backoff: Duration::from_millis(100),
        }
    }
}

/// Client for the career-coaching backend
#[derive(Clone)]
pub struct CoachClient {
    client: Client,
    config: ClientConfig,
}

impl CoachClient {
    /// Create a new client
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClientError::Configuration(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Build an absolute URL for an API path
    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Resolve a possibly-relative audio URL against the backend base
    fn resolve_url(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else {
            format!(
                "{}/{}",
                self.config.base_url.trim_end_matches('/'),
                url.trim_start_matches('/')
            )
        }
    }

    /// Execute a single POST request
    async fn execute_post<B: Serialize, T: DeserializeOwned>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let response = self.client.post(url).json(body).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response.text().await.unwrap_or_default();
            // 5xx errors are retryable, 4xx are not
            if status.is_server_error() {
                return Err(ClientError::Network(format!("Server error {status}: {message}")));
            }
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }

    /// POST with retry for transient failures
    async fn post_with_retry<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let url = self.api_url(path);
        let mut backoff = self.config.initial_backoff;
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                tracing::warn!(
                    path,
                    attempt,
                    max_retries = self.config.max_retries,
                    "request failed, retrying in {:?}",
                    backoff
                );
                tokio::time::sleep(backoff).await;
                backoff *= 2;
            }

            match self.execute_post(&url, body).await {
                Ok(result) => return Ok(result),
                Err(e) if e.is_retryable() => last_error = Some(e),
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or(ClientError::Timeout))
    }

    /// GET with retry for transient failures
    async fn get_with_retry<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let url = self.api_url(path);
        let mut backoff = self.config.initial_backoff;
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                tokio::time::sleep(backoff).await;
                backoff *= 2;
            }

            let result = async {
                let response = self.client.get(&url).send().await?;
                if !response.status().is_success() {
                    let status = response.status();
                    let message = response.text().await.unwrap_or_default();
                    if status.is_server_error() {
                        return Err(ClientError::Network(format!(
                            "Server error {status}: {message}"
                        )));
                    }
                    return Err(ClientError::Api {
                        status: status.as_u16(),
                        message,
                    });
                }
                response
                    .json()
                    .await
                    .map_err(|e| ClientError::InvalidResponse(e.to_string()))
            }
            .await;

            match result {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() => last_error = Some(e),
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or(ClientError::Timeout))
    }

    /// Transcribe a recorded answer
    pub async fn transcribe_audio(&self, clip: &AudioClip) -> Result<String, ClientError> {
        let request = TranscribeRequest {
            audio: BASE64.encode(&clip.bytes),
        };
        let response: TranscribeResponse =
            self.post_with_retry("/api/interview/transcribe", &request).await?;
        Ok(response.text)
    }

    /// Generate the opening interview question
    pub async fn generate_question(
        &self,
        job: &JobContext,
        history: &[ConversationMessage],
    ) -> Result<String, ClientError> {
        let request = QuestionRequest::new(job, history);
        let response: QuestionResponse = self
            .post_with_retry("/api/interview/generate-question", &request)
            .await?;
        response
            .into_text()
            .ok_or_else(|| ClientError::InvalidResponse("no question in response".to_string()))
    }

    /// Analyze a candidate answer
    pub async fn analyze_response(
        &self,
        job: &JobContext,
        answer: &str,
        history: &[ConversationMessage],
    ) -> Result<AnalyzeResponse, ClientError> {
        let request = AnalyzeRequest::new(job, answer, history);
        self.post_with_retry("/api/interview/analyze-response", &request)
            .await
    }

    /// Synthesize a line of interviewer speech and fetch the clip
    pub async fn synthesize_speech(
        &self,
        text: &str,
        voice: &str,
    ) -> Result<AudioClip, ClientError> {
        let request = SpeechRequest {
            text: text.to_string(),
            voice: voice.to_string(),
        };
        let response: SpeechResponse = self
            .post_with_retry("/api/interview/text-to-speech", &request)
            .await?;
        self.fetch_audio(&response.audio_url).await
    }

    /// Fetch a synthesized clip by URL
    async fn fetch_audio(&self, url: &str) -> Result<AudioClip, ClientError> {
        let url = self.resolve_url(url);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(ClientError::Api {
                status: response.status().as_u16(),
                message: format!("audio fetch failed: {url}"),
            });
        }

        let format = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(AudioFormat::from_mime_type)
            .unwrap_or(AudioFormat::Mp3);

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(ClientError::InvalidResponse("empty audio body".to_string()));
        }
        Ok(AudioClip::new(bytes.to_vec(), format))
    }

    /// List job applications for job-context selection
    pub async fn job_applications(&self) -> Result<Vec<JobApplication>, ClientError> {
        self.get_with_retry("/api/job-applications").await
    }
}

#[async_trait]
impl Transcriber for CoachClient {
    async fn transcribe(&self, clip: &AudioClip) -> CoreResult<String> {
        self.transcribe_audio(clip)
            .await
            .map_err(|e| CoreError::Transcription(e.to_string()))
    }
}

#[async_trait]
impl SpeechSynthesizer for CoachClient {
    async fn synthesize(&self, text: &str, voice: &str) -> CoreResult<AudioClip> {
        self.synthesize_speech(text, voice)
            .await
            .map_err(|e| CoreError::Synthesis(e.to_string()))
    }

    fn name(&self) -> &str {
        "coach-tts"
    }
}

#[async_trait]
impl InterviewCoach for CoachClient {
    async fn opening_question(
        &self,
        job: &JobContext,
        history: &[ConversationMessage],
    ) -> CoreResult<String> {
        self.generate_question(job, history)
            .await
            .map_err(|e| CoreError::Coach(e.to_string()))
    }

    async fn analyze_answer(
        &self,
        job: &JobContext,
        answer: &str,
        history: &[ConversationMessage],
    ) -> CoreResult<AnswerAnalysis> {
        let response = self
            .analyze_response(job, answer, history)
            .await
            .map_err(|e| CoreError::Coach(e.to_string()))?;
        Ok(AnswerAnalysis {
            reply: response.ai_response,
            is_last_question: response.is_last_question,
            feedback: response.feedback,
        })
    }
}
