//! Session orchestrator
//!
//! Owns the single mutable session state and exposes only named
//! operations; all phase changes flow through the dialogue machine, so
//! the turn loop is testable with mocked devices and a mocked backend.

use std::sync::Arc;

use tokio::sync::broadcast;

use interview_voice_core::{
    AudioCapture, Error as CoreError, InterviewCoach, JobContext, SessionPhase, SpeechOutput,
    SpeechSynthesizer, Transcriber,
};

use crate::events::{EndReason, SessionEvent};
use crate::machine::DialogueMachine;
use crate::transcript::Transcript;
use crate::SessionError;

/// Session policies
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Voice id for remote synthesis
    pub voice: String,
    /// Transcript substituted when a listening turn captured no audio
    pub fallback_transcript: String,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            voice: "alloy".to_string(),
            fallback_transcript: "I wasn't able to record my answer clearly.".to_string(),
        }
    }
}

/// One mock-interview session
///
/// Lifecycle: `select_job` + `start` create the session; the candidate
/// answers through `press_to_answer`/`complete_answer`; `end` (or the
/// coach's final turn) returns the engine to idle and releases the
/// microphone.
pub struct InterviewSession {
    id: String,
    options: SessionOptions,
    machine: DialogueMachine,
    transcript: Transcript,
    job: Option<JobContext>,
    feedback: Option<String>,
    capture: Box<dyn AudioCapture>,
    coach: Arc<dyn InterviewCoach>,
    transcriber: Arc<dyn Transcriber>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    fallback: Option<Arc<dyn SpeechSynthesizer>>,
    output: Arc<dyn SpeechOutput>,
    event_tx: broadcast::Sender<SessionEvent>,
}

impl InterviewSession {
    /// Create an engine around the given adapters
    pub fn new(
        capture: Box<dyn AudioCapture>,
        coach: Arc<dyn InterviewCoach>,
        transcriber: Arc<dyn Transcriber>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        output: Arc<dyn SpeechOutput>,
        options: SessionOptions,
    ) -> Self {
        let (event_tx, _) = broadcast::channel(64);
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            options,
            machine: DialogueMachine::new(),
            transcript: Transcript::new(),
            job: None,
            feedback: None,
            capture,
            coach,
            transcriber,
            synthesizer,
            fallback: None,
            output,
            event_tx,
        }
    }

    /// Use a local synthesizer when remote synthesis or playback fails
    pub fn with_fallback_speech(mut self, fallback: Arc<dyn SpeechSynthesizer>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Subscribe to session events
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.event_tx.subscribe()
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn phase(&self) -> SessionPhase {
        self.machine.phase()
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn job(&self) -> Option<&JobContext> {
        self.job.as_ref()
    }

    /// Final feedback from the coach, present after a completed session
    pub fn feedback(&self) -> Option<&str> {
        self.feedback.as_deref()
    }

    /// Pick the job the interview questions are tailored to
    ///
    /// Rejected while a session is in progress; the context is
    /// immutable for the session's lifetime.
    pub fn select_job(&mut self, job: JobContext) -> Result<(), SessionError> {
        if self.machine.phase().is_active() {
            return Err(SessionError::AlreadyActive);
        }
        tracing::info!(session = %self.id, job = %job, "job context selected");
        self.job = Some(job);
        Ok(())
    }

    /// Start the interview
    ///
    /// Requires a selected job context. Resets transcript and feedback,
    /// acquires the microphone, and asks the coach for the opening
    /// question. Failure to generate that question ends the session.
    pub async fn start(&mut self) -> Result<(), SessionError> {
        if self.machine.phase().is_active() {
            return Err(SessionError::AlreadyActive);
        }
        let job = self.job.clone().ok_or(CoreError::NoJobContext)?;

        self.transcript.reset();
        self.feedback = None;
        self.capture.setup().await?;

        self.transition(SessionPhase::Thinking)?;

        match self
            .coach
            .opening_question(&job, self.transcript.messages())
            .await
        {
            Ok(question) => {
                self.transcript.push_assistant(&question);
                self.emit(SessionEvent::InterviewerLine(question.clone()));
                self.transition(SessionPhase::Speaking)?;
                self.speak(&question).await;
                self.transition(SessionPhase::Listening)?;
                Ok(())
            }
            Err(e) => {
                // Nothing to fall back to before the first question.
                tracing::error!(session = %self.id, "opening question failed: {e}");
                self.teardown(EndReason::StartFailed);
                Err(e.into())
            }
        }
    }

    /// Arm the recorder (press-and-hold, or tap-to-record)
    pub fn press_to_answer(&mut self) -> Result<(), SessionError> {
        self.require_phase(SessionPhase::Listening)?;
        self.capture.start()?;
        Ok(())
    }

    /// Finish the answer: stop recording, transcribe, analyze, and
    /// speak the next interviewer line
    ///
    /// Transcription or analysis failure hands the floor back to the
    /// candidate (phase reverts to listening) without touching the
    /// transcript further; the turn can simply be retried.
    pub async fn complete_answer(&mut self) -> Result<(), SessionError> {
        self.require_phase(SessionPhase::Listening)?;
        self.capture.stop()?;
        let clip = self.capture.flush();

        self.transition(SessionPhase::Thinking)?;

        let answer = if clip.is_empty() {
            // Empty recording: substitute rather than stall the loop.
            tracing::warn!(session = %self.id, "empty recording, using fallback transcript");
            self.options.fallback_transcript.clone()
        } else {
            match self.transcriber.transcribe(&clip).await {
                Ok(text) if !text.trim().is_empty() => text,
                Ok(_) => self.options.fallback_transcript.clone(),
                Err(e) => {
                    self.retryable_failure("transcription", e)?;
                    return Ok(());
                }
            }
        };

        self.transcript.push_user(&answer);
        self.emit(SessionEvent::AnswerTranscribed(answer.clone()));

        let job = self.job.clone().ok_or(CoreError::NoJobContext)?;
        let analysis = match self
            .coach
            .analyze_answer(&job, &answer, self.transcript.messages())
            .await
        {
            Ok(analysis) => analysis,
            Err(e) => {
                self.retryable_failure("analysis", e)?;
                return Ok(());
            }
        };

        if analysis.is_last_question {
            if let Some(feedback) = analysis.feedback {
                self.feedback = Some(feedback.clone());
                self.emit(SessionEvent::FeedbackReady(feedback));
            }
            if let Some(reply) = analysis.reply {
                self.transcript.push_assistant(&reply);
                self.emit(SessionEvent::InterviewerLine(reply.clone()));
                self.transition(SessionPhase::Speaking)?;
                self.speak(&reply).await;
            }
            self.teardown(EndReason::Completed);
            return Ok(());
        }

        match analysis.reply {
            Some(reply) => {
                self.transcript.push_assistant(&reply);
                self.emit(SessionEvent::InterviewerLine(reply.clone()));
                self.transition(SessionPhase::Speaking)?;
                self.speak(&reply).await;
                self.transition(SessionPhase::Listening)?;
                Ok(())
            }
            None => {
                self.retryable_failure(
                    "analysis",
                    CoreError::Coach("no interviewer reply in response".to_string()),
                )?;
                Ok(())
            }
        }
    }

    /// End the session from any phase
    ///
    /// Microphone and playback resources are released unconditionally.
    pub fn end(&mut self) {
        if !self.machine.phase().is_active() {
            return;
        }
        tracing::info!(session = %self.id, "session ended by user");
        self.teardown(EndReason::UserEnded);
    }

    /// Synthesize and play one interviewer line, degrading to the local
    /// fallback and finally to silence
    ///
    /// Playback problems never abort the turn: the speaking phase still
    /// completes so the floor is handed back on schedule.
    async fn speak(&mut self, text: &str) {
        match self.synthesizer.synthesize(text, &self.options.voice).await {
            Ok(clip) => {
                if let Err(e) = self.output.play(&clip).await {
                    tracing::warn!(session = %self.id, "playback failed: {e}");
                    self.emit(SessionEvent::Warning(e.to_string()));
                    self.speak_fallback(text).await;
                }
            }
            Err(e) => {
                tracing::warn!(session = %self.id, "remote synthesis failed: {e}");
                self.emit(SessionEvent::Warning(e.to_string()));
                self.speak_fallback(text).await;
            }
        }
    }

    async fn speak_fallback(&mut self, text: &str) {
        let Some(fallback) = self.fallback.clone() else {
            return;
        };
        match fallback.synthesize(text, &self.options.voice).await {
            Ok(clip) => {
                if let Err(e) = self.output.play(&clip).await {
                    tracing::warn!(session = %self.id, "fallback playback failed: {e}");
                }
            }
            Err(e) => {
                tracing::warn!(session = %self.id, "fallback synthesis failed: {e}");
            }
        }
    }

    /// Log a retryable mid-turn failure and hand the floor back
    fn retryable_failure(&mut self, what: &str, err: CoreError) -> Result<(), SessionError> {
        tracing::warn!(session = %self.id, "{what} failed, returning to listening: {err}");
        self.emit(SessionEvent::Warning(err.to_string()));
        self.transition(SessionPhase::Listening)?;
        Ok(())
    }

    fn require_phase(&self, expected: SessionPhase) -> Result<(), SessionError> {
        let actual = self.machine.phase();
        if actual != expected {
            return Err(SessionError::WrongPhase { expected, actual });
        }
        Ok(())
    }

    fn transition(&mut self, to: SessionPhase) -> Result<(), SessionError> {
        let from = self.machine.transition(to)?;
        self.emit(SessionEvent::PhaseChanged { from, to });
        Ok(())
    }

    fn teardown(&mut self, reason: EndReason) {
        let _ = self.capture.stop();
        self.capture.release();
        let from = self.machine.force_idle();
        if from != SessionPhase::Idle {
            self.emit(SessionEvent::PhaseChanged {
                from,
                to: SessionPhase::Idle,
            });
        }
        self.emit(SessionEvent::Ended(reason));
    }

    fn emit(&self, event: SessionEvent) {
        // Subscribers are optional; a full or absent channel is fine.
        let _ = self.event_tx.send(event);
    }
}
