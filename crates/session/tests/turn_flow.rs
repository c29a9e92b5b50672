//! End-to-end turn-loop scenarios with mocked devices and a scripted
//! coaching backend.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use interview_voice_core::{
    AnswerAnalysis, AudioCapture, AudioClip, AudioFormat, ConversationMessage, Error,
    InterviewCoach, JobContext, MessageRole, Result, SessionPhase, SpeechOutput,
    SpeechSynthesizer, Transcriber,
};
use interview_voice_session::{
    EndReason, InterviewSession, SessionError, SessionEvent, SessionOptions,
};

/// Capture mock producing one scripted clip per recording turn
struct MockCapture {
    script: Mutex<VecDeque<Vec<u8>>>,
    buffered: Mutex<Vec<u8>>,
    capturing: Arc<AtomicBool>,
    released: Arc<AtomicBool>,
}

impl MockCapture {
    fn scripted(clips: Vec<Vec<u8>>) -> (Box<Self>, Arc<AtomicBool>, Arc<AtomicBool>) {
        let capturing = Arc::new(AtomicBool::new(false));
        let released = Arc::new(AtomicBool::new(false));
        let capture = Box::new(Self {
            script: Mutex::new(clips.into()),
            buffered: Mutex::new(Vec::new()),
            capturing: Arc::clone(&capturing),
            released: Arc::clone(&released),
        });
        (capture, capturing, released)
    }
}

#[async_trait]
impl AudioCapture for MockCapture {
    async fn setup(&mut self) -> Result<()> {
        self.released.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn start(&mut self) -> Result<()> {
        if !self.capturing.swap(true, Ordering::SeqCst) {
            let next = self.script.lock().pop_front().unwrap_or_default();
            *self.buffered.lock() = next;
        }
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.capturing.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn flush(&mut self) -> AudioClip {
        AudioClip::new(std::mem::take(&mut *self.buffered.lock()), AudioFormat::Wav)
    }

    fn is_capturing(&self) -> bool {
        self.capturing.load(Ordering::SeqCst)
    }

    fn release(&mut self) {
        self.capturing.store(false, Ordering::SeqCst);
        self.buffered.lock().clear();
        self.released.store(true, Ordering::SeqCst);
    }
}

/// Coach mock with a scripted opening question and analysis queue
struct MockCoach {
    opening: Mutex<Option<Result<String>>>,
    analyses: Mutex<VecDeque<Result<AnswerAnalysis>>>,
}

impl MockCoach {
    fn new(opening: Result<String>, analyses: Vec<Result<AnswerAnalysis>>) -> Arc<Self> {
        Arc::new(Self {
            opening: Mutex::new(Some(opening)),
            analyses: Mutex::new(analyses.into()),
        })
    }
}

#[async_trait]
impl InterviewCoach for MockCoach {
    async fn opening_question(
        &self,
        _job: &JobContext,
        _history: &[ConversationMessage],
    ) -> Result<String> {
        self.opening
            .lock()
            .take()
            .unwrap_or_else(|| Ok("Tell me about yourself.".to_string()))
    }

    async fn analyze_answer(
        &self,
        _job: &JobContext,
        _answer: &str,
        _history: &[ConversationMessage],
    ) -> Result<AnswerAnalysis> {
        self.analyses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(AnswerAnalysis::follow_up("Anything else?")))
    }
}

/// Transcriber mock replaying a queue of results
struct MockTranscriber {
    results: Mutex<VecDeque<Result<String>>>,
}

impl MockTranscriber {
    fn new(results: Vec<Result<String>>) -> Arc<Self> {
        Arc::new(Self {
            results: Mutex::new(results.into()),
        })
    }
}

#[async_trait]
impl Transcriber for MockTranscriber {
    async fn transcribe(&self, _clip: &AudioClip) -> Result<String> {
        self.results
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok("(unscripted)".to_string()))
    }
}

/// Synthesizer mock; optionally fails every call
struct MockSynth {
    label: &'static str,
    fail: bool,
    calls: Mutex<Vec<String>>,
}

impl MockSynth {
    fn ok(label: &'static str) -> Arc<Self> {
        Arc::new(Self {
            label,
            fail: false,
            calls: Mutex::new(Vec::new()),
        })
    }

    fn failing(label: &'static str) -> Arc<Self> {
        Arc::new(Self {
            label,
            fail: true,
            calls: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl SpeechSynthesizer for MockSynth {
    async fn synthesize(&self, text: &str, _voice: &str) -> Result<AudioClip> {
        self.calls.lock().push(text.to_string());
        if self.fail {
            return Err(Error::Synthesis("tts unavailable".to_string()));
        }
        Ok(AudioClip::new(text.as_bytes().to_vec(), AudioFormat::Wav))
    }

    fn name(&self) -> &str {
        self.label
    }
}

/// Output mock recording how many clips were played
struct MockOutput {
    played: Mutex<Vec<usize>>,
}

impl MockOutput {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            played: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl SpeechOutput for MockOutput {
    async fn play(&self, clip: &AudioClip) -> Result<()> {
        self.played.lock().push(clip.len());
        Ok(())
    }
}

fn job() -> JobContext {
    JobContext::new("Software Engineer", "Acme")
}

fn drain(rx: &mut tokio::sync::broadcast::Receiver<SessionEvent>) -> Vec<SessionEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

#[tokio::test]
async fn start_walks_thinking_speaking_listening() {
    let (capture, _, _) = MockCapture::scripted(vec![]);
    let coach = MockCoach::new(Ok("Tell me about yourself.".to_string()), vec![]);
    let mut session = InterviewSession::new(
        capture,
        coach,
        MockTranscriber::new(vec![]),
        MockSynth::ok("tts"),
        MockOutput::new(),
        SessionOptions::default(),
    );
    let mut rx = session.subscribe();

    session.select_job(job()).unwrap();
    session.start().await.unwrap();

    assert_eq!(session.phase(), SessionPhase::Listening);
    assert_eq!(session.transcript().len(), 1);
    assert_eq!(
        session.transcript().messages()[0].role,
        MessageRole::Assistant
    );

    let phases: Vec<(SessionPhase, SessionPhase)> = drain(&mut rx)
        .into_iter()
        .filter_map(|e| match e {
            SessionEvent::PhaseChanged { from, to } => Some((from, to)),
            _ => None,
        })
        .collect();
    assert_eq!(
        phases,
        vec![
            (SessionPhase::Idle, SessionPhase::Thinking),
            (SessionPhase::Thinking, SessionPhase::Speaking),
            (SessionPhase::Speaking, SessionPhase::Listening),
        ]
    );
}

#[tokio::test]
async fn start_without_job_is_rejected() {
    let (capture, _, _) = MockCapture::scripted(vec![]);
    let coach = MockCoach::new(Ok("Q".to_string()), vec![]);
    let mut session = InterviewSession::new(
        capture,
        coach,
        MockTranscriber::new(vec![]),
        MockSynth::ok("tts"),
        MockOutput::new(),
        SessionOptions::default(),
    );

    let err = session.start().await.unwrap_err();
    assert!(matches!(
        err,
        SessionError::Engine(Error::NoJobContext)
    ));
    assert_eq!(session.phase(), SessionPhase::Idle);
    assert!(session.transcript().is_empty());
}

#[tokio::test]
async fn opening_question_failure_ends_the_session() {
    let (capture, _, released) = MockCapture::scripted(vec![]);
    let coach = MockCoach::new(Err(Error::Coach("backend down".to_string())), vec![]);
    let mut session = InterviewSession::new(
        capture,
        coach,
        MockTranscriber::new(vec![]),
        MockSynth::ok("tts"),
        MockOutput::new(),
        SessionOptions::default(),
    );
    let mut rx = session.subscribe();

    session.select_job(job()).unwrap();
    assert!(session.start().await.is_err());

    assert_eq!(session.phase(), SessionPhase::Idle);
    assert!(released.load(Ordering::SeqCst));
    assert!(drain(&mut rx)
        .iter()
        .any(|e| matches!(e, SessionEvent::Ended(EndReason::StartFailed))));
}

#[tokio::test]
async fn press_and_release_appends_answer_and_speaks_follow_up() {
    let (capture, capturing, _) = MockCapture::scripted(vec![vec![1u8; 320]]);
    let coach = MockCoach::new(
        Ok("Tell me about yourself.".to_string()),
        vec![Ok(AnswerAnalysis::follow_up("Why Python?"))],
    );
    let transcriber = MockTranscriber::new(vec![Ok("I work primarily in Python.".to_string())]);
    let mut session = InterviewSession::new(
        capture,
        coach,
        transcriber,
        MockSynth::ok("tts"),
        MockOutput::new(),
        SessionOptions::default(),
    );

    session.select_job(job()).unwrap();
    session.start().await.unwrap();
    let mut rx = session.subscribe();

    session.press_to_answer().unwrap();
    assert!(capturing.load(Ordering::SeqCst));

    session.complete_answer().await.unwrap();

    let messages = session.transcript().messages();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[1].role, MessageRole::User);
    assert_eq!(messages[1].content, "I work primarily in Python.");
    assert_eq!(messages[2].content, "Why Python?");
    assert_eq!(session.phase(), SessionPhase::Listening);

    // The follow-up went through a thinking -> speaking transition.
    assert!(drain(&mut rx).iter().any(|e| matches!(
        e,
        SessionEvent::PhaseChanged {
            from: SessionPhase::Thinking,
            to: SessionPhase::Speaking,
        }
    )));
}

#[tokio::test]
async fn transcription_failure_reverts_to_listening() {
    let (capture, _, _) = MockCapture::scripted(vec![vec![1u8; 320]]);
    let coach = MockCoach::new(Ok("Q".to_string()), vec![]);
    let transcriber =
        MockTranscriber::new(vec![Err(Error::Transcription("HTTP 500".to_string()))]);
    let mut session = InterviewSession::new(
        capture,
        coach,
        transcriber,
        MockSynth::ok("tts"),
        MockOutput::new(),
        SessionOptions::default(),
    );

    session.select_job(job()).unwrap();
    session.start().await.unwrap();
    let before = session.transcript().len();

    session.press_to_answer().unwrap();
    session.complete_answer().await.unwrap();

    assert_eq!(session.phase(), SessionPhase::Listening);
    assert_eq!(session.transcript().len(), before);
}

#[tokio::test]
async fn empty_recording_substitutes_fallback_transcript() {
    // The scripted turn captures nothing at all.
    let (capture, _, _) = MockCapture::scripted(vec![Vec::new()]);
    let coach = MockCoach::new(Ok("Q".to_string()), vec![]);
    let mut session = InterviewSession::new(
        capture,
        coach,
        MockTranscriber::new(vec![]),
        MockSynth::ok("tts"),
        MockOutput::new(),
        SessionOptions::default(),
    );

    session.select_job(job()).unwrap();
    session.start().await.unwrap();
    session.press_to_answer().unwrap();
    session.complete_answer().await.unwrap();

    // The loop moved on rather than sticking in thinking.
    assert_eq!(session.phase(), SessionPhase::Listening);
    let answer = &session.transcript().messages()[1];
    assert_eq!(answer.role, MessageRole::User);
    assert_eq!(
        answer.content,
        SessionOptions::default().fallback_transcript
    );
}

#[tokio::test]
async fn final_answer_captures_feedback_and_returns_to_idle() {
    let (capture, _, released) = MockCapture::scripted(vec![vec![1u8; 320]]);
    let coach = MockCoach::new(
        Ok("Q".to_string()),
        vec![Ok(AnswerAnalysis::closing(
            "Thanks for your time.",
            "Strong answers overall.",
        ))],
    );
    let transcriber = MockTranscriber::new(vec![Ok("My final answer.".to_string())]);
    let mut session = InterviewSession::new(
        capture,
        coach,
        transcriber,
        MockSynth::ok("tts"),
        MockOutput::new(),
        SessionOptions::default(),
    );
    let mut rx = session.subscribe();

    session.select_job(job()).unwrap();
    session.start().await.unwrap();
    session.press_to_answer().unwrap();
    session.complete_answer().await.unwrap();

    assert_eq!(session.phase(), SessionPhase::Idle);
    assert_eq!(session.feedback(), Some("Strong answers overall."));
    assert!(released.load(Ordering::SeqCst));
    assert!(drain(&mut rx)
        .iter()
        .any(|e| matches!(e, SessionEvent::Ended(EndReason::Completed))));
}

#[tokio::test]
async fn end_releases_microphone_from_any_phase() {
    let (capture, _, released) = MockCapture::scripted(vec![vec![1u8; 320]]);
    let coach = MockCoach::new(Ok("Q".to_string()), vec![]);
    let mut session = InterviewSession::new(
        capture,
        coach,
        MockTranscriber::new(vec![]),
        MockSynth::ok("tts"),
        MockOutput::new(),
        SessionOptions::default(),
    );

    session.select_job(job()).unwrap();
    session.start().await.unwrap();
    session.press_to_answer().unwrap();

    // Listening, mid-recording.
    session.end();
    assert_eq!(session.phase(), SessionPhase::Idle);
    assert!(released.load(Ordering::SeqCst));

    // Ending an idle engine is a no-op.
    session.end();
    assert_eq!(session.phase(), SessionPhase::Idle);
}

#[tokio::test]
async fn remote_synthesis_failure_uses_local_fallback() {
    let (capture, _, _) = MockCapture::scripted(vec![]);
    let coach = MockCoach::new(Ok("Tell me about yourself.".to_string()), vec![]);
    let fallback = MockSynth::ok("fallback");
    let output = MockOutput::new();
    let mut session = InterviewSession::new(
        capture,
        coach,
        MockTranscriber::new(vec![]),
        MockSynth::failing("tts"),
        Arc::clone(&output) as Arc<dyn SpeechOutput>,
        SessionOptions::default(),
    )
    .with_fallback_speech(Arc::clone(&fallback) as Arc<dyn SpeechSynthesizer>);

    session.select_job(job()).unwrap();
    session.start().await.unwrap();

    // The fallback rendered the line and playback still happened, so
    // the floor was handed back on schedule.
    assert_eq!(session.phase(), SessionPhase::Listening);
    assert_eq!(fallback.calls.lock().len(), 1);
    assert_eq!(output.played.lock().len(), 1);
}

#[tokio::test]
async fn recording_controls_require_listening_phase() {
    let (capture, _, _) = MockCapture::scripted(vec![]);
    let coach = MockCoach::new(Ok("Q".to_string()), vec![]);
    let mut session = InterviewSession::new(
        capture,
        coach,
        MockTranscriber::new(vec![]),
        MockSynth::ok("tts"),
        MockOutput::new(),
        SessionOptions::default(),
    );

    // Idle: no recording without a session.
    let err = session.press_to_answer().unwrap_err();
    assert!(matches!(err, SessionError::WrongPhase { .. }));
    let err = session.complete_answer().await.unwrap_err();
    assert!(matches!(err, SessionError::WrongPhase { .. }));
}
