//! Speech processing traits

use async_trait::async_trait;

use crate::{AudioClip, Result};

/// Speech-to-Text interface
///
/// Implementations:
/// - `CoachClient` - remote transcription endpoint (interview-voice-client)
/// - test mocks with scripted transcripts
#[async_trait]
pub trait Transcriber: Send + Sync + 'static {
    /// Transcribe one recorded answer
    ///
    /// The clip is never empty here; empty recordings are substituted
    /// with a fallback transcript before transcription is attempted.
    async fn transcribe(&self, clip: &AudioClip) -> Result<String>;
}

/// Text-to-Speech interface
///
/// Implementations:
/// - `CoachClient` - remote synthesis endpoint returning a fetchable clip
/// - `CadenceSpeech` - local fallback (interview-voice-audio)
///
/// # Example
///
/// ```ignore
/// let tts: Arc<dyn SpeechSynthesizer> = Arc::new(client);
/// let clip = tts.synthesize("Tell me about yourself.", "alloy").await?;
/// ```
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync + 'static {
    /// Synthesize text to an audio clip
    async fn synthesize(&self, text: &str, voice: &str) -> Result<AudioClip>;

    /// Name for logging
    fn name(&self) -> &str;
}

/// Audio playback interface
///
/// `play` resolves when playback has finished; the session uses that
/// completion to hand the floor back to the candidate, so an
/// implementation must not return early while audio is still audible.
#[async_trait]
pub trait SpeechOutput: Send + Sync + 'static {
    /// Play a clip to completion
    async fn play(&self, clip: &AudioClip) -> Result<()>;
}
