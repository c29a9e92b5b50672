//! Clip playback through the default output device
//!
//! A fresh rodio output stream is opened per clip inside a blocking
//! task; `play` resolves only once the sink has drained, which is what
//! the session uses to hand the floor back to the candidate.

use std::io::Cursor;

use async_trait::async_trait;

use interview_voice_core::{AudioClip, Result, SpeechOutput};

use crate::AudioError;

/// Speaker playback via rodio
#[derive(Debug, Clone)]
pub struct RodioPlayer {
    /// Linear volume applied to every clip
    pub volume: f32,
}

impl Default for RodioPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl RodioPlayer {
    pub fn new() -> Self {
        Self { volume: 1.0 }
    }

    pub fn with_volume(mut self, volume: f32) -> Self {
        self.volume = volume.clamp(0.0, 2.0);
        self
    }
}

#[async_trait]
impl SpeechOutput for RodioPlayer {
    async fn play(&self, clip: &AudioClip) -> Result<()> {
        if clip.is_empty() {
            return Ok(());
        }

        let bytes = clip.bytes.clone();
        let volume = self.volume;

        let played = tokio::task::spawn_blocking(move || -> std::result::Result<(), AudioError> {
            // The output stream is !Send, so its whole lifetime stays on
            // this blocking thread.
            let (_stream, handle) = rodio::OutputStream::try_default()
                .map_err(|e| AudioError::Playback(e.to_string()))?;
            let sink =
                rodio::Sink::try_new(&handle).map_err(|e| AudioError::Playback(e.to_string()))?;
            let source = rodio::Decoder::new(Cursor::new(bytes))
                .map_err(|e| AudioError::Playback(e.to_string()))?;

            sink.set_volume(volume);
            sink.append(source);
            sink.sleep_until_end();
            Ok(())
        })
        .await
        .map_err(|e| AudioError::Playback(format!("playback task failed: {e}")))?;

        played?;
        Ok(())
    }
}
