//! Local synthesis fallback
//!
//! When remote synthesis or playback fails, the session still owes the
//! candidate an audible "speaking" turn before the floor is handed
//! back. This synthesizer renders one short tone pulse per word so the
//! spoken line keeps its pacing, using the same WAV/playback path as
//! real speech.

use async_trait::async_trait;

use interview_voice_core::{AudioClip, AudioFormat, Result, SpeechSynthesizer};

use crate::capture::encode_wav;

const SAMPLE_RATE: u32 = 16_000;
const TONE_HZ: f32 = 523.25;
const PULSE_MS: u32 = 160;
const GAP_MS: u32 = 90;

/// Tone-cadence fallback synthesizer
#[derive(Debug, Default, Clone)]
pub struct CadenceSpeech;

impl CadenceSpeech {
    pub fn new() -> Self {
        Self
    }

    fn render(&self, words: usize) -> Vec<i16> {
        let pulse_len = (SAMPLE_RATE * PULSE_MS / 1000) as usize;
        let gap_len = (SAMPLE_RATE * GAP_MS / 1000) as usize;
        let mut samples = Vec::with_capacity(words * (pulse_len + gap_len));

        for _ in 0..words {
            for i in 0..pulse_len {
                let t = i as f32 / SAMPLE_RATE as f32;
                // Linear attack/decay keeps the pulses from clicking.
                let edge = (pulse_len / 8).max(1);
                let envelope = (i.min(pulse_len - i) as f32 / edge as f32).min(1.0);
                let value =
                    (t * TONE_HZ * std::f32::consts::TAU).sin() * envelope * 0.4 * i16::MAX as f32;
                samples.push(value as i16);
            }
            samples.extend(std::iter::repeat(0).take(gap_len));
        }
        samples
    }
}

#[async_trait]
impl SpeechSynthesizer for CadenceSpeech {
    async fn synthesize(&self, text: &str, _voice: &str) -> Result<AudioClip> {
        let words = text.split_whitespace().count();
        if words == 0 {
            return Ok(AudioClip::empty(AudioFormat::Wav));
        }

        let samples = self.render(words);
        let pcm: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
        let bytes = encode_wav(&pcm, SAMPLE_RATE, 1)?;

        tracing::debug!(words, bytes = bytes.len(), "rendered fallback speech");
        Ok(AudioClip::new(bytes, AudioFormat::Wav))
    }

    fn name(&self) -> &str {
        "cadence-fallback"
    }
}
