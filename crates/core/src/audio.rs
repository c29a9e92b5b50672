//! Audio clip and chunk buffer types

use serde::{Deserialize, Serialize};

/// Container format of an audio clip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioFormat {
    /// 16-bit PCM in a WAV container (capture output)
    Wav,
    /// MPEG audio (typical remote synthesis output)
    Mp3,
}

impl AudioFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            AudioFormat::Wav => "audio/wav",
            AudioFormat::Mp3 => "audio/mpeg",
        }
    }

    /// Best-effort mapping from an HTTP content type
    pub fn from_mime_type(mime: &str) -> Option<Self> {
        match mime.split(';').next().unwrap_or("").trim() {
            "audio/wav" | "audio/x-wav" | "audio/wave" => Some(AudioFormat::Wav),
            "audio/mpeg" | "audio/mp3" => Some(AudioFormat::Mp3),
            _ => None,
        }
    }
}

/// One finished piece of audio: a recorded answer or a synthesized line
#[derive(Debug, Clone)]
pub struct AudioClip {
    /// Encoded audio bytes
    pub bytes: Vec<u8>,
    /// Container format of `bytes`
    pub format: AudioFormat,
}

impl AudioClip {
    pub fn new(bytes: Vec<u8>, format: AudioFormat) -> Self {
        Self { bytes, format }
    }

    /// A clip with no audio in it (nothing was captured during the turn)
    pub fn empty(format: AudioFormat) -> Self {
        Self {
            bytes: Vec::new(),
            format,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }
}

/// Ordered binary fragments accumulated during one listening turn
///
/// Non-empty only between a listening-turn start and its completion:
/// `flush()` concatenates everything captured so far into one clip and
/// clears the buffer.
#[derive(Debug, Default)]
pub struct ChunkBuffer {
    chunks: Vec<Vec<u8>>,
}

impl ChunkBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one captured fragment
    pub fn push(&mut self, chunk: Vec<u8>) {
        if !chunk.is_empty() {
            self.chunks.push(chunk);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Number of buffered fragments
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Total buffered bytes
    pub fn byte_len(&self) -> usize {
        self.chunks.iter().map(Vec::len).sum()
    }

    /// Concatenate all fragments into one byte vector and clear the buffer
    pub fn flush(&mut self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.byte_len());
        for chunk in self.chunks.drain(..) {
            out.extend_from_slice(&chunk);
        }
        out
    }

    /// Discard everything without producing a clip
    pub fn clear(&mut self) {
        self.chunks.clear();
    }
}
