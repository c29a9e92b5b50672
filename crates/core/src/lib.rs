//! Core traits and types for the interview practice engine
//!
//! This crate provides foundational types used across all other crates:
//! - Core traits for pluggable backends (capture, transcription, synthesis, coaching)
//! - Session phase definitions and the legal transition table
//! - Conversation message types
//! - Audio clip and chunk buffer types
//! - Error types

pub mod audio;
pub mod conversation;
pub mod error;
pub mod job;
pub mod phase;
pub mod traits;

// Re-exports
pub use audio::{AudioClip, AudioFormat, ChunkBuffer};
pub use conversation::{ConversationMessage, MessageRole};
pub use error::{Error, Result};
pub use job::JobContext;
pub use phase::SessionPhase;

// Trait re-exports
pub use traits::{
    // Capture
    AudioCapture,
    // Speech
    SpeechOutput, SpeechSynthesizer, Transcriber,
    // Coaching
    AnswerAnalysis, InterviewCoach,
};
