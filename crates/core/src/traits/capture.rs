//! Audio capture trait

use async_trait::async_trait;

use crate::{AudioClip, Result};

/// Microphone capture interface
///
/// Implementations:
/// - `CpalCapture` - real input device (interview-voice-audio)
/// - test mocks with scripted clips
///
/// `start`/`stop` are guarded: calling them when the recorder is
/// already in the target state is a no-op, so overlapping UI events
/// cannot corrupt a turn.
///
/// # Example
///
/// ```ignore
/// let mut capture: Box<dyn AudioCapture> = Box::new(CpalCapture::new(config));
/// capture.setup().await?;
/// capture.start()?;
/// // ... candidate speaks ...
/// capture.stop()?;
/// let clip = capture.flush();
/// ```
#[async_trait]
pub trait AudioCapture: Send {
    /// Acquire the input device and prepare a recorder
    ///
    /// Called once at session start. Fails if no input device is
    /// available or permission is denied; the session cannot start in
    /// that case.
    async fn setup(&mut self) -> Result<()>;

    /// Begin appending captured chunks to the turn buffer
    ///
    /// No-op if already capturing.
    fn start(&mut self) -> Result<()>;

    /// Stop appending chunks
    ///
    /// No-op if not capturing.
    fn stop(&mut self) -> Result<()>;

    /// Concatenate everything captured this turn into one clip and
    /// clear the buffer
    ///
    /// An empty clip means no audio arrived between `start` and `stop`;
    /// the caller decides the fallback policy.
    fn flush(&mut self) -> AudioClip;

    /// Whether chunks are currently being appended
    fn is_capturing(&self) -> bool;

    /// Release the input device and discard any buffered audio
    ///
    /// Called unconditionally at session end. Safe to call more than
    /// once.
    fn release(&mut self);
}
