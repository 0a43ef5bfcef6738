//! Speech input/output ports.
//!
//! The platform's recognition and synthesis engines live behind these
//! traits so the session controller's state machine stays testable with
//! fake implementations delivering deterministic sequences.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::VoicePersona;

/// Errors that can terminate a one-shot capture attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
    /// The environment lacks speech recognition entirely.
    #[error("speech recognition is not supported in this environment")]
    Unsupported,

    /// Capture ended with silence - retryable by user action.
    #[error("no speech was detected")]
    NoSpeech,

    /// Any other recognition failure.
    #[error("speech recognition failed: {0}")]
    Failed(String),
}

/// Port for one-shot voice capture.
///
/// A single call produces exactly one terminal outcome: one final
/// transcript, or one error - never both, and never silence (an environment
/// without recognition support must resolve immediately with
/// [`CaptureError::Unsupported`] rather than hang).
#[async_trait]
pub trait SpeechInput: Send + Sync {
    /// Listen for one utterance and resolve with its final transcript.
    async fn listen(&self) -> Result<String, CaptureError>;
}

/// Callback invoked when a scheduled utterance finishes or is terminated by
/// a genuine engine error. Superseded utterances never fire it.
pub type SpeechDoneCallback = Box<dyn FnOnce() + Send + 'static>;

/// Port for cancelable speech output.
///
/// `speak` is fire-and-forget: playback proceeds asynchronously and can be
/// superseded at any time by another `speak` or halted by `stop`.
pub trait SpeechOutput: Send + Sync {
    /// Speak `text` with the given persona, superseding any in-flight
    /// utterance. `on_done` fires when the utterance completes naturally or
    /// dies to a genuine engine error - not when it is superseded.
    fn speak(&self, text: &str, persona: VoicePersona, on_done: Option<SpeechDoneCallback>);

    /// Cancel any in-flight utterance. Idempotent; safe to call when
    /// nothing is playing.
    fn stop(&self);

    /// Whether an utterance is currently playing.
    fn is_speaking(&self) -> bool;
}
