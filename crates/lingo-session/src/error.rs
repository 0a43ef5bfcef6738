//! Session engine errors.
//!
//! Every variant maps to a distinct user-facing failure message in the
//! host application, so capture problems keep their identity instead of
//! collapsing into one generic error.

use lingo_core::ports::CaptureError;
use thiserror::Error;

/// Errors surfaced by [`crate::LessonSessionController`] operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The environment has no speech recognition at all.
    #[error("speech recognition is not supported in this environment")]
    CaptureUnsupported,

    /// Capture ended in silence. The learner can simply try again.
    #[error("no speech was detected")]
    NoSpeechDetected,

    /// Voice capture failed for some other reason.
    #[error("voice capture failed: {0}")]
    CaptureFailure(String),

    /// The dialogue endpoint could not be reached or gave no usable reply.
    #[error("could not reach the tutor: {0}")]
    ConnectionFailure(String),

    /// A saved conversation could not be restored into a live context.
    #[error("could not restore the saved conversation: {0}")]
    RehydrationFailure(String),

    /// The session snapshot could not be persisted.
    #[error("could not save the session: {0}")]
    PersistenceFailure(String),
}

impl From<CaptureError> for SessionError {
    fn from(err: CaptureError) -> Self {
        match err {
            CaptureError::Unsupported => Self::CaptureUnsupported,
            CaptureError::NoSpeech => Self::NoSpeechDetected,
            CaptureError::Failed(msg) => Self::CaptureFailure(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_errors_keep_their_identity() {
        assert!(matches!(
            SessionError::from(CaptureError::Unsupported),
            SessionError::CaptureUnsupported
        ));
        assert!(matches!(
            SessionError::from(CaptureError::NoSpeech),
            SessionError::NoSpeechDetected
        ));
        assert!(matches!(
            SessionError::from(CaptureError::Failed("mic".to_string())),
            SessionError::CaptureFailure(msg) if msg == "mic"
        ));
    }
}
