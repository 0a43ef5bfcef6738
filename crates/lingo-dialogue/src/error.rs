//! Internal error types for dialogue endpoint operations.
//!
//! These errors are internal to `lingo-dialogue` and are mapped to the core
//! `DialogueError` port error at the boundary.

use lingo_core::ports::DialogueError;
use thiserror::Error;

/// Result type alias for dialogue endpoint operations.
pub type TutorResult<T> = Result<T, TutorError>;

/// Errors related to the tutor dialogue endpoint.
#[derive(Debug, Error)]
pub enum TutorError {
    /// Request failed with an HTTP error status.
    #[error("dialogue endpoint request failed with status {status}: {url}")]
    RequestFailed {
        /// HTTP status code
        status: u16,
        /// The URL that was requested
        url: String,
    },

    /// Network or HTTP client error.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// JSON serialization or parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The endpoint answered but the payload is not a usable reply.
    #[error("endpoint reply is not a usable structured reply: {0}")]
    MalformedReply(String),

    /// Called an operation that needs a live context before creating one.
    #[error("no active dialogue context")]
    NoActiveContext,
}

impl From<TutorError> for DialogueError {
    fn from(err: TutorError) -> Self {
        match err {
            TutorError::NoActiveContext => Self::NoActiveContext,
            TutorError::RequestFailed { .. }
            | TutorError::Network(_)
            | TutorError::InvalidUrl(_) => Self::Connection(err.to_string()),
            TutorError::Json(_) | TutorError::MalformedReply(_) => {
                Self::InvalidReply(err.to_string())
            }
        }
    }
}
