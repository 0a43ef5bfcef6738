//! Speech output error types.

use thiserror::Error;

/// Errors surfaced by a [`crate::SynthesisEngine`] while playing a chunk.
#[derive(Debug, Error)]
pub enum SpeechError {
    /// Playback was cut off by a cancel. Expected during normal operation
    /// whenever an utterance is superseded; never reported upward.
    #[error("chunk playback was interrupted")]
    Interrupted,

    /// The engine genuinely failed to synthesize or play the chunk.
    #[error("synthesis engine failure")]
    Engine {
        #[source]
        source: anyhow::Error,
    },
}

impl SpeechError {
    /// Wrap an arbitrary engine failure.
    pub fn engine(source: impl Into<anyhow::Error>) -> Self {
        Self::Engine {
            source: source.into(),
        }
    }
}
