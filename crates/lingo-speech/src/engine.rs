//! The synthesis engine seam.

use async_trait::async_trait;

use crate::error::SpeechError;
use crate::voice::VoiceSelection;

/// Platform synthesis engine: plays one chunk of text as audio.
///
/// `play_chunk` resolves when the chunk has finished playing, or with
/// [`SpeechError::Interrupted`] when a `cancel` cut it off mid-play.
/// `cancel` must be safe to call at any time, including when nothing is
/// playing.
#[async_trait]
pub trait SynthesisEngine: Send + Sync {
    async fn play_chunk(&self, text: &str, voice: &VoiceSelection) -> Result<(), SpeechError>;

    fn cancel(&self);
}
