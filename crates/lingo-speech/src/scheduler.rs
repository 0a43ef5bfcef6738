//! Chunked, cancelable speech output.
//!
//! Every `speak` and `stop` mints a new generation token; the playback task
//! re-checks the token before and after every chunk and falls silent as
//! soon as it finds itself stale. The engine is additionally canceled
//! up front so an in-flight chunk stops immediately rather than at its
//! natural end.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use tracing::{debug, warn};

use lingo_core::domain::VoicePersona;
use lingo_core::ports::{SpeechDoneCallback, SpeechOutput};

use crate::chunk::split_speakable;
use crate::engine::SynthesisEngine;
use crate::error::SpeechError;
use crate::voice::VoiceSelection;

/// Speech output scheduler over a platform [`SynthesisEngine`].
///
/// Implements the `SpeechOutput` port. At most one utterance is live at a
/// time; a newer `speak` supersedes the old utterance without firing its
/// completion callback.
pub struct SpeechOutputScheduler {
    engine: Arc<dyn SynthesisEngine>,
    current_token: Arc<AtomicU64>,
    speaking: Arc<AtomicBool>,
}

impl SpeechOutputScheduler {
    #[must_use]
    pub fn new(engine: Arc<dyn SynthesisEngine>) -> Self {
        Self {
            engine,
            current_token: Arc::new(AtomicU64::new(0)),
            speaking: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Invalidate every outstanding utterance and return the fresh token.
    fn mint(&self) -> u64 {
        self.current_token.fetch_add(1, Ordering::SeqCst) + 1
    }
}

impl SpeechOutput for SpeechOutputScheduler {
    fn speak(&self, text: &str, persona: VoicePersona, on_done: Option<SpeechDoneCallback>) {
        let token = self.mint();
        self.engine.cancel();

        let chunks = split_speakable(text);
        if chunks.iter().all(|c| c.trim().is_empty()) {
            self.speaking.store(false, Ordering::SeqCst);
            if let Some(done) = on_done {
                done();
            }
            return;
        }

        self.speaking.store(true, Ordering::SeqCst);
        let voice = VoiceSelection::for_persona(persona);
        let engine = Arc::clone(&self.engine);
        let current = Arc::clone(&self.current_token);
        let speaking = Arc::clone(&self.speaking);

        tokio::spawn(async move {
            for chunk in chunks {
                if current.load(Ordering::SeqCst) != token {
                    debug!(token, "utterance superseded, abandoning remaining chunks");
                    return;
                }
                if chunk.trim().is_empty() {
                    continue;
                }
                match engine.play_chunk(&chunk, &voice).await {
                    Ok(()) => {}
                    Err(SpeechError::Interrupted) => return,
                    Err(err) => {
                        warn!(error = %err, "chunk playback failed, abandoning utterance");
                        break;
                    }
                }
                if current.load(Ordering::SeqCst) != token {
                    return;
                }
            }
            // Still the live utterance: finished (or died to an engine
            // error), either way it is done.
            if current.load(Ordering::SeqCst) == token {
                speaking.store(false, Ordering::SeqCst);
                if let Some(done) = on_done {
                    done();
                }
            }
        });
    }

    fn stop(&self) {
        self.mint();
        self.engine.cancel();
        self.speaking.store(false, Ordering::SeqCst);
    }

    fn is_speaking(&self) -> bool {
        self.speaking.load(Ordering::SeqCst)
    }
}
