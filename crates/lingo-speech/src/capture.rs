//! One-shot voice capture over a callback-style recognition engine.
//!
//! Platform recognition engines report through callbacks (partial results,
//! errors, an end-of-capture signal) in whatever order the platform fires
//! them. [`SpeechInputCapture`] adapts that into the async `SpeechInput`
//! port with a first-terminal-outcome-wins latch: the first transcript or
//! error resolves the call, everything after it is ignored.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use tokio::sync::oneshot;
use tracing::debug;

use lingo_core::ports::{CaptureError, SpeechInput};

type TerminalLatch = Mutex<Option<oneshot::Sender<Result<String, CaptureError>>>>;

/// Handle given to the recognition engine for reporting capture outcomes.
///
/// Cheap to clone; all clones share one latch, and only the first terminal
/// report wins. Dropping every clone without reporting resolves the capture
/// as failed.
#[derive(Clone)]
pub struct RecognitionHandler {
    latch: Arc<TerminalLatch>,
}

impl RecognitionHandler {
    fn new(tx: oneshot::Sender<Result<String, CaptureError>>) -> Self {
        Self {
            latch: Arc::new(Mutex::new(Some(tx))),
        }
    }

    fn resolve(&self, outcome: Result<String, CaptureError>) {
        let mut slot = self
            .latch
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(tx) = slot.take() {
            let _ = tx.send(outcome);
        }
    }

    /// Report the final transcript.
    pub fn transcript(&self, text: impl Into<String>) {
        self.resolve(Ok(text.into()));
    }

    /// Report a recognition error.
    pub fn error(&self, err: CaptureError) {
        self.resolve(Err(err));
    }

    /// Report end of capture. If no transcript or error arrived first, the
    /// capture ended in silence.
    pub fn ended(&self) {
        self.resolve(Err(CaptureError::NoSpeech));
    }
}

/// Platform recognition engine: starts one capture attempt and reports
/// through the handler.
///
/// `start` fails immediately (typically with [`CaptureError::Unsupported`])
/// when capture cannot begin at all; once it returns `Ok`, the engine owns
/// the handler and must eventually report a terminal outcome or drop it.
pub trait RecognitionEngine: Send + Sync {
    fn start(&self, handler: RecognitionHandler) -> Result<(), CaptureError>;
}

/// One-shot capture adapter implementing the `SpeechInput` port.
pub struct SpeechInputCapture {
    engine: Arc<dyn RecognitionEngine>,
}

impl SpeechInputCapture {
    #[must_use]
    pub fn new(engine: Arc<dyn RecognitionEngine>) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl SpeechInput for SpeechInputCapture {
    async fn listen(&self) -> Result<String, CaptureError> {
        let (tx, rx) = oneshot::channel();
        self.engine.start(RecognitionHandler::new(tx))?;
        debug!("capture started, awaiting terminal outcome");
        match rx.await {
            Ok(outcome) => outcome,
            // Every handler clone dropped without a report.
            Err(_) => Err(CaptureError::Failed(
                "recognition engine went away without a result".to_owned(),
            )),
        }
    }
}
