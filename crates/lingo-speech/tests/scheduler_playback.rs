//! Scheduler behavior against fake synthesis engines: chunk ordering,
//! supersede-on-speak, stop, and engine-failure handling.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::{Semaphore, oneshot};

use lingo_core::domain::VoicePersona;
use lingo_core::ports::SpeechOutput;
use lingo_speech::{SpeechError, SpeechOutputScheduler, SynthesisEngine, VoiceSelection};

/// Plays every chunk instantly, recording what it saw.
#[derive(Default)]
struct InstantEngine {
    played: Mutex<Vec<String>>,
    cancels: AtomicUsize,
}

#[async_trait]
impl SynthesisEngine for InstantEngine {
    async fn play_chunk(&self, text: &str, _voice: &VoiceSelection) -> Result<(), SpeechError> {
        self.played.lock().unwrap().push(text.to_owned());
        Ok(())
    }

    fn cancel(&self) {
        self.cancels.fetch_add(1, Ordering::SeqCst);
    }
}

/// Blocks each chunk on a semaphore permit so tests control pacing.
struct StepEngine {
    played: Mutex<Vec<String>>,
    gate: Semaphore,
}

impl StepEngine {
    fn new() -> Self {
        Self {
            played: Mutex::new(Vec::new()),
            gate: Semaphore::new(0),
        }
    }
}

#[async_trait]
impl SynthesisEngine for StepEngine {
    async fn play_chunk(&self, text: &str, _voice: &VoiceSelection) -> Result<(), SpeechError> {
        let permit = self
            .gate
            .acquire()
            .await
            .map_err(|_| SpeechError::Interrupted)?;
        permit.forget();
        self.played.lock().unwrap().push(text.to_owned());
        Ok(())
    }

    fn cancel(&self) {}
}

/// Fails any chunk containing the trigger word.
struct FaultyEngine {
    played: Mutex<Vec<String>>,
    trigger: &'static str,
}

#[async_trait]
impl SynthesisEngine for FaultyEngine {
    async fn play_chunk(&self, text: &str, _voice: &VoiceSelection) -> Result<(), SpeechError> {
        if text.contains(self.trigger) {
            return Err(SpeechError::engine(std::io::Error::other("device lost")));
        }
        self.played.lock().unwrap().push(text.to_owned());
        Ok(())
    }

    fn cancel(&self) {}
}

fn done_flag() -> (Option<lingo_core::ports::SpeechDoneCallback>, oneshot::Receiver<()>) {
    let (tx, rx) = oneshot::channel();
    (Some(Box::new(move || drop(tx.send(())))), rx)
}

async fn settle() {
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test(flavor = "current_thread")]
async fn plays_chunks_in_order_and_fires_done() {
    let engine = Arc::new(InstantEngine::default());
    let scheduler = SpeechOutputScheduler::new(engine.clone());

    let (on_done, done) = done_flag();
    scheduler.speak("One. Two! Three?", VoicePersona::default(), on_done);
    assert!(scheduler.is_speaking());

    done.await.expect("utterance should complete");
    assert_eq!(
        *engine.played.lock().unwrap(),
        vec!["One.", " Two!", " Three?"]
    );
    assert!(!scheduler.is_speaking());
    assert_eq!(engine.cancels.load(Ordering::SeqCst), 1);
}

#[tokio::test(flavor = "current_thread")]
async fn newer_speak_supersedes_older_utterance() {
    let engine = Arc::new(InstantEngine::default());
    let scheduler = SpeechOutputScheduler::new(engine.clone());

    let stale_done = Arc::new(AtomicBool::new(false));
    let flag = stale_done.clone();
    // The first utterance's task is spawned but not yet polled when the
    // second speak mints a fresh token, so it must fall silent entirely.
    scheduler.speak(
        "Old news.",
        VoicePersona::default(),
        Some(Box::new(move || flag.store(true, Ordering::SeqCst))),
    );
    let (on_done, done) = done_flag();
    scheduler.speak("Fresh reply.", VoicePersona::default(), on_done);

    done.await.expect("live utterance should complete");
    settle().await;

    assert_eq!(*engine.played.lock().unwrap(), vec!["Fresh reply."]);
    assert!(!stale_done.load(Ordering::SeqCst));
    assert!(!scheduler.is_speaking());
}

#[tokio::test(flavor = "current_thread")]
async fn stop_halts_at_the_next_chunk_boundary() {
    let engine = Arc::new(StepEngine::new());
    let scheduler = SpeechOutputScheduler::new(engine.clone());

    let finished = Arc::new(AtomicBool::new(false));
    let flag = finished.clone();
    scheduler.speak(
        "One. Two.",
        VoicePersona::default(),
        Some(Box::new(move || flag.store(true, Ordering::SeqCst))),
    );
    // Let the task begin its first chunk, then stop while it is in flight.
    settle().await;
    scheduler.stop();
    assert!(!scheduler.is_speaking());

    engine.gate.add_permits(2);
    settle().await;

    assert_eq!(*engine.played.lock().unwrap(), vec!["One."]);
    assert!(!finished.load(Ordering::SeqCst));
}

#[tokio::test(flavor = "current_thread")]
async fn engine_failure_abandons_rest_but_still_finishes() {
    let engine = Arc::new(FaultyEngine {
        played: Mutex::new(Vec::new()),
        trigger: "crackle",
    });
    let scheduler = SpeechOutputScheduler::new(engine.clone());

    let (on_done, done) = done_flag();
    scheduler.speak("Fine. crackle pop. Never played.", VoicePersona::default(), on_done);

    done.await
        .expect("a genuine engine error still counts as finished");
    assert_eq!(*engine.played.lock().unwrap(), vec!["Fine."]);
    assert!(!scheduler.is_speaking());
}

#[tokio::test(flavor = "current_thread")]
async fn whitespace_only_text_finishes_without_playing() {
    let engine = Arc::new(InstantEngine::default());
    let scheduler = SpeechOutputScheduler::new(engine.clone());

    let (on_done, done) = done_flag();
    scheduler.speak("   ", VoicePersona::default(), on_done);

    done.await.expect("empty utterance resolves immediately");
    assert!(engine.played.lock().unwrap().is_empty());
    assert!(!scheduler.is_speaking());
}

#[tokio::test(flavor = "current_thread")]
async fn stop_with_nothing_playing_is_harmless() {
    let engine = Arc::new(InstantEngine::default());
    let scheduler = SpeechOutputScheduler::new(engine.clone());

    scheduler.stop();
    scheduler.stop();
    assert!(!scheduler.is_speaking());
    assert_eq!(engine.cancels.load(Ordering::SeqCst), 2);
}
