//! The lesson session controller.
//!
//! One controller drives one learner's spoken practice. It owns the
//! turn-taking state machine and coordinates the four ports: dialogue
//! endpoint, snapshot store, voice capture, and speech output.
//!
//! Concurrency model: all mutable session state lives behind one async
//! mutex, and two atomic flags enforce single-flight for replies and
//! capture. The flags are checked before the mutex is taken, so input
//! arriving while a reply is pending is dropped immediately instead of
//! queueing behind the lock.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::{Mutex, mpsc};
use tracing::{debug, warn};

use lingo_core::domain::{
    ChatTurn, LearnerProfile, SessionSnapshot, Speaker, Unit, VoicePersona,
};
use lingo_core::ports::{
    AgentReply, DialogueClient, DialogueError, SessionStore, SpeechInput, SpeechOutput,
};

use crate::error::SessionError;
use crate::events::{SessionEvent, SessionPhase};
use crate::progress::RewardPolicy;

struct SessionState {
    phase: SessionPhase,
    profile: LearnerProfile,
    unit: Option<Unit>,
    /// Snapshot loaded at `begin`, awaiting a resume-or-restart decision.
    pending_resume: Option<SessionSnapshot>,
    transcript: Vec<ChatTurn>,
    progress_percent: u8,
    earned_points: u32,
    lives_remaining: u32,
}

/// Clears a single-flight flag when the guarded operation ends, on every
/// exit path.
struct FlagGuard<'a>(&'a AtomicBool);

impl Drop for FlagGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Turn-taking controller for one practice session at a time.
///
/// All methods take `&self`; the controller is meant to live in an `Arc`
/// shared between UI callbacks.
pub struct LessonSessionController {
    dialogue: Arc<dyn DialogueClient>,
    store: Arc<dyn SessionStore>,
    input: Arc<dyn SpeechInput>,
    output: Arc<dyn SpeechOutput>,
    policy: RewardPolicy,
    events: mpsc::UnboundedSender<SessionEvent>,
    reply_in_flight: AtomicBool,
    listening: AtomicBool,
    state: Mutex<SessionState>,
}

impl LessonSessionController {
    /// Create a controller and the event stream it reports through.
    pub fn new(
        dialogue: Arc<dyn DialogueClient>,
        store: Arc<dyn SessionStore>,
        input: Arc<dyn SpeechInput>,
        output: Arc<dyn SpeechOutput>,
        profile: LearnerProfile,
        policy: RewardPolicy,
    ) -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let lives = profile.hearts;
        let controller = Self {
            dialogue,
            store,
            input,
            output,
            policy,
            events,
            reply_in_flight: AtomicBool::new(false),
            listening: AtomicBool::new(false),
            state: Mutex::new(SessionState {
                phase: SessionPhase::Idle,
                profile,
                unit: None,
                pending_resume: None,
                transcript: Vec::new(),
                progress_percent: 0,
                earned_points: 0,
                lives_remaining: lives,
            }),
        };
        (controller, receiver)
    }

    /// Open a session for a unit.
    ///
    /// If a consistent snapshot exists the session parks in
    /// [`SessionPhase::ResumePrompt`] until [`resume`] or [`restart`] is
    /// called. A missing, corrupt, or inconsistent snapshot falls through
    /// to a fresh session.
    ///
    /// [`resume`]: Self::resume
    /// [`restart`]: Self::restart
    pub async fn begin(&self, unit: Unit) -> Result<(), SessionError> {
        self.set_phase(SessionPhase::Initializing).await;

        match self.store.load(&unit.id).await {
            Ok(Some(snapshot)) if snapshot.is_consistent() => {
                let mut state = self.state.lock().await;
                state.unit = Some(unit);
                state.pending_resume = Some(snapshot);
                state.phase = SessionPhase::ResumePrompt;
                self.emit(SessionEvent::PhaseChanged(SessionPhase::ResumePrompt));
                Ok(())
            }
            Ok(Some(_)) => {
                warn!(unit = %unit.id, "stored snapshot is inconsistent, starting fresh");
                self.start_fresh(unit).await
            }
            Ok(None) => self.start_fresh(unit).await,
            Err(err) => {
                warn!(unit = %unit.id, error = %err, "snapshot unreadable, starting fresh");
                self.start_fresh(unit).await
            }
        }
    }

    /// Resume the session parked at the resume prompt.
    ///
    /// Returns `Ok(false)` when there is nothing to resume. A rehydration
    /// failure falls back to a fresh session rather than stranding the
    /// learner.
    pub async fn resume(&self) -> Result<bool, SessionError> {
        let (snapshot, unit) = {
            let mut state = self.state.lock().await;
            let Some(snapshot) = state.pending_resume.take() else {
                return Ok(false);
            };
            let Some(unit) = state.unit.clone() else {
                return Ok(false);
            };
            (snapshot, unit)
        };

        match self
            .dialogue
            .rehydrate_context(&snapshot.dialogue_context)
            .await
        {
            Ok(()) => {
                let mut state = self.state.lock().await;
                state.transcript = snapshot.transcript.clone();
                state.progress_percent = snapshot.progress_percent;
                state.earned_points = snapshot.earned_points;
                state.lives_remaining = snapshot.lives_remaining;
                state.phase = SessionPhase::Idle;
                self.emit(SessionEvent::TranscriptRestored {
                    turns: snapshot.transcript,
                    progress_percent: snapshot.progress_percent,
                    earned_points: snapshot.earned_points,
                });
                self.emit(SessionEvent::PhaseChanged(SessionPhase::Idle));
                Ok(true)
            }
            Err(err) => {
                warn!(error = %err, "context rehydration failed, starting fresh");
                self.start_fresh(unit).await?;
                Ok(true)
            }
        }
    }

    /// Discard the parked snapshot and start over.
    ///
    /// Returns `Ok(false)` when no resume decision was pending.
    pub async fn restart(&self) -> Result<bool, SessionError> {
        let unit = {
            let mut state = self.state.lock().await;
            if state.pending_resume.take().is_none() {
                return Ok(false);
            }
            let Some(unit) = state.unit.clone() else {
                return Ok(false);
            };
            unit
        };
        self.start_fresh(unit).await?;
        Ok(true)
    }

    /// Commit a learner utterance and await the agent's reply.
    ///
    /// Returns `Ok(false)` when the utterance was dropped: empty text, no
    /// live session, or a reply already in flight. The learner turn is
    /// appended optimistically and survives a failed request so the
    /// transcript matches what the learner actually said.
    pub async fn submit_utterance(&self, text: &str) -> Result<bool, SessionError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(false);
        }
        if self.reply_in_flight.swap(true, Ordering::SeqCst) {
            debug!("utterance dropped, a reply is already in flight");
            return Ok(false);
        }
        let _guard = FlagGuard(&self.reply_in_flight);

        {
            let mut state = self.state.lock().await;
            if state.unit.is_none() || state.pending_resume.is_some() {
                return Ok(false);
            }
            let turn = ChatTurn::learner(trimmed);
            state.transcript.push(turn.clone());
            state.phase = SessionPhase::AwaitingReply;
            self.emit(SessionEvent::TurnAppended(turn));
            self.emit(SessionEvent::PhaseChanged(SessionPhase::AwaitingReply));
        }

        match self.dialogue.send_utterance(trimmed).await {
            Ok(reply) => {
                self.commit_reply(reply).await;
                Ok(true)
            }
            Err(err) => {
                self.set_phase(SessionPhase::Idle).await;
                Err(map_dialogue_err(err))
            }
        }
    }

    /// Capture one spoken utterance and submit it.
    ///
    /// Stops any playing speech first so the learner can barge in. Returns
    /// `Ok(false)` when capture was refused (already listening, reply in
    /// flight, or no live session).
    pub async fn request_listening(&self) -> Result<bool, SessionError> {
        if self.reply_in_flight.load(Ordering::SeqCst) {
            return Ok(false);
        }
        if self.listening.swap(true, Ordering::SeqCst) {
            debug!("capture request dropped, already listening");
            return Ok(false);
        }
        let _guard = FlagGuard(&self.listening);

        {
            let mut state = self.state.lock().await;
            if state.unit.is_none() || state.pending_resume.is_some() {
                return Ok(false);
            }
            self.output.stop();
            state.phase = SessionPhase::Listening;
            self.emit(SessionEvent::PhaseChanged(SessionPhase::Listening));
        }

        match self.input.listen().await {
            Ok(text) => self.submit_utterance(&text).await,
            Err(err) => {
                self.set_phase(SessionPhase::Idle).await;
                Err(err.into())
            }
        }
    }

    /// Replay an agent turn through speech output.
    ///
    /// An explicit replay plays even while muted; the mute flag only
    /// suppresses automatic speech. Returns `false` for unknown ids and
    /// learner turns.
    pub async fn replay_turn(&self, turn_id: &str) -> bool {
        let (text, persona) = {
            let state = self.state.lock().await;
            let Some(turn) = state
                .transcript
                .iter()
                .find(|t| t.id == turn_id && t.speaker == Speaker::Agent)
            else {
                return false;
            };
            let text = turn
                .spoken_script
                .clone()
                .unwrap_or_else(|| turn.display_text.clone());
            (text, state.profile.voice.persona)
        };
        self.schedule_speech(&text, persona);
        true
    }

    /// Mute or unmute automatic speech. Muting also silences anything
    /// currently playing.
    pub async fn set_muted(&self, muted: bool) {
        let mut state = self.state.lock().await;
        state.profile.voice.muted = muted;
        if muted {
            self.output.stop();
        }
    }

    /// Switch the voice persona, confirming the change out loud.
    pub async fn set_persona(&self, persona: VoicePersona) {
        let muted = {
            let mut state = self.state.lock().await;
            state.profile.voice.persona = persona;
            state.profile.voice.muted
        };
        if !muted {
            let line = format!(
                "Okay, I will use this {} voice from now on.",
                persona.gender.as_str()
            );
            self.schedule_speech(&line, persona);
        }
    }

    /// Persist the current session, surfacing failures.
    ///
    /// Normal persistence happens automatically after every committed
    /// exchange and is best-effort; this is the explicit variant for
    /// "save before leaving" flows.
    pub async fn save_now(&self) -> Result<(), SessionError> {
        let state = self.state.lock().await;
        self.persist(&state).await
    }

    /// The current phase, with playback folded in: an idle session whose
    /// output is still playing reports [`SessionPhase::Speaking`].
    pub async fn phase(&self) -> SessionPhase {
        let state = self.state.lock().await;
        if state.phase == SessionPhase::Idle && self.output.is_speaking() {
            SessionPhase::Speaking
        } else {
            state.phase
        }
    }

    /// Snapshot of the transcript for rendering.
    pub async fn transcript(&self) -> Vec<ChatTurn> {
        self.state.lock().await.transcript.clone()
    }

    /// Current `(progress_percent, earned_points)`.
    pub async fn progress(&self) -> (u8, u32) {
        let state = self.state.lock().await;
        (state.progress_percent, state.earned_points)
    }

    async fn start_fresh(&self, unit: Unit) -> Result<(), SessionError> {
        // Restart and rehydration-fallback enter here directly, so the
        // loading state is raised on every fresh-start path.
        self.set_phase(SessionPhase::Initializing).await;

        if let Err(err) = self.store.clear(&unit.id).await {
            warn!(unit = %unit.id, error = %err, "failed to clear stale snapshot");
        }

        let level = self.state.lock().await.profile.level;
        let reply = self
            .dialogue
            .create_context(level, unit.topic())
            .await
            .map_err(map_dialogue_err)?;

        let mut state = self.state.lock().await;
        state.unit = Some(unit);
        state.pending_resume = None;
        state.transcript.clear();
        state.progress_percent = 0;
        state.earned_points = 0;
        state.lives_remaining = state.profile.hearts;

        // The opening turn leads with the first question; the greeting is
        // already part of the spoken script.
        let turn = ChatTurn::agent(
            reply.next_question.clone(),
            Some(reply.voice_script.clone()),
            None,
            None,
        );
        state.transcript.push(turn.clone());
        state.phase = SessionPhase::Idle;
        self.emit(SessionEvent::TurnAppended(turn));
        self.emit(SessionEvent::PhaseChanged(SessionPhase::Idle));

        self.persist_best_effort(&state).await;
        let muted = state.profile.voice.muted;
        let persona = state.profile.voice.persona;
        drop(state);

        if !muted {
            self.schedule_speech(&reply.voice_script, persona);
        }
        Ok(())
    }

    async fn commit_reply(&self, reply: AgentReply) {
        let mut state = self.state.lock().await;
        let display = format!("{} {}", reply.reply, reply.next_question);
        let turn = ChatTurn::agent(
            display,
            Some(reply.voice_script.clone()),
            non_empty(reply.correction),
            non_empty(reply.pronunciation_analysis),
        );
        state.transcript.push(turn.clone());

        let (progress, points) = self
            .policy
            .advance(state.progress_percent, state.earned_points);
        state.progress_percent = progress;
        state.earned_points = points;
        state.phase = SessionPhase::Idle;

        self.emit(SessionEvent::TurnAppended(turn));
        self.emit(SessionEvent::ProgressChanged {
            progress_percent: progress,
            earned_points: points,
        });
        self.emit(SessionEvent::PhaseChanged(SessionPhase::Idle));

        self.persist_best_effort(&state).await;
        let muted = state.profile.voice.muted;
        let persona = state.profile.voice.persona;
        drop(state);

        if !muted {
            self.schedule_speech(&reply.voice_script, persona);
        }
    }

    async fn persist(&self, state: &SessionState) -> Result<(), SessionError> {
        let Some(unit) = state.unit.as_ref() else {
            return Ok(());
        };
        let context = self
            .dialogue
            .export_context()
            .await
            .map_err(|e| SessionError::PersistenceFailure(e.to_string()))?;

        let snapshot = SessionSnapshot {
            unit_id: unit.id.clone(),
            dialogue_context: context,
            transcript: state.transcript.clone(),
            progress_percent: state.progress_percent,
            earned_points: state.earned_points,
            lives_remaining: state.lives_remaining,
        };
        debug_assert!(
            snapshot.is_consistent(),
            "transcript and dialogue context out of step"
        );

        self.store
            .save(&unit.id, &snapshot)
            .await
            .map_err(|e| SessionError::PersistenceFailure(e.to_string()))?;
        self.emit(SessionEvent::SnapshotSaved {
            unit_id: unit.id.clone(),
        });
        Ok(())
    }

    async fn persist_best_effort(&self, state: &SessionState) {
        if let Err(err) = self.persist(state).await {
            warn!(error = %err, "snapshot persistence failed");
        }
    }

    fn schedule_speech(&self, text: &str, persona: VoicePersona) {
        let events = self.events.clone();
        self.emit(SessionEvent::PhaseChanged(SessionPhase::Speaking));
        self.output.speak(
            text,
            persona,
            Some(Box::new(move || {
                let _ = events.send(SessionEvent::SpeakingFinished);
                let _ = events.send(SessionEvent::PhaseChanged(SessionPhase::Idle));
            })),
        );
    }

    async fn set_phase(&self, phase: SessionPhase) {
        let mut state = self.state.lock().await;
        if state.phase != phase {
            debug!(from = ?state.phase, to = ?phase, "phase transition");
            state.phase = phase;
            self.emit(SessionEvent::PhaseChanged(phase));
        }
    }

    fn emit(&self, event: SessionEvent) {
        if self.events.send(event).is_err() {
            debug!("event receiver dropped");
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn map_dialogue_err(err: DialogueError) -> SessionError {
    match err {
        DialogueError::Rehydration(msg) => SessionError::RehydrationFailure(msg),
        other => SessionError::ConnectionFailure(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_notes_are_dropped() {
        assert_eq!(non_empty(Some("  ".to_string())), None);
        assert_eq!(non_empty(Some(String::new())), None);
        assert_eq!(
            non_empty(Some("Say 'I am', not 'I is'.".to_string())),
            Some("Say 'I am', not 'I is'.".to_string())
        );
        assert_eq!(non_empty(None), None);
    }
}
