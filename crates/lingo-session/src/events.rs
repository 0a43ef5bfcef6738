//! Session phases and the event stream a UI subscribes to.

use lingo_core::domain::ChatTurn;

/// Where the session currently is in its turn-taking cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Nothing in flight; the learner may speak, type, or replay.
    Idle,
    /// A session is being created or loaded for a unit.
    Initializing,
    /// A resumable snapshot exists; waiting for resume-or-restart.
    ResumePrompt,
    /// Voice capture is active.
    Listening,
    /// A learner utterance is at the endpoint; further input is dropped.
    AwaitingReply,
    /// The agent's reply is playing. Advisory only: speech output is
    /// interruptible at any time, so this never blocks input.
    Speaking,
}

/// State changes streamed to the host UI.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    PhaseChanged(SessionPhase),
    /// A turn was committed to the transcript (learner turns appear
    /// optimistically, before the agent's reply arrives).
    TurnAppended(ChatTurn),
    /// A saved session was resumed; replaces the whole transcript view.
    TranscriptRestored {
        turns: Vec<ChatTurn>,
        progress_percent: u8,
        earned_points: u32,
    },
    ProgressChanged {
        progress_percent: u8,
        earned_points: u32,
    },
    /// The current utterance finished playing (superseded utterances do
    /// not report this).
    SpeakingFinished,
    SnapshotSaved {
        unit_id: String,
    },
}
