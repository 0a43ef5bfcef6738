//! Session state: lesson units, the opaque dialogue context, and the
//! persisted snapshot that makes a session resumable.

use serde::{Deserialize, Serialize};

use super::turn::ChatTurn;

/// Learner proficiency level, as understood by the dialogue endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LearnerLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl LearnerLevel {
    /// String form used when seeding a dialogue context.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
        }
    }
}

impl std::fmt::Display for LearnerLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A lesson unit the learner can practice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    /// Stable unit identifier (also the snapshot key).
    pub id: String,
    /// Display title.
    pub title: String,
    /// Short description, used as the topic of last resort.
    pub description: String,
    /// Conversation topics for this unit, most relevant first.
    pub topics: Vec<String>,
}

impl Unit {
    /// The topic used to seed a fresh dialogue context.
    ///
    /// Falls back to the unit description when no topics are configured.
    #[must_use]
    pub fn topic(&self) -> &str {
        self.topics.first().map_or(&self.description, String::as_str)
    }
}

/// Opaque, appendable log of dialogue exchanges.
///
/// This is the provider-side conversational memory the [`DialogueClient`]
/// needs to continue a dialogue coherently. Everything outside the client
/// treats it as a black box: entries are stored and replayed verbatim, and
/// the only inspection allowed is counting them.
///
/// [`DialogueClient`]: crate::ports::DialogueClient
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContextLog(Vec<serde_json::Value>);

impl ContextLog {
    /// Create an empty log.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Wrap existing entries without interpreting them.
    #[must_use]
    pub fn from_entries(entries: Vec<serde_json::Value>) -> Self {
        Self(entries)
    }

    /// Append one entry verbatim.
    pub fn push(&mut self, entry: serde_json::Value) {
        self.0.push(entry);
    }

    /// Number of raw entries in the log.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.0.len()
    }

    /// Number of completed exchanges the log describes.
    ///
    /// One exchange is a learner-side entry paired with an agent-side entry
    /// (a fresh session's hidden seed prompt pairs with the agent's opening
    /// turn).
    #[must_use]
    pub fn exchange_count(&self) -> usize {
        self.0.len() / 2
    }

    /// Whether the log holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the raw entries for verbatim replay.
    #[must_use]
    pub fn entries(&self) -> &[serde_json::Value] {
        &self.0
    }

    /// Consume the log, yielding its raw entries.
    #[must_use]
    pub fn into_entries(self) -> Vec<serde_json::Value> {
        self.0
    }
}

/// The full persisted state needed to resume a session later.
///
/// One snapshot exists per unit at a time, keyed by `unit_id`. It is
/// overwritten after every committed turn and deleted when a fresh session
/// is explicitly started.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    /// The unit this session belongs to.
    pub unit_id: String,

    /// Opaque dialogue context, replayed verbatim on resume.
    pub dialogue_context: ContextLog,

    /// UI-visible transcript, ordered and append-only.
    pub transcript: Vec<ChatTurn>,

    /// Lesson progress, 0–100.
    pub progress_percent: u8,

    /// Points earned so far in this session.
    pub earned_points: u32,

    /// Lives the learner had when the snapshot was taken.
    pub lives_remaining: u32,
}

impl SessionSnapshot {
    /// Check that the transcript and the dialogue context describe the same
    /// number of completed exchanges.
    ///
    /// The context additionally holds the hidden seed prompt that opened the
    /// session, so a consistent snapshot always satisfies
    /// `context entries == transcript turns + 1`.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.dialogue_context.entry_count() == self.transcript.len() + 1
    }
}
