//! Transcript turn types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which side of the dialogue produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    /// The human learner practicing the language.
    Learner,
    /// The conversational agent.
    Agent,
}

impl Speaker {
    /// Convert to the string representation used on the wire.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Learner => "learner",
            Self::Agent => "agent",
        }
    }
}

impl std::fmt::Display for Speaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One completed utterance within a session transcript.
///
/// Turns are immutable after creation; the transcript is an ordered,
/// append-only sequence of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatTurn {
    /// Unique turn identifier.
    pub id: String,

    /// Who produced the turn.
    pub speaker: Speaker,

    /// Text shown in the transcript view.
    pub display_text: String,

    /// Clean text for speech output, when the turn is speakable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spoken_script: Option<String>,

    /// Grammar/word-choice correction attached to an agent turn.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correction_note: Option<String>,

    /// Pronunciation feedback attached to an agent turn.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pronunciation_note: Option<String>,
}

impl ChatTurn {
    /// Create a learner turn from a raw utterance.
    #[must_use]
    pub fn learner(display_text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            speaker: Speaker::Learner,
            display_text: display_text.into(),
            spoken_script: None,
            correction_note: None,
            pronunciation_note: None,
        }
    }

    /// Create an agent turn, optionally carrying feedback notes.
    #[must_use]
    pub fn agent(
        display_text: impl Into<String>,
        spoken_script: Option<String>,
        correction_note: Option<String>,
        pronunciation_note: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            speaker: Speaker::Agent,
            display_text: display_text.into(),
            spoken_script,
            correction_note,
            pronunciation_note,
        }
    }
}
