//! Learner and voice configuration.
//!
//! Pure configuration types with no lifecycle: the voice persona picks the
//! synthesized voice character, the learner profile seeds a fresh session.

use serde::{Deserialize, Serialize};

use super::session::LearnerLevel;

/// Gender class of the synthesized voice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoiceGender {
    Male,
    #[default]
    Female,
}

impl VoiceGender {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }
}

/// Age class of the synthesized voice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgeClass {
    Child,
    #[default]
    Adult,
    Elderly,
}

/// Selected voice persona: gender plus age class.
///
/// This only influences voice selection in the speech output layer; it is
/// not correctness-critical and may be approximated by whatever synthesis
/// voice the platform offers for the session locale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoicePersona {
    pub gender: VoiceGender,
    pub age: AgeClass,
}

/// Voice configuration for a learner: persona plus mute flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceProfile {
    pub persona: VoicePersona,
    pub muted: bool,
}

/// The learner as the session engine sees them.
///
/// Gamification bookkeeping (XP, streaks, gems) lives in the host
/// application; the engine only needs proficiency, starting lives, and the
/// voice configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearnerProfile {
    pub name: String,
    pub level: LearnerLevel,
    /// Lives a fresh session starts with.
    pub hearts: u32,
    pub voice: VoiceProfile,
}

impl LearnerProfile {
    /// A profile with sensible defaults for the given name.
    #[must_use]
    pub fn new(name: impl Into<String>, level: LearnerLevel) -> Self {
        Self {
            name: name.into(),
            level,
            hearts: 5,
            voice: VoiceProfile::default(),
        }
    }
}
