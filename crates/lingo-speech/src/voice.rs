//! Persona to voice-parameter mapping.

use lingo_core::domain::{AgeClass, VoiceGender, VoicePersona};

/// Locale requested from the synthesis engine for all tutor speech.
pub const SPEECH_LOCALE: &str = "en-US";

/// Speaking rate for tutor speech. Slightly below natural pace so learners
/// can follow along.
pub const LEARNER_PACE_RATE: f32 = 0.9;

/// Concrete voice parameters handed to the synthesis engine.
///
/// Personas are approximated through pitch: the engine picks whatever voice
/// it has for the locale, and we shift pitch to suggest gender and age.
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceSelection {
    pub language: String,
    pub pitch: f32,
    pub rate: f32,
}

impl VoiceSelection {
    /// Map a persona to voice parameters.
    #[must_use]
    pub fn for_persona(persona: VoicePersona) -> Self {
        let base = match persona.gender {
            VoiceGender::Female => 1.1,
            VoiceGender::Male => 0.85,
        };
        let pitch = match persona.age {
            AgeClass::Child => base + 0.25,
            AgeClass::Adult => base,
            AgeClass::Elderly => base - 0.15,
        };
        Self {
            language: SPEECH_LOCALE.to_owned(),
            pitch,
            rate: LEARNER_PACE_RATE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_voices_are_pitched_up() {
        let adult = VoiceSelection::for_persona(VoicePersona {
            gender: VoiceGender::Female,
            age: AgeClass::Adult,
        });
        let child = VoiceSelection::for_persona(VoicePersona {
            gender: VoiceGender::Female,
            age: AgeClass::Child,
        });
        assert!(child.pitch > adult.pitch);
    }

    #[test]
    fn male_voices_sit_below_female() {
        let female = VoiceSelection::for_persona(VoicePersona::default());
        let male = VoiceSelection::for_persona(VoicePersona {
            gender: VoiceGender::Male,
            age: AgeClass::Adult,
        });
        assert!(male.pitch < female.pitch);
        assert_eq!(male.rate, LEARNER_PACE_RATE);
    }
}
