//! Domain types for the dialogue engine.
//!
//! These types represent transcripts, sessions, and learner configuration in
//! the domain model, independent of any infrastructure concerns.

pub mod profile;
pub mod session;
pub mod turn;

pub use profile::{AgeClass, LearnerProfile, VoiceGender, VoicePersona, VoiceProfile};
pub use session::{ContextLog, LearnerLevel, SessionSnapshot, Unit};
pub use turn::{ChatTurn, Speaker};
