#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod ports;

// Re-export commonly used types for convenience
pub use domain::{
    AgeClass, ChatTurn, ContextLog, LearnerLevel, LearnerProfile, SessionSnapshot, Speaker, Unit,
    VoiceGender, VoicePersona, VoiceProfile,
};
pub use ports::{
    AgentReply, CaptureError, DialogueClient, DialogueError, SessionStore, SessionStoreError,
    SpeechDoneCallback, SpeechInput, SpeechOutput,
};
