//! Port definitions: the trait contracts adapter crates implement.
//!
//! # Design Rules
//!
//! - Signatures carry domain types only; adapter types (HTTP clients, audio
//!   engines, file handles) never appear here.
//! - Each port owns its error enum; adapters map internal errors to it at
//!   the boundary.

pub mod dialogue;
pub mod session_store;
pub mod speech;

pub use dialogue::{AgentReply, DialogueClient, DialogueError};
pub use session_store::{SessionStore, SessionStoreError};
pub use speech::{CaptureError, SpeechDoneCallback, SpeechInput, SpeechOutput};
