#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

#[cfg(test)]
use tempfile as _;
#[cfg(test)]
use tokio_test as _;

pub mod controller;
pub mod error;
pub mod events;
pub mod progress;
pub mod store;

// Re-export key types for convenience
pub use controller::LessonSessionController;
pub use error::SessionError;
pub use events::{SessionEvent, SessionPhase};
pub use progress::RewardPolicy;
pub use store::{FileSessionStore, MemorySessionStore};
