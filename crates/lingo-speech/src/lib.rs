#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

#[cfg(test)]
use tokio_test as _;

pub mod capture;
pub mod chunk;
pub mod engine;
pub mod error;
pub mod scheduler;
pub mod voice;

// Re-export key types for convenience
pub use capture::{RecognitionEngine, RecognitionHandler, SpeechInputCapture};
pub use engine::SynthesisEngine;
pub use error::SpeechError;
pub use scheduler::SpeechOutputScheduler;
pub use voice::VoiceSelection;
