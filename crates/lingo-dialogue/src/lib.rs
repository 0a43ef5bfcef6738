#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

#[cfg(test)]
use tokio_test as _;

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod protocol;

// Re-export key types for convenience
pub use client::{DefaultTutorClient, TutorDialogueClient};
pub use config::TutorClientConfig;
pub use error::{TutorError, TutorResult};
pub use http::{HttpBackend, ReqwestBackend};
