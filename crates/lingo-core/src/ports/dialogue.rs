//! Dialogue client port - the stateful conversational endpoint contract.
//!
//! The client owns the running [`ContextLog`] while a session is live; the
//! session controller only ever stores and replays the exported log, never
//! interprets it. This keeps the underlying model provider substitutable.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{ContextLog, LearnerLevel};

/// One structured reply from the dialogue endpoint.
///
/// Wire-shape DTO: field names match the endpoint's JSON schema
/// (`reply`, `voice_script`, `next_question` required; `correction` and
/// `pronunciation_analysis` optional).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentReply {
    /// The agent's natural-language reply.
    pub reply: String,

    /// Clean text for speech output.
    pub voice_script: String,

    /// The question that keeps the conversation going.
    pub next_question: String,

    /// Correction of a learner mistake, when one was detected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correction: Option<String>,

    /// Feedback on likely pronunciation errors, when detected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pronunciation_analysis: Option<String>,
}

/// Errors returned by [`DialogueClient`] operations.
#[derive(Debug, Error)]
pub enum DialogueError {
    /// An operation that needs a live context was called before
    /// `create_context` or `rehydrate_context`.
    #[error("no active dialogue context - create or rehydrate one first")]
    NoActiveContext,

    /// The endpoint could not be reached, timed out, or refused the request.
    #[error("dialogue endpoint request failed: {0}")]
    Connection(String),

    /// The endpoint answered, but not with a usable structured reply.
    #[error("dialogue endpoint returned an unusable reply: {0}")]
    InvalidReply(String),

    /// A stored context log could not be restored into a live context.
    #[error("stored dialogue context could not be restored: {0}")]
    Rehydration(String),
}

/// Port for the stateful conversational endpoint.
///
/// Implementations are network-bound; callers await them from a single
/// logical thread of control, so no concurrent calls need to be supported.
#[async_trait]
pub trait DialogueClient: Send + Sync {
    /// Establish a fresh context seeded with the learner's proficiency and a
    /// topic, returning the agent's opening turn.
    async fn create_context(
        &self,
        level: LearnerLevel,
        topic: &str,
    ) -> Result<AgentReply, DialogueError>;

    /// Reconstruct a live context from a previously exported log.
    ///
    /// Must not produce a new turn.
    async fn rehydrate_context(&self, log: &ContextLog) -> Result<(), DialogueError>;

    /// Send the learner's raw utterance and await the agent's structured
    /// reply. Fails with [`DialogueError::NoActiveContext`] before
    /// create/rehydrate.
    async fn send_utterance(&self, text: &str) -> Result<AgentReply, DialogueError>;

    /// Export the opaque context log for persistence.
    ///
    /// Must only be called while a context exists.
    async fn export_context(&self) -> Result<ContextLog, DialogueError>;
}
