//! Tutor client configuration.

use std::time::Duration;

/// System instruction sent with every request.
///
/// The endpoint forwards this to the model verbatim; the JSON contract here
/// must stay in sync with the `AgentReply` wire shape.
pub const DEFAULT_SYSTEM_INSTRUCTION: &str = "\
You are 'Miss Lingo', a friendly and patient English tutor for Vietnamese learners. \
Keep replies SHORT (1-2 sentences), warm, and matched to the learner's level. \
Always respond with a single JSON object with these fields: \
\"reply\" (your conversational answer), \
\"voice_script\" (clean spoken text, no markdown or emoji), \
\"next_question\" (one question that keeps the conversation going), \
and optionally \"correction\" and \"pronunciation_analysis\" when the learner's \
last utterance contained a grammar or pronunciation mistake. \
Never output anything outside the JSON object.";

/// Configuration for [`crate::TutorDialogueClient`].
#[derive(Debug, Clone)]
pub struct TutorClientConfig {
    /// Dialogue endpoint URL.
    pub endpoint: String,
    /// Bearer token for the endpoint, if it requires one.
    pub api_key: Option<String>,
    /// Model identifier forwarded to the endpoint.
    pub model: String,
    /// System instruction establishing the tutor persona and reply schema.
    pub system_instruction: String,
    /// Per-request timeout. Elapsing counts as a connection failure.
    pub request_timeout: Duration,
}

impl Default for TutorClientConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8787/v1/dialogue".to_string(),
            api_key: None,
            model: "gemini-2.5-flash".to_string(),
            system_instruction: DEFAULT_SYSTEM_INSTRUCTION.to_string(),
            request_timeout: Duration::from_secs(30),
        }
    }
}
