//! Wire protocol for the dialogue endpoint: request shape, context entry
//! construction, and reply parsing.

use serde::Serialize;
use serde_json::{Value, json};

use lingo_core::domain::LearnerLevel;
use lingo_core::ports::AgentReply;

use crate::error::{TutorError, TutorResult};

/// Request body sent to the dialogue endpoint.
#[derive(Debug, Serialize)]
pub struct DialogueRequest<'a> {
    pub model: &'a str,
    pub system: &'a str,
    pub messages: &'a [Value],
}

/// Build one context log entry.
///
/// Entries keep the endpoint's native shape so an exported log can be
/// replayed verbatim: a `role` plus a list of text parts.
#[must_use]
pub fn context_entry(role: &str, text: &str) -> Value {
    json!({ "role": role, "parts": [{ "text": text }] })
}

/// The hidden seed prompt that opens a fresh context.
#[must_use]
pub fn seed_prompt(level: LearnerLevel, topic: &str) -> String {
    format!(
        "START CONVERSATION.\nUser Level: {level}\nTopic: {topic}\n\n\
         Action: Start with a VERY SHORT, natural greeting (max 1 sentence). \
         Then immediately ask the first question about the topic."
    )
}

/// Wrap a raw learner utterance for the endpoint.
#[must_use]
pub fn utterance_prompt(text: &str) -> String {
    format!("User said: \"{text}\"")
}

/// Parse the endpoint's response into a structured reply.
///
/// Accepts either the reply object directly or a JSON string containing it,
/// optionally wrapped in markdown code fences (some model gateways return
/// the raw model text).
pub fn parse_reply(value: Value) -> TutorResult<AgentReply> {
    let value = match value {
        Value::String(raw) => serde_json::from_str(strip_code_fences(&raw))?,
        other => other,
    };
    serde_json::from_value(value).map_err(|e| TutorError::MalformedReply(e.to_string()))
}

fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .map_or(trimmed, str::trim)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply_value() -> Value {
        json!({
            "reply": "That sounds tasty!",
            "voice_script": "That sounds tasty!",
            "next_question": "What did you drink with it?"
        })
    }

    #[test]
    fn parses_a_direct_reply_object() {
        let reply = parse_reply(reply_value()).unwrap();
        assert_eq!(reply.reply, "That sounds tasty!");
        assert!(reply.correction.is_none());
    }

    #[test]
    fn parses_a_fenced_string_payload() {
        let raw = format!("```json\n{}\n```", reply_value());
        let reply = parse_reply(Value::String(raw)).unwrap();
        assert_eq!(reply.next_question, "What did you drink with it?");
    }

    #[test]
    fn rejects_a_reply_missing_required_fields() {
        let err = parse_reply(json!({ "reply": "hi" })).unwrap_err();
        assert!(matches!(err, TutorError::MalformedReply(_)));
    }

    #[test]
    fn seed_prompt_carries_level_and_topic() {
        let prompt = seed_prompt(LearnerLevel::Beginner, "Ordering food");
        assert!(prompt.contains("Beginner"));
        assert!(prompt.contains("Ordering food"));
        assert!(prompt.starts_with("START CONVERSATION."));
    }

    #[test]
    fn context_entries_keep_the_endpoint_shape() {
        let entry = context_entry("user", "hello");
        assert_eq!(entry["role"], "user");
        assert_eq!(entry["parts"][0]["text"], "hello");
    }
}
