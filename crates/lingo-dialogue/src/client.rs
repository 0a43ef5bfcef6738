//! The tutor dialogue client implementing the `DialogueClient` port.

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::debug;
use url::Url;

use lingo_core::domain::{ContextLog, LearnerLevel};
use lingo_core::ports::{AgentReply, DialogueClient, DialogueError};

use crate::config::TutorClientConfig;
use crate::error::{TutorError, TutorResult};
use crate::http::{HttpBackend, ReqwestBackend};
use crate::protocol::{DialogueRequest, context_entry, parse_reply, seed_prompt, utterance_prompt};

/// Stateful dialogue client over a pluggable HTTP backend.
///
/// Owns the context log for the active session: each request sends the full
/// log, and committed turns append a `user` and a `model` entry. Agent
/// replies are stored serialized so a rehydrated context carries the exact
/// structured turns the endpoint produced.
pub struct TutorDialogueClient<B: HttpBackend> {
    backend: B,
    endpoint: Url,
    model: String,
    system_instruction: String,
    context: Mutex<Option<Vec<Value>>>,
}

/// The production client: [`TutorDialogueClient`] over [`ReqwestBackend`].
pub type DefaultTutorClient = TutorDialogueClient<ReqwestBackend>;

impl DefaultTutorClient {
    /// Create a client backed by a real HTTP client.
    pub fn new(config: &TutorClientConfig) -> TutorResult<Self> {
        Self::with_backend(ReqwestBackend::new(config), config)
    }
}

impl<B: HttpBackend> TutorDialogueClient<B> {
    /// Create a client over an arbitrary backend.
    pub fn with_backend(backend: B, config: &TutorClientConfig) -> TutorResult<Self> {
        Ok(Self {
            backend,
            endpoint: Url::parse(&config.endpoint)?,
            model: config.model.clone(),
            system_instruction: config.system_instruction.clone(),
            context: Mutex::new(None),
        })
    }

    async fn request_reply(&self, entries: &[Value]) -> TutorResult<AgentReply> {
        let request = DialogueRequest {
            model: &self.model,
            system: &self.system_instruction,
            messages: entries,
        };
        let body = serde_json::to_value(&request)?;
        debug!(entries = entries.len(), "requesting tutor reply");
        let raw = self.backend.post_json(&self.endpoint, &body).await?;
        parse_reply(raw)
    }
}

fn serialize_reply(reply: &AgentReply) -> Result<String, DialogueError> {
    serde_json::to_string(reply).map_err(|e| DialogueError::InvalidReply(e.to_string()))
}

#[async_trait]
impl<B: HttpBackend> DialogueClient for TutorDialogueClient<B> {
    async fn create_context(
        &self,
        level: LearnerLevel,
        topic: &str,
    ) -> Result<AgentReply, DialogueError> {
        let mut entries = vec![context_entry("user", &seed_prompt(level, topic))];
        let reply = self.request_reply(&entries).await.map_err(DialogueError::from)?;
        entries.push(context_entry("model", &serialize_reply(&reply)?));

        *self.context.lock().await = Some(entries);
        Ok(reply)
    }

    async fn rehydrate_context(&self, log: &ContextLog) -> Result<(), DialogueError> {
        for (i, entry) in log.entries().iter().enumerate() {
            let role_ok = entry
                .as_object()
                .and_then(|obj| obj.get("role"))
                .is_some_and(Value::is_string);
            if !role_ok {
                return Err(DialogueError::Rehydration(format!(
                    "entry {i} is not a role-tagged context entry"
                )));
            }
        }

        *self.context.lock().await = Some(log.entries().to_vec());
        debug!(entries = log.entry_count(), "context rehydrated");
        Ok(())
    }

    async fn send_utterance(&self, text: &str) -> Result<AgentReply, DialogueError> {
        let mut guard = self.context.lock().await;
        let entries = guard.as_mut().ok_or(DialogueError::NoActiveContext)?;

        // The user entry stays in the log even when the request fails; it
        // mirrors the learner turn the caller already committed.
        entries.push(context_entry("user", &utterance_prompt(text)));
        let reply = self.request_reply(entries).await.map_err(DialogueError::from)?;
        entries.push(context_entry("model", &serialize_reply(&reply)?));
        Ok(reply)
    }

    async fn export_context(&self) -> Result<ContextLog, DialogueError> {
        let guard = self.context.lock().await;
        let entries = guard.as_ref().ok_or(DialogueError::NoActiveContext)?;
        Ok(ContextLog::from_entries(entries.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex as StdMutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Backend that pops scripted responses and records request bodies.
    #[derive(Default)]
    struct ScriptedBackend {
        replies: StdMutex<VecDeque<TutorResult<Value>>>,
        calls: AtomicUsize,
        last_body: StdMutex<Option<Value>>,
    }

    impl ScriptedBackend {
        fn push_reply(&self, reply: &str, question: &str) {
            self.replies.lock().unwrap().push_back(Ok(json!({
                "reply": reply,
                "voice_script": reply,
                "next_question": question,
            })));
        }

        fn push_failure(&self) {
            self.replies
                .lock()
                .unwrap()
                .push_back(Err(TutorError::RequestFailed {
                    status: 502,
                    url: "http://127.0.0.1:8787/v1/dialogue".to_string(),
                }));
        }
    }

    #[async_trait]
    impl HttpBackend for &ScriptedBackend {
        async fn post_json(&self, _url: &Url, body: &Value) -> TutorResult<Value> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_body.lock().unwrap() = Some(body.clone());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .expect("test sent more requests than scripted")
        }
    }

    fn client(backend: &ScriptedBackend) -> TutorDialogueClient<&ScriptedBackend> {
        TutorDialogueClient::with_backend(backend, &TutorClientConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn create_context_installs_seed_and_opening_reply() {
        let backend = ScriptedBackend::default();
        backend.push_reply("Hi!", "What's your favorite food?");
        let client = client(&backend);

        let reply = client
            .create_context(LearnerLevel::Beginner, "Food")
            .await
            .unwrap();
        assert_eq!(reply.next_question, "What's your favorite food?");

        let log = client.export_context().await.unwrap();
        assert_eq!(log.entry_count(), 2);
        assert_eq!(log.entries()[0]["role"], "user");
        assert_eq!(log.entries()[1]["role"], "model");
    }

    #[tokio::test]
    async fn send_before_create_is_rejected() {
        let backend = ScriptedBackend::default();
        let client = client(&backend);

        let err = client.send_utterance("hello").await.unwrap_err();
        assert!(matches!(err, DialogueError::NoActiveContext));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn send_appends_both_entries_and_replays_full_log() {
        let backend = ScriptedBackend::default();
        backend.push_reply("Hi!", "What's your favorite food?");
        backend.push_reply("Pho is great!", "Do you cook it yourself?");
        let client = client(&backend);

        client
            .create_context(LearnerLevel::Intermediate, "Food")
            .await
            .unwrap();
        let reply = client.send_utterance("I like pho").await.unwrap();
        assert_eq!(reply.reply, "Pho is great!");

        let log = client.export_context().await.unwrap();
        assert_eq!(log.entry_count(), 4);
        assert_eq!(log.exchange_count(), 2);

        // The second request carried the seed, the opening reply, and the
        // wrapped learner utterance.
        let body = backend.last_body.lock().unwrap().clone().unwrap();
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 3);
        assert!(
            messages[2]["parts"][0]["text"]
                .as_str()
                .unwrap()
                .contains("I like pho")
        );
    }

    #[tokio::test]
    async fn failed_send_keeps_the_user_entry() {
        let backend = ScriptedBackend::default();
        backend.push_reply("Hi!", "What's up?");
        backend.push_failure();
        let client = client(&backend);

        client
            .create_context(LearnerLevel::Beginner, "Weather")
            .await
            .unwrap();
        let err = client.send_utterance("it rains").await.unwrap_err();
        assert!(matches!(err, DialogueError::Connection(_)));

        let log = client.export_context().await.unwrap();
        assert_eq!(log.entry_count(), 3);
    }

    #[tokio::test]
    async fn rehydrate_installs_log_without_a_request() {
        let backend = ScriptedBackend::default();
        backend.push_reply("Welcome back!", "Where were we?");
        let client = client(&backend);

        let log = ContextLog::from_entries(vec![
            json!({ "role": "user", "parts": [{ "text": "seed" }] }),
            json!({ "role": "model", "parts": [{ "text": "{\"reply\":\"hi\"}" }] }),
        ]);
        client.rehydrate_context(&log).await.unwrap();
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);

        let exported = client.export_context().await.unwrap();
        assert_eq!(exported, log);
    }

    #[tokio::test]
    async fn rehydrate_rejects_entries_without_a_role() {
        let backend = ScriptedBackend::default();
        let client = client(&backend);

        let log = ContextLog::from_entries(vec![json!("just a string")]);
        let err = client.rehydrate_context(&log).await.unwrap_err();
        assert!(matches!(err, DialogueError::Rehydration(_)));

        // A bad log must not clobber the (absent) context either way.
        assert!(matches!(
            client.export_context().await.unwrap_err(),
            DialogueError::NoActiveContext
        ));
    }

    #[tokio::test]
    async fn export_before_create_is_rejected() {
        let backend = ScriptedBackend::default();
        let client = client(&backend);
        assert!(matches!(
            client.export_context().await.unwrap_err(),
            DialogueError::NoActiveContext
        ));
    }
}
