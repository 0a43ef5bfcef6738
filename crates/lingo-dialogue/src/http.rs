//! HTTP backend abstraction for the dialogue endpoint.
//!
//! This module provides a trait-based HTTP backend that allows for
//! dependency injection and easy testing. The production implementation
//! uses reqwest.

use async_trait::async_trait;
use serde_json::Value;
use url::Url;

use crate::config::TutorClientConfig;
use crate::error::{TutorError, TutorResult};

/// Trait for HTTP backends that can POST JSON and return JSON.
///
/// This is an implementation detail - external code should use the
/// `DialogueClient` port.
#[async_trait]
pub trait HttpBackend: Send + Sync {
    /// POST a JSON body to a URL and return the JSON response.
    async fn post_json(&self, url: &Url, body: &Value) -> TutorResult<Value>;
}

/// Production HTTP backend using reqwest.
pub struct ReqwestBackend {
    client: reqwest::Client,
    api_key: Option<String>,
}

impl ReqwestBackend {
    /// Create a new reqwest backend with the given configuration.
    pub fn new(config: &TutorClientConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .expect("failed to create HTTP client");

        Self {
            client,
            api_key: config.api_key.clone(),
        }
    }
}

#[async_trait]
impl HttpBackend for ReqwestBackend {
    async fn post_json(&self, url: &Url, body: &Value) -> TutorResult<Value> {
        let mut request = self.client.post(url.as_str()).json(body);
        if let Some(ref key) = self.api_key {
            request = request.header("Authorization", format!("Bearer {key}"));
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TutorError::RequestFailed {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.json().await?)
    }
}
