//! Hosted model endpoint over HTTPS.

use super::{ModelProvider, ProviderError};
use async_trait::async_trait;
use keyring::Entry;
use serde_json::{json, Value};
use std::env;
use std::time::Duration;
use tracing::debug;
use url::Url;
use uuid::Uuid;

/// Default REST base for the hosted generative-content endpoint.
const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model when none is configured.
const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Keyring service name under which the API key may be stored.
const KEYRING_SERVICE: &str = "compass-ai";

/// Provider implementation speaking a Gemini-style `generateContent`
/// REST shape.
///
/// One call performs one upstream attempt: POST the prompt, read the
/// first candidate's text parts. Non-success statuses become
/// [`ProviderError::Status`] with the body preserved for classification.
pub struct HostedModelProvider {
    client: reqwest::Client,
    base_url: Url,
    model: String,
    api_key: Option<String>,
}

impl std::fmt::Debug for HostedModelProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostedModelProvider")
            .field("base_url", &self.base_url.as_str())
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl HostedModelProvider {
    /// Build a provider for `model` against the default endpoint.
    ///
    /// The API key is resolved keyring-first, then from the environment.
    pub fn new(model: impl Into<String>) -> Result<Self, ProviderError> {
        Self::with_base_url(model, DEFAULT_API_BASE)
    }

    /// Build a provider for the default model against the default endpoint.
    pub fn new_default() -> Result<Self, ProviderError> {
        Self::new(DEFAULT_MODEL)
    }

    /// Build a provider against a custom endpoint (primarily for tests
    /// and self-hosted gateways).
    pub fn with_base_url(
        model: impl Into<String>,
        base_url: impl AsRef<str>,
    ) -> Result<Self, ProviderError> {
        let base = base_url.as_ref();
        let parsed = Url::parse(base).map_err(|e| ProviderError::InvalidBaseUrl {
            url: base.to_string(),
            reason: e.to_string(),
        })?;

        let timeout_secs = env::var("COMPASS_AI_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(30);

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: parsed,
            model: model.into(),
            api_key: Self::resolve_api_key(),
        })
    }

    /// Override the resolved API key (tests, multi-tenant hosts).
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    fn resolve_api_key() -> Option<String> {
        // 1. Keyring
        if let Ok(entry) = Entry::new(KEYRING_SERVICE, "api-key") {
            if let Ok(key) = entry.get_password() {
                return Some(key);
            }
        }
        // 2. Environment
        env::var("COMPASS_AI_API_KEY")
            .or_else(|_| env::var("GEMINI_API_KEY"))
            .or_else(|_| env::var("GOOGLE_API_KEY"))
            .ok()
    }

    fn endpoint(&self, key: &str) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url.as_str().trim_end_matches('/'),
            self.model,
            key
        )
    }

    /// Concatenate the text parts of the first candidate.
    fn extract_text(body: &Value) -> Option<String> {
        let parts = body["candidates"][0]["content"]["parts"].as_array()?;
        let text: String = parts
            .iter()
            .filter_map(|p| p["text"].as_str())
            .collect::<Vec<_>>()
            .join("");
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[async_trait]
impl ModelProvider for HostedModelProvider {
    async fn call_model(&self, prompt: &str) -> Result<String, ProviderError> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ProviderError::MissingApiKey {
                provider: self.name().to_string(),
            })?;

        let request_id = Uuid::new_v4().to_string();
        let body = json!({
            "contents": [{
                "parts": [{ "text": prompt }]
            }]
        });

        debug!(
            model = self.model.as_str(),
            request_id = request_id.as_str(),
            "dispatching model request"
        );

        let resp = self
            .client
            .post(self.endpoint(key))
            .header("x-compass-request-id", &request_id)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: Value = resp.json().await?;
        Self::extract_text(&parsed).ok_or(ProviderError::EmptyResponse)
    }

    fn name(&self) -> &'static str {
        "hosted-model"
    }
}
