//! Ollama chat generation over `POST /api/chat`.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, instrument};

use super::client::OllamaClient;
use crate::error::{ProviderError, ProviderResult};
use crate::providers::ChatModel;

/// Ollama text-generation model.
///
/// Sends a single-message, non-streaming chat request and returns the
/// assistant text verbatim.
#[derive(Clone)]
pub struct OllamaChatModel {
    client: OllamaClient,
    model_id: String,
    temperature: Option<f32>,
}

impl std::fmt::Debug for OllamaChatModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OllamaChatModel")
            .field("model_id", &self.model_id)
            .field("temperature", &self.temperature)
            .finish_non_exhaustive()
    }
}

impl OllamaChatModel {
    /// Create a new chat model.
    pub(crate) fn new(client: OllamaClient, model_id: impl Into<String>) -> Self {
        Self {
            client,
            model_id: model_id.into(),
            temperature: None,
        }
    }

    /// Set the sampling temperature.
    #[must_use]
    pub const fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Build the request body for the API.
    fn build_request_body(&self, prompt: &str) -> Value {
        let mut body = serde_json::json!({
            "model": self.model_id,
            "messages": [{ "role": "user", "content": prompt }],
            "stream": false
        });

        if let Some(temperature) = self.temperature {
            body["options"] = serde_json::json!({ "temperature": temperature });
        }

        body
    }

    /// Pull the assistant text out of the API response.
    fn parse_response(json: &Value) -> ProviderResult<String> {
        json["message"]["content"]
            .as_str()
            .map(String::from)
            .ok_or_else(|| ProviderError::invalid_response("missing message.content"))
    }
}

#[async_trait]
impl ChatModel for OllamaChatModel {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn provider(&self) -> &'static str {
        "ollama"
    }

    #[instrument(skip(self, prompt), fields(model = %self.model_id))]
    async fn generate(&self, prompt: &str) -> ProviderResult<String> {
        let body = self.build_request_body(prompt);
        let url = format!("{}/api/chat", self.client.base_url());

        debug!(prompt_len = prompt.len(), "sending chat request");

        let response = self
            .client
            .http_client()
            .post(&url)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(ProviderError::api(status, error_text));
        }

        let json: Value = response.json().await?;
        Self::parse_response(&json)
    }
}
