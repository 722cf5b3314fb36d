//! Ollama embeddings over `POST /api/embeddings`.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::client::OllamaClient;
use crate::error::{ProviderError, ProviderResult};
use crate::providers::EmbeddingModel;

/// Response body of the embeddings endpoint.
#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f32>,
}

/// Ollama embedding model.
#[derive(Clone)]
pub struct OllamaEmbeddingModel {
    client: OllamaClient,
    model_id: String,
}

impl std::fmt::Debug for OllamaEmbeddingModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OllamaEmbeddingModel")
            .field("model_id", &self.model_id)
            .finish_non_exhaustive()
    }
}

impl OllamaEmbeddingModel {
    /// Create a new embedding model.
    pub(crate) fn new(client: OllamaClient, model_id: impl Into<String>) -> Self {
        Self {
            client,
            model_id: model_id.into(),
        }
    }
}

#[async_trait]
impl EmbeddingModel for OllamaEmbeddingModel {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn provider(&self) -> &'static str {
        "ollama"
    }

    #[instrument(skip(self, text), fields(model = %self.model_id))]
    async fn embed(&self, text: &str) -> ProviderResult<Vec<f32>> {
        let body = serde_json::json!({
            "model": self.model_id,
            "prompt": text
        });
        let url = format!("{}/api/embeddings", self.client.base_url());

        debug!(text_len = text.len(), "sending embedding request");

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

        let parsed: EmbeddingResponse = response.json().await?;
        if parsed.embedding.is_empty() {
            return Err(ProviderError::invalid_response("empty embedding"));
        }

        Ok(parsed.embedding)
    }
}
