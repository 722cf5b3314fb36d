//! Ollama API client.
//!
//! Provides a client for a locally running Ollama server and acts as the
//! factory for its chat and embedding models.

use std::sync::Arc;

use super::chat::OllamaChatModel;
use super::embedding::OllamaEmbeddingModel;
use crate::error::ProviderResult;

/// Default Ollama API base URL (local server).
pub const OLLAMA_API_BASE_URL: &str = "http://localhost:11434";

/// Ollama API client.
///
/// Ollama runs locally and doesn't require an API key. One client is
/// created at startup and shared by the chat and embedding models.
///
/// # Example
///
/// ```rust,ignore
/// use tomo::providers::OllamaClient;
///
/// let client = OllamaClient::new();
/// let chat = client.chat_model("llama3.2:3b");
/// let embed = client.embedding_model("nomic-embed-text");
/// ```
#[derive(Clone)]
pub struct OllamaClient {
    http_client: reqwest::Client,
    base_url: Arc<str>,
}

impl std::fmt::Debug for OllamaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OllamaClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl Default for OllamaClient {
    fn default() -> Self {
        Self::new()
    }
}

impl OllamaClient {
    /// Create a new client for `http://localhost:11434`.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a new client builder.
    #[must_use]
    pub fn builder() -> OllamaClientBuilder {
        OllamaClientBuilder::default()
    }

    /// Create a chat model with the specified model id.
    #[must_use]
    pub fn chat_model(&self, model_id: impl Into<String>) -> OllamaChatModel {
        OllamaChatModel::new(self.clone(), model_id)
    }

    /// Create an embedding model with the specified model id.
    #[must_use]
    pub fn embedding_model(&self, model_id: impl Into<String>) -> OllamaEmbeddingModel {
        OllamaEmbeddingModel::new(self.clone(), model_id)
    }

    /// Check if the Ollama server is running and accessible.
    ///
    /// # Errors
    ///
    /// Returns an error if the server is not reachable.
    pub async fn health_check(&self) -> ProviderResult<bool> {
        let response = self
            .http_client
            .get(format!("{}/api/tags", self.base_url))
            .send()
            .await?;

        Ok(response.status().is_success())
    }

    /// List the models available on the server.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list_models(&self) -> ProviderResult<Vec<String>> {
        let response = self
            .http_client
            .get(format!("{}/api/tags", self.base_url))
            .send()
            .await?
            .json::<serde_json::Value>()
            .await?;

        let models = response["models"]
            .as_array()
            .map(|arr| {
                arr.iter()
                    .filter_map(|m| m["name"].as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default();

        Ok(models)
    }

    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) const fn http_client(&self) -> &reqwest::Client {
        &self.http_client
    }
}

/// Builder for [`OllamaClient`].
#[derive(Debug, Default)]
pub struct OllamaClientBuilder {
    base_url: Option<String>,
    timeout_secs: Option<u64>,
}

impl OllamaClientBuilder {
    /// Set a custom base URL, e.g. for a remote Ollama server.
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the request timeout in seconds.
    ///
    /// Default is no timeout; local inference can be slow.
    #[must_use]
    pub const fn timeout_secs(mut self, timeout: u64) -> Self {
        self.timeout_secs = Some(timeout);
        self
    }

    /// Build the client.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client fails to build.
    #[must_use]
    pub fn build(self) -> OllamaClient {
        let base_url = self
            .base_url
            .unwrap_or_else(|| OLLAMA_API_BASE_URL.to_string());

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout_secs {
            builder = builder.timeout(std::time::Duration::from_secs(timeout));
        }
        let http_client = builder.build().expect("Failed to build HTTP client");

        OllamaClient {
            http_client,
            base_url: base_url.into(),
        }
    }
}
