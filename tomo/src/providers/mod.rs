//! Model providers.
//!
//! The chatbot depends on two external boundaries: a text-generation
//! service and an embedding service. Both are expressed as traits so the
//! pipeline can run against a local Ollama server in production and
//! against scriptable mocks in tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use tomo::providers::{ChatModel, OllamaClient};
//!
//! let client = OllamaClient::new();
//! let model = client.chat_model("llama3.2:3b");
//! let reply = model.generate("Hello!").await?;
//! ```

pub mod mock;
pub mod ollama;

pub use mock::{MockChatModel, MockEmbeddingModel};
pub use ollama::{OLLAMA_API_BASE_URL, OllamaChatModel, OllamaClient, OllamaEmbeddingModel};

use async_trait::async_trait;

use crate::error::ProviderResult;

/// A text-generation model: one prompt in, generated text out.
///
/// The chatbot sends a single prompt per turn; conversation history is not
/// threaded through the model.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Get the model identifier (e.g., "llama3.2:3b").
    fn model_id(&self) -> &str;

    /// Generate a response for the given prompt.
    ///
    /// # Errors
    ///
    /// Returns an error if the service is unreachable, replies with a
    /// non-success status, or the response cannot be parsed.
    async fn generate(&self, prompt: &str) -> ProviderResult<String>;

    /// Provider name for logs.
    fn provider(&self) -> &'static str;
}

/// An embedding model: text in, fixed-dimension numeric vector out.
#[async_trait]
pub trait EmbeddingModel: Send + Sync {
    /// Get the model identifier (e.g., "nomic-embed-text").
    fn model_id(&self) -> &str;

    /// Embed a single text.
    ///
    /// # Errors
    ///
    /// Returns an error if the service is unreachable, replies with a
    /// non-success status, or returns an empty vector.
    async fn embed(&self, text: &str) -> ProviderResult<Vec<f32>>;

    /// Provider name for logs.
    fn provider(&self) -> &'static str;
}
