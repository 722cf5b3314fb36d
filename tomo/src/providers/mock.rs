//! Scriptable in-process models.
//!
//! Used by the test suite to exercise the pipeline and the fallback chain
//! without a running Ollama server. The chat mock records every prompt it
//! sees, so tests can assert on prompt composition.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::{ProviderError, ProviderResult};
use crate::providers::{ChatModel, EmbeddingModel};

/// Chat model that answers every prompt with a canned reply.
#[derive(Debug, Clone)]
pub struct MockChatModel {
    reply: String,
    fail: bool,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockChatModel {
    /// Create a mock that answers every prompt with `reply`.
    #[must_use]
    pub fn with_reply(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            fail: false,
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock whose `generate` always fails with a connection error.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            reply: String::new(),
            fail: true,
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Prompts seen so far, in order.
    pub async fn prompts(&self) -> Vec<String> {
        self.prompts.lock().await.clone()
    }
}

#[async_trait]
impl ChatModel for MockChatModel {
    fn model_id(&self) -> &str {
        "mock-chat"
    }

    fn provider(&self) -> &'static str {
        "mock"
    }

    async fn generate(&self, prompt: &str) -> ProviderResult<String> {
        if self.fail {
            return Err(ProviderError::Connection(
                "mock chat model is set to fail".into(),
            ));
        }
        self.prompts.lock().await.push(prompt.to_string());
        Ok(self.reply.clone())
    }
}

/// Embedding model that maps exact texts to preset vectors.
///
/// Texts without a preset embed to the zero vector, which scores 0.0
/// against everything under cosine similarity.
#[derive(Debug, Clone)]
pub struct MockEmbeddingModel {
    dimension: usize,
    vectors: HashMap<String, Vec<f32>>,
    fail: bool,
}

impl MockEmbeddingModel {
    /// Create a mock producing vectors of the given dimension.
    #[must_use]
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            vectors: HashMap::new(),
            fail: false,
        }
    }

    /// Preset the vector returned for an exact text.
    #[must_use]
    pub fn with_vector(mut self, text: impl Into<String>, vector: Vec<f32>) -> Self {
        self.vectors.insert(text.into(), vector);
        self
    }

    /// Create a mock whose `embed` always fails with a connection error.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            dimension: 0,
            vectors: HashMap::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl EmbeddingModel for MockEmbeddingModel {
    fn model_id(&self) -> &str {
        "mock-embedding"
    }

    fn provider(&self) -> &'static str {
        "mock"
    }

    async fn embed(&self, text: &str) -> ProviderResult<Vec<f32>> {
        if self.fail {
            return Err(ProviderError::Connection(
                "mock embedding model is set to fail".into(),
            ));
        }
        Ok(self
            .vectors
            .get(text)
            .cloned()
            .unwrap_or_else(|| vec![0.0; self.dimension]))
    }
}
