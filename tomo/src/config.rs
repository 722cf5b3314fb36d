//! Chatbot configuration.
//!
//! All options are fixed at construction time; nothing is runtime-reloadable.

/// Default generation model.
pub const DEFAULT_MODEL: &str = "llama3.2:3b";

/// Default embedding model.
pub const DEFAULT_EMBEDDING_MODEL: &str = "nomic-embed-text";

/// Default number of documents retrieved per query.
pub const DEFAULT_TOP_K: usize = 3;

/// Configuration for the chatbot.
///
/// # Example
///
/// ```rust,ignore
/// use tomo::config::ChatbotConfig;
///
/// let config = ChatbotConfig::new("llama3.2:3b")
///     .with_rag(true)
///     .with_top_k(5);
/// ```
#[derive(Debug, Clone)]
pub struct ChatbotConfig {
    /// Generation model id (e.g., "llama3.2:3b").
    pub model: String,
    /// Embedding model id (e.g., "nomic-embed-text").
    pub embedding_model: String,
    /// Whether the RAG pipeline handles queries.
    pub use_rag: bool,
    /// Whether the function-call router handles queries.
    pub use_tools: bool,
    /// Number of documents retrieved per query.
    pub top_k: usize,
}

impl Default for ChatbotConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            use_rag: false,
            use_tools: true,
            top_k: DEFAULT_TOP_K,
        }
    }
}

impl ChatbotConfig {
    /// Create a configuration for the given generation model.
    #[must_use]
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Self::default()
        }
    }

    /// Set the embedding model id.
    #[must_use]
    pub fn with_embedding_model(mut self, model: impl Into<String>) -> Self {
        self.embedding_model = model.into();
        self
    }

    /// Enable or disable the RAG pipeline.
    #[must_use]
    pub const fn with_rag(mut self, enabled: bool) -> Self {
        self.use_rag = enabled;
        self
    }

    /// Enable or disable function calling.
    #[must_use]
    pub const fn with_tools(mut self, enabled: bool) -> Self {
        self.use_tools = enabled;
        self
    }

    /// Set the retrieval depth.
    #[must_use]
    pub const fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }
}
