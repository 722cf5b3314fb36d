//! Tomo - a minimal RAG and function-calling chatbot over local Ollama models.
//!
//! This crate wires three small pipelines behind one interactive chatbot:
//!
//! - **Providers** ([`providers`]) - chat and embedding calls against a
//!   local Ollama server, plus scriptable mocks
//! - **Store** ([`store`]) - embedded documents with top-k cosine search,
//!   in memory or persisted to a JSON file
//! - **RAG** ([`rag`]) - embed a query, retrieve context, compose a prompt,
//!   generate
//! - **Tools** ([`tools`], [`router`]) - a clock and a strict arithmetic
//!   calculator behind deterministic intent matching
//! - **Chat** ([`chat`]) - the per-turn fallback chain tying it together
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tomo::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = OllamaClient::new();
//!     let config = ChatbotConfig::default().with_rag(true);
//!
//!     let chat_model: Arc<dyn ChatModel> = Arc::new(client.chat_model(&config.model));
//!     let embedder: Arc<dyn EmbeddingModel> =
//!         Arc::new(client.embedding_model(&config.embedding_model));
//!     let store: Arc<dyn VectorStore> = Arc::new(MemoryVectorStore::new());
//!
//!     let rag = RagPipeline::new(embedder, store, chat_model.clone());
//!     let mut bot = Chatbot::new(config, chat_model, rag);
//!
//!     let turn = bot.respond("What time is it?").await;
//!     println!("{}", turn.bot);
//!     Ok(())
//! }
//! ```

pub mod chat;
pub mod config;
pub mod error;
pub mod providers;
pub mod rag;
pub mod router;
pub mod store;
pub mod tools;

/// Prelude module for convenient imports.
pub mod prelude {
    // Error types (centralized)
    pub use crate::error::{
        EvalError, EvalResult, ProviderError, ProviderResult, RagError, RagResult, Result,
        RouterError, RouterResult, StoreError, StoreResult, TomoError,
    };

    // Chat
    pub use crate::chat::{ChatMode, ChatTurn, Chatbot};

    // Config
    pub use crate::config::{
        ChatbotConfig, DEFAULT_EMBEDDING_MODEL, DEFAULT_MODEL, DEFAULT_TOP_K,
    };

    // Providers
    pub use crate::providers::{
        ChatModel, EmbeddingModel, MockChatModel, MockEmbeddingModel, OLLAMA_API_BASE_URL,
        OllamaChatModel, OllamaClient, OllamaEmbeddingModel,
    };

    // RAG
    pub use crate::rag::{DocumentSummary, RagPipeline};

    // Router and tools
    pub use crate::router::ToolRouter;
    pub use crate::tools::calculator::evaluate;
    pub use crate::tools::{ToolInvocation, ToolKind, current_time};

    // Store
    pub use crate::store::{
        Document, FileVectorStore, MemoryVectorStore, ScoredDocument, StoreStats, VectorStore,
        cosine_similarity,
    };
}
