//! Ollama provider implementation.
//!
//! Talks to a local Ollama server over HTTP: `/api/chat` for generation,
//! `/api/embeddings` for embeddings, `/api/tags` for the health check.

mod chat;
mod client;
mod embedding;

pub use chat::OllamaChatModel;
pub use client::{OLLAMA_API_BASE_URL, OllamaClient, OllamaClientBuilder};
pub use embedding::OllamaEmbeddingModel;
