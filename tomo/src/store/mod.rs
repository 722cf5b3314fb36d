//! Vector document storage.
//!
//! A [`VectorStore`] holds embedded documents and answers top-k queries by
//! cosine similarity. Two backends are provided: [`MemoryVectorStore`] for
//! ephemeral sessions and [`FileVectorStore`], which persists documents as
//! a single JSON file across restarts.

mod file;
mod memory;

pub use file::FileVectorStore;
pub use memory::MemoryVectorStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

// ============================================================================
// Types
// ============================================================================

/// A stored document with its embedding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Store-unique identifier, e.g. `doc_3` or `file_notes_7`.
    pub id: String,
    /// Full document text.
    pub text: String,
    /// Where the text came from (a file path), if anywhere.
    pub source: Option<String>,
    /// Embedding vector computed at insert time.
    pub embedding: Vec<f32>,
}

impl Document {
    /// Create a document without a source.
    #[must_use]
    pub fn new(id: impl Into<String>, text: impl Into<String>, embedding: Vec<f32>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            source: None,
            embedding,
        }
    }

    /// Set the document source.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// A document paired with its similarity score for one query.
#[derive(Debug, Clone)]
pub struct ScoredDocument {
    /// The matched document.
    pub document: Document,
    /// Cosine similarity against the query, in `[-1, 1]`.
    pub score: f32,
}

/// Point-in-time counters reported by the `stats` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreStats {
    /// Number of stored documents.
    pub document_count: usize,
    /// Backend label (`"memory"` or `"file"`).
    pub backend: &'static str,
    /// Dimension of the stored embeddings, 0 when the store is empty.
    pub embedding_dimension: usize,
}

// ============================================================================
// Trait
// ============================================================================

/// Storage backend for embedded documents with similarity search.
///
/// Ids are caller-assigned, but the store owns the sequence counter used to
/// build them, so ids stay unique even after deletes. The counter resets
/// only on [`clear`](VectorStore::clear).
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Backend label for display.
    fn backend(&self) -> &'static str;

    /// Reserve and return the next id sequence number (1-based).
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot persist the counter.
    async fn next_seq(&self) -> StoreResult<u64>;

    /// Insert a document.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::DuplicateId` when the id is already present.
    async fn insert(&self, document: Document) -> StoreResult<()>;

    /// The `top_k` most similar documents, ranked by descending cosine
    /// similarity. Equal scores keep insertion order. An empty store
    /// returns an empty list.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::DimensionMismatch` when the query vector's
    /// dimension differs from the stored embeddings.
    async fn search(&self, embedding: &[f32], top_k: usize) -> StoreResult<Vec<ScoredDocument>>;

    /// All stored documents in insertion order.
    async fn list(&self) -> StoreResult<Vec<Document>>;

    /// Remove a document by id. Returns whether it was present.
    async fn remove(&self, id: &str) -> StoreResult<bool>;

    /// Remove all documents and reset the id sequence.
    async fn clear(&self) -> StoreResult<()>;

    /// Current counters.
    async fn stats(&self) -> StoreResult<StoreStats>;
}

// ============================================================================
// Similarity
// ============================================================================

/// Compute cosine similarity between two vectors.
///
/// Returns 0.0 if either vector has zero magnitude.
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Score every document against `query` and keep the best `top_k`.
///
/// `Vec::sort_by` is stable, so equal scores keep insertion order.
pub(crate) fn rank_documents(
    documents: &[Document],
    query: &[f32],
    top_k: usize,
) -> StoreResult<Vec<ScoredDocument>> {
    if let Some(first) = documents.first()
        && first.embedding.len() != query.len()
    {
        return Err(StoreError::DimensionMismatch {
            query: query.len(),
            store: first.embedding.len(),
        });
    }

    let mut scored: Vec<ScoredDocument> = documents
        .iter()
        .map(|document| ScoredDocument {
            document: document.clone(),
            score: cosine_similarity(&document.embedding, query),
        })
        .collect();

    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    scored.truncate(top_k);
    Ok(scored)
}
