//! In-memory vector store.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::store::{Document, ScoredDocument, StoreStats, VectorStore, rank_documents};

/// Ephemeral store backed by a `tokio::sync::RwLock<Vec<Document>>`.
///
/// Documents are kept in insertion order. Contents are lost when the
/// process exits; pass `--ephemeral` to the CLI to pick this backend.
#[derive(Debug, Default)]
pub struct MemoryVectorStore {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    sequence: u64,
    documents: Vec<Document>,
}

impl MemoryVectorStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VectorStore for MemoryVectorStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn next_seq(&self) -> StoreResult<u64> {
        let mut inner = self.inner.write().await;
        inner.sequence += 1;
        Ok(inner.sequence)
    }

    async fn insert(&self, document: Document) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        if inner.documents.iter().any(|doc| doc.id == document.id) {
            return Err(StoreError::DuplicateId(document.id));
        }
        inner.documents.push(document);
        Ok(())
    }

    async fn search(&self, embedding: &[f32], top_k: usize) -> StoreResult<Vec<ScoredDocument>> {
        let inner = self.inner.read().await;
        rank_documents(&inner.documents, embedding, top_k)
    }

    async fn list(&self) -> StoreResult<Vec<Document>> {
        Ok(self.inner.read().await.documents.clone())
    }

    async fn remove(&self, id: &str) -> StoreResult<bool> {
        let mut inner = self.inner.write().await;
        let before = inner.documents.len();
        inner.documents.retain(|doc| doc.id != id);
        Ok(inner.documents.len() < before)
    }

    async fn clear(&self) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        inner.documents.clear();
        inner.sequence = 0;
        Ok(())
    }

    async fn stats(&self) -> StoreResult<StoreStats> {
        let inner = self.inner.read().await;
        Ok(StoreStats {
            document_count: inner.documents.len(),
            backend: self.backend(),
            embedding_dimension: inner
                .documents
                .first()
                .map_or(0, |doc| doc.embedding.len()),
        })
    }
}
