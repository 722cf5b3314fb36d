//! File-backed vector store.
//!
//! Persists every document plus the id sequence in one pretty-printed
//! `documents.json` under the data directory. The file is loaded once at
//! open and rewritten in full on each mutation, which is plenty for a
//! single-process chatbot.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::store::{Document, ScoredDocument, StoreStats, VectorStore, rank_documents};

const STORE_FILE: &str = "documents.json";

/// On-disk shape of the store.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
    sequence: u64,
    documents: Vec<Document>,
}

/// Store persisted as a single JSON file under a data directory.
#[derive(Debug)]
pub struct FileVectorStore {
    path: PathBuf,
    inner: RwLock<Snapshot>,
}

impl FileVectorStore {
    /// Open the store under `data_dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Fails when the directory cannot be created or an existing
    /// `documents.json` cannot be read or parsed.
    pub async fn open(data_dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let dir = data_dir.into();
        tokio::fs::create_dir_all(&dir).await?;

        let path = dir.join(STORE_FILE);
        let snapshot = if path.exists() {
            let content = tokio::fs::read_to_string(&path).await?;
            let snapshot: Snapshot = serde_json::from_str(&content)?;
            debug!(
                documents = snapshot.documents.len(),
                path = %path.display(),
                "loaded document store"
            );
            snapshot
        } else {
            Snapshot::default()
        };

        Ok(Self {
            path,
            inner: RwLock::new(snapshot),
        })
    }

    async fn persist(&self, snapshot: &Snapshot) -> StoreResult<()> {
        let content = serde_json::to_string_pretty(snapshot)?;
        tokio::fs::write(&self.path, content).await?;
        Ok(())
    }
}

#[async_trait]
impl VectorStore for FileVectorStore {
    fn backend(&self) -> &'static str {
        "file"
    }

    async fn next_seq(&self) -> StoreResult<u64> {
        let mut inner = self.inner.write().await;
        inner.sequence += 1;
        self.persist(&inner).await?;
        Ok(inner.sequence)
    }

    async fn insert(&self, document: Document) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        if inner.documents.iter().any(|doc| doc.id == document.id) {
            return Err(StoreError::DuplicateId(document.id));
        }
        inner.documents.push(document);
        self.persist(&inner).await?;
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
        let removed = inner.documents.len() < before;
        if removed {
            self.persist(&inner).await?;
            debug!(id = %id, "deleted document");
        }
        Ok(removed)
    }

    async fn clear(&self) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        inner.documents.clear();
        inner.sequence = 0;
        self.persist(&inner).await?;
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

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use assert_fs::TempDir;

    #[tokio::test]
    async fn test_round_trip_across_reopen() {
        let dir = TempDir::new().unwrap();

        {
            let store = FileVectorStore::open(dir.path()).await.unwrap();
            let seq = store.next_seq().await.unwrap();
            store
                .insert(
                    Document::new(format!("doc_{seq}"), "persisted text", vec![0.5, 0.5])
                        .with_source("notes.txt"),
                )
                .await
                .unwrap();
        }

        let store = FileVectorStore::open(dir.path()).await.unwrap();
        let documents = store.list().await.unwrap();
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].id, "doc_1");
        assert_eq!(documents[0].text, "persisted text");
        assert_eq!(documents[0].source.as_deref(), Some("notes.txt"));
        assert_eq!(documents[0].embedding, vec![0.5, 0.5]);
    }

    #[tokio::test]
    async fn test_sequence_survives_reopen_after_delete() {
        let dir = TempDir::new().unwrap();

        {
            let store = FileVectorStore::open(dir.path()).await.unwrap();
            let seq = store.next_seq().await.unwrap();
            store
                .insert(Document::new(format!("doc_{seq}"), "first", vec![1.0]))
                .await
                .unwrap();
            assert!(store.remove("doc_1").await.unwrap());
        }

        let store = FileVectorStore::open(dir.path()).await.unwrap();
        assert_eq!(store.next_seq().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_clear_persists_reset() {
        let dir = TempDir::new().unwrap();

        {
            let store = FileVectorStore::open(dir.path()).await.unwrap();
            let seq = store.next_seq().await.unwrap();
            store
                .insert(Document::new(format!("doc_{seq}"), "first", vec![1.0]))
                .await
                .unwrap();
            store.clear().await.unwrap();
        }

        let store = FileVectorStore::open(dir.path()).await.unwrap();
        assert!(store.list().await.unwrap().is_empty());
        assert_eq!(store.next_seq().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_open_fresh_directory() {
        let dir = TempDir::new().unwrap();
        let store = FileVectorStore::open(dir.path().join("nested").join("db"))
            .await
            .unwrap();
        let stats = store.stats().await.unwrap();
        assert_eq!(stats.document_count, 0);
        assert_eq!(stats.backend, "file");
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(STORE_FILE), "not json").unwrap();

        let err = FileVectorStore::open(dir.path()).await.unwrap_err();
        assert!(matches!(err, StoreError::Json(_)));
    }
}
