//! Retrieval augmented generation.
//!
//! [`RagPipeline`] owns the three seams of the retrieval flow: an
//! [`EmbeddingModel`] to vectorize text, a [`VectorStore`] to hold and rank
//! documents, and a [`ChatModel`] to answer over the retrieved context. It
//! also carries the document management operations behind the REPL's
//! `add_doc` / `list_docs` / `delete_doc` family of commands.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::config::DEFAULT_TOP_K;
use crate::error::{RagError, RagResult};
use crate::providers::{ChatModel, EmbeddingModel};
use crate::store::{Document, ScoredDocument, StoreStats, VectorStore};

/// Characters of document text shown by `list_docs`.
const PREVIEW_CHARS: usize = 200;

/// One row of [`RagPipeline::list_documents`] output.
#[derive(Debug, Clone)]
pub struct DocumentSummary {
    /// Document id.
    pub id: String,
    /// Where the text came from, if anywhere.
    pub source: Option<String>,
    /// Truncated document text.
    pub preview: String,
}

impl From<Document> for DocumentSummary {
    fn from(document: Document) -> Self {
        Self {
            id: document.id,
            source: document.source,
            preview: preview(&document.text),
        }
    }
}

/// Embed the query, retrieve top-k context, compose a prompt, generate.
///
/// Every step awaits sequentially; a failure at any step surfaces as a
/// [`RagError`] and leaves falling back to the caller.
pub struct RagPipeline {
    embedder: Arc<dyn EmbeddingModel>,
    store: Arc<dyn VectorStore>,
    generator: Arc<dyn ChatModel>,
    top_k: usize,
}

impl std::fmt::Debug for RagPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RagPipeline")
            .field("embedding_model", &self.embedder.model_id())
            .field("chat_model", &self.generator.model_id())
            .field("backend", &self.store.backend())
            .field("top_k", &self.top_k)
            .finish_non_exhaustive()
    }
}

impl RagPipeline {
    /// Create a pipeline over the given models and store.
    pub fn new(
        embedder: Arc<dyn EmbeddingModel>,
        store: Arc<dyn VectorStore>,
        generator: Arc<dyn ChatModel>,
    ) -> Self {
        Self {
            embedder,
            store,
            generator,
            top_k: DEFAULT_TOP_K,
        }
    }

    /// Set how many documents a query retrieves.
    #[must_use]
    pub const fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Answer a query over the stored documents.
    ///
    /// With an empty store (or no surviving matches) the raw query is sent
    /// to the model as-is.
    ///
    /// # Errors
    ///
    /// Returns [`RagError`] when embedding, retrieval, or generation fails.
    #[instrument(skip(self, query))]
    pub async fn answer(&self, query: &str) -> RagResult<String> {
        let retrieved = self.retrieve(query).await?;
        let prompt = compose_prompt(query, &retrieved);
        self.generator
            .generate(&prompt)
            .await
            .map_err(RagError::Generation)
    }

    /// Top-k documents ranked by cosine similarity against the query.
    ///
    /// # Errors
    ///
    /// Returns [`RagError`] when embedding or the store lookup fails.
    pub async fn retrieve(&self, query: &str) -> RagResult<Vec<ScoredDocument>> {
        let embedding = self.embed(query).await?;
        let results = self.store.search(&embedding, self.top_k).await?;
        debug!(results = results.len(), top_k = self.top_k, "retrieved documents");
        Ok(results)
    }

    /// Embed and store a document; returns its assigned id (`doc_{n}`).
    ///
    /// # Errors
    ///
    /// Returns [`RagError::EmptyDocument`] for empty or whitespace-only
    /// text, and [`RagError`] when embedding or the insert fails.
    pub async fn add_document(&self, text: &str, source: Option<&str>) -> RagResult<String> {
        if text.trim().is_empty() {
            return Err(RagError::EmptyDocument);
        }

        let embedding = self.embed(text).await?;
        let seq = self.store.next_seq().await?;
        let id = format!("doc_{seq}");

        let mut document = Document::new(id.clone(), text, embedding);
        if let Some(source) = source {
            document = document.with_source(source);
        }
        self.store.insert(document).await?;
        debug!(id = %id, "added document");
        Ok(id)
    }

    /// Read a file and store its contents; returns the assigned id
    /// (`file_{stem}_{n}`). Non-UTF-8 bytes are replaced rather than
    /// rejected.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::File`] when the file cannot be read,
    /// [`RagError::EmptyDocument`] when it holds no text, and [`RagError`]
    /// when embedding or the insert fails.
    pub async fn add_document_from_file(&self, path: impl AsRef<Path>) -> RagResult<String> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let text = String::from_utf8_lossy(&bytes).into_owned();
        if text.trim().is_empty() {
            return Err(RagError::EmptyDocument);
        }

        let embedding = self.embed(&text).await?;
        let seq = self.store.next_seq().await?;
        let stem = path.file_stem().map_or_else(
            || "file".to_string(),
            |stem| stem.to_string_lossy().into_owned(),
        );
        let id = format!("file_{stem}_{seq}");

        let document =
            Document::new(id.clone(), text, embedding).with_source(path.display().to_string());
        self.store.insert(document).await?;
        debug!(id = %id, path = %path.display(), "added document from file");
        Ok(id)
    }

    /// Summaries of every stored document, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`RagError`] when the store lookup fails.
    pub async fn list_documents(&self) -> RagResult<Vec<DocumentSummary>> {
        let documents = self.store.list().await?;
        Ok(documents.into_iter().map(DocumentSummary::from).collect())
    }

    /// Delete a document by id. Returns whether it existed.
    ///
    /// # Errors
    ///
    /// Returns [`RagError`] when the store delete fails.
    pub async fn delete_document(&self, id: &str) -> RagResult<bool> {
        Ok(self.store.remove(id).await?)
    }

    /// Delete every document and reset the id sequence.
    ///
    /// # Errors
    ///
    /// Returns [`RagError`] when the store clear fails.
    pub async fn clear_documents(&self) -> RagResult<()> {
        Ok(self.store.clear().await?)
    }

    /// Store counters for the `stats` command.
    ///
    /// # Errors
    ///
    /// Returns [`RagError`] when the store lookup fails.
    pub async fn stats(&self) -> RagResult<StoreStats> {
        Ok(self.store.stats().await?)
    }

    async fn embed(&self, text: &str) -> RagResult<Vec<f32>> {
        self.embedder.embed(text).await.map_err(RagError::Embedding)
    }
}

/// Build the generation prompt from the query and its retrieved context.
///
/// With nothing retrieved the query passes through untouched.
fn compose_prompt(query: &str, retrieved: &[ScoredDocument]) -> String {
    if retrieved.is_empty() {
        return query.to_string();
    }

    let context = retrieved
        .iter()
        .map(|scored| {
            let source = scored.document.source.as_deref().unwrap_or("unknown");
            format!("Source: {source}\nContent: {}", scored.document.text)
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "Based on the following context information, please answer the question. \
         If the context doesn't contain relevant information, you can use your general \
         knowledge but mention that the information is not from the provided context.\n\n\
         Context:\n{context}\n\nQuestion: {query}\n\nAnswer:"
    )
}

/// First [`PREVIEW_CHARS`] characters of `text`, `...`-terminated when cut.
fn preview(text: &str) -> String {
    match text.char_indices().nth(PREVIEW_CHARS) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::providers::{MockChatModel, MockEmbeddingModel};
    use crate::store::MemoryVectorStore;

    fn pipeline(
        embedder: MockEmbeddingModel,
        generator: MockChatModel,
    ) -> (RagPipeline, Arc<MemoryVectorStore>) {
        let store = Arc::new(MemoryVectorStore::new());
        let pipeline = RagPipeline::new(Arc::new(embedder), store.clone(), Arc::new(generator));
        (pipeline, store)
    }

    #[tokio::test]
    async fn test_add_document_assigns_sequential_ids() {
        let (pipeline, _) = pipeline(MockEmbeddingModel::new(2), MockChatModel::with_reply("ok"));

        assert_eq!(pipeline.add_document("first", None).await.unwrap(), "doc_1");
        // Identical text is not deduplicated; it gets its own id.
        assert_eq!(pipeline.add_document("first", None).await.unwrap(), "doc_2");
    }

    #[tokio::test]
    async fn test_add_document_rejects_whitespace() {
        let (pipeline, _) = pipeline(MockEmbeddingModel::new(2), MockChatModel::with_reply("ok"));

        let err = pipeline.add_document("   \n\t", None).await.unwrap_err();
        assert!(matches!(err, RagError::EmptyDocument));
    }

    #[tokio::test]
    async fn test_ids_not_reused_after_delete() {
        let (pipeline, _) = pipeline(MockEmbeddingModel::new(2), MockChatModel::with_reply("ok"));

        let id = pipeline.add_document("first", None).await.unwrap();
        assert!(pipeline.delete_document(&id).await.unwrap());
        assert!(!pipeline.delete_document(&id).await.unwrap());

        assert_eq!(pipeline.add_document("second", None).await.unwrap(), "doc_2");
    }

    #[tokio::test]
    async fn test_add_document_from_file() {
        let dir = assert_fs::TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "rust notes").unwrap();

        let (pipeline, store) =
            pipeline(MockEmbeddingModel::new(2), MockChatModel::with_reply("ok"));
        let id = pipeline.add_document_from_file(&path).await.unwrap();
        assert_eq!(id, "file_notes_1");

        let documents = store.list().await.unwrap();
        let expected_source = path.display().to_string();
        assert_eq!(documents[0].source.as_deref(), Some(expected_source.as_str()));
        assert_eq!(documents[0].text, "rust notes");
    }

    #[tokio::test]
    async fn test_add_document_from_file_missing() {
        let (pipeline, _) = pipeline(MockEmbeddingModel::new(2), MockChatModel::with_reply("ok"));

        let err = pipeline
            .add_document_from_file("/no/such/file.txt")
            .await
            .unwrap_err();
        assert!(matches!(err, RagError::File(_)));
    }

    #[tokio::test]
    async fn test_answer_composes_context_prompt() {
        let embedder = MockEmbeddingModel::new(2)
            .with_vector("rust is a systems language", vec![1.0, 0.0])
            .with_vector("what is rust?", vec![1.0, 0.0]);
        let generator = MockChatModel::with_reply("a systems language");
        let (pipeline, _) = pipeline(embedder, generator.clone());

        pipeline
            .add_document("rust is a systems language", None)
            .await
            .unwrap();

        let reply = pipeline.answer("what is rust?").await.unwrap();
        assert_eq!(reply, "a systems language");

        let prompts = generator.prompts().await;
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].starts_with("Based on the following context information"));
        assert!(prompts[0].contains("Source: unknown"));
        assert!(prompts[0].contains("Content: rust is a systems language"));
        assert!(prompts[0].contains("Question: what is rust?"));
        assert!(prompts[0].ends_with("Answer:"));
    }

    #[tokio::test]
    async fn test_answer_empty_store_sends_raw_query() {
        let generator = MockChatModel::with_reply("no idea");
        let (pipeline, _) = pipeline(MockEmbeddingModel::new(2), generator.clone());

        let reply = pipeline.answer("what is rust?").await.unwrap();
        assert_eq!(reply, "no idea");
        assert_eq!(generator.prompts().await, vec!["what is rust?".to_string()]);
    }

    #[tokio::test]
    async fn test_answer_embedding_failure() {
        let (pipeline, _) = pipeline(MockEmbeddingModel::failing(), MockChatModel::with_reply("ok"));

        let err = pipeline.answer("query").await.unwrap_err();
        assert!(matches!(err, RagError::Embedding(_)));
    }

    #[tokio::test]
    async fn test_answer_generation_failure() {
        let (pipeline, _) = pipeline(MockEmbeddingModel::new(2), MockChatModel::failing());

        let err = pipeline.answer("query").await.unwrap_err();
        assert!(matches!(err, RagError::Generation(_)));
    }

    #[tokio::test]
    async fn test_retrieve_respects_top_k() {
        let embedder = MockEmbeddingModel::new(2);
        let store = Arc::new(MemoryVectorStore::new());
        let pipeline = RagPipeline::new(
            Arc::new(embedder),
            store,
            Arc::new(MockChatModel::with_reply("ok")),
        )
        .with_top_k(2);

        for text in ["one", "two", "three", "four"] {
            pipeline.add_document(text, None).await.unwrap();
        }

        let retrieved = pipeline.retrieve("query").await.unwrap();
        assert_eq!(retrieved.len(), 2);
    }

    #[tokio::test]
    async fn test_list_documents_previews() {
        let (pipeline, _) = pipeline(MockEmbeddingModel::new(2), MockChatModel::with_reply("ok"));

        let long = "x".repeat(300);
        pipeline.add_document(&long, None).await.unwrap();
        pipeline.add_document("short", Some("notes.txt")).await.unwrap();

        let summaries = pipeline.list_documents().await.unwrap();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].preview.chars().count(), 203);
        assert!(summaries[0].preview.ends_with("..."));
        assert_eq!(summaries[1].preview, "short");
        assert_eq!(summaries[1].source.as_deref(), Some("notes.txt"));
    }

    #[test]
    fn test_preview_respects_char_boundaries() {
        let text = "日".repeat(250);
        let cut = preview(&text);
        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), 203);
    }

    #[tokio::test]
    async fn test_clear_documents_resets_ids() {
        let (pipeline, _) = pipeline(MockEmbeddingModel::new(2), MockChatModel::with_reply("ok"));

        pipeline.add_document("first", None).await.unwrap();
        pipeline.clear_documents().await.unwrap();

        let stats = pipeline.stats().await.unwrap();
        assert_eq!(stats.document_count, 0);
        assert_eq!(pipeline.add_document("again", None).await.unwrap(), "doc_1");
    }
}
