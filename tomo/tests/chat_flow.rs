//! End-to-end fallback-chain tests over mock providers.
//!
//! These drive [`Chatbot`] through its public API only: commands, RAG,
//! tool routing, and plain generation, in their fixed priority order.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use async_trait::async_trait;
use tomo::prelude::*;

fn make_chatbot(
    config: ChatbotConfig,
    chat: MockChatModel,
    embedder: MockEmbeddingModel,
    store: Arc<dyn VectorStore>,
) -> Chatbot {
    let chat_model: Arc<dyn ChatModel> = Arc::new(chat);
    let rag =
        RagPipeline::new(Arc::new(embedder), store, chat_model.clone()).with_top_k(config.top_k);
    Chatbot::new(config, chat_model, rag)
}

fn memory_chatbot(config: ChatbotConfig, chat: MockChatModel) -> Chatbot {
    make_chatbot(
        config,
        chat,
        MockEmbeddingModel::new(2),
        Arc::new(MemoryVectorStore::new()),
    )
}

/// Store whose every operation fails, standing in for an offline backend.
#[derive(Debug)]
struct UnreachableStore;

fn offline() -> StoreError {
    StoreError::Io(std::io::Error::new(
        std::io::ErrorKind::ConnectionRefused,
        "store offline",
    ))
}

#[async_trait]
impl VectorStore for UnreachableStore {
    fn backend(&self) -> &'static str {
        "unreachable"
    }

    async fn next_seq(&self) -> StoreResult<u64> {
        Err(offline())
    }

    async fn insert(&self, _document: Document) -> StoreResult<()> {
        Err(offline())
    }

    async fn search(&self, _embedding: &[f32], _top_k: usize) -> StoreResult<Vec<ScoredDocument>> {
        Err(offline())
    }

    async fn list(&self) -> StoreResult<Vec<Document>> {
        Err(offline())
    }

    async fn remove(&self, _id: &str) -> StoreResult<bool> {
        Err(offline())
    }

    async fn clear(&self) -> StoreResult<()> {
        Err(offline())
    }

    async fn stats(&self) -> StoreResult<StoreStats> {
        Err(offline())
    }
}

#[tokio::test]
async fn test_time_query_fires_clock_tool() {
    let chat = MockChatModel::with_reply("unused");
    let mut bot = memory_chatbot(ChatbotConfig::default(), chat.clone());

    let turn = bot.respond("What time is it?").await;
    assert_eq!(turn.mode, ChatMode::Tool);
    assert!(turn.bot.starts_with("The current time is "));
    // "YYYY-MM-DD HH:MM:SS" plus the closing period.
    assert_eq!(turn.bot.len(), "The current time is ".len() + 19 + 1);

    // The query never reached the model.
    assert!(chat.prompts().await.is_empty());
}

#[tokio::test]
async fn test_calculate_two_plus_two_is_four() {
    let mut bot = memory_chatbot(ChatbotConfig::default(), MockChatModel::with_reply("unused"));

    let turn = bot.respond("Calculate 2+2").await;
    assert_eq!(turn.mode, ChatMode::Tool);
    assert_eq!(turn.bot, "4");
}

#[tokio::test]
async fn test_document_round_trip() {
    let mut bot = memory_chatbot(ChatbotConfig::default(), MockChatModel::with_reply("unused"));

    let turn = bot.respond("add_doc Tomo is a demo chatbot").await;
    assert_eq!(turn.mode, ChatMode::Command);
    assert_eq!(turn.bot, "✓ Document added with ID: doc_1");

    let turn = bot.respond("list_docs").await;
    assert!(turn.bot.contains("ID: doc_1"));
    assert!(turn.bot.contains("Tomo is a demo chatbot"));

    let turn = bot.respond("clear_docs").await;
    assert_eq!(turn.bot, "✓ Document collection cleared");

    let turn = bot.respond("list_docs").await;
    assert_eq!(turn.bot, "No documents in collection");
}

#[tokio::test]
async fn test_readded_document_gets_fresh_id() {
    let mut bot = memory_chatbot(ChatbotConfig::default(), MockChatModel::with_reply("unused"));

    assert_eq!(
        bot.respond("add_doc same text").await.bot,
        "✓ Document added with ID: doc_1"
    );
    assert_eq!(bot.respond("delete_doc doc_1").await.bot, "✓ Document doc_1 deleted");
    assert_eq!(
        bot.respond("add_doc same text").await.bot,
        "✓ Document added with ID: doc_2"
    );
}

#[tokio::test]
async fn test_rag_answers_with_retrieved_context() {
    let chat = MockChatModel::with_reply("It is a demo chatbot.");
    let embedder = MockEmbeddingModel::new(2)
        .with_vector("Tomo is a demo chatbot", vec![1.0, 0.0])
        .with_vector("What is tomo?", vec![1.0, 0.0]);
    let mut bot = make_chatbot(
        ChatbotConfig::default().with_rag(true),
        chat.clone(),
        embedder,
        Arc::new(MemoryVectorStore::new()),
    );

    bot.respond("add_doc Tomo is a demo chatbot").await;

    let turn = bot.respond("What is tomo?").await;
    assert_eq!(turn.mode, ChatMode::Rag);
    assert_eq!(turn.bot, "It is a demo chatbot.");

    let prompts = chat.prompts().await;
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("Content: Tomo is a demo chatbot"));
    assert!(prompts[0].contains("Question: What is tomo?"));
}

#[tokio::test]
async fn test_unreachable_store_still_gets_plain_generation() {
    let chat = MockChatModel::with_reply("plain answer");
    let mut bot = make_chatbot(
        ChatbotConfig::default().with_rag(true),
        chat.clone(),
        MockEmbeddingModel::new(2),
        Arc::new(UnreachableStore),
    );

    // Not a command, not a tool match: RAG fails, tools decline, the
    // model answers.
    let turn = bot.respond("Tell me about Rust").await;
    assert_eq!(turn.mode, ChatMode::Basic);
    assert_eq!(turn.bot, "plain answer");
    assert_eq!(chat.prompts().await, vec!["Tell me about Rust".to_string()]);
}

#[tokio::test]
async fn test_stats_reports_backend() {
    let mut bot = memory_chatbot(ChatbotConfig::default(), MockChatModel::with_reply("unused"));

    let turn = bot.respond("stats").await;
    assert_eq!(turn.mode, ChatMode::Command);
    assert_eq!(turn.bot, "Documents: 0\nBackend: memory\nEmbedding dimension: 0");
}

#[tokio::test]
async fn test_documents_persist_across_chatbots() {
    let dir = assert_fs::TempDir::new().unwrap();

    {
        let store = FileVectorStore::open(dir.path()).await.unwrap();
        let mut bot = make_chatbot(
            ChatbotConfig::default(),
            MockChatModel::with_reply("unused"),
            MockEmbeddingModel::new(2),
            Arc::new(store),
        );
        assert_eq!(
            bot.respond("add_doc kept between runs").await.bot,
            "✓ Document added with ID: doc_1"
        );
    }

    let store = FileVectorStore::open(dir.path()).await.unwrap();
    let mut bot = make_chatbot(
        ChatbotConfig::default(),
        MockChatModel::with_reply("unused"),
        MockEmbeddingModel::new(2),
        Arc::new(store),
    );

    let turn = bot.respond("list_docs").await;
    assert!(turn.bot.contains("ID: doc_1"));
    assert!(turn.bot.contains("kept between runs"));

    let turn = bot.respond("stats").await;
    assert!(turn.bot.contains("Documents: 1"));
    assert!(turn.bot.contains("Backend: file"));
}
