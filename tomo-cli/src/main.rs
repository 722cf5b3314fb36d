//! Tomo CLI - interactive RAG and function-calling chatbot over Ollama.

#![allow(clippy::print_stdout)] // CLI program intentionally uses stdout

mod repl;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tomo::chat::Chatbot;
use tomo::config::{ChatbotConfig, DEFAULT_EMBEDDING_MODEL, DEFAULT_MODEL, DEFAULT_TOP_K};
use tomo::providers::{ChatModel, EmbeddingModel, OLLAMA_API_BASE_URL, OllamaClient};
use tomo::rag::RagPipeline;
use tomo::store::{FileVectorStore, MemoryVectorStore, VectorStore};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Tomo - a minimal RAG and function-calling chatbot
#[derive(Parser, Debug)]
#[command(name = "tomo")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Generation model name
    #[arg(short, long, default_value = DEFAULT_MODEL)]
    model: String,

    /// Embedding model name
    #[arg(long, default_value = DEFAULT_EMBEDDING_MODEL)]
    embedding_model: String,

    /// Ollama server URL
    #[arg(long, env = "OLLAMA_HOST", default_value = OLLAMA_API_BASE_URL)]
    ollama_url: String,

    /// Answer queries over the stored documents (RAG)
    #[arg(long)]
    rag: bool,

    /// Disable the clock and calculator tools
    #[arg(long)]
    no_tools: bool,

    /// Documents retrieved per query
    #[arg(short = 'k', long, default_value_t = DEFAULT_TOP_K)]
    top_k: usize,

    /// Directory for the persistent document store
    #[arg(long, default_value = "./tomo_db")]
    data_dir: PathBuf,

    /// Keep documents in memory only (nothing survives exit)
    #[arg(long)]
    ephemeral: bool,

    /// Seed three demo documents at startup
    #[arg(long)]
    sample_docs: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("tomo=debug,tomo_cli=debug")
    } else {
        EnvFilter::new("tomo=warn,tomo_cli=info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    println!("Initializing Tomo with Ollama...");

    let client = OllamaClient::builder().base_url(&args.ollama_url).build();
    if !client.health_check().await.unwrap_or(false) {
        println!(
            "Error: Could not connect to Ollama at {}. Make sure Ollama is running.",
            args.ollama_url
        );
        println!("Install Ollama from https://ollama.ai and run: ollama serve");
        return Ok(());
    }

    let config = ChatbotConfig::new(&args.model)
        .with_embedding_model(&args.embedding_model)
        .with_rag(args.rag)
        .with_tools(!args.no_tools)
        .with_top_k(args.top_k);

    let store: Arc<dyn VectorStore> = if args.ephemeral {
        Arc::new(MemoryVectorStore::new())
    } else {
        Arc::new(FileVectorStore::open(&args.data_dir).await?)
    };

    let chat_model: Arc<dyn ChatModel> = Arc::new(client.chat_model(&config.model));
    let embedder: Arc<dyn EmbeddingModel> =
        Arc::new(client.embedding_model(&config.embedding_model));

    let rag = RagPipeline::new(embedder, store, chat_model.clone()).with_top_k(config.top_k);

    if args.sample_docs {
        seed_sample_docs(&rag).await;
    }

    let mut chatbot = Chatbot::new(config, chat_model, rag);
    repl::run(&mut chatbot).await?;
    Ok(())
}

/// Short demo documents so retrieval has something to chew on.
async fn seed_sample_docs(rag: &RagPipeline) {
    const SAMPLES: [(&str, &str); 3] = [
        (
            "rust-intro",
            "Rust is a systems programming language focused on safety, speed, \
             and concurrency. It achieves memory safety without garbage collection.",
        ),
        (
            "ollama-notes",
            "Ollama runs large language models locally. Models are pulled by name, \
             for example 'ollama pull llama3.2:3b', and served over a local HTTP API.",
        ),
        (
            "rag-overview",
            "Retrieval augmented generation grounds a language model by retrieving \
             relevant documents and inlining them into the prompt as context.",
        ),
    ];

    for (source, text) in SAMPLES {
        match rag.add_document(text, Some(source)).await {
            Ok(id) => println!("✓ Sample document added with ID: {id}"),
            Err(err) => println!("✗ Error adding sample document: {err}"),
        }
    }
}
