//! Chat orchestration.
//!
//! [`Chatbot`] runs the per-turn fallback chain: document-management
//! commands first, then RAG (when enabled), then the tool router (when
//! enabled), then plain generation. Each stage either fully handles the
//! turn or defers to the next; only a failure of the final stage becomes
//! user-visible error text, and even that never ends the session.

use std::fmt::Write as _;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::ChatbotConfig;
use crate::providers::ChatModel;
use crate::rag::RagPipeline;
use crate::router::ToolRouter;

// ============================================================================
// Turn log
// ============================================================================

/// Which stage of the fallback chain produced a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatMode {
    /// A document-management command, executed directly.
    Command,
    /// Retrieval augmented generation.
    Rag,
    /// A routed tool invocation.
    Tool,
    /// Plain generation with no context.
    Basic,
}

/// One completed exchange.
///
/// Turns live only in process memory; documents persist, chat history
/// does not.
#[derive(Debug, Clone)]
pub struct ChatTurn {
    /// What the user typed.
    pub user: String,
    /// The reply shown to them.
    pub bot: String,
    /// Which stage handled the turn.
    pub mode: ChatMode,
}

// ============================================================================
// Commands
// ============================================================================

/// A recognized document-management command.
///
/// A bare `add_doc` / `add_file` / `delete_doc` is still a command; it
/// reports usage instead of being sent to the model.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    AddDoc(Option<String>),
    AddFile(Option<String>),
    DeleteDoc(Option<String>),
    ListDocs,
    ClearDocs,
    Stats,
}

impl Command {
    fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        match trimmed {
            "add_doc" => return Some(Self::AddDoc(None)),
            "add_file" => return Some(Self::AddFile(None)),
            "delete_doc" => return Some(Self::DeleteDoc(None)),
            "list_docs" => return Some(Self::ListDocs),
            "clear_docs" => return Some(Self::ClearDocs),
            "stats" => return Some(Self::Stats),
            _ => {}
        }

        if let Some(rest) = trimmed.strip_prefix("add_doc ") {
            return Some(Self::AddDoc(argument(rest)));
        }
        if let Some(rest) = trimmed.strip_prefix("add_file ") {
            return Some(Self::AddFile(argument(rest)));
        }
        if let Some(rest) = trimmed.strip_prefix("delete_doc ") {
            return Some(Self::DeleteDoc(argument(rest)));
        }
        None
    }
}

fn argument(rest: &str) -> Option<String> {
    let rest = rest.trim();
    (!rest.is_empty()).then(|| rest.to_string())
}

// ============================================================================
// Chatbot
// ============================================================================

/// The top-level chatbot.
///
/// Owns the RAG pipeline, the tool router, the plain-generation model, and
/// the session's turn log.
pub struct Chatbot {
    config: ChatbotConfig,
    chat_model: Arc<dyn ChatModel>,
    rag: RagPipeline,
    router: ToolRouter,
    turns: Vec<ChatTurn>,
}

impl std::fmt::Debug for Chatbot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chatbot")
            .field("config", &self.config)
            .field("model", &self.chat_model.model_id())
            .field("turns", &self.turns.len())
            .finish_non_exhaustive()
    }
}

impl Chatbot {
    /// Wire a chatbot from its parts.
    #[must_use]
    pub fn new(config: ChatbotConfig, chat_model: Arc<dyn ChatModel>, rag: RagPipeline) -> Self {
        Self {
            config,
            chat_model,
            rag,
            router: ToolRouter::new(),
            turns: Vec::new(),
        }
    }

    /// The configuration this chatbot was built with.
    #[must_use]
    pub const fn config(&self) -> &ChatbotConfig {
        &self.config
    }

    /// Every completed turn of this session, oldest first.
    #[must_use]
    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    /// Run one turn through the fallback chain and log it.
    ///
    /// Never fails: when even plain generation errors out, the reply is an
    /// error sentence and the session continues.
    pub async fn respond(&mut self, input: &str) -> ChatTurn {
        let (bot, mode) = self.dispatch(input).await;
        let turn = ChatTurn {
            user: input.to_string(),
            bot,
            mode,
        };
        self.turns.push(turn.clone());
        turn
    }

    async fn dispatch(&self, input: &str) -> (String, ChatMode) {
        if let Some(command) = Command::parse(input) {
            debug!(?command, "handling document command");
            return (self.run_command(command).await, ChatMode::Command);
        }

        if self.config.use_rag {
            match self.rag.answer(input).await {
                Ok(reply) => return (reply, ChatMode::Rag),
                Err(err) => warn!(error = %err, "rag pipeline failed, falling back"),
            }
        }

        if self.config.use_tools {
            match self.router.route(input) {
                Ok(Some(invocation)) => {
                    debug!(tool = %invocation.tool, "tool handled query");
                    return (invocation.output, ChatMode::Tool);
                }
                Ok(None) => {}
                Err(err) => warn!(error = %err, "tool routing failed, falling back"),
            }
        }

        match self.chat_model.generate(input).await {
            Ok(reply) => (reply, ChatMode::Basic),
            Err(err) => (format!("Error generating response: {err}"), ChatMode::Basic),
        }
    }

    async fn run_command(&self, command: Command) -> String {
        match command {
            Command::AddDoc(None) => "Usage: add_doc <document text>".to_string(),
            Command::AddDoc(Some(text)) => match self.rag.add_document(&text, None).await {
                Ok(id) => format!("✓ Document added with ID: {id}"),
                Err(err) => format!("✗ Error adding document: {err}"),
            },
            Command::AddFile(None) => "Usage: add_file <file path>".to_string(),
            Command::AddFile(Some(path)) => match self.rag.add_document_from_file(&path).await {
                Ok(id) => format!("✓ File added with ID: {id}"),
                Err(err) => format!("✗ Error adding file: {err}"),
            },
            Command::DeleteDoc(None) => "Usage: delete_doc <document id>".to_string(),
            Command::DeleteDoc(Some(id)) => match self.rag.delete_document(&id).await {
                Ok(true) => format!("✓ Document {id} deleted"),
                Ok(false) => format!("✗ No document with ID: {id}"),
                Err(err) => format!("✗ Error deleting document: {err}"),
            },
            Command::ListDocs => self.list_docs().await,
            Command::ClearDocs => match self.rag.clear_documents().await {
                Ok(()) => "✓ Document collection cleared".to_string(),
                Err(err) => format!("✗ Error clearing collection: {err}"),
            },
            Command::Stats => match self.rag.stats().await {
                Ok(stats) => format!(
                    "Documents: {}\nBackend: {}\nEmbedding dimension: {}",
                    stats.document_count, stats.backend, stats.embedding_dimension
                ),
                Err(err) => format!("✗ Error reading stats: {err}"),
            },
        }
    }

    async fn list_docs(&self) -> String {
        let summaries = match self.rag.list_documents().await {
            Ok(summaries) => summaries,
            Err(err) => return format!("✗ Error listing documents: {err}"),
        };
        if summaries.is_empty() {
            return "No documents in collection".to_string();
        }

        let mut out = format!("📚 Documents in collection ({} total):", summaries.len());
        for (i, summary) in summaries.iter().enumerate() {
            let source = summary.source.as_deref().unwrap_or("unknown");
            let preview: String = summary.preview.chars().take(100).collect();
            let _ = write!(
                out,
                "\n  {}. ID: {}, Source: {}\n     Preview: {}...",
                i + 1,
                summary.id,
                source,
                preview
            );
        }
        out
    }
}
