//! Unified error types for tomo.
//!
//! Every fallible stage of the chatbot has its own error enum, and all of
//! them convert into the main [`TomoError`] type. The orchestrator treats
//! most of these as fallback signals rather than hard failures: a stage
//! that errors defers to the next stage in the chain.

// ============================================================================
// Main Error Type
// ============================================================================

/// The main error type for tomo operations.
#[derive(Debug, thiserror::Error)]
pub enum TomoError {
    /// Model provider error (generation or embedding endpoint).
    #[error("provider: {0}")]
    Provider(#[from] ProviderError),

    /// Function-call router error.
    #[error("router: {0}")]
    Router(#[from] RouterError),

    /// Vector store error.
    #[error("store: {0}")]
    Store(#[from] StoreError),

    /// RAG pipeline error.
    #[error("rag: {0}")]
    Rag(#[from] RagError),

    /// IO error.
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic internal error.
    #[error("{0}")]
    Internal(String),
}

impl TomoError {
    /// Create an internal error.
    #[inline]
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

/// Result type alias for tomo operations.
pub type Result<T> = std::result::Result<T, TomoError>;

// ============================================================================
// Provider Errors
// ============================================================================

/// Error type for model provider operations.
///
/// Covers both the generation endpoint and the embedding endpoint. The
/// connection and timeout variants mean the local inference server is
/// unreachable; the chat loop surfaces these as a plain apology and keeps
/// running.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Server unreachable (connection refused, DNS failure).
    #[error("connection: {0}")]
    Connection(String),

    /// Request timed out.
    #[error("timeout: {0}")]
    Timeout(String),

    /// Non-success HTTP status from the API.
    #[error("api ({status}): {message}")]
    Api {
        /// HTTP status code returned by the server.
        status: reqwest::StatusCode,
        /// Response body text.
        message: String,
    },

    /// Response body did not have the expected shape.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Other transport-level failure.
    #[error("http: {0}")]
    Http(String),
}

impl ProviderError {
    /// Create an API error from a status code and response body.
    #[inline]
    pub fn api(status: reqwest::StatusCode, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create an invalid response error.
    #[inline]
    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Whether this error means the server could not be reached at all.
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::Timeout(_))
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::Connection(err.to_string())
        } else {
            Self::Http(err.to_string())
        }
    }
}

/// Result type for provider operations.
pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

// ============================================================================
// Calculator Errors
// ============================================================================

/// Error type for arithmetic expression evaluation.
///
/// The calculator accepts a restricted grammar (numbers, `+ - * / ( )`);
/// anything outside it is rejected here rather than interpreted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    /// Character outside the allowed grammar.
    #[error("invalid character '{0}' in expression")]
    InvalidCharacter(char),

    /// Token in a position where it cannot appear.
    #[error("unexpected '{0}'")]
    UnexpectedToken(String),

    /// Expression ended mid-parse.
    #[error("unexpected end of expression")]
    UnexpectedEnd,

    /// A `(` without its matching `)`.
    #[error("unclosed parenthesis")]
    UnclosedParen,

    /// Numeric literal that does not parse.
    #[error("invalid number '{0}'")]
    InvalidNumber(String),

    /// Division by zero.
    #[error("division by zero")]
    DivisionByZero,

    /// Input left over after a complete expression.
    #[error("trailing input '{0}'")]
    TrailingInput(String),

    /// Nothing to evaluate.
    #[error("empty expression")]
    EmptyExpression,
}

/// Result type for expression evaluation.
pub type EvalResult<T> = std::result::Result<T, EvalError>;

// ============================================================================
// Router Errors
// ============================================================================

/// Error type for the function-call router.
///
/// Raised only when a query matched a tool intent but the tool could not
/// produce a result. The orchestrator treats this as recoverable and falls
/// back to plain generation.
#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    /// The matched expression failed to evaluate.
    #[error("evaluation: {0}")]
    Eval(#[from] EvalError),

    /// Calculation intent matched but no expression could be extracted.
    #[error("no arithmetic expression found in query")]
    NoExpression,
}

/// Result type for router operations.
pub type RouterResult<T> = std::result::Result<T, RouterError>;

// ============================================================================
// Store Errors
// ============================================================================

/// Error type for vector store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// IO error.
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    /// Insert with an id already present in the store.
    #[error("duplicate id: {0}")]
    DuplicateId(String),

    /// Query vector dimension differs from the stored vectors.
    #[error("dimension mismatch: query has {query}, store has {store}")]
    DimensionMismatch {
        /// Dimension of the query vector.
        query: usize,
        /// Dimension of the stored vectors.
        store: usize,
    },
}

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

// ============================================================================
// RAG Pipeline Errors
// ============================================================================

/// Error type for the RAG pipeline.
///
/// Any stage failure (embedding, store, generation) lands here. An empty
/// retrieval result is deliberately *not* an error: the pipeline falls back
/// to context-free generation instead.
#[derive(Debug, thiserror::Error)]
pub enum RagError {
    /// The embedding provider failed.
    #[error("embedding: {0}")]
    Embedding(ProviderError),

    /// The vector store failed.
    #[error("store: {0}")]
    Store(#[from] StoreError),

    /// The generation provider failed.
    #[error("generation: {0}")]
    Generation(ProviderError),

    /// Reading a document file failed.
    #[error("file: {0}")]
    File(#[from] std::io::Error),

    /// Document content is empty or whitespace-only.
    #[error("document content cannot be empty")]
    EmptyDocument,
}

/// Result type for RAG pipeline operations.
pub type RagResult<T> = std::result::Result<T, RagError>;

// ============================================================================
// Tests
// ============================================================================
