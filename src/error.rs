use thiserror::Error;

/// Main error type for plagdex operations
#[derive(Error, Debug)]
pub enum PlagdexError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    #[error("Index format mismatch: {0}")]
    FormatMismatch(String),

    #[error("Index invariant violated: {0}")]
    InvariantViolation(String),

    #[error("No index loaded")]
    EngineNotLoaded,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Index error: {0}")]
    IndexError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for plagdex operations
pub type Result<T> = std::result::Result<T, PlagdexError>;

impl PlagdexError {
    /// Check if this error is a per-request problem rather than a fault of
    /// the engine state (used by the API layer for status mapping).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            PlagdexError::InvalidRequest(_) | PlagdexError::EngineNotLoaded
        )
    }
}
