//! Error types for Plansight explain processing

use thiserror::Error;

/// Errors surfaced by the text entry points.
///
/// Parsing an already-decoded JSON value never fails; only raw text that is
/// not JSON at all is rejected.
#[derive(Debug, Error)]
pub enum ExplainError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Empty EXPLAIN output")]
    EmptyOutput,
}

/// Result type for explain processing
pub type Result<T> = std::result::Result<T, ExplainError>;
