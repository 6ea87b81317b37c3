//! Error types for the ACO solver.

use thiserror::Error;

/// Errors surfaced by the library.
///
/// Degenerate transitions and zero-length deposits are recovered inside the
/// colony and never show up here.
#[derive(Debug, Error)]
pub enum ACOError {
    /// Malformed distance matrix or out-of-range hyperparameter
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Instance file could be read but not understood
    #[error("parse error: {0}")]
    Parse(String),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ACOError>;

impl ACOError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        ACOError::InvalidInput(msg.into())
    }
}
