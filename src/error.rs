//! Error types raised by storage backends.

use thiserror::Error;

/// Errors surfaced by key-value storage implementations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage backend unavailable")]
    Unavailable,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("backend rejected request: {0}")]
    Backend(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;
