//! Error types for the store crate.

use thiserror::Error;

/// Errors that can occur in store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A write was rejected because required fields were missing or invalid.
    /// The caller must fix the input and retry; nothing was persisted.
    #[error("Validation error: {0}")]
    Validation(#[from] crate::validation::ValidationError),

    /// Database connection or operation failed. Fatal to the calling write.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Filesystem operation failed (directory creation, bank files).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization of an entry payload failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Point lookup by id with no match.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid query or parameters.
    #[error("Query error: {0}")]
    Query(String),
}

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
