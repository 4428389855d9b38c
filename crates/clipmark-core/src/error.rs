//! Error types for Clipmark.

use thiserror::Error;

/// Main error type for Clipmark operations.
#[derive(Error, Debug)]
pub enum ClipmarkError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Media error: {0}")]
    Media(String),

    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Invalid name: {0}")]
    InvalidName(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for Clipmark operations.
pub type Result<T> = std::result::Result<T, ClipmarkError>;
