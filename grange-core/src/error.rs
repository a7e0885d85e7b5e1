//! Error types for the grange backend.

use thiserror::Error;

/// Errors that can occur in grange operations.
#[derive(Error, Debug)]
pub enum GrangeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    InvalidInput(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Media storage error: {0}")]
    Media(String),

    #[error("Assistant error: {0}")]
    Assistant(String),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for grange operations.
pub type GrangeResult<T> = Result<T, GrangeError>;
