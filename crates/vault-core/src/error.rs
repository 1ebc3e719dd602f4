//! Error types for vault-core

use thiserror::Error;

/// Result type alias using vault-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in vault-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration is missing or invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// Authentication failed
    #[error("Authentication error: {0}")]
    Auth(String),

    /// An operation required an established session
    #[error("Session is not ready")]
    SessionNotReady,

    /// The backend collaborator rejected or failed an operation
    #[error("Backend error: {0}")]
    Backend(String),

    /// HTTP transport error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Base64 payload could not be decoded
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Item not found
    #[error("Item not found: {0}")]
    NotFound(String),

    /// Secure session storage error
    #[error("Secure storage error: {0}")]
    SecureStorage(String),
}
