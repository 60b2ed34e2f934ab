//! Error types for recall-share-core

use thiserror::Error;

/// Result type alias using recall-share-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in recall-share-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Shared URL is missing, relative, or not http/https
    #[error("Invalid share URL: {0}")]
    InvalidUrl(String),

    /// Bridge call arguments did not match the typed contract
    #[error("Invalid bridge request: {0}")]
    InvalidRequest(String),

    /// Bridge method name is not part of the contract
    #[error("Method not implemented: {0}")]
    UnsupportedMethod(String),

    /// Items API base URL cannot form a usable endpoint
    #[error("Invalid API configuration: {0}")]
    InvalidConfiguration(String),

    /// Shared store error
    #[error("Shared store error: {0}")]
    Store(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
