//! Error types for the orchestrator

use crate::core::remote::RemoteError;
use thiserror::Error;

/// Result type alias for the orchestrator
pub type Result<T> = std::result::Result<T, BulkError>;

/// Main error type for the orchestrator
#[derive(Error, Debug)]
pub enum BulkError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// A job already exists under the requested id
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed or empty row source
    #[error("Row source error: {0}")]
    RowSource(String),

    /// Remote call errors
    #[error("Remote error: {0}")]
    Remote(#[from] RemoteError),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}
