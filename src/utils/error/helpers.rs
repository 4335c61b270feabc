//! Helper functions for creating specific error types

use super::types::BulkError;

impl BulkError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    pub fn conflict<S: Into<String>>(message: S) -> Self {
        Self::Conflict(message.into())
    }

    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound(message.into())
    }

    pub fn row_source<S: Into<String>>(message: S) -> Self {
        Self::RowSource(message.into())
    }

    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Stable machine-readable code, used in HTTP and control channel replies
    pub fn code(&self) -> &'static str {
        match self {
            BulkError::Config(_) => "CONFIG_ERROR",
            BulkError::Validation(_) => "VALIDATION_ERROR",
            BulkError::Conflict(_) => "JOB_EXISTS",
            BulkError::NotFound(_) => "NOT_FOUND",
            BulkError::RowSource(_) => "INVALID_ROW_SOURCE",
            BulkError::Remote(_) => "REMOTE_ERROR",
            BulkError::Serialization(_) => "SERIALIZATION_ERROR",
            BulkError::Yaml(_) => "YAML_ERROR",
            BulkError::Io(_) => "IO_ERROR",
            BulkError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}
