//! Auditor-specific error types

use thiserror::Error;
use shared::SharedError;

#[derive(Error, Debug)]
pub enum AuditorError {
    #[error("File system operation failed: {operation} on {path}: {source}")]
    FileSystemError {
        operation: String,
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {field}")]
    ConfigurationError { field: String },

    #[error("Shared component error: {0}")]
    SharedError(#[from] SharedError),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl AuditorError {
    pub fn config(field: impl Into<String>) -> Self {
        AuditorError::ConfigurationError { field: field.into() }
    }

    pub fn file_system(operation: &str, path: &std::path::Path, source: std::io::Error) -> Self {
        AuditorError::FileSystemError {
            operation: operation.to_string(),
            path: path.display().to_string(),
            source,
        }
    }
}

pub type AuditorResult<T> = Result<T, AuditorError>;
