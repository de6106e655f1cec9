//! Shared error types for the subscription auditor

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SharedError {
    #[error("Invalid UUID: {input}")]
    InvalidUuid { input: String },

    #[error("Invalid configuration: {field} = {value}")]
    InvalidConfig { field: String, value: String },
}

pub type SharedResult<T> = Result<T, SharedError>;

/// Recoverable problems reported alongside audit results.
///
/// None of these abort a run; they travel with the report as data.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AuditError {
    #[error("Malformed record at line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    #[error("Required column missing: {field}")]
    MissingColumn { field: String },

    #[error("No valid subscription rows in batch")]
    EmptyBatch,

    #[error("Augmentation unavailable: {reason}")]
    AugmentationUnavailable { reason: String },
}

impl AuditError {
    pub fn malformed(line: usize, reason: impl Into<String>) -> Self {
        AuditError::MalformedRecord {
            line,
            reason: reason.into(),
        }
    }

    pub fn augmentation(reason: impl Into<String>) -> Self {
        AuditError::AugmentationUnavailable { reason: reason.into() }
    }
}
