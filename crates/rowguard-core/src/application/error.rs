//! Application layer errors.
//!
//! These errors represent failures around a write (rejection, callback
//! wiring, record decoding, schema loading), not declaration mistakes.
//! Declaration mistakes are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::application::operation::ErrorReport;
use crate::error::ErrorCategory;

/// Errors that occur while driving a write through the validation hook.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// The operation error state was non-empty; the write was not committed.
    #[error("{model} write rejected: {}", summarize(.errors))]
    WriteRejected {
        model: String,
        errors: Vec<ErrorReport>,
    },

    /// A callback anchor named in a registration does not exist.
    #[error("Callback not found: {name}")]
    CallbackNotFound { name: String },

    /// A callback with this name is already registered.
    #[error("Callback already registered: {name}")]
    DuplicateCallback { name: String },

    /// Input could not be turned into a record.
    #[error("Invalid record: {reason}")]
    InvalidRecord { reason: String },

    /// A schema file could not be read or parsed.
    #[error("Failed to load schema from {path}: {reason}")]
    SchemaLoad { path: PathBuf, reason: String },

    /// No schema is known for the requested model.
    #[error("No schema for model '{model}'")]
    UnknownModel { model: String },

    /// Store access failed (lock poisoned).
    #[error("Record store error")]
    StoreLock,

    /// An update targeted a record that does not exist.
    #[error("{model} with key {key} not found")]
    NotFound { model: String, key: String },

    /// A create used a primary key that is already stored or repeated in the batch.
    #[error("{model} with key {key} already exists")]
    DuplicateKey { model: String, key: String },
}

fn summarize(errors: &[ErrorReport]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::WriteRejected { errors, .. } => {
                let mut out = vec![format!("Fix the {} reported violation(s):", errors.len())];
                out.extend(errors.iter().map(|e| format!("  • {}", e.message)));
                out
            }
            Self::CallbackNotFound { name } => vec![
                format!("No callback named '{}' is registered", name),
                "Register the anchor before inserting relative to it".into(),
            ],
            Self::InvalidRecord { reason } => vec![
                format!("Record could not be read: {}", reason),
                "Records must be JSON objects with scalar field values".into(),
            ],
            Self::SchemaLoad { path, .. } => vec![
                format!("Check the schema file: {}", path.display()),
                "Schemas are TOML with `model` and `[[fields]]` entries".into(),
            ],
            Self::UnknownModel { model } => vec![
                format!("No schema declares model '{}'", model),
                "Pass the schema file or directory with --schema".into(),
            ],
            Self::StoreLock => vec![
                "The record store is locked".into(),
                "Try again in a moment".into(),
            ],
            Self::DuplicateKey { key, .. } => vec![
                format!("Key {} is already stored or repeated in the batch", key),
                "Use update to change an existing record".into(),
            ],
            _ => vec!["Check the error details above".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::WriteRejected { .. } => ErrorCategory::Validation,
            Self::CallbackNotFound { .. } | Self::DuplicateCallback { .. } => {
                ErrorCategory::Configuration
            }
            Self::InvalidRecord { .. } => ErrorCategory::Validation,
            Self::SchemaLoad { .. } => ErrorCategory::Configuration,
            Self::UnknownModel { .. } | Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::DuplicateKey { .. } => ErrorCategory::Validation,
            Self::StoreLock => ErrorCategory::Internal,
        }
    }
}
