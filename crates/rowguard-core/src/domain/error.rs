// ============================================================================
// domain/error.rs - STRUCTURAL / CONFIGURATION ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// These are programming errors in a model declaration, never user-data
/// violations. User-data violations are `ValidationError`s and are collected,
/// not returned.
///
/// All errors are:
/// - Cloneable
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Record reflection
    // ========================================================================
    #[error("model '{model}' declares field '{field}' but the record does not expose it")]
    UnknownField { model: String, field: String },

    #[error("model '{model}' has no primary key")]
    MissingPrimaryKey { model: String },

    // ========================================================================
    // Rule registry
    // ========================================================================
    #[error("custom rule '{name}' is not registered")]
    UnregisteredRule { name: String },

    #[error("rule name '{name}' is reserved for a built-in rule")]
    RuleNameReserved { name: String },

    #[error("rule registry lock poisoned")]
    RegistryLock,

    // ========================================================================
    // Schema declaration
    // ========================================================================
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    #[error("model '{model}' declares field '{field}' more than once")]
    DuplicateField { model: String, field: String },

    #[error("invalid rule on '{field}': {reason}")]
    InvalidRule { field: String, reason: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::UnknownField { model, field } => vec![
                format!("Check the schema of '{}' for a typo in '{}'", model, field),
                "Every declared field must be readable through Record::value".into(),
            ],
            Self::MissingPrimaryKey { model } => vec![
                format!("Mark at least one field of '{}' as primary_key", model),
                "Labels are built from the model name and its key values".into(),
            ],
            Self::UnregisteredRule { name } => vec![
                format!("Register '{}' during start-up with register_rule", name),
                "Try: rowguard rules".into(),
            ],
            Self::RuleNameReserved { name } => vec![
                format!("'{}' is a built-in rule; pick another name", name),
            ],
            Self::InvalidRule { field, .. } => vec![
                format!("Fix the rule parameters declared on '{}'", field),
                "length rules need min <= max".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnknownField { .. }
            | Self::MissingPrimaryKey { .. }
            | Self::InvalidSchema(_)
            | Self::DuplicateField { .. }
            | Self::InvalidRule { .. } => ErrorCategory::Schema,
            Self::UnregisteredRule { .. } | Self::RuleNameReserved { .. } => {
                ErrorCategory::Registry
            }
            Self::RegistryLock => ErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Schema,
    Registry,
    Internal,
}
