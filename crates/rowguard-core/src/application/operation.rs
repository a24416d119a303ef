//! Operation error state: the ordered errors collected for one write.

use std::{error::Error as StdError, fmt};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::ValidationError;

/// One error recorded against a write operation.
#[derive(Debug, Error)]
pub enum OperationError<'r> {
    /// A field violation, from a rule or raised by a custom validator.
    #[error(transparent)]
    Validation(ValidationError<'r>),

    /// Any other error a custom validator chose to raise.
    #[error("{0}")]
    Custom(Box<dyn StdError + Send + Sync>),
}

impl<'r> OperationError<'r> {
    pub fn custom(err: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self::Custom(err.into())
    }

    pub fn as_validation(&self) -> Option<&ValidationError<'r>> {
        match self {
            Self::Validation(e) => Some(e),
            Self::Custom(_) => None,
        }
    }

    pub fn column(&self) -> Option<&str> {
        self.as_validation().map(ValidationError::column)
    }

    pub fn message(&self) -> String {
        self.to_string()
    }
}

// Not `#[from]`: the wrapped error borrows its record.
impl<'r> From<ValidationError<'r>> for OperationError<'r> {
    fn from(error: ValidationError<'r>) -> Self {
        Self::Validation(error)
    }
}

/// Ordered, append-only errors of one write. Non-empty means do not commit.
///
/// Duplicates are kept: two identical messages are two errors.
#[derive(Debug, Default)]
pub struct OperationErrors<'r> {
    errors: Vec<OperationError<'r>>,
}

impl<'r> OperationErrors<'r> {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn push(&mut self, error: impl Into<OperationError<'r>>) {
        self.errors.push(error.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, OperationError<'r>> {
        self.errors.iter()
    }

    pub fn first(&self) -> Option<&OperationError<'r>> {
        self.errors.first()
    }

    /// Messages in append order.
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(OperationError::message).collect()
    }

    /// Owned snapshots that outlive the borrowed records.
    pub fn reports(&self) -> Vec<ErrorReport> {
        self.errors.iter().map(ErrorReport::from).collect()
    }

    pub fn into_vec(self) -> Vec<OperationError<'r>> {
        self.errors
    }
}

impl<'r> Extend<OperationError<'r>> for OperationErrors<'r> {
    fn extend<I: IntoIterator<Item = OperationError<'r>>>(&mut self, iter: I) {
        self.errors.extend(iter);
    }
}

impl<'r> IntoIterator for OperationErrors<'r> {
    type Item = OperationError<'r>;
    type IntoIter = std::vec::IntoIter<OperationError<'r>>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a, 'r> IntoIterator for &'a OperationErrors<'r> {
    type Item = &'a OperationError<'r>;
    type IntoIter = std::slice::Iter<'a, OperationError<'r>>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

impl fmt::Display for OperationErrors<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.messages().join("; "))
    }
}

/// Owned, serializable view of one operation error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl From<&OperationError<'_>> for ErrorReport {
    fn from(error: &OperationError<'_>) -> Self {
        match error {
            OperationError::Validation(e) => Self {
                model: Some(e.resource().model_name().to_string()),
                column: Some(e.column().to_string()),
                message: e.message().to_string(),
                label: e.label().ok(),
            },
            OperationError::Custom(e) => Self {
                model: None,
                column: None,
                message: e.to_string(),
                label: None,
            },
        }
    }
}
