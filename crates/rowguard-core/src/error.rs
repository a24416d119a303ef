//! Unified error handling for rowguard core.
//!
//! This module provides a unified error type that wraps domain and application
//! errors, with user-actionable suggestions.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Root error type for rowguard core operations.
#[derive(Debug, Error, Clone)]
pub enum RowguardError {
    /// Declaration errors (unknown field, missing key, unregistered rule).
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// Errors around a write (rejection, callbacks, loading).
    #[error("Application error: {0}")]
    Application(#[from] ApplicationError),
}

impl RowguardError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Schema => ErrorCategory::Schema,
                crate::domain::ErrorCategory::Registry => ErrorCategory::Configuration,
                crate::domain::ErrorCategory::Internal => ErrorCategory::Internal,
            },
            Self::Application(e) => e.category(),
        }
    }

    /// The rejected write's violations, if this is a rejection.
    pub fn violations(&self) -> Option<&[crate::application::ErrorReport]> {
        match self {
            Self::Application(ApplicationError::WriteRejected { errors, .. }) => Some(errors),
            _ => None,
        }
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Schema,
    NotFound,
    Configuration,
    Internal,
}

/// Convenient result type alias.
pub type RowguardResult<T> = Result<T, RowguardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_exposes_violations() {
        let err: RowguardError = ApplicationError::WriteRejected {
            model: "User".into(),
            errors: vec![crate::application::ErrorReport {
                model: Some("User".into()),
                column: Some("Name".into()),
                message: "Name can't be blank".into(),
                label: Some("User_1_Name".into()),
            }],
        }
        .into();

        assert_eq!(err.category(), ErrorCategory::Validation);
        assert_eq!(err.violations().map(<[_]>::len), Some(1));
        assert!(err.to_string().contains("Name can't be blank"));
    }

    #[test]
    fn registry_errors_are_configuration() {
        let err: RowguardError = DomainError::UnregisteredRule { name: "slug".into() }.into();
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert!(!err.suggestions().is_empty());
    }

    #[test]
    fn lock_errors_are_internal() {
        let store: RowguardError = ApplicationError::StoreLock.into();
        let registry: RowguardError = DomainError::RegistryLock.into();
        assert_eq!(store.category(), ErrorCategory::Internal);
        assert_eq!(registry.category(), ErrorCategory::Internal);
        assert_eq!(registry.violations(), None);
    }
}
