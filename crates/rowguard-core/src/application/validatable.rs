//! Custom per-model validation.

use crate::application::{
    operation::{OperationError, OperationErrors},
    ports::WriteContext,
};

/// A model's own validation method.
///
/// Implement this and return `Some(self)` from
/// [`Record::as_validatable`](crate::domain::Record::as_validatable). The
/// hook runs it before any declarative rule.
///
/// Errors may be added through the scope, returned, or both; added errors are
/// recorded first.
///
/// ```rust,ignore
/// impl Validatable for User {
///     fn validate<'r>(
///         &'r self,
///         scope: &mut ValidationScope<'_, 'r>,
///     ) -> Result<(), OperationError<'r>> {
///         if self.name == "invalid" {
///             scope.add_error(ValidationError::new(self, "Name", "invalid user name"));
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Validatable {
    fn validate<'r>(&'r self, scope: &mut ValidationScope<'_, 'r>)
    -> Result<(), OperationError<'r>>;
}

/// The active operation as seen by a custom validator.
pub struct ValidationScope<'a, 'r> {
    context: &'a dyn WriteContext,
    errors: &'a mut OperationErrors<'r>,
}

impl<'a, 'r> ValidationScope<'a, 'r> {
    pub fn new(context: &'a dyn WriteContext, errors: &'a mut OperationErrors<'r>) -> Self {
        Self { context, errors }
    }

    /// The write being validated.
    pub fn context(&self) -> &dyn WriteContext {
        self.context
    }

    /// Append an error to the operation.
    pub fn add_error(&mut self, error: impl Into<OperationError<'r>>) {
        self.errors.push(error);
    }

    /// Errors recorded so far in this operation.
    pub fn errors(&self) -> &OperationErrors<'r> {
        &*self.errors
    }
}
