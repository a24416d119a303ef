//! Application layer for rowguard.
//!
//! This layer contains:
//! - **Services**: the pre-write `ValidationHook`
//! - **Ports**: what the hook needs to know about the write it guards
//! - **Operation state**: the ordered errors collected for one write
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! rule logic itself. Rules and messages live in `crate::domain`.

pub mod error;
pub mod operation;
pub mod ports;
pub mod services;
pub mod validatable;

pub use services::{SkipReason, ValidationHook};

pub use operation::{ErrorReport, OperationError, OperationErrors};
pub use validatable::{Validatable, ValidationScope};

// Re-export port traits (for adapter implementation)
pub use ports::{SKIP_VALIDATIONS_KEY, WriteContext};

pub use error::ApplicationError;
