//! Application services - orchestrate use cases.
//!
//! The validation hook coordinates the domain rule engine and the
//! `WriteContext` port to decide whether a write may commit.

pub mod validation_hook;

pub use validation_hook::{SkipReason, ValidationHook};
