//! Driven (output) ports - implemented by the persistence layer.
//!
//! These traits define what the hook needs to know about the write it is
//! guarding. The `rowguard-adapters` crate provides an implementation.

use crate::domain::WriteKind;

/// Setting key of the per-operation opt-out flag.
pub const SKIP_VALIDATIONS_KEY: &str = "validations:skip_validations";

/// Port for the write operation being validated.
///
/// Implemented by:
/// - `rowguard_adapters::WriteOperation` (in-memory store / callback chain)
///
/// ## Design Notes
///
/// - Read-only: the hook never mutates the operation through this port; it
///   returns the errors it collected and the caller decides to abort
/// - Synchronous: the hook runs inline, before the write commits
#[cfg_attr(test, mockall::automock)]
pub trait WriteContext {
    /// Which lifecycle (create or update) triggered the hook.
    fn write_kind(&self) -> WriteKind;

    /// `true` when only specific columns are written, not the whole record.
    fn is_partial_update(&self) -> bool;

    /// The per-operation opt-out flag (`SKIP_VALIDATIONS_KEY`).
    fn skip_validations(&self) -> bool;

    /// `true` if the operation already failed before the hook ran.
    fn has_error(&self) -> bool;
}
