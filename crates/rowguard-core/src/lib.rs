//! Rowguard Core - pre-write record validation
//!
//! This crate provides the domain and application layers of rowguard: typed
//! constraint declarations on model fields, a rule evaluator with a
//! process-wide registry of named custom rules, and a hook that runs before
//! every create or update and collects field-level errors.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           rowguard-cli (CLI)            │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │   rowguard-adapters (Infrastructure)    │
//! │ (CallbackChain, InMemoryStore, loaders) │
//! └──────────────────┬──────────────────────┘
//!                    │ drives
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │  (ValidationHook, WriteContext port)    │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ (ModelSchema, Rule, RuleEvaluator, ...) │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use rowguard_core::prelude::*;
//!
//! let hook = ValidationHook::new();
//! let errors = hook.validate(&[&user], &operation)?;
//! if !errors.is_empty() {
//!     // abort the write
//! }
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        ErrorReport, OperationError, OperationErrors, SKIP_VALIDATIONS_KEY, Validatable,
        ValidationHook, ValidationScope, WriteContext,
    };
    pub use crate::domain::{
        FieldDef, FieldValue, ModelSchema, Record, Rule, RuleContext, RuleKind, RuleRegistry,
        ValidationError, WriteKind, register_rule,
    };
    pub use crate::error::{RowguardError, RowguardResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
