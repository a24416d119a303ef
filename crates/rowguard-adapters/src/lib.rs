//! Infrastructure adapters for rowguard.
//!
//! This crate implements the ports defined in `rowguard-core::application::ports`
//! and wires the validation hook into a write lifecycle. It contains all I/O.

pub mod builtin_rules;
pub mod callbacks;
pub mod context;
pub mod record;
pub mod schema_loader;
pub mod store;

// Re-export commonly used adapters
pub use builtin_rules::{BUILTIN_RULES, register_builtin_rules};
pub use callbacks::{CallbackChain, VALIDATE_CALLBACK, register_callbacks};
pub use context::{WriteOperation, WriteOptions};
pub use record::DynamicRecord;
pub use schema_loader::{SchemaCatalog, SchemaLoader};
pub use store::InMemoryStore;
