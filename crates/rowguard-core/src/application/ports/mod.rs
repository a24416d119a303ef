//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. The persistence layer (or the adapters in
//! `rowguard-adapters`) implements these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by the hook, implemented by the persistence layer
//!   - `WriteContext`: what the hook may ask about the write it guards
//!
//! - **Driving (Input) Ports**: Called by the persistence layer
//!   - `ValidationHook::validate` and the `Record` / `Validatable` traits

pub mod output;

pub use output::{SKIP_VALIDATIONS_KEY, WriteContext};
