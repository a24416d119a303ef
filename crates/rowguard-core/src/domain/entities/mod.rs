pub mod failure;
pub mod record;
pub mod rule;
pub mod schema;
pub mod validation_error;

pub use crate::domain::DomainError;
pub use failure::RuleFailure;
pub use record::Record;
pub use rule::Rule;
pub use schema::{FieldDef, ModelSchema, ModelSchemaBuilder};
pub use validation_error::ValidationError;
