//! Reflective access to a record instance.
//!
//! The persistence layer owns the record types; this trait is the only view
//! the validation core needs of them: the declared schema, the current value
//! of each field, and whether the type carries its own validation method.

use std::fmt;

use crate::application::Validatable;
use crate::domain::{entities::schema::ModelSchema, error::DomainError, value_objects::FieldValue};

/// A record that can be validated before it is written.
///
/// ```rust
/// use std::sync::LazyLock;
/// use rowguard_core::domain::{FieldValue, ModelSchema, Record, Rule};
///
/// static USER: LazyLock<ModelSchema> = LazyLock::new(|| {
///     ModelSchema::builder("User")
///         .primary_key("ID")
///         .field("Name", [Rule::Required])
///         .build()
///         .expect("static schema")
/// });
///
/// #[derive(Debug)]
/// struct User { id: i64, name: String }
///
/// impl Record for User {
///     fn schema(&self) -> &ModelSchema { &USER }
///     fn value(&self, field: &str) -> Option<FieldValue> {
///         match field {
///             "ID" => Some(self.id.into()),
///             "Name" => Some(self.name.as_str().into()),
///             _ => None,
///         }
///     }
/// }
/// ```
pub trait Record: fmt::Debug {
    /// The declaration of this record's type.
    fn schema(&self) -> &ModelSchema;

    /// Current value of `field`, or `None` if the record has no such field.
    fn value(&self, field: &str) -> Option<FieldValue>;

    /// The record's own validation method, if its type declares one.
    fn as_validatable(&self) -> Option<&dyn Validatable> {
        None
    }

    fn model_name(&self) -> &str {
        self.schema().model()
    }

    /// Values of the primary-key fields, in declaration order.
    ///
    /// # Errors
    ///
    /// - `MissingPrimaryKey` if the schema declares no key
    /// - `UnknownField` if a declared key cannot be read
    fn primary_key_values(&self) -> Result<Vec<FieldValue>, DomainError> {
        let schema = self.schema();
        let values = schema
            .primary_keys()
            .map(|key| {
                self.value(&key.name).ok_or_else(|| DomainError::UnknownField {
                    model: schema.model().to_string(),
                    field: key.name.clone(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if values.is_empty() {
            return Err(DomainError::MissingPrimaryKey {
                model: schema.model().to_string(),
            });
        }
        Ok(values)
    }

    /// Primary key rendered as text; composite keys as `[a b]`.
    fn primary_key(&self) -> Result<String, DomainError> {
        let values = self.primary_key_values()?;
        Ok(match values.as_slice() {
            [single] => single.to_string(),
            many => format!(
                "[{}]",
                many.iter()
                    .map(FieldValue::to_string)
                    .collect::<Vec<_>>()
                    .join(" ")
            ),
        })
    }
}
