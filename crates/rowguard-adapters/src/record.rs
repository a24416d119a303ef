//! Schema-driven records built from JSON.
//!
//! Used wherever the record type is only known at run time (the CLI reads
//! records from a JSON file and their declarations from a schema file).

use std::{collections::HashMap, sync::Arc};

use serde_json::{Map, Value};

use rowguard_core::{
    application::ApplicationError,
    domain::{FieldValue, ModelSchema, Record},
    error::RowguardResult,
};

/// A record backed by a schema and a field → value map.
#[derive(Debug, Clone)]
pub struct DynamicRecord {
    schema: Arc<ModelSchema>,
    values: HashMap<String, FieldValue>,
}

impl DynamicRecord {
    /// Empty record: every declared field reads as `Null`.
    pub fn new(schema: Arc<ModelSchema>) -> Self {
        Self {
            schema,
            values: HashMap::new(),
        }
    }

    /// Build a record from a JSON object.
    ///
    /// Declared fields absent from the object read as `Null`. Keys the schema
    /// does not declare are kept and readable.
    ///
    /// # Errors
    ///
    /// `InvalidRecord` if `value` is not an object or holds a nested array or
    /// object.
    pub fn from_json(schema: Arc<ModelSchema>, value: &Value) -> RowguardResult<Self> {
        let Value::Object(object) = value else {
            return Err(invalid(format!(
                "{} record must be a JSON object, got {}",
                schema.model(),
                kind_of(value)
            )));
        };
        Self::from_map(schema, object)
    }

    fn from_map(schema: Arc<ModelSchema>, object: &Map<String, Value>) -> RowguardResult<Self> {
        let mut record = Self::new(schema);
        for (key, value) in object {
            let value = scalar(value).ok_or_else(|| {
                invalid(format!(
                    "field '{}' of {} holds a nested {}",
                    key,
                    record.schema.model(),
                    kind_of(value)
                ))
            })?;
            record.values.insert(key.clone(), value);
        }
        Ok(record)
    }

    /// Set one field.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.values.insert(field.into(), value.into());
        self
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) {
        self.values.insert(field.into(), value.into());
    }

    pub fn schema_arc(&self) -> &Arc<ModelSchema> {
        &self.schema
    }
}

impl Record for DynamicRecord {
    fn schema(&self) -> &ModelSchema {
        &self.schema
    }

    fn value(&self, field: &str) -> Option<FieldValue> {
        match self.values.get(field) {
            Some(value) => Some(value.clone()),
            None if self.schema.field(field).is_some() => Some(FieldValue::Null),
            None => None,
        }
    }
}

fn scalar(value: &Value) -> Option<FieldValue> {
    match value {
        Value::Null => Some(FieldValue::Null),
        Value::Bool(b) => Some(FieldValue::Bool(*b)),
        Value::Number(n) => Some(match n.as_i64() {
            Some(i) => FieldValue::Int(i),
            None => FieldValue::Float(n.as_f64()?),
        }),
        Value::String(s) => Some(FieldValue::Text(s.clone())),
        Value::Array(_) | Value::Object(_) => None,
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn invalid(reason: String) -> rowguard_core::error::RowguardError {
    ApplicationError::InvalidRecord { reason }.into()
}

#[cfg(test)]
mod tests {
    use rowguard_core::domain::Rule;
    use serde_json::json;

    use super::*;

    fn schema() -> Arc<ModelSchema> {
        Arc::new(
            ModelSchema::builder("User")
                .primary_key("ID")
                .field("Name", [Rule::Required])
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn reads_scalars_from_json() {
        let record =
            DynamicRecord::from_json(schema(), &json!({"ID": 7, "Name": "ann", "Score": 1.5}))
                .unwrap();

        assert_eq!(record.value("ID"), Some(FieldValue::Int(7)));
        assert_eq!(record.value("Name"), Some(FieldValue::from("ann")));
        assert_eq!(record.value("Score"), Some(FieldValue::Float(1.5)));
        assert_eq!(record.primary_key().unwrap(), "7");
    }

    #[test]
    fn declared_but_missing_fields_read_as_null() {
        let record = DynamicRecord::from_json(schema(), &json!({"ID": 1})).unwrap();
        assert_eq!(record.value("Name"), Some(FieldValue::Null));
        assert_eq!(record.value("Nickname"), None);
    }

    #[test]
    fn nested_values_are_rejected() {
        let err = DynamicRecord::from_json(schema(), &json!({"ID": 1, "Name": ["a"]}))
            .unwrap_err();
        assert!(err.to_string().contains("nested array"));
    }

    #[test]
    fn non_object_is_rejected() {
        let err = DynamicRecord::from_json(schema(), &json!("ann")).unwrap_err();
        assert!(err.to_string().contains("must be a JSON object"));
    }
}
