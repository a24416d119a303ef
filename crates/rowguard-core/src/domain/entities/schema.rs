//! Model schemas: the declared fields of a record type and their constraints.
//!
//! A `ModelSchema` is built once per model type and only read afterwards.
//! Field order is significant: it is the order in which rules are evaluated
//! and therefore the order in which violations are reported.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::domain::{entities::rule::Rule, error::DomainError};

// ============================================================================
// FieldDef
// ============================================================================

/// One declared field of a model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    #[serde(default)]
    pub primary_key: bool,
    #[serde(default)]
    pub rules: Vec<Rule>,
}

impl FieldDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            primary_key: false,
            rules: Vec::new(),
        }
    }

    pub fn is_constrained(&self) -> bool {
        !self.rules.is_empty()
    }
}

// ============================================================================
// ModelSchema
// ============================================================================

/// The declaration of a record type: its name and its ordered fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSchema {
    pub model: String,
    #[serde(default)]
    pub fields: Vec<FieldDef>,
}

impl ModelSchema {
    pub fn builder(model: impl Into<String>) -> ModelSchemaBuilder {
        ModelSchemaBuilder::new(model)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Fields carrying at least one rule, in declaration order.
    pub fn constrained_fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter().filter(|f| f.is_constrained())
    }

    /// Primary-key fields, in declaration order.
    pub fn primary_keys(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter().filter(|f| f.primary_key)
    }

    pub fn rule_count(&self) -> usize {
        self.fields.iter().map(|f| f.rules.len()).sum()
    }

    /// Check internal consistency.
    ///
    /// Called by the builder. Available for re-validation after
    /// deserialization.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.model.trim().is_empty() {
            return Err(DomainError::InvalidSchema(
                "model name cannot be empty".into(),
            ));
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            if field.name.trim().is_empty() {
                return Err(DomainError::InvalidSchema(format!(
                    "model '{}' declares a field with an empty name",
                    self.model
                )));
            }
            if !seen.insert(field.name.as_str()) {
                return Err(DomainError::DuplicateField {
                    model: self.model.clone(),
                    field: field.name.clone(),
                });
            }
            for rule in &field.rules {
                validate_rule(&field.name, rule)?;
            }
        }

        Ok(())
    }
}

fn validate_rule(field: &str, rule: &Rule) -> Result<(), DomainError> {
    match rule {
        Rule::Length { min, max } if min > max => Err(DomainError::InvalidRule {
            field: field.to_string(),
            reason: format!("length min ({min}) exceeds max ({max})"),
        }),
        Rule::Custom { name } if name.trim().is_empty() => Err(DomainError::InvalidRule {
            field: field.to_string(),
            reason: "custom rule name cannot be empty".into(),
        }),
        _ => Ok(()),
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`ModelSchema`].
///
/// ```rust
/// use rowguard_core::domain::{ModelSchema, Rule};
///
/// let schema = ModelSchema::builder("User")
///     .primary_key("ID")
///     .field("Name", [Rule::Required])
///     .field("Password", [Rule::length(6, 20)])
///     .build()
///     .unwrap();
///
/// assert_eq!(schema.fields().len(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct ModelSchemaBuilder {
    model: String,
    fields: Vec<FieldDef>,
}

impl ModelSchemaBuilder {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            fields: Vec::new(),
        }
    }

    /// Declare a primary-key field.
    pub fn primary_key(mut self, name: impl Into<String>) -> Self {
        let mut def = FieldDef::new(name);
        def.primary_key = true;
        self.fields.push(def);
        self
    }

    /// Declare a field with its rules.
    pub fn field(mut self, name: impl Into<String>, rules: impl IntoIterator<Item = Rule>) -> Self {
        let mut def = FieldDef::new(name);
        def.rules.extend(rules);
        self.fields.push(def);
        self
    }

    /// Declare an unconstrained field.
    pub fn column(self, name: impl Into<String>) -> Self {
        self.field(name, [])
    }

    /// Consume builder and construct `ModelSchema`.
    ///
    /// # Errors
    ///
    /// - `InvalidSchema` if the model or a field name is empty
    /// - `DuplicateField` if a field is declared twice
    /// - `InvalidRule` if a rule's parameters are inconsistent
    pub fn build(self) -> Result<ModelSchema, DomainError> {
        let schema = ModelSchema {
            model: self.model,
            fields: self.fields,
        };
        schema.validate()?;
        Ok(schema)
    }
}
