// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for rowguard.
//!
//! This module contains the validation model: typed constraint declarations,
//! the rule evaluator, the message formatter and the validation error.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, network, or storage calls
//! - **No tracing**: Observability belongs to the application and CLI layers
//! - **Immutable declarations**: Schemas are read, never mutated, during evaluation
//!
// Public API - what the world sees
pub mod entities;
pub mod error;
pub mod rules;
pub mod value_objects;

// Re-exports for convenience
pub use entities::{
    FieldDef, ModelSchema, ModelSchemaBuilder, Record, Rule, RuleFailure, ValidationError,
};

pub use error::{DomainError, ErrorCategory};

pub use rules::{
    PredicateError, RuleContext, RuleEvaluator, RulePredicate, RuleRegistry, format_message,
    register_rule,
};

pub use value_objects::{FieldValue, RuleKind, WriteKind};

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    // ========================================================================
    // Value Object Tests
    // ========================================================================

    #[test]
    fn rule_kind_parses_correctly() {
        assert_eq!(RuleKind::from_str("required").unwrap(), RuleKind::Required);
        assert_eq!(RuleKind::from_str("EMAIL").unwrap(), RuleKind::Email);
        assert!(RuleKind::from_str("unique").is_err());
    }

    #[test]
    fn builtin_kinds_exclude_custom() {
        assert!(RuleKind::BUILTIN.iter().all(|k| k.is_builtin()));
        assert!(!RuleKind::Custom.is_builtin());
    }

    #[test]
    fn write_kind_aliases() {
        assert_eq!(WriteKind::from_str("insert").unwrap(), WriteKind::Create);
        assert_eq!(WriteKind::from_str("update").unwrap(), WriteKind::Update);
        assert!(WriteKind::from_str("delete").is_err());
    }

    #[test]
    fn zero_values() {
        assert!(FieldValue::Null.is_zero());
        assert!(FieldValue::Bool(false).is_zero());
        assert!(FieldValue::Int(0).is_zero());
        assert!(FieldValue::Float(0.0).is_zero());
        assert!(FieldValue::from("").is_zero());
        assert!(!FieldValue::from("a").is_zero());
        assert!(!FieldValue::Int(-1).is_zero());
    }

    #[test]
    fn field_value_text_rendering() {
        assert_eq!(FieldValue::Null.to_text(), "");
        assert_eq!(FieldValue::Int(12).to_text(), "12");
        assert_eq!(FieldValue::Null.to_string(), "null");
        assert_eq!(FieldValue::from(Some("x")), FieldValue::from("x"));
        assert_eq!(FieldValue::from(None::<i64>), FieldValue::Null);
    }

    #[test]
    fn field_value_deserializes_untagged() {
        let values: Vec<FieldValue> =
            serde_json::from_str(r#"[null, true, 3, 2.5, "hi"]"#).unwrap();
        assert_eq!(
            values,
            vec![
                FieldValue::Null,
                FieldValue::Bool(true),
                FieldValue::Int(3),
                FieldValue::Float(2.5),
                FieldValue::Text("hi".into()),
            ]
        );
    }
}
