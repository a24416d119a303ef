//! Rule evaluation: record + declarations → ordered raw failures.
//!
//! # Ordering
//!
//! Failures come out in field-declaration order, and within a field in rule
//! order. For a collection, record order is the outer order. Passing rules
//! produce nothing.
//!
//! # Zero values
//!
//! Only `required` looks at zero values. `length`, `numeric` and `email` pass
//! on a zero value so that an optional field may be left empty; declare
//! `required` alongside them when the field is mandatory. Custom predicates
//! always receive the value and decide for themselves.

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::{
    entities::{failure::RuleFailure, record::Record, rule::Rule},
    error::DomainError,
    rules::registry::{RuleContext, RuleRegistry},
    value_objects::FieldValue,
};

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)+$",
    )
    .expect("email pattern is a valid regex")
});

/// Evaluates declared rules against record values.
#[derive(Debug, Clone, Copy)]
pub struct RuleEvaluator<'a> {
    registry: &'a RuleRegistry,
}

impl<'a> RuleEvaluator<'a> {
    pub fn new(registry: &'a RuleRegistry) -> Self {
        Self { registry }
    }

    /// Evaluate every declared rule of one record.
    ///
    /// `None` (no instance supplied) yields no failures.
    ///
    /// # Errors
    ///
    /// - `UnknownField` if a constrained field cannot be read from the record
    /// - `UnregisteredRule` if a custom rule has no predicate registered
    pub fn evaluate(&self, record: Option<&dyn Record>) -> Result<Vec<RuleFailure>, DomainError> {
        let Some(record) = record else {
            return Ok(Vec::new());
        };

        let schema = record.schema();
        let mut failures = Vec::new();

        for field in schema.constrained_fields() {
            let value = record
                .value(&field.name)
                .ok_or_else(|| DomainError::UnknownField {
                    model: schema.model().to_string(),
                    field: field.name.clone(),
                })?;

            for rule in &field.rules {
                if let Some(failure) = self.check(record, &field.name, rule, &value)? {
                    failures.push(failure);
                }
            }
        }

        Ok(failures)
    }

    /// Evaluate a homogeneous collection, pairing each failure with its record.
    pub fn evaluate_all<'r>(
        &self,
        records: &[&'r dyn Record],
    ) -> Result<Vec<(&'r dyn Record, RuleFailure)>, DomainError> {
        let mut out = Vec::new();
        for &record in records {
            out.extend(
                self.evaluate(Some(record))?
                    .into_iter()
                    .map(|failure| (record, failure)),
            );
        }
        Ok(out)
    }

    fn check(
        &self,
        record: &dyn Record,
        field: &str,
        rule: &Rule,
        value: &FieldValue,
    ) -> Result<Option<RuleFailure>, DomainError> {
        let fail = |raw: String| Some(RuleFailure::new(field, rule.clone(), raw));
        let does_not_validate = || format!("{field}: {value} does not validate as {rule}");

        let failure = match rule {
            Rule::Required => value
                .is_zero()
                .then(|| format!("{field}: non zero value required"))
                .and_then(fail),
            _ if value.is_zero() && !matches!(rule, Rule::Custom { .. }) => None,
            Rule::Length { min, max } => {
                let len = value.to_text().chars().count();
                (len < *min || len > *max)
                    .then(does_not_validate)
                    .and_then(fail)
            }
            Rule::Numeric => (!is_numeric(value)).then(does_not_validate).and_then(fail),
            Rule::Email => (!is_email(value)).then(does_not_validate).and_then(fail),
            Rule::Custom { name } => {
                let predicate =
                    self.registry
                        .get(name)?
                        .ok_or_else(|| DomainError::UnregisteredRule {
                            name: name.clone(),
                        })?;
                match predicate.check(value, &RuleContext::new(record, field)) {
                    Ok(true) => None,
                    Ok(false) => fail(does_not_validate()),
                    Err(e) => fail(format!("{field}: {name} could not be evaluated: {e}")),
                }
            }
        };

        Ok(failure)
    }
}

fn is_numeric(value: &FieldValue) -> bool {
    match value {
        FieldValue::Int(_) => true,
        FieldValue::Float(f) => f.is_finite(),
        FieldValue::Text(s) => s.parse::<f64>().is_ok_and(f64::is_finite),
        FieldValue::Bool(_) | FieldValue::Null => false,
    }
}

fn is_email(value: &FieldValue) -> bool {
    value.as_str().is_some_and(|s| EMAIL_REGEX.is_match(s))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::domain::{ModelSchema, rules::registry::PredicateError};

    #[derive(Debug)]
    struct Row {
        schema: ModelSchema,
        values: HashMap<&'static str, FieldValue>,
    }

    impl Record for Row {
        fn schema(&self) -> &ModelSchema {
            &self.schema
        }
        fn value(&self, field: &str) -> Option<FieldValue> {
            self.values.get(field).cloned()
        }
    }

    fn row(schema: ModelSchema, values: &[(&'static str, FieldValue)]) -> Row {
        Row {
            schema,
            values: values.iter().cloned().collect(),
        }
    }

    fn single(rule: Rule, value: FieldValue) -> Vec<RuleFailure> {
        let schema = ModelSchema::builder("T").field("F", [rule]).build().unwrap();
        let record = row(schema, &[("F", value)]);
        RuleEvaluator::new(&RuleRegistry::new())
            .evaluate(Some(&record))
            .unwrap()
    }

    #[test]
    fn required_fails_on_zero_values() {
        assert_eq!(single(Rule::Required, "".into()).len(), 1);
        assert_eq!(single(Rule::Required, FieldValue::Int(0)).len(), 1);
        assert_eq!(single(Rule::Required, FieldValue::Null).len(), 1);
        assert!(single(Rule::Required, "x".into()).is_empty());
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        assert!(single(Rule::length(2, 3), "héé".into()).is_empty());
        assert_eq!(single(Rule::length(2, 3), "héllo".into()).len(), 1);
        assert_eq!(single(Rule::length(6, 20), "123".into()).len(), 1);
    }

    #[test]
    fn optional_rules_pass_on_empty_value() {
        assert!(single(Rule::length(6, 20), "".into()).is_empty());
        assert!(single(Rule::Numeric, FieldValue::Null).is_empty());
        assert!(single(Rule::Email, "".into()).is_empty());
    }

    #[test]
    fn numeric_accepts_numbers_and_numeric_text() {
        assert!(single(Rule::Numeric, "12.5".into()).is_empty());
        assert!(single(Rule::Numeric, "-3".into()).is_empty());
        assert!(single(Rule::Numeric, FieldValue::Int(9)).is_empty());
        assert_eq!(single(Rule::Numeric, "12a".into()).len(), 1);
        assert_eq!(single(Rule::Numeric, "NaN".into()).len(), 1);
        assert_eq!(single(Rule::Numeric, FieldValue::Bool(true)).len(), 1);
    }

    #[test]
    fn email_pattern() {
        assert!(single(Rule::Email, "jane@example.com".into()).is_empty());
        assert_eq!(single(Rule::Email, "jane@".into()).len(), 1);
        assert_eq!(single(Rule::Email, "jane.example.com".into()).len(), 1);
        assert_eq!(single(Rule::Email, "jane@localhost".into()).len(), 1);
    }

    #[test]
    fn failures_follow_declaration_order() {
        let schema = ModelSchema::builder("User")
            .field("Name", [Rule::Required])
            .field("Password", [Rule::length(6, 20)])
            .build()
            .unwrap();
        let record = row(schema, &[("Name", "".into()), ("Password", "123".into())]);

        let failures = RuleEvaluator::new(&RuleRegistry::new())
            .evaluate(Some(&record))
            .unwrap();

        let fields: Vec<_> = failures.iter().map(RuleFailure::field).collect();
        assert_eq!(fields, ["Name", "Password"]);
        assert_eq!(failures[1].raw_message(), "Password: 123 does not validate as length(6|20)");
    }

    #[test]
    fn absent_record_yields_nothing() {
        let failures = RuleEvaluator::new(&RuleRegistry::new()).evaluate(None).unwrap();
        assert!(failures.is_empty());
    }

    #[test]
    fn unreadable_field_is_structural() {
        let schema = ModelSchema::builder("User")
            .field("Ghost", [Rule::Required])
            .build()
            .unwrap();
        let record = row(schema, &[]);
        let err = RuleEvaluator::new(&RuleRegistry::new())
            .evaluate(Some(&record))
            .unwrap_err();
        assert!(matches!(err, DomainError::UnknownField { .. }));
    }

    #[test]
    fn unregistered_custom_rule_is_structural() {
        let err = single_result(Rule::custom("nope"), "x".into()).unwrap_err();
        assert!(matches!(err, DomainError::UnregisteredRule { .. }));
    }

    fn single_result(rule: Rule, value: FieldValue) -> Result<Vec<RuleFailure>, DomainError> {
        let schema = ModelSchema::builder("T").field("F", [rule]).build().unwrap();
        let record = row(schema, &[("F", value)]);
        RuleEvaluator::new(&RuleRegistry::new()).evaluate(Some(&record))
    }

    #[test]
    fn predicate_error_becomes_failure_and_evaluation_continues() {
        let registry = RuleRegistry::new();
        registry
            .register("flaky", |_: &FieldValue, _: &RuleContext<'_>| {
                Err(PredicateError::new("lookup unavailable"))
            })
            .unwrap();

        let schema = ModelSchema::builder("T")
            .field("A", [Rule::custom("flaky")])
            .field("B", [Rule::Required])
            .build()
            .unwrap();
        let record = row(schema, &[("A", "x".into()), ("B", "".into())]);

        let failures = RuleEvaluator::new(&registry).evaluate(Some(&record)).unwrap();
        assert_eq!(failures.len(), 2);
        assert_eq!(
            failures[0].raw_message(),
            "A: flaky could not be evaluated: lookup unavailable"
        );
        assert_eq!(failures[1].field(), "B");
    }

    #[test]
    fn custom_predicate_sees_record_and_field() {
        let registry = RuleRegistry::new();
        registry
            .register("matches_confirm", |v: &FieldValue, ctx: &RuleContext<'_>| {
                Ok(ctx.record().value("Confirm").as_ref() == Some(v) && ctx.field() == "Password")
            })
            .unwrap();

        let schema = ModelSchema::builder("T")
            .field("Password", [Rule::custom("matches_confirm")])
            .column("Confirm")
            .build()
            .unwrap();
        let ok = row(schema.clone(), &[("Password", "a".into()), ("Confirm", "a".into())]);
        let bad = row(schema, &[("Password", "a".into()), ("Confirm", "b".into())]);

        let evaluator = RuleEvaluator::new(&registry);
        assert!(evaluator.evaluate(Some(&ok)).unwrap().is_empty());
        assert_eq!(evaluator.evaluate(Some(&bad)).unwrap().len(), 1);
    }

    #[test]
    fn collection_pairs_failures_with_records_in_order() {
        let schema = ModelSchema::builder("T").field("F", [Rule::Required]).build().unwrap();
        let a = row(schema.clone(), &[("F", "a".into())]);
        let b = row(schema.clone(), &[("F", "".into())]);
        let c = row(schema, &[("F", "".into())]);
        let records: Vec<&dyn Record> = vec![&a, &b, &c];

        let failures = RuleEvaluator::new(&RuleRegistry::new())
            .evaluate_all(&records)
            .unwrap();
        assert_eq!(failures.len(), 2);
        assert!(std::ptr::addr_eq(failures[0].0, &b as &dyn Record));
        assert!(std::ptr::addr_eq(failures[1].0, &c as &dyn Record));
    }
}
