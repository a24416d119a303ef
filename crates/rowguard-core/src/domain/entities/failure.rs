use crate::domain::{
    entities::{record::Record, rule::Rule, validation_error::ValidationError},
    rules::formatter::format_message,
    value_objects::RuleKind,
};

/// A constraint that did not pass, before message formatting.
///
/// Carries the rule itself so the formatter can dispatch on its kind and
/// parameters instead of inspecting message text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleFailure {
    field: String,
    rule: Rule,
    raw_message: String,
}

impl RuleFailure {
    pub fn new(field: impl Into<String>, rule: Rule, raw_message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            rule,
            raw_message: raw_message.into(),
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    pub fn rule_kind(&self) -> RuleKind {
        self.rule.kind()
    }

    pub fn rule_params(&self) -> Vec<(&'static str, String)> {
        self.rule.params()
    }

    pub fn raw_message(&self) -> &str {
        &self.raw_message
    }

    /// Format this failure and attach it to the record it came from.
    pub fn into_validation_error<'r>(self, resource: &'r dyn Record) -> ValidationError<'r> {
        let message = format_message(&self);
        ValidationError::new(resource, self.field, message)
    }
}
