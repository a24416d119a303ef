//! Typed per-field constraint declarations.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::RuleKind;

/// One constraint attached to a field.
///
/// Serialized with a `rule` tag so schema files read naturally:
///
/// ```toml
/// rules = [{ rule = "required" }, { rule = "length", min = 6, max = 20 }]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "lowercase")]
pub enum Rule {
    Required,
    Length { min: usize, max: usize },
    Numeric,
    Email,
    Custom { name: String },
}

impl Rule {
    pub const fn length(min: usize, max: usize) -> Self {
        Self::Length { min, max }
    }

    pub fn custom(name: impl Into<String>) -> Self {
        Self::Custom { name: name.into() }
    }

    pub const fn kind(&self) -> RuleKind {
        match self {
            Self::Required => RuleKind::Required,
            Self::Length { .. } => RuleKind::Length,
            Self::Numeric => RuleKind::Numeric,
            Self::Email => RuleKind::Email,
            Self::Custom { .. } => RuleKind::Custom,
        }
    }

    /// Kind-specific parameters as `(name, value)` pairs.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::Length { min, max } => vec![("min", min.to_string()), ("max", max.to_string())],
            Self::Custom { name } => vec![("name", name.clone())],
            Self::Required | Self::Numeric | Self::Email => Vec::new(),
        }
    }

    /// The name the rule is known by: the kind for built-ins, the registered
    /// name for custom rules.
    pub fn name(&self) -> &str {
        match self {
            Self::Custom { name } => name,
            other => other.kind().as_str(),
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Length { min, max } => write!(f, "length({min}|{max})"),
            other => f.write_str(other.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_renders_with_bounds() {
        assert_eq!(Rule::length(6, 20).to_string(), "length(6|20)");
        assert_eq!(Rule::Required.to_string(), "required");
        assert_eq!(Rule::custom("unique").to_string(), "unique");
    }

    #[test]
    fn params_follow_kind() {
        assert!(Rule::Email.params().is_empty());
        assert_eq!(
            Rule::length(1, 3).params(),
            vec![("min", "1".to_string()), ("max", "3".to_string())]
        );
        assert_eq!(Rule::custom("alpha").kind(), RuleKind::Custom);
    }

    #[test]
    fn deserializes_tagged_form() {
        let rule: Rule = serde_json::from_str(r#"{"rule":"length","min":2,"max":4}"#).unwrap();
        assert_eq!(rule, Rule::length(2, 4));

        let rule: Rule = serde_json::from_str(r#"{"rule":"custom","name":"alpha"}"#).unwrap();
        assert_eq!(rule, Rule::custom("alpha"));
    }
}
