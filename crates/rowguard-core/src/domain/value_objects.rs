//! Domain value objects: FieldValue, RuleKind, WriteKind.
//!
//! # Design
//!
//! These are pure value types, equality-by-value, no identity. `FieldValue`
//! is the only shape in which the evaluator ever sees a record's data, so
//! every rule is written against it rather than against concrete model types.

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

// ── FieldValue ───────────────────────────────────────────────────────────────

/// The current value of one record field, as seen by the rule evaluator.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl FieldValue {
    /// Whether this is the zero value of its type (`null`, `false`, `0`, `0.0`, `""`).
    ///
    /// `required` fails on exactly these values.
    pub fn is_zero(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Bool(b) => !b,
            Self::Int(i) => *i == 0,
            Self::Float(f) => *f == 0.0,
            Self::Text(s) => s.is_empty(),
        }
    }

    /// Text rendering used by text-oriented rules. `Null` renders empty.
    pub fn to_text(&self) -> Cow<'_, str> {
        match self {
            Self::Null => Cow::Borrowed(""),
            Self::Text(s) => Cow::Borrowed(s.as_str()),
            Self::Bool(b) => Cow::Owned(b.to_string()),
            Self::Int(i) => Cow::Owned(i.to_string()),
            Self::Float(f) => Cow::Owned(f.to_string()),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&String> for FieldValue {
    fn from(s: &String) -> Self {
        Self::Text(s.clone())
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for FieldValue {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<u32> for FieldValue {
    fn from(i: u32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

// ── RuleKind ─────────────────────────────────────────────────────────────────

/// The kind tag of a rule, without its parameters.
///
/// The message formatter dispatches on this tag, never on message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
    Required,
    Length,
    Numeric,
    Email,
    Custom,
}

impl RuleKind {
    /// Names owned by built-in rules; custom rules may not use them.
    pub const BUILTIN: [RuleKind; 4] = [Self::Required, Self::Length, Self::Numeric, Self::Email];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Length => "length",
            Self::Numeric => "numeric",
            Self::Email => "email",
            Self::Custom => "custom",
        }
    }

    pub const fn is_builtin(self) -> bool {
        !matches!(self, Self::Custom)
    }

    pub const fn description(&self) -> &'static str {
        match self {
            Self::Required => "value must not be its zero value",
            Self::Length => "character count must be within [min, max]",
            Self::Numeric => "value must parse as a number",
            Self::Email => "value must be a syntactically valid email address",
            Self::Custom => "named predicate from the rule registry",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "required" => Ok(Self::Required),
            "length" => Ok(Self::Length),
            "numeric" => Ok(Self::Numeric),
            "email" => Ok(Self::Email),
            "custom" => Ok(Self::Custom),
            other => Err(DomainError::InvalidSchema(format!(
                "unknown rule kind: {other}"
            ))),
        }
    }
}

// ── WriteKind ────────────────────────────────────────────────────────────────

/// The write lifecycle a hook is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteKind {
    Create,
    Update,
}

impl WriteKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
        }
    }
}

impl fmt::Display for WriteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WriteKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "create" | "insert" => Ok(Self::Create),
            "update" | "save" => Ok(Self::Update),
            other => Err(DomainError::InvalidSchema(format!(
                "unknown write kind: {other}"
            ))),
        }
    }
}
