//! Ready-made custom rules.
//!
//! These are ordinary registry entries, referenced from schemas as
//! `{ rule = "custom", name = "alphanumeric" }`. Call
//! [`register_builtin_rules`] once at start-up.

use tracing::debug;

use rowguard_core::{
    domain::{FieldValue, RuleContext, RuleRegistry},
    error::RowguardResult,
};

/// Names and descriptions of the rules [`register_builtin_rules`] installs.
pub const BUILTIN_RULES: [(&str, &str); 6] = [
    ("alpha", "letters only"),
    ("alphanumeric", "letters and digits only"),
    ("lowercase", "no uppercase letters"),
    ("uppercase", "no lowercase letters"),
    ("ascii", "ASCII characters only"),
    ("positive", "a number greater than zero"),
];

/// Register every built-in rule in `registry`.
///
/// Re-registering replaces earlier predicates of the same name.
pub fn register_builtin_rules(registry: &RuleRegistry) -> RowguardResult<()> {
    registry.register("alpha", |v: &FieldValue, _: &RuleContext<'_>| {
        Ok(v.to_text().chars().all(char::is_alphabetic))
    })?;
    registry.register("alphanumeric", |v: &FieldValue, _: &RuleContext<'_>| {
        Ok(v.to_text().chars().all(char::is_alphanumeric))
    })?;
    registry.register("lowercase", |v: &FieldValue, _: &RuleContext<'_>| {
        Ok(!v.to_text().chars().any(char::is_uppercase))
    })?;
    registry.register("uppercase", |v: &FieldValue, _: &RuleContext<'_>| {
        Ok(!v.to_text().chars().any(char::is_lowercase))
    })?;
    registry.register("ascii", |v: &FieldValue, _: &RuleContext<'_>| {
        Ok(v.to_text().is_ascii())
    })?;
    registry.register("positive", |v: &FieldValue, _: &RuleContext<'_>| {
        Ok(match v {
            FieldValue::Int(i) => *i > 0,
            FieldValue::Float(f) => *f > 0.0,
            FieldValue::Text(s) => s.trim().parse::<f64>().is_ok_and(|f| f > 0.0),
            FieldValue::Bool(_) | FieldValue::Null => false,
        })
    })?;

    debug!(count = BUILTIN_RULES.len(), "Registered built-in rules");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::LazyLock;

    use rowguard_core::domain::{ModelSchema, Record};

    use super::*;

    static NOTE: LazyLock<ModelSchema> =
        LazyLock::new(|| ModelSchema::builder("Note").column("Body").build().unwrap());

    #[derive(Debug)]
    struct Note;

    impl Record for Note {
        fn schema(&self) -> &ModelSchema {
            &NOTE
        }
        fn value(&self, _: &str) -> Option<FieldValue> {
            None
        }
    }

    fn check(registry: &RuleRegistry, rule: &str, value: impl Into<FieldValue>) -> bool {
        let note = Note;
        let predicate = registry.get(rule).unwrap().unwrap();
        predicate
            .check(&value.into(), &RuleContext::new(&note, "Body"))
            .unwrap()
    }

    #[test]
    fn registers_every_listed_rule() {
        let registry = RuleRegistry::new();
        register_builtin_rules(&registry).unwrap();

        let names: Vec<_> = BUILTIN_RULES.iter().map(|(n, _)| n.to_string()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(registry.names().unwrap(), sorted);
    }

    #[test]
    fn predicates_behave() {
        let registry = RuleRegistry::new();
        register_builtin_rules(&registry).unwrap();

        assert!(check(&registry, "alpha", "abcÉ"));
        assert!(!check(&registry, "alpha", "ab1"));
        assert!(check(&registry, "alphanumeric", "ab1"));
        assert!(!check(&registry, "alphanumeric", "a-b"));
        assert!(check(&registry, "lowercase", "abc-1"));
        assert!(!check(&registry, "lowercase", "aBc"));
        assert!(check(&registry, "uppercase", "ABC"));
        assert!(!check(&registry, "ascii", "naïve"));
        assert!(check(&registry, "positive", FieldValue::Int(3)));
        assert!(check(&registry, "positive", " 2.5 "));
        assert!(!check(&registry, "positive", FieldValue::Int(0)));
        assert!(!check(&registry, "positive", "x"));
    }
}
