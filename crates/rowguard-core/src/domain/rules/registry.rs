//! Process-wide registry of named custom rule predicates.
//!
//! Predicates are registered once at start-up and looked up by name every
//! time a `Rule::Custom` is evaluated, so a re-registration is visible to the
//! next evaluation. The validation core only reads from the registry.

use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, LazyLock, RwLock},
};

use thiserror::Error;

use crate::domain::{
    entities::record::Record,
    error::DomainError,
    value_objects::{FieldValue, RuleKind},
};

static GLOBAL: LazyLock<Arc<RuleRegistry>> = LazyLock::new(|| Arc::new(RuleRegistry::new()));

/// Error raised by a predicate that could not reach a verdict.
///
/// Surfaced as a failure of the rule that raised it; evaluation of the
/// remaining rules continues.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct PredicateError(String);

impl PredicateError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// What a predicate can see besides the value: the record and the field.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    record: &'a dyn Record,
    field: &'a str,
}

impl<'a> RuleContext<'a> {
    pub fn new(record: &'a dyn Record, field: &'a str) -> Self {
        Self { record, field }
    }

    pub fn record(&self) -> &'a dyn Record {
        self.record
    }

    pub fn field(&self) -> &'a str {
        self.field
    }
}

/// A named custom rule.
pub trait RulePredicate: Send + Sync {
    /// `Ok(true)` passes, `Ok(false)` fails, `Err` fails with the error text.
    fn check(&self, value: &FieldValue, ctx: &RuleContext<'_>) -> Result<bool, PredicateError>;
}

impl<F> RulePredicate for F
where
    F: Fn(&FieldValue, &RuleContext<'_>) -> Result<bool, PredicateError> + Send + Sync,
{
    fn check(&self, value: &FieldValue, ctx: &RuleContext<'_>) -> Result<bool, PredicateError> {
        self(value, ctx)
    }
}

/// Thread-safe name → predicate table.
#[derive(Default)]
pub struct RuleRegistry {
    rules: RwLock<HashMap<String, Arc<dyn RulePredicate>>>,
}

impl RuleRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry used by default hooks.
    pub fn global() -> Arc<Self> {
        Arc::clone(&GLOBAL)
    }

    /// Register (or replace) a closure predicate under `name`.
    pub fn register<F>(&self, name: impl Into<String>, predicate: F) -> Result<(), DomainError>
    where
        F: Fn(&FieldValue, &RuleContext<'_>) -> Result<bool, PredicateError>
            + Send
            + Sync
            + 'static,
    {
        self.register_predicate(name, Arc::new(predicate))
    }

    /// Register (or replace) a predicate object under `name`.
    ///
    /// # Errors
    ///
    /// - `InvalidSchema` if the name is empty
    /// - `RuleNameReserved` if the name belongs to a built-in rule
    pub fn register_predicate(
        &self,
        name: impl Into<String>,
        predicate: Arc<dyn RulePredicate>,
    ) -> Result<(), DomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::InvalidSchema(
                "custom rule name cannot be empty".into(),
            ));
        }
        if RuleKind::BUILTIN.iter().any(|k| k.as_str() == name) {
            return Err(DomainError::RuleNameReserved { name });
        }

        let mut rules = self.rules.write().map_err(|_| DomainError::RegistryLock)?;
        rules.insert(name, predicate);
        Ok(())
    }

    /// Remove a predicate. Returns whether one was registered.
    pub fn unregister(&self, name: &str) -> Result<bool, DomainError> {
        let mut rules = self.rules.write().map_err(|_| DomainError::RegistryLock)?;
        Ok(rules.remove(name).is_some())
    }

    /// The predicate currently registered under `name`.
    pub fn get(&self, name: &str) -> Result<Option<Arc<dyn RulePredicate>>, DomainError> {
        let rules = self.rules.read().map_err(|_| DomainError::RegistryLock)?;
        Ok(rules.get(name).cloned())
    }

    pub fn contains(&self, name: &str) -> Result<bool, DomainError> {
        let rules = self.rules.read().map_err(|_| DomainError::RegistryLock)?;
        Ok(rules.contains_key(name))
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Result<Vec<String>, DomainError> {
        let rules = self.rules.read().map_err(|_| DomainError::RegistryLock)?;
        let mut names: Vec<String> = rules.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    pub fn len(&self) -> Result<usize, DomainError> {
        let rules = self.rules.read().map_err(|_| DomainError::RegistryLock)?;
        Ok(rules.len())
    }

    pub fn is_empty(&self) -> Result<bool, DomainError> {
        Ok(self.len()? == 0)
    }
}

impl fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct("RuleRegistry");
        match self.names() {
            Ok(names) => out.field("rules", &names),
            Err(_) => out.field("rules", &"<poisoned>"),
        };
        out.finish()
    }
}

/// Register a predicate in the process-wide registry.
///
/// Call during start-up, before the first write is validated.
pub fn register_rule<F>(name: impl Into<String>, predicate: F) -> Result<(), DomainError>
where
    F: Fn(&FieldValue, &RuleContext<'_>) -> Result<bool, PredicateError> + Send + Sync + 'static,
{
    GLOBAL.register(name, predicate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_and_lookup() {
        let registry = RuleRegistry::new();
        registry
            .register("even", |v: &FieldValue, _: &RuleContext<'_>| {
                Ok(matches!(v, FieldValue::Int(i) if i % 2 == 0))
            })
            .unwrap();

        assert!(registry.contains("even").unwrap());
        assert!(registry.get("even").unwrap().is_some());
        assert!(registry.get("odd").unwrap().is_none());
        assert_eq!(registry.names().unwrap(), vec!["even".to_string()]);
    }

    #[test]
    fn builtin_names_are_reserved() {
        let registry = RuleRegistry::new();
        let err = registry
            .register("email", |_: &FieldValue, _: &RuleContext<'_>| Ok(true))
            .unwrap_err();
        assert!(matches!(err, DomainError::RuleNameReserved { .. }));
        assert!(registry.is_empty().unwrap());
    }

    #[test]
    fn empty_name_rejected() {
        let registry = RuleRegistry::new();
        assert!(
            registry
                .register(" ", |_: &FieldValue, _: &RuleContext<'_>| Ok(true))
                .is_err()
        );
    }

    #[test]
    fn unregister_reports_presence() {
        let registry = RuleRegistry::new();
        registry
            .register("any", |_: &FieldValue, _: &RuleContext<'_>| Ok(true))
            .unwrap();
        assert!(registry.unregister("any").unwrap());
        assert!(!registry.unregister("any").unwrap());
    }

    #[test]
    fn poisoned_lock_is_reported() {
        let registry = RuleRegistry::new();
        std::thread::scope(|scope| {
            let _ = scope
                .spawn(|| {
                    let _guard = registry.rules.write().unwrap();
                    panic!("writer panicked while holding the registry lock");
                })
                .join();
        });

        assert!(matches!(registry.names(), Err(DomainError::RegistryLock)));
        assert!(matches!(registry.contains("any"), Err(DomainError::RegistryLock)));
        assert!(matches!(registry.len(), Err(DomainError::RegistryLock)));
        assert!(format!("{registry:?}").contains("<poisoned>"));
    }
}
