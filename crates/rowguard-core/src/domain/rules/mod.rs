//! The declarative rule engine: registry, evaluator and message formatter.

pub mod evaluator;
pub mod formatter;
pub mod registry;

pub use evaluator::RuleEvaluator;
pub use formatter::format_message;
pub use registry::{PredicateError, RuleContext, RulePredicate, RuleRegistry, register_rule};
