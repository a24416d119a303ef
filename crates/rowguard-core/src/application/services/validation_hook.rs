//! Validation Hook - the pre-write orchestrator.
//!
//! Runs once per create/update, immediately before the write commits:
//! 1. Skip check (partial update, opt-out flag, already-failed operation)
//! 2. Custom validation (`Validatable`), record by record
//! 3. Declarative rules (evaluate + format), record by record
//!
//! Errors are collected and returned, never raised. The caller aborts the
//! write when the returned collection is non-empty. Only structural errors
//! (a declaration the record cannot satisfy) abort the pass with `Err`.

use std::sync::Arc;

use tracing::{debug, instrument, trace};

use crate::{
    application::{
        operation::OperationErrors,
        ports::WriteContext,
        validatable::ValidationScope,
    },
    domain::{Record, RuleEvaluator, RuleRegistry},
    error::{RowguardError, RowguardResult},
};

/// Why a validation pass was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    PartialUpdate,
    OptedOut,
    PriorError,
}

impl SkipReason {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PartialUpdate => "partial column update",
            Self::OptedOut => "skip_validations set",
            Self::PriorError => "operation already failed",
        }
    }

    /// First matching reason, in precedence order.
    pub fn for_context(ctx: &dyn WriteContext) -> Option<Self> {
        if ctx.is_partial_update() {
            Some(Self::PartialUpdate)
        } else if ctx.skip_validations() {
            Some(Self::OptedOut)
        } else if ctx.has_error() {
            Some(Self::PriorError)
        } else {
            None
        }
    }
}

/// Pre-write validation hook.
///
/// Reads custom rules from a [`RuleRegistry`] at evaluation time; by default
/// the process-wide one.
#[derive(Debug, Clone)]
pub struct ValidationHook {
    registry: Arc<RuleRegistry>,
}

impl ValidationHook {
    /// Hook bound to the process-wide rule registry.
    pub fn new() -> Self {
        Self::with_registry(RuleRegistry::global())
    }

    /// Hook bound to a specific registry.
    pub fn with_registry(registry: Arc<RuleRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Validate the records of one write operation.
    ///
    /// `records` is one record or a homogeneous collection; errors follow
    /// record order, custom errors of all records first.
    #[instrument(
        skip_all,
        fields(kind = %ctx.write_kind(), records = records.len())
    )]
    pub fn validate<'r>(
        &self,
        records: &[&'r dyn Record],
        ctx: &dyn WriteContext,
    ) -> RowguardResult<OperationErrors<'r>> {
        let mut errors = OperationErrors::new();

        if let Some(reason) = SkipReason::for_context(ctx) {
            debug!(reason = reason.as_str(), "Validation skipped");
            return Ok(errors);
        }

        self.run_custom(records, ctx, &mut errors);
        let custom = errors.len();

        self.run_declarative(records, &mut errors)?;

        debug!(
            custom,
            declarative = errors.len() - custom,
            "Validation finished"
        );
        Ok(errors)
    }

    /// Validate a single, possibly absent, record.
    pub fn validate_record<'r>(
        &self,
        record: Option<&'r dyn Record>,
        ctx: &dyn WriteContext,
    ) -> RowguardResult<OperationErrors<'r>> {
        match record {
            Some(record) => self.validate(&[record], ctx),
            None => self.validate(&[], ctx),
        }
    }

    /// Validate a slice of concrete records.
    pub fn validate_slice<'r, R: Record>(
        &self,
        records: &'r [R],
        ctx: &dyn WriteContext,
    ) -> RowguardResult<OperationErrors<'r>> {
        let records: Vec<&'r dyn Record> = records.iter().map(|r| r as &dyn Record).collect();
        self.validate(&records, ctx)
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn run_custom<'r>(
        &self,
        records: &[&'r dyn Record],
        ctx: &dyn WriteContext,
        errors: &mut OperationErrors<'r>,
    ) {
        for (index, &record) in records.iter().enumerate() {
            let Some(validatable) = record.as_validatable() else {
                continue;
            };

            let before = errors.len();
            let outcome = validatable.validate(&mut ValidationScope::new(ctx, errors));
            if let Err(e) = outcome {
                errors.push(e);
            }
            trace!(
                index,
                model = record.model_name(),
                added = errors.len() - before,
                "Custom validation ran"
            );
        }
    }

    fn run_declarative<'r>(
        &self,
        records: &[&'r dyn Record],
        errors: &mut OperationErrors<'r>,
    ) -> RowguardResult<()> {
        let failures = RuleEvaluator::new(&self.registry)
            .evaluate_all(records)
            .map_err(RowguardError::Domain)?;

        errors.extend(
            failures
                .into_iter()
                .map(|(record, failure)| failure.into_validation_error(record).into()),
        );
        Ok(())
    }
}

impl Default for ValidationHook {
    fn default() -> Self {
        Self::new()
    }
}
