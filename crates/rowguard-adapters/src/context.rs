//! Write options and the in-flight write operation.

use std::collections::HashMap;

use rowguard_core::{
    application::{ApplicationError, OperationErrors, SKIP_VALIDATIONS_KEY, WriteContext},
    domain::{Record, WriteKind},
    error::RowguardResult,
};

/// Per-operation settings.
///
/// ```rust
/// use rowguard_adapters::WriteOptions;
///
/// let opts = WriteOptions::new().skip_validations(true);
/// assert!(opts.get("validations:skip_validations"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteOptions {
    settings: HashMap<String, bool>,
    columns: Option<Vec<String>>,
}

impl WriteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a named flag for this operation.
    pub fn set(mut self, key: impl Into<String>, value: bool) -> Self {
        self.settings.insert(key.into(), value);
        self
    }

    /// Unset flags read as `false`.
    pub fn get(&self, key: &str) -> bool {
        self.settings.get(key).copied().unwrap_or(false)
    }

    pub fn skip_validations(self, skip: bool) -> Self {
        self.set(SKIP_VALIDATIONS_KEY, skip)
    }

    /// Restrict the write to these columns (a partial update).
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    pub fn partial_columns(&self) -> Option<&[String]> {
        self.columns.as_deref()
    }
}

/// One create or update as it travels through the callback chain.
///
/// Owns the operation error state; the records are borrowed for `'a`.
#[derive(Debug)]
pub struct WriteOperation<'a> {
    kind: WriteKind,
    options: &'a WriteOptions,
    records: Vec<&'a dyn Record>,
    errors: OperationErrors<'a>,
}

impl<'a> WriteOperation<'a> {
    pub fn new(kind: WriteKind, options: &'a WriteOptions, records: Vec<&'a dyn Record>) -> Self {
        Self {
            kind,
            options,
            records,
            errors: OperationErrors::new(),
        }
    }

    pub fn kind(&self) -> WriteKind {
        self.kind
    }

    pub fn options(&self) -> &WriteOptions {
        self.options
    }

    pub fn records(&self) -> &[&'a dyn Record] {
        &self.records
    }

    pub fn errors(&self) -> &OperationErrors<'a> {
        &self.errors
    }

    /// Append errors to the operation.
    pub fn add_errors(&mut self, errors: OperationErrors<'a>) {
        self.errors.extend(errors);
    }

    /// Commit decision: `Ok` when no error was recorded.
    ///
    /// # Errors
    ///
    /// `WriteRejected` carrying an owned report of every recorded error.
    pub fn finish(self) -> RowguardResult<()> {
        if self.errors.is_empty() {
            return Ok(());
        }

        let model = self
            .records
            .first()
            .map(|r| r.model_name().to_string())
            .unwrap_or_default();
        Err(ApplicationError::WriteRejected {
            model,
            errors: self.errors.reports(),
        }
        .into())
    }
}

impl WriteContext for WriteOperation<'_> {
    fn write_kind(&self) -> WriteKind {
        self.kind
    }

    fn is_partial_update(&self) -> bool {
        self.kind == WriteKind::Update && self.options.partial_columns().is_some()
    }

    fn skip_validations(&self) -> bool {
        self.options.get(SKIP_VALIDATIONS_KEY)
    }

    fn has_error(&self) -> bool {
        !self.errors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use rowguard_core::application::OperationError;

    use super::*;

    #[test]
    fn unset_flags_are_false() {
        let opts = WriteOptions::new().set("audit", true);
        assert!(opts.get("audit"));
        assert!(!opts.get("missing"));
    }

    #[test]
    fn columns_only_mark_updates_as_partial() {
        let opts = WriteOptions::new().columns(["Name"]);

        let create = WriteOperation::new(WriteKind::Create, &opts, Vec::new());
        assert!(!create.is_partial_update());

        let update = WriteOperation::new(WriteKind::Update, &opts, Vec::new());
        assert!(update.is_partial_update());
    }

    #[test]
    fn opt_out_flag_is_read_from_settings() {
        let opts = WriteOptions::new().skip_validations(true);
        let op = WriteOperation::new(WriteKind::Create, &opts, Vec::new());
        assert!(op.skip_validations());
    }

    #[test]
    fn finish_rejects_when_errors_were_recorded() {
        let opts = WriteOptions::new();
        let mut op = WriteOperation::new(WriteKind::Create, &opts, Vec::new());
        assert!(!op.has_error());

        let mut errors = OperationErrors::new();
        errors.push(OperationError::custom("quota exceeded"));
        op.add_errors(errors);
        assert!(op.has_error());

        let err = op.finish().unwrap_err();
        assert_eq!(err.violations().map(<[_]>::len), Some(1));
    }
}
