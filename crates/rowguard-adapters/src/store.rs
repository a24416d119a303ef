//! In-memory record store guarded by the validation hook.

use std::{
    collections::{BTreeMap, BTreeSet},
    sync::{Arc, RwLock},
};

use tracing::{debug, instrument};

use rowguard_core::{
    application::{ApplicationError, ValidationHook},
    domain::{Record, WriteKind},
    error::RowguardResult,
};

use crate::{
    callbacks::{CallbackChain, register_callbacks},
    context::{WriteOperation, WriteOptions},
};

/// Thread-safe in-memory store of one record type, keyed by primary key.
///
/// Every write runs the store's callback chain first and is committed only
/// when the operation recorded no error.
pub struct InMemoryStore<R> {
    rows: Arc<RwLock<BTreeMap<String, R>>>,
    callbacks: Arc<CallbackChain>,
}

impl<R: Record + Clone> InMemoryStore<R> {
    /// Store with the validation hook installed on the process-wide registry.
    pub fn new() -> RowguardResult<Self> {
        Self::with_hook(ValidationHook::new())
    }

    /// Store with the given hook installed.
    pub fn with_hook(hook: ValidationHook) -> RowguardResult<Self> {
        let mut chain = CallbackChain::new();
        register_callbacks(&mut chain, hook)?;
        Ok(Self::with_callbacks(chain))
    }

    /// Store running a caller-assembled chain.
    pub fn with_callbacks(callbacks: CallbackChain) -> Self {
        Self {
            rows: Arc::new(RwLock::new(BTreeMap::new())),
            callbacks: Arc::new(callbacks),
        }
    }

    pub fn callbacks(&self) -> &CallbackChain {
        &self.callbacks
    }

    /// Insert a new record.
    ///
    /// # Errors
    ///
    /// `WriteRejected` when validation recorded errors; structural errors
    /// from the hook or the record's key.
    #[instrument(skip_all, fields(model = record.model_name()))]
    pub fn create(&self, record: R, options: &WriteOptions) -> RowguardResult<()> {
        self.create_many(vec![record], options)
    }

    /// Insert a homogeneous collection; all records commit or none do.
    ///
    /// # Errors
    ///
    /// `DuplicateKey` if a key is already stored or appears twice in
    /// `records`; otherwise as [`create`](Self::create).
    #[instrument(skip_all, fields(records = records.len()))]
    pub fn create_many(&self, records: Vec<R>, options: &WriteOptions) -> RowguardResult<()> {
        let keys = self.guard(WriteKind::Create, &records, options)?;

        let mut rows = self.rows.write().map_err(|_| ApplicationError::StoreLock)?;
        let mut seen = BTreeSet::new();
        for (key, record) in keys.iter().zip(&records) {
            if rows.contains_key(key) || !seen.insert(key.as_str()) {
                return Err(ApplicationError::DuplicateKey {
                    model: record.model_name().to_string(),
                    key: key.clone(),
                }
                .into());
            }
        }
        for (key, record) in keys.into_iter().zip(records) {
            rows.insert(key, record);
        }
        debug!(total = rows.len(), "Records created");
        Ok(())
    }

    /// Replace an existing record in full.
    ///
    /// # Errors
    ///
    /// `NotFound` if no record with the same key exists; otherwise as
    /// [`create`](Self::create).
    #[instrument(skip_all, fields(model = record.model_name()))]
    pub fn update(&self, record: R, options: &WriteOptions) -> RowguardResult<()> {
        let keys = self.guard(WriteKind::Update, std::slice::from_ref(&record), options)?;
        self.replace(keys, record)
    }

    /// Replace an existing record as a partial write of `columns`.
    ///
    /// Partial writes skip validation.
    #[instrument(skip_all, fields(model = record.model_name(), columns = columns.len()))]
    pub fn update_columns(
        &self,
        record: R,
        columns: &[&str],
        options: &WriteOptions,
    ) -> RowguardResult<()> {
        let options = options.clone().columns(columns.iter().copied());
        let keys = self.guard(WriteKind::Update, std::slice::from_ref(&record), &options)?;
        self.replace(keys, record)
    }

    pub fn get(&self, key: &str) -> RowguardResult<Option<R>> {
        let rows = self.rows.read().map_err(|_| ApplicationError::StoreLock)?;
        Ok(rows.get(key).cloned())
    }

    pub fn len(&self) -> usize {
        self.rows.read().map(|rows| rows.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // ── internals ─────────────────────────────────────────────────────────────

    /// Run the chain for `records`; on success return their keys.
    fn guard(
        &self,
        kind: WriteKind,
        records: &[R],
        options: &WriteOptions,
    ) -> RowguardResult<Vec<String>> {
        let keys = records
            .iter()
            .map(|r| r.primary_key())
            .collect::<Result<Vec<_>, _>>()?;

        let refs: Vec<&dyn Record> = records.iter().map(|r| r as &dyn Record).collect();
        let mut op = WriteOperation::new(kind, options, refs);
        self.callbacks.run(&mut op)?;
        op.finish()?;

        Ok(keys)
    }

    fn replace(&self, keys: Vec<String>, record: R) -> RowguardResult<()> {
        let mut rows = self.rows.write().map_err(|_| ApplicationError::StoreLock)?;
        let Some(key) = keys.into_iter().next() else {
            return Ok(());
        };
        let Some(slot) = rows.get_mut(&key) else {
            return Err(ApplicationError::NotFound {
                model: record.model_name().to_string(),
                key,
            }
            .into());
        };
        *slot = record;
        debug!(%key, "Record updated");
        Ok(())
    }
}

impl<R> Clone for InMemoryStore<R> {
    fn clone(&self) -> Self {
        Self {
            rows: Arc::clone(&self.rows),
            callbacks: Arc::clone(&self.callbacks),
        }
    }
}

impl<R> std::fmt::Debug for InMemoryStore<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryStore")
            .field("callbacks", &self.callbacks)
            .finish_non_exhaustive()
    }
}
