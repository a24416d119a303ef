//! Ordered, named callbacks around the write lifecycle.
//!
//! Each lifecycle (create, update) owns a chain seeded with an anchor
//! callback that marks where the write itself happens. Other callbacks are
//! inserted relative to an anchor by name.

use std::fmt;

use tracing::{debug, instrument, trace};

use rowguard_core::{
    application::{ApplicationError, ValidationHook},
    domain::WriteKind,
    error::RowguardResult,
};

use crate::context::WriteOperation;

/// Anchor marking the create write.
pub const BEFORE_CREATE: &str = "store:before_create";

/// Anchor marking the update write.
pub const BEFORE_UPDATE: &str = "store:before_update";

/// Name under which the validation hook is installed.
pub const VALIDATE_CALLBACK: &str = "validations:validate";

type Callback = Box<dyn for<'a> Fn(&mut WriteOperation<'a>) -> RowguardResult<()> + Send + Sync>;

struct Entry {
    name: String,
    // Anchors carry no body.
    callback: Option<Callback>,
}

/// Per-lifecycle ordered callback lists.
pub struct CallbackChain {
    create: Vec<Entry>,
    update: Vec<Entry>,
}

impl CallbackChain {
    /// A chain holding only the two anchors.
    pub fn new() -> Self {
        Self {
            create: vec![Entry::anchor(BEFORE_CREATE)],
            update: vec![Entry::anchor(BEFORE_UPDATE)],
        }
    }

    /// The anchor of a lifecycle.
    pub const fn anchor(kind: WriteKind) -> &'static str {
        match kind {
            WriteKind::Create => BEFORE_CREATE,
            WriteKind::Update => BEFORE_UPDATE,
        }
    }

    /// Insert `callback` immediately before `anchor` in the `kind` chain.
    ///
    /// # Errors
    ///
    /// - `CallbackNotFound` if `anchor` is not in the chain
    /// - `DuplicateCallback` if `name` is already registered there
    pub fn register_before<F>(
        &mut self,
        kind: WriteKind,
        anchor: &str,
        name: impl Into<String>,
        callback: F,
    ) -> RowguardResult<()>
    where
        F: for<'a> Fn(&mut WriteOperation<'a>) -> RowguardResult<()> + Send + Sync + 'static,
    {
        let name = name.into();
        let chain = self.chain_mut(kind);

        if chain.iter().any(|e| e.name == name) {
            return Err(ApplicationError::DuplicateCallback { name }.into());
        }
        let position = chain.iter().position(|e| e.name == anchor).ok_or_else(|| {
            ApplicationError::CallbackNotFound {
                name: anchor.to_string(),
            }
        })?;

        debug!(%kind, %name, anchor, "Registering callback");
        chain.insert(
            position,
            Entry {
                name,
                callback: Some(Box::new(callback)),
            },
        );
        Ok(())
    }

    /// Callback names of a lifecycle, in execution order.
    pub fn names(&self, kind: WriteKind) -> Vec<&str> {
        self.chain(kind).iter().map(|e| e.name.as_str()).collect()
    }

    pub fn contains(&self, kind: WriteKind, name: &str) -> bool {
        self.chain(kind).iter().any(|e| e.name == name)
    }

    /// Run every callback of the operation's lifecycle, in order.
    ///
    /// Errors recorded on the operation do not stop the chain; an `Err` from
    /// a callback does.
    #[instrument(skip_all, fields(kind = %op.kind()))]
    pub fn run(&self, op: &mut WriteOperation<'_>) -> RowguardResult<()> {
        for entry in self.chain(op.kind()) {
            if let Some(callback) = &entry.callback {
                trace!(name = %entry.name, "Running callback");
                callback(op)?;
            }
        }
        Ok(())
    }

    fn chain(&self, kind: WriteKind) -> &[Entry] {
        match kind {
            WriteKind::Create => &self.create,
            WriteKind::Update => &self.update,
        }
    }

    fn chain_mut(&mut self, kind: WriteKind) -> &mut Vec<Entry> {
        match kind {
            WriteKind::Create => &mut self.create,
            WriteKind::Update => &mut self.update,
        }
    }
}

impl Default for CallbackChain {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CallbackChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackChain")
            .field("create", &self.names(WriteKind::Create))
            .field("update", &self.names(WriteKind::Update))
            .finish()
    }
}

impl Entry {
    fn anchor(name: &str) -> Self {
        Self {
            name: name.to_string(),
            callback: None,
        }
    }
}

/// Install `hook` before the create and update anchors.
///
/// # Errors
///
/// `DuplicateCallback` if the hook is already installed.
pub fn register_callbacks(chain: &mut CallbackChain, hook: ValidationHook) -> RowguardResult<()> {
    for kind in [WriteKind::Create, WriteKind::Update] {
        let hook = hook.clone();
        chain.register_before(
            kind,
            CallbackChain::anchor(kind),
            VALIDATE_CALLBACK,
            move |op: &mut WriteOperation<'_>| {
                let errors = hook.validate(op.records(), &*op)?;
                op.add_errors(errors);
                Ok(())
            },
        )?;
    }
    Ok(())
}
