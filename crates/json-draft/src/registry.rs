//! Session-scoped reference registry.
//!
//! Every handle minted during an edit session is registered here under a
//! [`ReferenceId`] and stays registered for the life of the session; staging
//! areas hold ids, not handles, and resolve them through the registry on
//! read. The id counter belongs to the registry, so two sessions never
//! share ids or state.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::error::DraftError;
use crate::handle::node::NodeRef;
use crate::handle::{Core, Handle};
use crate::options::DraftOptions;

/// Opaque id of a registered handle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReferenceId(String);

impl ReferenceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReferenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Default)]
struct Inner {
    options: DraftOptions,
    counter: u64,
    nodes: HashMap<ReferenceId, NodeRef>,
}

/// Map from reference id to live handle, plus the session's id counter.
///
/// Cloning yields another handle onto the same registry.
#[derive(Clone, Default)]
pub struct Registry {
    inner: Rc<RefCell<Inner>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: DraftOptions) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                options,
                ..Inner::default()
            })),
        }
    }

    pub fn options(&self) -> DraftOptions {
        self.inner.borrow().options.clone()
    }

    pub(crate) fn escape_segments(&self) -> bool {
        self.inner.borrow().options.escape_segments
    }

    /// Mints the next id. Ids are monotonic and never reused; ids a caller
    /// registered by hand are skipped.
    pub fn next_id(&self) -> ReferenceId {
        let mut inner = self.inner.borrow_mut();
        loop {
            inner.counter += 1;
            let id = ReferenceId(format!("{}:{}", inner.options.id_prefix, inner.counter));
            if !inner.nodes.contains_key(&id) {
                return id;
            }
        }
    }

    /// Registers `handle` under `id`.
    ///
    /// Fails if `id` is taken, if it is not the handle's own id, or if the
    /// handle was built against another registry.
    pub fn register(&self, id: ReferenceId, handle: &Handle) -> Result<(), DraftError> {
        let core = handle.core();
        if !core.registry.same_registry(self) {
            return Err(DraftError::UnsupportedWriteKind);
        }
        if core.id() != id {
            return Err(DraftError::InvariantViolation(format!(
                "handle {} registered as {id}",
                core.id()
            )));
        }
        let mut inner = self.inner.borrow_mut();
        if inner.nodes.contains_key(&id) {
            return Err(DraftError::DuplicateId(id));
        }
        inner.nodes.insert(id, core.node.clone());
        Ok(())
    }

    /// Looks up a registered handle.
    pub fn resolve(&self, id: &ReferenceId) -> Result<Handle, DraftError> {
        let node = self
            .inner
            .borrow()
            .nodes
            .get(id)
            .cloned()
            .ok_or_else(|| DraftError::NotFound(id.clone()))?;
        Ok(Handle::from_core(Core::new(node, self.clone())))
    }

    pub fn contains(&self, id: &ReferenceId) -> bool {
        self.inner.borrow().nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().nodes.is_empty()
    }

    /// Whether `other` is a clone of this registry.
    pub fn same_registry(&self, other: &Registry) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Registry")
            .field("options", &inner.options)
            .field("counter", &inner.counter)
            .field("handles", &inner.nodes.len())
            .finish()
    }
}
