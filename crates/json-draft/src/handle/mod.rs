//! Live handles over struct and sequence values.
//!
//! A handle reads like the value it wraps but never changes it: writes go
//! to the handle's staging area and append one record to the session's
//! [`PatchLog`](json_draft_patch::PatchLog). Handles are cheap to clone;
//! clones share state and compare equal.
//!
//! Each handle tracks the path it was last reached at. The path is
//! rewritten whenever the handle is read through a parent, so records
//! always anchor at its current position. A handle that is superseded by
//! another value at its position is detached: it stays readable, but
//! writes through it fail with [`DraftError::WriteWithoutPath`].

mod iter;
pub(crate) mod node;
mod sequence_handle;
mod shared;
mod struct_handle;

use std::cell::RefCell;
use std::cmp::Ordering;
use std::rc::Rc;

use json_draft_patch::{Literal, PatchLog, Value, ValueKind};

pub(crate) use shared::Core;
pub use iter::SequenceIter;
pub use sequence_handle::SequenceHandle;
pub use struct_handle::StructHandle;

use crate::error::DraftError;
use crate::registry::{ReferenceId, Registry};
use node::{Node, Shape};

// ── Handle ────────────────────────────────────────────────────────────────

/// Either kind of handle, as stored in the registry.
#[derive(Debug, Clone, PartialEq)]
pub enum Handle {
    Struct(StructHandle),
    Sequence(SequenceHandle),
}

impl Handle {
    pub(crate) fn from_core(core: Core) -> Self {
        let is_struct = matches!(core.node.borrow().shape, Shape::Struct(_));
        if is_struct {
            Handle::Struct(StructHandle::from_core(core))
        } else {
            Handle::Sequence(SequenceHandle::from_core(core))
        }
    }

    /// Builds a handle over `source` at `path` and registers it under `id`.
    pub(crate) fn attach(
        registry: &Registry,
        log: &PatchLog,
        id: ReferenceId,
        source: Value,
        path: String,
    ) -> Result<Handle, DraftError> {
        if registry.contains(&id) {
            return Err(DraftError::DuplicateId(id));
        }
        let node = Node::new(id.clone(), source, path, log.clone())?;
        let handle = Handle::from_core(Core::new(Rc::new(RefCell::new(node)), registry.clone()));
        registry.register(id, &handle)?;
        Ok(handle)
    }

    pub(crate) fn core(&self) -> &Core {
        match self {
            Handle::Struct(h) => h.core(),
            Handle::Sequence(h) => h.core(),
        }
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Handle::Struct(_) => ValueKind::Struct,
            Handle::Sequence(_) => ValueKind::Sequence,
        }
    }

    pub fn id(&self) -> ReferenceId {
        self.core().id()
    }

    pub fn current_path(&self) -> String {
        self.core().path()
    }

    pub fn rebind_path(&self, new_path: impl Into<String>) {
        self.core().rebind(new_path.into());
    }

    pub fn is_detached(&self) -> bool {
        self.core().path().is_empty()
    }

    pub fn to_value(&self) -> Result<Value, DraftError> {
        self.core().to_value()
    }

    pub fn as_struct(&self) -> Option<&StructHandle> {
        match self {
            Handle::Struct(h) => Some(h),
            Handle::Sequence(_) => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&SequenceHandle> {
        match self {
            Handle::Sequence(h) => Some(h),
            Handle::Struct(_) => None,
        }
    }

    pub fn into_struct(self) -> Option<StructHandle> {
        match self {
            Handle::Struct(h) => Some(h),
            Handle::Sequence(_) => None,
        }
    }

    pub fn into_sequence(self) -> Option<SequenceHandle> {
        match self {
            Handle::Sequence(h) => Some(h),
            Handle::Struct(_) => None,
        }
    }
}

impl From<StructHandle> for Handle {
    fn from(h: StructHandle) -> Self {
        Handle::Struct(h)
    }
}

impl From<SequenceHandle> for Handle {
    fn from(h: SequenceHandle) -> Self {
        Handle::Sequence(h)
    }
}

// ── Entry ─────────────────────────────────────────────────────────────────

/// Result of reading a key or index.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Literal(Literal),
    Struct(StructHandle),
    Sequence(SequenceHandle),
}

impl Entry {
    pub fn kind(&self) -> ValueKind {
        match self {
            Entry::Literal(_) => ValueKind::Literal,
            Entry::Struct(_) => ValueKind::Struct,
            Entry::Sequence(_) => ValueKind::Sequence,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Entry::Literal(Literal::Absent))
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Entry::Literal(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&StructHandle> {
        match self {
            Entry::Struct(h) => Some(h),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&SequenceHandle> {
        match self {
            Entry::Sequence(h) => Some(h),
            _ => None,
        }
    }

    pub fn into_struct(self) -> Option<StructHandle> {
        match self {
            Entry::Struct(h) => Some(h),
            _ => None,
        }
    }

    pub fn into_sequence(self) -> Option<SequenceHandle> {
        match self {
            Entry::Sequence(h) => Some(h),
            _ => None,
        }
    }

    pub fn into_handle(self) -> Option<Handle> {
        match self {
            Entry::Struct(h) => Some(Handle::Struct(h)),
            Entry::Sequence(h) => Some(Handle::Sequence(h)),
            Entry::Literal(_) => None,
        }
    }

    pub fn to_value(&self) -> Result<Value, DraftError> {
        match self {
            Entry::Literal(l) => Ok(Value::Literal(l.clone())),
            Entry::Struct(h) => h.to_value(),
            Entry::Sequence(h) => h.to_value(),
        }
    }

    /// Literals in [`Literal::total_cmp`] order, then handles, which
    /// compare equal to one another.
    pub fn total_cmp(&self, other: &Entry) -> Ordering {
        match (self, other) {
            (Entry::Literal(a), Entry::Literal(b)) => a.total_cmp(b),
            (Entry::Literal(_), _) => Ordering::Less,
            (_, Entry::Literal(_)) => Ordering::Greater,
            _ => Ordering::Equal,
        }
    }
}

impl From<Handle> for Entry {
    fn from(h: Handle) -> Self {
        match h {
            Handle::Struct(h) => Entry::Struct(h),
            Handle::Sequence(h) => Entry::Sequence(h),
        }
    }
}

impl From<Literal> for Entry {
    fn from(l: Literal) -> Self {
        Entry::Literal(l)
    }
}

// ── Input ─────────────────────────────────────────────────────────────────

/// Anything that can be written through a handle: a raw value, or a handle
/// of the same session being moved to a new position.
#[derive(Debug, Clone)]
pub enum Input {
    Value(Value),
    Handle(Handle),
}

impl From<Value> for Input {
    fn from(v: Value) -> Self {
        Input::Value(v)
    }
}

impl From<Handle> for Input {
    fn from(h: Handle) -> Self {
        Input::Handle(h)
    }
}

impl From<StructHandle> for Input {
    fn from(h: StructHandle) -> Self {
        Input::Handle(Handle::Struct(h))
    }
}

impl From<&StructHandle> for Input {
    fn from(h: &StructHandle) -> Self {
        Input::Handle(Handle::Struct(h.clone()))
    }
}

impl From<SequenceHandle> for Input {
    fn from(h: SequenceHandle) -> Self {
        Input::Handle(Handle::Sequence(h))
    }
}

impl From<&SequenceHandle> for Input {
    fn from(h: &SequenceHandle) -> Self {
        Input::Handle(Handle::Sequence(h.clone()))
    }
}

impl From<Entry> for Input {
    fn from(e: Entry) -> Self {
        match e {
            Entry::Literal(l) => Input::Value(Value::Literal(l)),
            Entry::Struct(h) => Input::Handle(Handle::Struct(h)),
            Entry::Sequence(h) => Input::Handle(Handle::Sequence(h)),
        }
    }
}

macro_rules! input_from_value {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Input {
                fn from(v: $t) -> Self {
                    Input::Value(Value::from(v))
                }
            }
        )*
    };
}

input_from_value!(Literal, serde_json::Value, bool, i32, i64, u32, u64, f64, &str, String);
