//! Shared state behind a registered handle.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use json_draft_patch::{PatchLog, StructMap, Value, ValueKind};

use crate::error::DraftError;
use crate::registry::ReferenceId;
use crate::staging::Staging;

pub(crate) type NodeRef = Rc<RefCell<Node>>;

/// The wrapped source, plus the tracked length for sequences.
#[derive(Debug, Clone)]
pub(crate) enum Shape {
    Struct(Arc<StructMap>),
    Sequence {
        source: Arc<Vec<Value>>,
        tracked_len: usize,
    },
}

/// State behind one registered handle.
#[derive(Debug)]
pub(crate) struct Node {
    pub(crate) id: ReferenceId,
    pub(crate) shape: Shape,
    /// Route from the tree root; empty once detached.
    pub(crate) path: String,
    pub(crate) staging: Staging,
    pub(crate) log: PatchLog,
}

impl Node {
    pub(crate) fn new(
        id: ReferenceId,
        source: Value,
        path: String,
        log: PatchLog,
    ) -> Result<Self, DraftError> {
        let shape = match source {
            Value::Struct(map) => Shape::Struct(map),
            Value::Sequence(items) => Shape::Sequence {
                tracked_len: items.len(),
                source: items,
            },
            Value::Literal(_) => return Err(DraftError::UnsupportedValueKind(ValueKind::Literal)),
        };
        Ok(Self {
            id,
            shape,
            path,
            staging: Staging::default(),
            log,
        })
    }

    pub(crate) fn source_child(&self, key: &str) -> Option<&Value> {
        match &self.shape {
            Shape::Struct(map) => map.get(key),
            Shape::Sequence { source, .. } => key.parse::<usize>().ok().and_then(|i| source.get(i)),
        }
    }

    /// Whether this node wraps `value` itself, not merely an equal copy.
    pub(crate) fn wraps(&self, value: &Value) -> bool {
        match (&self.shape, value) {
            (Shape::Struct(a), Value::Struct(b)) => Arc::ptr_eq(a, b),
            (Shape::Sequence { source, .. }, Value::Sequence(b)) => Arc::ptr_eq(source, b),
            _ => false,
        }
    }

    pub(crate) fn source_len(&self) -> usize {
        match &self.shape {
            Shape::Struct(map) => map.len(),
            Shape::Sequence { source, .. } => source.len(),
        }
    }
}
