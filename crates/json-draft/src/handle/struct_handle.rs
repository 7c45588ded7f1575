use std::fmt;

use json_draft_patch::{PatchLog, Value};

use super::node::Shape;
use super::{Core, Entry, Input};
use crate::error::DraftError;
use crate::registry::{ReferenceId, Registry};
use crate::staging::StagingEntry;

/// Handle over a string-keyed struct.
///
/// ```
/// use json_draft::{wrap_struct, PatchLog, Registry, Value};
/// use serde_json::json;
///
/// let registry = Registry::new();
/// let log = PatchLog::new();
/// let source = Value::from(json!({"a": 1, "b": 2}));
/// let root = wrap_struct(&registry, &log, registry.next_id(), source.clone(), "/").unwrap();
///
/// root.set("a", 2).unwrap();
/// root.set("b", 3).unwrap();
///
/// assert_eq!(log.len(), 2);
/// assert_eq!(root.to_value().unwrap(), Value::from(json!({"a": 2, "b": 3})));
/// assert_eq!(source, Value::from(json!({"a": 1, "b": 2})));
/// ```
#[derive(Clone)]
pub struct StructHandle {
    core: Core,
}

impl StructHandle {
    pub(crate) fn from_core(core: Core) -> Self {
        Self { core }
    }

    pub(crate) fn core(&self) -> &Core {
        &self.core
    }

    pub fn id(&self) -> ReferenceId {
        self.core.id()
    }

    pub fn current_path(&self) -> String {
        self.core.path()
    }

    /// Re-anchors the handle; later records use `new_path` as their prefix.
    pub fn rebind_path(&self, new_path: impl Into<String>) {
        self.core.rebind(new_path.into());
    }

    pub fn is_detached(&self) -> bool {
        self.core.path().is_empty()
    }

    pub fn registry(&self) -> Registry {
        self.core.registry.clone()
    }

    pub fn log(&self) -> PatchLog {
        self.core.log()
    }

    /// Reads `key`. Missing keys read as [`Literal::Absent`](json_draft_patch::Literal::Absent).
    pub fn get(&self, key: &str) -> Result<Entry, DraftError> {
        self.core.read(key)
    }

    /// Writes `key` and appends an `add` (new key) or `replace` record.
    pub fn set(&self, key: &str, value: impl Into<Input>) -> Result<(), DraftError> {
        self.core.write(key, value.into())
    }

    pub fn has(&self, key: &str) -> bool {
        self.core.is_staged(key) || self.core.source_child(key).is_some()
    }

    /// Source keys in source order, then keys added by writes.
    pub fn keys(&self) -> Vec<String> {
        let node = self.core.node.borrow();
        let mut keys: Vec<String> = match &node.shape {
            Shape::Struct(map) => map.keys().cloned().collect(),
            Shape::Sequence { .. } => Vec::new(),
        };
        for (key, _) in node.staging.iter() {
            if node.source_child(key).is_none() {
                keys.push(key.clone());
            }
        }
        keys
    }

    pub fn len(&self) -> usize {
        self.keys().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// What staging holds for `key`, if anything.
    pub fn staged(&self, key: &str) -> Option<StagingEntry> {
        self.core.staged(key)
    }

    pub fn to_value(&self) -> Result<Value, DraftError> {
        self.core.to_value()
    }

    pub fn to_json(&self) -> Result<serde_json::Value, DraftError> {
        Ok(self.to_value()?.to_json())
    }
}

impl PartialEq for StructHandle {
    fn eq(&self, other: &Self) -> bool {
        self.core.same_node(&other.core)
    }
}

impl fmt::Debug for StructHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StructHandle")
            .field("id", &self.id())
            .field("path", &self.current_path())
            .finish()
    }
}
