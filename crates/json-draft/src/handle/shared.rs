//! Read, write and path bookkeeping shared by struct and sequence handles.

use std::collections::HashSet;
use std::rc::Rc;

use json_draft_patch::path::join;
use json_draft_patch::{Literal, PatchLog, PatchOp, PatchRecord, StructMap, Value};
use tracing::{debug, trace, warn};

use super::node::{NodeRef, Shape};
use super::{Entry, Handle, Input};
use crate::error::DraftError;
use crate::registry::{ReferenceId, Registry};
use crate::staging::StagingEntry;

/// A write, validated and ready to be staged.
pub(crate) enum Prepared {
    Literal(Literal),
    /// A raw struct or sequence; gets a freshly minted handle.
    Fresh(Value),
    /// A handle of this session being re-parented.
    Existing { handle: Handle, payload: Value },
}

impl Prepared {
    fn is_handle(&self, id: &ReferenceId) -> bool {
        matches!(self, Prepared::Existing { handle, .. } if &handle.id() == id)
    }
}

#[derive(Clone)]
pub(crate) struct Core {
    pub(crate) node: NodeRef,
    pub(crate) registry: Registry,
}

impl Core {
    pub(crate) fn new(node: NodeRef, registry: Registry) -> Self {
        Self { node, registry }
    }

    pub(crate) fn id(&self) -> ReferenceId {
        self.node.borrow().id.clone()
    }

    pub(crate) fn path(&self) -> String {
        self.node.borrow().path.clone()
    }

    pub(crate) fn log(&self) -> PatchLog {
        self.node.borrow().log.clone()
    }

    pub(crate) fn same_node(&self, other: &Core) -> bool {
        Rc::ptr_eq(&self.node, &other.node)
    }

    pub(crate) fn rebind(&self, new_path: String) {
        let mut node = self.node.borrow_mut();
        if node.path != new_path {
            trace!(id = %node.id, from = %node.path, to = %new_path, "path rebound");
            node.path = new_path;
        }
    }

    /// `path/segment`, or empty when this handle has no path.
    pub(crate) fn child_path(&self, segment: &str) -> String {
        let path = self.path();
        if path.is_empty() {
            return path;
        }
        join(&path, segment, self.registry.escape_segments())
    }

    pub(crate) fn require_path(&self) -> Result<String, DraftError> {
        let path = self.path();
        if path.is_empty() {
            warn!(id = %self.id(), "write rejected: handle has no path");
            return Err(DraftError::WriteWithoutPath);
        }
        Ok(path)
    }

    pub(crate) fn staged(&self, key: &str) -> Option<StagingEntry> {
        self.node.borrow().staging.get(key).cloned()
    }

    pub(crate) fn is_staged(&self, key: &str) -> bool {
        self.node.borrow().staging.contains(key)
    }

    pub(crate) fn unstage(&self, key: &str) -> Option<StagingEntry> {
        self.node.borrow_mut().staging.remove(key)
    }

    pub(crate) fn source_child(&self, key: &str) -> Option<Value> {
        self.node.borrow().source_child(key).cloned()
    }

    pub(crate) fn source_len(&self) -> usize {
        self.node.borrow().source_len()
    }

    pub(crate) fn wraps(&self, value: &Value) -> bool {
        self.node.borrow().wraps(value)
    }

    fn pointers(&self) -> Vec<ReferenceId> {
        self.node.borrow().staging.pointers().cloned().collect()
    }

    // ── Reads ────────────────────────────────────────────────────────────

    /// Staging first, then the source. Nested source values get a child
    /// handle on first read, which is staged so later reads return it.
    pub(crate) fn read(&self, key: &str) -> Result<Entry, DraftError> {
        match self.staged(key) {
            Some(StagingEntry::Literal(l)) => Ok(Entry::Literal(l)),
            Some(StagingEntry::Pointer(id)) => self.deref(key, &id),
            None => match self.source_child(key) {
                None => Ok(Entry::Literal(Literal::Absent)),
                Some(Value::Literal(l)) => Ok(Entry::Literal(l)),
                Some(value) => {
                    let child = self.mint(value, self.child_path(key))?;
                    self.node
                        .borrow_mut()
                        .staging
                        .insert(key.to_string(), StagingEntry::Pointer(child.id()));
                    Ok(child.into())
                }
            },
        }
    }

    /// Resolves a staged reference and re-anchors it under this handle.
    pub(crate) fn deref(&self, key: &str, id: &ReferenceId) -> Result<Entry, DraftError> {
        let handle = self.registry.resolve(id)?;
        let path = self.child_path(key);
        if !path.is_empty() {
            handle.core().rebind(path);
        }
        Ok(handle.into())
    }

    /// Registers a new handle over `value` at `path`.
    pub(crate) fn mint(&self, value: Value, path: String) -> Result<Handle, DraftError> {
        let id = self.registry.next_id();
        trace!(parent = %self.id(), child = %id, path = %path, "minting child handle");
        Handle::attach(&self.registry, &self.log(), id, value, path)
    }

    // ── Writes ───────────────────────────────────────────────────────────

    /// Checks an incoming value without touching any state.
    pub(crate) fn prepare(&self, input: Input) -> Result<Prepared, DraftError> {
        match input {
            Input::Value(Value::Literal(l)) => Ok(Prepared::Literal(l)),
            Input::Value(value) => Ok(Prepared::Fresh(value)),
            Input::Handle(handle) => {
                let core = handle.core();
                if !core.registry.same_registry(&self.registry)
                    || !core.log().same_log(&self.log())
                {
                    return Err(DraftError::UnsupportedWriteKind);
                }
                if core.reaches(&self.id())? {
                    return Err(DraftError::CyclicReference(handle.id()));
                }
                let payload = handle.to_value()?;
                Ok(Prepared::Existing { handle, payload })
            }
        }
    }

    /// Stages a prepared value at `key`, anchoring nested handles at `anchor`.
    /// A different handle previously staged at `key` is detached.
    ///
    /// Returns the patch payload.
    pub(crate) fn put(
        &self,
        key: &str,
        prepared: Prepared,
        anchor: String,
    ) -> Result<Value, DraftError> {
        let superseded = match self.staged(key) {
            Some(StagingEntry::Pointer(old)) if !prepared.is_handle(&old) => {
                Some(self.registry.resolve(&old)?)
            }
            _ => None,
        };
        let (entry, payload) = match prepared {
            Prepared::Literal(l) => (StagingEntry::Literal(l.clone()), Value::Literal(l)),
            Prepared::Fresh(value) => {
                let child = self.mint(value.clone(), anchor)?;
                (StagingEntry::Pointer(child.id()), value)
            }
            Prepared::Existing { handle, payload } => {
                handle.core().rebind(anchor);
                (StagingEntry::Pointer(handle.id()), payload)
            }
        };
        if let Some(old) = superseded {
            old.core().detach();
        }
        self.node
            .borrow_mut()
            .staging
            .insert(key.to_string(), entry);
        Ok(payload)
    }

    /// Writes `input` at `key` and records it. `add` when the key is new to
    /// both source and staging, `replace` otherwise.
    pub(crate) fn write(&self, key: &str, input: Input) -> Result<(), DraftError> {
        let path = self.require_path()?;
        let target = join(&path, key, self.registry.escape_segments());
        let prepared = self.prepare(input)?;
        let op = if self.is_staged(key) || self.source_child(key).is_some() {
            PatchOp::Replace
        } else {
            PatchOp::Add
        };
        let payload = self.put(key, prepared, target.clone())?;
        self.emit(PatchRecord {
            op,
            path: target,
            value: Some(payload),
        });
        Ok(())
    }

    pub(crate) fn emit(&self, record: PatchRecord) {
        debug!(op = %record.op, path = %record.path, "patch appended");
        self.log().append(record);
    }

    // ── Detachment ───────────────────────────────────────────────────────

    /// Clears this handle's path, and the paths of staged descendants still
    /// anchored beneath it.
    pub(crate) fn detach(&self) {
        let old = std::mem::take(&mut self.node.borrow_mut().path);
        if old.is_empty() {
            return;
        }
        debug!(id = %self.id(), path = %old, "handle detached");
        let prefix = format!("{old}/");
        for child in self.pointers().iter().filter_map(|id| self.registry.resolve(id).ok()) {
            if child.core().path().starts_with(&prefix) {
                child.core().detach();
            }
        }
    }

    /// Whether `target` is this handle or reachable through staged references.
    fn reaches(&self, target: &ReferenceId) -> Result<bool, DraftError> {
        let mut stack = vec![self.id()];
        let mut seen = HashSet::new();
        while let Some(id) = stack.pop() {
            if &id == target {
                return Ok(true);
            }
            if !seen.insert(id.clone()) {
                continue;
            }
            stack.extend(self.registry.resolve(&id)?.core().pointers());
        }
        Ok(false)
    }

    // ── Materialisation ──────────────────────────────────────────────────

    /// The value this handle currently reads as. Never mints handles.
    pub(crate) fn to_value(&self) -> Result<Value, DraftError> {
        let (shape, staging) = {
            let node = self.node.borrow();
            (node.shape.clone(), node.staging.clone())
        };
        match shape {
            Shape::Struct(source) => {
                let mut out = StructMap::with_capacity(source.len());
                for (key, value) in source.iter() {
                    let v = match staging.get(key) {
                        Some(entry) => self.entry_value(entry)?,
                        None => value.clone(),
                    };
                    out.insert(key.clone(), v);
                }
                for (key, entry) in staging.iter() {
                    if !source.contains_key(key) {
                        out.insert(key.clone(), self.entry_value(entry)?);
                    }
                }
                Ok(Value::from_struct(out))
            }
            Shape::Sequence {
                source,
                tracked_len,
            } => {
                let mut out = Vec::with_capacity(tracked_len);
                for i in 0..tracked_len {
                    let v = match staging.get(&i.to_string()) {
                        Some(entry) => self.entry_value(entry)?,
                        None => source.get(i).cloned().ok_or_else(|| {
                            DraftError::InvariantViolation(format!(
                                "index {i} of {} is neither staged nor in source",
                                self.id()
                            ))
                        })?,
                    };
                    out.push(v);
                }
                Ok(Value::from_sequence(out))
            }
        }
    }

    fn entry_value(&self, entry: &StagingEntry) -> Result<Value, DraftError> {
        match entry {
            StagingEntry::Literal(l) => Ok(Value::Literal(l.clone())),
            StagingEntry::Pointer(id) => self.registry.resolve(id)?.to_value(),
        }
    }

    // ── Sequence bookkeeping ─────────────────────────────────────────────

    pub(crate) fn tracked_len(&self) -> usize {
        match &self.node.borrow().shape {
            Shape::Sequence { tracked_len, .. } => *tracked_len,
            Shape::Struct(map) => map.len(),
        }
    }

    pub(crate) fn set_tracked_len(&self, len: usize) {
        if let Shape::Sequence { tracked_len, .. } = &mut self.node.borrow_mut().shape {
            *tracked_len = len;
        }
    }
}
