use std::cmp::Ordering;
use std::fmt;

use json_draft_patch::path::{join, APPEND_SEGMENT};
use json_draft_patch::{Literal, PatchLog, PatchRecord, Value};

use super::{Core, Entry, Input, SequenceIter};
use crate::error::DraftError;
use crate::registry::{ReferenceId, Registry};
use crate::staging::StagingEntry;

/// Handle over an ordered sequence.
///
/// Besides index access, a sequence handle keeps a tracked length that
/// `push` and `pop` move without touching the source. Derived views
/// (`map`, `filter`, `reduce`, `sort`, iteration) cover exactly the tracked
/// length and never write.
#[derive(Clone)]
pub struct SequenceHandle {
    core: Core,
}

/// Parses a sequence key: decimal digits, no sign, no leading zeros.
pub(crate) fn parse_index(key: &str) -> Result<usize, DraftError> {
    let bytes = key.as_bytes();
    let canonical = !bytes.is_empty()
        && bytes.iter().all(u8::is_ascii_digit)
        && !(bytes.len() > 1 && bytes[0] == b'0');
    if !canonical {
        return Err(DraftError::MalformedIndex(key.to_string()));
    }
    key.parse::<usize>()
        .map_err(|_| DraftError::MalformedIndex(key.to_string()))
}

impl SequenceHandle {
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

    /// Tracked length.
    pub fn len(&self) -> usize {
        self.core.tracked_len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Length of the wrapped source, unaffected by `push`/`pop`.
    pub fn source_len(&self) -> usize {
        self.core.source_len()
    }

    pub fn staged(&self, index: usize) -> Option<StagingEntry> {
        self.core.staged(&index.to_string())
    }

    // ── Index access ─────────────────────────────────────────────────────

    /// Reads `index`; anything at or past the tracked length is absent.
    pub fn get_index(&self, index: usize) -> Result<Entry, DraftError> {
        if index >= self.len() {
            return Ok(Entry::Literal(Literal::Absent));
        }
        self.core.read(&index.to_string())
    }

    pub fn get(&self, key: &str) -> Result<Entry, DraftError> {
        self.get_index(parse_index(key)?)
    }

    /// Overwrites an existing element. Growing the sequence goes through
    /// [`SequenceHandle::push`].
    pub fn set_index(&self, index: usize, value: impl Into<Input>) -> Result<(), DraftError> {
        let len = self.len();
        if index >= len {
            return Err(DraftError::IndexOutOfRange { index, len });
        }
        let source_len = self.source_len();
        if len < source_len {
            return Err(DraftError::InvariantViolation(format!(
                "tracked length {len} is below source length {source_len}"
            )));
        }
        self.core.write(&index.to_string(), value.into())
    }

    pub fn set(&self, key: &str, value: impl Into<Input>) -> Result<(), DraftError> {
        self.set_index(parse_index(key)?, value)
    }

    // ── Push / pop ───────────────────────────────────────────────────────

    /// Appends `value`, recording an `add` at `path/-`. Returns the new
    /// tracked length.
    ///
    /// Nested values are anchored at their concrete index, so later writes
    /// through them address `path/<index>/...`.
    pub fn push(&self, value: impl Into<Input>) -> Result<usize, DraftError> {
        let path = self.core.require_path()?;
        let index = self.len();
        let key = index.to_string();
        let escape = self.core.registry.escape_segments();
        let prepared = self.core.prepare(value.into())?;
        let payload = self.core.put(&key, prepared, join(&path, &key, escape))?;
        self.core.set_tracked_len(index + 1);
        self.core
            .emit(PatchRecord::add(join(&path, APPEND_SEGMENT, false), payload));
        Ok(index + 1)
    }

    /// Removes and returns the tail element; `Absent` when empty.
    ///
    /// A nested tail comes back as a detached handle. The `remove` record at
    /// `path/-` is only appended while the handle has a path.
    pub fn pop(&self) -> Result<Entry, DraftError> {
        let len = self.len();
        if len == 0 {
            return Ok(Entry::Literal(Literal::Absent));
        }
        let index = len - 1;
        let key = index.to_string();
        let popped = match self.core.staged(&key) {
            Some(StagingEntry::Literal(l)) => Entry::Literal(l),
            Some(StagingEntry::Pointer(id)) => Entry::from(self.core.registry.resolve(&id)?),
            None => match self.core.source_child(&key) {
                Some(Value::Literal(l)) => Entry::Literal(l),
                Some(value) => Entry::from(self.core.mint(value, String::new())?),
                None => {
                    return Err(DraftError::InvariantViolation(format!(
                        "tracked length {len} exceeds source length {} with nothing staged at the tail",
                        self.source_len()
                    )))
                }
            },
        };

        self.core.unstage(&key);
        self.core.set_tracked_len(index);
        if let Some(handle) = popped.clone().into_handle() {
            handle.core().detach();
        }
        let path = self.core.path();
        if !path.is_empty() {
            self.core.emit(PatchRecord::remove(join(&path, APPEND_SEGMENT, false)));
        }
        Ok(popped)
    }

    // ── Derived views ────────────────────────────────────────────────────

    /// Lazy iteration over the tracked view as of this call.
    pub fn iter(&self) -> SequenceIter {
        SequenceIter::new(self.clone())
    }

    pub fn map<T, F>(&self, mut f: F) -> Result<Vec<T>, DraftError>
    where
        F: FnMut(Entry, usize) -> T,
    {
        self.iter()
            .enumerate()
            .map(|(i, entry)| entry.map(|e| f(e, i)))
            .collect()
    }

    pub fn filter<F>(&self, mut pred: F) -> Result<Vec<Entry>, DraftError>
    where
        F: FnMut(&Entry, usize) -> bool,
    {
        let mut out = Vec::new();
        for (i, entry) in self.iter().enumerate() {
            let entry = entry?;
            if pred(&entry, i) {
                out.push(entry);
            }
        }
        Ok(out)
    }

    pub fn reduce<A, F>(&self, init: A, mut f: F) -> Result<A, DraftError>
    where
        F: FnMut(A, Entry, usize) -> A,
    {
        let mut acc = init;
        for (i, entry) in self.iter().enumerate() {
            acc = f(acc, entry?, i);
        }
        Ok(acc)
    }

    /// Sorted copy of the tracked view in [`Entry::total_cmp`] order. The
    /// handle itself is left as is.
    pub fn sort(&self) -> Result<Vec<Entry>, DraftError> {
        self.sort_by(Entry::total_cmp)
    }

    /// Stable sort of a copy of the tracked view.
    pub fn sort_by<F>(&self, cmp: F) -> Result<Vec<Entry>, DraftError>
    where
        F: FnMut(&Entry, &Entry) -> Ordering,
    {
        let mut entries = self.iter().collect::<Result<Vec<_>, _>>()?;
        entries.sort_by(cmp);
        Ok(entries)
    }

    pub fn to_value(&self) -> Result<Value, DraftError> {
        self.core.to_value()
    }

    pub fn to_json(&self) -> Result<serde_json::Value, DraftError> {
        Ok(self.to_value()?.to_json())
    }
}

impl<'a> IntoIterator for &'a SequenceHandle {
    type Item = Result<Entry, DraftError>;
    type IntoIter = SequenceIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl PartialEq for SequenceHandle {
    fn eq(&self, other: &Self) -> bool {
        self.core.same_node(&other.core)
    }
}

impl fmt::Debug for SequenceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SequenceHandle")
            .field("id", &self.id())
            .field("path", &self.current_path())
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_canonical_indices_only() {
        assert_eq!(parse_index("0"), Ok(0));
        assert_eq!(parse_index("42"), Ok(42));
        for bad in ["", "-1", "01", "1.5", "x", " 1", "-"] {
            assert_eq!(
                parse_index(bad),
                Err(DraftError::MalformedIndex(bad.to_string())),
                "{bad:?} should be rejected"
            );
        }
        assert!(parse_index("99999999999999999999999999").is_err());
    }

    #[test]
    fn pop_past_source_without_staging_is_an_invariant_violation() {
        let registry = Registry::new();
        let log = PatchLog::new();
        let source = Value::from(serde_json::json!([1]));
        let h = crate::wrap::wrap_sequence(&registry, &log, registry.next_id(), source, "$")
            .unwrap();
        h.core().set_tracked_len(5);

        assert!(matches!(h.pop(), Err(DraftError::InvariantViolation(_))));
        assert_eq!(h.len(), 5);
        assert!(log.is_empty());
        assert!(matches!(h.to_value(), Err(DraftError::InvariantViolation(_))));
    }
}
