use json_draft_patch::{Literal, Value};

use super::{Entry, SequenceHandle};
use crate::error::DraftError;
use crate::staging::StagingEntry;

/// Lazy iterator over a sequence handle's tracked view.
///
/// The tracked length and the staged entries are captured when the
/// iterator is created; elements are resolved one at a time as it advances.
/// Writes made after creation are not observed. A nested element that has
/// been superseded in the meantime is yielded as a detached handle over the
/// value the snapshot saw.
///
/// A clone carries on from the same position; call
/// [`SequenceHandle::iter`] again for a fresh pass.
#[derive(Debug, Clone)]
pub struct SequenceIter {
    handle: SequenceHandle,
    slots: Vec<Option<StagingEntry>>,
    next: usize,
}

impl SequenceIter {
    pub(crate) fn new(handle: SequenceHandle) -> Self {
        let slots = (0..handle.len()).map(|i| handle.staged(i)).collect();
        Self {
            handle,
            slots,
            next: 0,
        }
    }

    fn resolve(&self, index: usize) -> Result<Entry, DraftError> {
        let core = self.handle.core();
        let key = index.to_string();
        let live = core.staged(&key);
        match &self.slots[index] {
            Some(StagingEntry::Literal(l)) => Ok(Entry::Literal(l.clone())),
            Some(StagingEntry::Pointer(id)) => {
                if live.as_ref().and_then(StagingEntry::as_pointer) == Some(id) {
                    core.deref(&key, id)
                } else {
                    Ok(Entry::from(core.registry.resolve(id)?))
                }
            }
            None => match core.source_child(&key) {
                None => Ok(Entry::Literal(Literal::Absent)),
                Some(Value::Literal(l)) => Ok(Entry::Literal(l)),
                Some(value) => match live {
                    None => core.read(&key),
                    // Staged by a read since the snapshot; the element is unchanged.
                    Some(StagingEntry::Pointer(id))
                        if core.registry.resolve(&id)?.core().wraps(&value) =>
                    {
                        core.deref(&key, &id)
                    }
                    Some(_) => Ok(Entry::from(core.mint(value, String::new())?)),
                },
            },
        }
    }
}

impl Iterator for SequenceIter {
    type Item = Result<Entry, DraftError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.slots.len() {
            return None;
        }
        let index = self.next;
        self.next += 1;
        Some(self.resolve(index))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let rest = self.slots.len() - self.next;
        (rest, Some(rest))
    }
}

impl ExactSizeIterator for SequenceIter {}
