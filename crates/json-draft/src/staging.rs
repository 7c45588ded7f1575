//! Per-handle staging area.
//!
//! Staging shadows the handle's source: an entry at key `K` overrides
//! whatever the source holds at `K` for every later read. Entries are kept
//! in first-write order so that struct keys added by writes list after the
//! source's own keys.

use indexmap::IndexMap;
use json_draft_patch::Literal;

use crate::registry::ReferenceId;

/// What a handle has observed or written at one key.
#[derive(Debug, Clone, PartialEq)]
pub enum StagingEntry {
    /// A literal, returned verbatim on read.
    Literal(Literal),
    /// A nested struct or sequence, owned by the registered handle.
    Pointer(ReferenceId),
}

impl StagingEntry {
    pub fn as_pointer(&self) -> Option<&ReferenceId> {
        match self {
            StagingEntry::Pointer(id) => Some(id),
            StagingEntry::Literal(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Staging {
    entries: IndexMap<String, StagingEntry>,
}

impl Staging {
    pub(crate) fn get(&self, key: &str) -> Option<&StagingEntry> {
        self.entries.get(key)
    }

    pub(crate) fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub(crate) fn insert(&mut self, key: String, entry: StagingEntry) -> Option<StagingEntry> {
        self.entries.insert(key, entry)
    }

    pub(crate) fn remove(&mut self, key: &str) -> Option<StagingEntry> {
        self.entries.shift_remove(key)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&String, &StagingEntry)> {
        self.entries.iter()
    }

    /// Ids of every staged nested handle.
    pub(crate) fn pointers(&self) -> impl Iterator<Item = &ReferenceId> {
        self.entries.values().filter_map(StagingEntry::as_pointer)
    }
}
