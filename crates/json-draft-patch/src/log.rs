//! Append-only patch log shared by a whole handle tree.
//!
//! A [`PatchLog`] is a cheap, cloneable handle: every clone appends to and
//! reads from the same record list. The caller creates one per edit session
//! and hands the recorded patches to a consumer when the session ends.
//!
//! The log is single-threaded by construction (`Rc`); concurrent use needs
//! external mutual exclusion around the whole session anyway.

use std::cell::RefCell;
use std::rc::Rc;

use crate::types::PatchRecord;

#[derive(Debug, Clone, Default)]
pub struct PatchLog {
    records: Rc<RefCell<Vec<PatchRecord>>>,
}

impl PatchLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record. The only mutator besides [`PatchLog::take`].
    pub fn append(&self, record: PatchRecord) {
        self.records.borrow_mut().push(record);
    }

    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }

    /// Copy of all records, oldest first.
    pub fn records(&self) -> Vec<PatchRecord> {
        self.records.borrow().clone()
    }

    pub fn last(&self) -> Option<PatchRecord> {
        self.records.borrow().last().cloned()
    }

    /// Drains the log, handing its records to the caller.
    pub fn take(&self) -> Vec<PatchRecord> {
        std::mem::take(&mut *self.records.borrow_mut())
    }

    /// Whether `other` is a clone of this log.
    pub fn same_log(&self, other: &PatchLog) -> bool {
        Rc::ptr_eq(&self.records, &other.records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PatchOp;

    #[test]
    fn clones_share_records() {
        let log = PatchLog::new();
        let other = log.clone();
        log.append(PatchRecord::replace("/a", 1));
        other.append(PatchRecord::add("/b", 2));

        assert!(log.same_log(&other));
        assert_eq!(log.len(), 2);
        let ops: Vec<PatchOp> = other.records().iter().map(|r| r.op).collect();
        assert_eq!(ops, vec![PatchOp::Replace, PatchOp::Add]);
        assert_eq!(log.last().map(|r| r.path), Some("/b".to_string()));
    }

    #[test]
    fn take_drains() {
        let log = PatchLog::new();
        log.append(PatchRecord::remove("/x/-"));
        let taken = log.take();
        assert_eq!(taken.len(), 1);
        assert!(log.is_empty());
        assert!(!log.same_log(&PatchLog::new()));
    }
}
