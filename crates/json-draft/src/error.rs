use json_draft_patch::ValueKind;
use thiserror::Error;

use crate::registry::ReferenceId;

/// Errors raised by registry and handle operations.
///
/// All of them are raised at the triggering call, before any staging or log
/// update, so a failed call leaves the session unchanged.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DraftError {
    #[error("reference {0} is not registered")]
    NotFound(ReferenceId),
    #[error("reference {0} is already registered")]
    DuplicateId(ReferenceId),
    #[error("unsupported value kind: {0}")]
    UnsupportedValueKind(ValueKind),
    #[error("unsupported write: handle belongs to another session")]
    UnsupportedWriteKind,
    #[error("write through a handle without a path")]
    WriteWithoutPath,
    #[error("malformed sequence index: {0:?}")]
    MalformedIndex(String),
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("writing {0} here would make it contain itself")]
    CyclicReference(ReferenceId),
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}

impl DraftError {
    /// Caller misuse, as opposed to an internal inconsistency.
    pub fn is_usage_error(&self) -> bool {
        !matches!(self, DraftError::InvariantViolation(_) | DraftError::NotFound(_))
    }
}
