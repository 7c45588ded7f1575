//! Patch record types.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::value::Value;

// ── Error ─────────────────────────────────────────────────────────────────

#[derive(Debug, Error, PartialEq)]
pub enum PatchError {
    #[error("INVALID_OP: {0}")]
    InvalidOp(String),
    #[error("INVALID_PATH")]
    InvalidPath,
    #[error("MISSING_VALUE: {0}")]
    MissingValue(PatchOp),
}

// ── Op ────────────────────────────────────────────────────────────────────

/// The edit kinds a draft emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatchOp {
    Add,
    Remove,
    Replace,
}

impl PatchOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatchOp::Add => "add",
            PatchOp::Remove => "remove",
            PatchOp::Replace => "replace",
        }
    }

    /// Whether records of this kind carry a value.
    pub fn has_value(&self) -> bool {
        !matches!(self, PatchOp::Remove)
    }
}

impl fmt::Display for PatchOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PatchOp {
    type Err = PatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "add" => Ok(PatchOp::Add),
            "remove" => Ok(PatchOp::Remove),
            "replace" => Ok(PatchOp::Replace),
            other => Err(PatchError::InvalidOp(other.to_string())),
        }
    }
}

// ── Record ────────────────────────────────────────────────────────────────

/// One entry of the patch log.
///
/// `path` is the slash-joined route from the caller's root prefix; it is
/// stored verbatim and never re-parsed by this crate.
#[derive(Debug, Clone, PartialEq)]
pub struct PatchRecord {
    pub op: PatchOp,
    pub path: String,
    pub value: Option<Value>,
}

impl PatchRecord {
    pub fn add(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            op: PatchOp::Add,
            path: path.into(),
            value: Some(value.into()),
        }
    }

    pub fn replace(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            op: PatchOp::Replace,
            path: path.into(),
            value: Some(value.into()),
        }
    }

    pub fn remove(path: impl Into<String>) -> Self {
        Self {
            op: PatchOp::Remove,
            path: path.into(),
            value: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn op_names_roundtrip() {
        for op in [PatchOp::Add, PatchOp::Remove, PatchOp::Replace] {
            assert_eq!(op.as_str().parse::<PatchOp>(), Ok(op));
        }
        assert_eq!(
            "move".parse::<PatchOp>(),
            Err(PatchError::InvalidOp("move".into()))
        );
    }

    #[test]
    fn remove_has_no_value() {
        let rec = PatchRecord::remove("$/list/-");
        assert_eq!(rec.op, PatchOp::Remove);
        assert!(rec.value.is_none());
        assert!(!PatchOp::Remove.has_value());
        assert!(PatchOp::Replace.has_value());
    }
}
