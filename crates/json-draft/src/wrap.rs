//! Entry points: wrap a source value in a root handle.

use json_draft_patch::{PatchLog, Value, ValueKind};
use tracing::debug;

use crate::error::DraftError;
use crate::handle::{Handle, SequenceHandle, StructHandle};
use crate::registry::{ReferenceId, Registry};

/// Wraps a struct value in a handle registered under `id`.
///
/// `initial_path` is the prefix of every record the handle tree emits. It
/// is used verbatim; an empty prefix leaves the root without a path, so
/// writes through it fail.
pub fn wrap_struct(
    registry: &Registry,
    log: &PatchLog,
    id: ReferenceId,
    source: Value,
    initial_path: impl Into<String>,
) -> Result<StructHandle, DraftError> {
    match wrap_kind(registry, log, id, source, initial_path.into(), ValueKind::Struct)? {
        Handle::Struct(h) => Ok(h),
        Handle::Sequence(_) => Err(DraftError::UnsupportedValueKind(ValueKind::Sequence)),
    }
}

/// Wraps a sequence value in a handle registered under `id`.
pub fn wrap_sequence(
    registry: &Registry,
    log: &PatchLog,
    id: ReferenceId,
    source: Value,
    initial_path: impl Into<String>,
) -> Result<SequenceHandle, DraftError> {
    match wrap_kind(registry, log, id, source, initial_path.into(), ValueKind::Sequence)? {
        Handle::Sequence(h) => Ok(h),
        Handle::Struct(_) => Err(DraftError::UnsupportedValueKind(ValueKind::Struct)),
    }
}

/// Wraps a struct or sequence under a freshly minted id.
pub fn wrap(
    registry: &Registry,
    log: &PatchLog,
    source: Value,
    initial_path: impl Into<String>,
) -> Result<Handle, DraftError> {
    let kind = source.kind();
    if kind == ValueKind::Literal {
        return Err(DraftError::UnsupportedValueKind(kind));
    }
    wrap_kind(registry, log, registry.next_id(), source, initial_path.into(), kind)
}

fn wrap_kind(
    registry: &Registry,
    log: &PatchLog,
    id: ReferenceId,
    source: Value,
    path: String,
    expected: ValueKind,
) -> Result<Handle, DraftError> {
    let kind = source.kind();
    if kind != expected {
        return Err(DraftError::UnsupportedValueKind(kind));
    }
    debug!(id = %id, path = %path, kind = %kind, "wrapping source");
    Handle::attach(registry, log, id, source, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wrap_rejects_wrong_kinds() {
        let registry = Registry::new();
        let log = PatchLog::new();
        assert_eq!(
            wrap_struct(&registry, &log, registry.next_id(), Value::from(json!([1])), "$")
                .unwrap_err(),
            DraftError::UnsupportedValueKind(ValueKind::Sequence)
        );
        assert_eq!(
            wrap_sequence(&registry, &log, registry.next_id(), Value::from(json!({})), "$")
                .unwrap_err(),
            DraftError::UnsupportedValueKind(ValueKind::Struct)
        );
        assert_eq!(
            wrap(&registry, &log, Value::from(3), "$").unwrap_err(),
            DraftError::UnsupportedValueKind(ValueKind::Literal)
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn wrap_picks_handle_kind() {
        let registry = Registry::new();
        let log = PatchLog::new();
        let h = wrap(&registry, &log, Value::from(json!([1, 2])), "$").unwrap();
        assert_eq!(h.kind(), ValueKind::Sequence);
        assert_eq!(h.current_path(), "$");
        assert_eq!(registry.resolve(&h.id()).unwrap(), h);
    }

    #[test]
    fn wrap_rejects_taken_id() {
        let registry = Registry::new();
        let log = PatchLog::new();
        let id = registry.next_id();
        wrap_struct(&registry, &log, id.clone(), Value::from(json!({})), "$").unwrap();
        assert_eq!(
            wrap_struct(&registry, &log, id.clone(), Value::from(json!({})), "$").unwrap_err(),
            DraftError::DuplicateId(id)
        );
    }
}
