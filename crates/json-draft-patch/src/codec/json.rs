//! JSON codec for patch records.
//!
//! Records are written in RFC 6902 shape: `{"op", "path", "value"?}`. The
//! path string is emitted as stored; no pointer re-encoding happens here.

use serde_json::{json, Map, Value as Json};

use crate::types::{PatchError, PatchOp, PatchRecord};
use crate::value::Value;

// ── Serialization ─────────────────────────────────────────────────────────

/// Serialize a record to a JSON object.
pub fn to_json(record: &PatchRecord) -> Json {
    let mut m = Map::new();
    m.insert("op".into(), json!(record.op.as_str()));
    m.insert("path".into(), Json::String(record.path.clone()));
    if let Some(value) = &record.value {
        m.insert("value".into(), value.to_json());
    }
    Json::Object(m)
}

/// Serialize a list of records to a JSON array.
pub fn to_json_patch(records: &[PatchRecord]) -> Json {
    Json::Array(records.iter().map(to_json).collect())
}

// ── Deserialization ───────────────────────────────────────────────────────

/// Deserialize a record from a JSON object.
pub fn from_json(v: &Json) -> Result<PatchRecord, PatchError> {
    let obj = v
        .as_object()
        .ok_or_else(|| PatchError::InvalidOp("record must be an object".into()))?;
    let op: PatchOp = obj
        .get("op")
        .and_then(Json::as_str)
        .ok_or_else(|| PatchError::InvalidOp("missing op".into()))?
        .parse()?;
    let path = obj
        .get("path")
        .and_then(Json::as_str)
        .ok_or(PatchError::InvalidPath)?
        .to_string();
    let value = match (op.has_value(), obj.get("value")) {
        (true, Some(v)) => Some(Value::from(v)),
        (true, None) => return Err(PatchError::MissingValue(op)),
        (false, _) => None,
    };
    Ok(PatchRecord { op, path, value })
}

/// Deserialize a JSON array of records.
pub fn from_json_patch(v: &Json) -> Result<Vec<PatchRecord>, PatchError> {
    let arr = v
        .as_array()
        .ok_or_else(|| PatchError::InvalidOp("patch must be an array".into()))?;
    arr.iter().map(from_json).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remove_omits_value() {
        let j = to_json(&PatchRecord::remove("$/-"));
        assert_eq!(j, json!({"op": "remove", "path": "$/-"}));
    }

    #[test]
    fn remove_ignores_stray_value() {
        let rec = from_json(&json!({"op": "remove", "path": "/a", "value": 1})).unwrap();
        assert_eq!(rec, PatchRecord::remove("/a"));
    }

    #[test]
    fn replace_requires_value() {
        let err = from_json(&json!({"op": "replace", "path": "/a"})).unwrap_err();
        assert_eq!(err, PatchError::MissingValue(PatchOp::Replace));
    }
}
