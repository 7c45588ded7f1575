use json_draft_patch::{from_json, from_json_patch, to_json, to_json_patch};
use json_draft_patch::{PatchError, PatchOp, PatchRecord, Value};
use serde_json::json;

#[test]
fn encodes_rfc6902_shape() {
    let records = vec![
        PatchRecord::replace("//a", 2),
        PatchRecord::add("$/i", Value::from(json!({"j": 3, "k": 2}))),
        PatchRecord::remove("$/-"),
    ];
    assert_eq!(
        to_json_patch(&records),
        json!([
            {"op": "replace", "path": "//a", "value": 2},
            {"op": "add", "path": "$/i", "value": {"j": 3, "k": 2}},
            {"op": "remove", "path": "$/-"},
        ])
    );
}

#[test]
fn decodes_what_it_encodes() {
    let records = vec![
        PatchRecord::add("$/list/-", Value::from(json!([1, {"x": null}]))),
        PatchRecord::replace("$/name", "draft"),
        PatchRecord::remove("$/list/-"),
    ];
    let decoded = from_json_patch(&to_json_patch(&records)).expect("patch should decode");
    assert_eq!(decoded, records);
}

#[test]
fn path_is_kept_verbatim() {
    // No pointer escaping happens in the codec.
    let rec = PatchRecord::replace("$/a/b~c", true);
    let j = to_json(&rec);
    assert_eq!(j["path"], json!("$/a/b~c"));
    assert_eq!(from_json(&j).unwrap().path, "$/a/b~c");
}

#[test]
fn rejects_unsupported_ops() {
    for op in ["move", "copy", "test"] {
        let err = from_json(&json!({"op": op, "path": "/a", "from": "/b"})).unwrap_err();
        assert_eq!(err, PatchError::InvalidOp(op.to_string()));
    }
}

#[test]
fn rejects_malformed_records() {
    assert_eq!(
        from_json(&json!({"op": "add", "path": 5, "value": 1})),
        Err(PatchError::InvalidPath)
    );
    assert_eq!(
        from_json(&json!({"op": "add", "path": "/a"})),
        Err(PatchError::MissingValue(PatchOp::Add))
    );
    assert!(from_json(&json!(["add", "/a"])).is_err());
    assert!(from_json_patch(&json!({"op": "add"})).is_err());
}
