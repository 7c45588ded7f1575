use json_draft::{
    wrap_struct, DraftError, PatchLog, Registry, SequenceHandle, StructHandle, Value,
};
use proptest::prelude::*;
use serde_json::json;

#[derive(Debug, Clone)]
enum Step {
    SetRoot(&'static str, i64),
    ReplaceNested(i64),
    SetNested(i64),
    PushNested(i64),
    PopNested,
    PushStruct(i64),
    SetIndex(usize, i64),
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        (prop_oneof![Just("a"), Just("g"), Just("z")], 0..100i64)
            .prop_map(|(k, n)| Step::SetRoot(k, n)),
        (0..100i64).prop_map(Step::ReplaceNested),
        (0..100i64).prop_map(Step::SetNested),
        (0..100i64).prop_map(Step::PushNested),
        Just(Step::PopNested),
        (0..100i64).prop_map(Step::PushStruct),
        (0..6usize, 0..100i64).prop_map(|(i, n)| Step::SetIndex(i, n)),
    ]
}

fn nested(root: &StructHandle) -> StructHandle {
    root.get("b").unwrap().into_struct().unwrap()
}

fn list(root: &StructHandle) -> SequenceHandle {
    nested(root).get("d").unwrap().into_sequence().unwrap()
}

struct Outcome {
    prefix: String,
    /// Records a successful call is expected to append.
    appends: usize,
    result: Result<(), DraftError>,
}

fn apply(root: &StructHandle, model: &mut serde_json::Value, step: &Step) -> Outcome {
    match *step {
        Step::SetRoot(key, n) => {
            let result = root.set(key, n);
            if result.is_ok() {
                model[key] = json!(n);
            }
            Outcome { prefix: root.current_path(), appends: 1, result }
        }
        Step::ReplaceNested(n) => {
            let fresh = json!({"c": n, "d": [n]});
            let result = root.set("b", fresh.clone());
            if result.is_ok() {
                model["b"] = fresh;
            }
            Outcome { prefix: root.current_path(), appends: 1, result }
        }
        Step::SetNested(n) => {
            let b = nested(root);
            let prefix = b.current_path();
            let result = b.set("c", n);
            if result.is_ok() {
                model["b"]["c"] = json!(n);
            }
            Outcome { prefix, appends: 1, result }
        }
        Step::PushNested(n) => {
            let d = list(root);
            let prefix = d.current_path();
            let result = d.push(n).map(|_| ());
            if result.is_ok() {
                model["b"]["d"].as_array_mut().unwrap().push(json!(n));
            }
            Outcome { prefix, appends: 1, result }
        }
        Step::PopNested => {
            let d = list(root);
            let prefix = d.current_path();
            let appends = usize::from(!d.is_empty());
            let result = d.pop().map(|_| ());
            if result.is_ok() {
                model["b"]["d"].as_array_mut().unwrap().pop();
            }
            Outcome { prefix, appends, result }
        }
        Step::PushStruct(n) => {
            let e = root.get("e").unwrap().into_sequence().unwrap();
            let prefix = e.current_path();
            let result = e.push(json!({"f": n})).map(|_| ());
            if result.is_ok() {
                model["e"].as_array_mut().unwrap().push(json!({"f": n}));
            }
            Outcome { prefix, appends: 1, result }
        }
        Step::SetIndex(i, n) => {
            let d = list(root);
            let prefix = d.current_path();
            let result = d.set_index(i, n);
            if result.is_ok() {
                model["b"]["d"][i] = json!(n);
            }
            Outcome { prefix, appends: 1, result }
        }
    }
}

proptest! {
    #[test]
    fn every_write_appends_exactly_one_anchored_record(
        steps in prop::collection::vec(step(), 1..40)
    ) {
        let original = json!({"a": 1, "b": {"c": 2, "d": [1, 2, 3]}, "e": [{"f": 1}], "g": "s"});
        let registry = Registry::new();
        let log = PatchLog::new();
        let source = Value::from(original.clone());
        let root = wrap_struct(&registry, &log, registry.next_id(), source.clone(), "$").unwrap();
        let mut model = original.clone();

        for step in &steps {
            let before = log.len();
            let outcome = apply(&root, &mut model, step);
            match &outcome.result {
                Ok(()) => {
                    prop_assert_eq!(log.len(), before + outcome.appends, "{:?}", step);
                    if outcome.appends > 0 {
                        let last = log.last().unwrap();
                        prop_assert!(
                            last.path.starts_with(&format!("{}/", outcome.prefix)),
                            "{} not under {}", last.path, outcome.prefix
                        );
                    }
                }
                Err(err) => {
                    prop_assert!(err.is_usage_error() || matches!(err, DraftError::InvariantViolation(_)));
                    prop_assert_eq!(log.len(), before, "{:?}", step);
                }
            }
        }

        prop_assert_eq!(root.to_json().unwrap(), model);
        prop_assert_eq!(source.to_json(), original);
    }

    #[test]
    fn repeated_reads_never_grow_the_registry(reads in 1..20usize) {
        let registry = Registry::new();
        let log = PatchLog::new();
        let source = Value::from(json!({"b": {"d": [[1], {"x": 2}]}}));
        let root = wrap_struct(&registry, &log, registry.next_id(), source, "$").unwrap();

        for _ in 0..reads {
            let d = list(&root);
            for entry in &d {
                entry.unwrap();
            }
        }
        prop_assert_eq!(registry.len(), 5);
        prop_assert!(log.is_empty());
    }
}
