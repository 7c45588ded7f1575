//! Value model for draft sources and patch payloads.
//!
//! A [`Value`] is classified exactly once, when it is constructed: it is
//! either a [`Literal`], a string-keyed struct or an ordered sequence.
//! Containers keep their children behind an [`Arc`] and expose no mutating
//! API, so a value handed to a draft can be shared freely and is never
//! altered by it.

use std::cmp::Ordering;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{Map, Number};

/// Members of a struct value, in insertion order.
pub type StructMap = IndexMap<String, Value>;

// ── Literal ───────────────────────────────────────────────────────────────

/// A leaf value.
///
/// `Absent` stands for a missing value (a key that is not there, or a read
/// past the end of a sequence). It is distinct from `Null`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Literal {
    #[default]
    Absent,
    Null,
    Bool(bool),
    Number(Number),
    String(String),
}

impl Literal {
    pub fn is_absent(&self) -> bool {
        matches!(self, Literal::Absent)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Literal::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Literal::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Literal::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Literal::String(s) => Some(s),
            _ => None,
        }
    }

    /// JSON form of the literal. `Absent` has no JSON form and maps to `null`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Literal::Absent | Literal::Null => serde_json::Value::Null,
            Literal::Bool(b) => serde_json::Value::Bool(*b),
            Literal::Number(n) => serde_json::Value::Number(n.clone()),
            Literal::String(s) => serde_json::Value::String(s.clone()),
        }
    }

    /// Total order over literals: absent < null < booleans < numbers < strings.
    ///
    /// Numbers compare numerically, strings by code point.
    pub fn total_cmp(&self, other: &Literal) -> Ordering {
        fn rank(l: &Literal) -> u8 {
            match l {
                Literal::Absent => 0,
                Literal::Null => 1,
                Literal::Bool(_) => 2,
                Literal::Number(_) => 3,
                Literal::String(_) => 4,
            }
        }
        match (self, other) {
            (Literal::Bool(a), Literal::Bool(b)) => a.cmp(b),
            (Literal::Number(a), Literal::Number(b)) => {
                let a = a.as_f64().unwrap_or(f64::NAN);
                let b = b.as_f64().unwrap_or(f64::NAN);
                a.total_cmp(&b)
            }
            (Literal::String(a), Literal::String(b)) => a.cmp(b),
            _ => rank(self).cmp(&rank(other)),
        }
    }
}

impl From<bool> for Literal {
    fn from(v: bool) -> Self {
        Literal::Bool(v)
    }
}

impl From<i32> for Literal {
    fn from(v: i32) -> Self {
        Literal::Number(Number::from(v))
    }
}

impl From<i64> for Literal {
    fn from(v: i64) -> Self {
        Literal::Number(Number::from(v))
    }
}

impl From<u32> for Literal {
    fn from(v: u32) -> Self {
        Literal::Number(Number::from(v))
    }
}

impl From<u64> for Literal {
    fn from(v: u64) -> Self {
        Literal::Number(Number::from(v))
    }
}

impl From<f64> for Literal {
    /// Non-finite floats have no JSON number form and become `Null`.
    fn from(v: f64) -> Self {
        Number::from_f64(v).map(Literal::Number).unwrap_or(Literal::Null)
    }
}

impl From<&str> for Literal {
    fn from(v: &str) -> Self {
        Literal::String(v.to_owned())
    }
}

impl From<String> for Literal {
    fn from(v: String) -> Self {
        Literal::String(v)
    }
}

// ── Value ─────────────────────────────────────────────────────────────────

/// Shape of a [`Value`], fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Literal,
    Struct,
    Sequence,
}

impl ValueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Literal => "literal",
            ValueKind::Struct => "struct",
            ValueKind::Sequence => "sequence",
        }
    }
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable nested value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Literal(Literal),
    Struct(Arc<StructMap>),
    Sequence(Arc<Vec<Value>>),
}

impl Default for Value {
    fn default() -> Self {
        Value::Literal(Literal::Absent)
    }
}

impl Value {
    pub fn absent() -> Self {
        Value::Literal(Literal::Absent)
    }

    pub fn null() -> Self {
        Value::Literal(Literal::Null)
    }

    pub fn from_struct(map: StructMap) -> Self {
        Value::Struct(Arc::new(map))
    }

    pub fn from_sequence(items: Vec<Value>) -> Self {
        Value::Sequence(Arc::new(items))
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Literal(_) => ValueKind::Literal,
            Value::Struct(_) => ValueKind::Struct,
            Value::Sequence(_) => ValueKind::Sequence,
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Value::Literal(_))
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Value::Literal(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&StructMap> {
        match self {
            Value::Struct(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Member of a struct, or element of a sequence when `key` is a decimal
    /// index. `None` for literals and missing entries.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Struct(map) => map.get(key),
            Value::Sequence(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
            Value::Literal(_) => None,
        }
    }

    /// Number of members or elements; `0` for literals.
    pub fn len(&self) -> usize {
        match self {
            Value::Struct(map) => map.len(),
            Value::Sequence(items) => items.len(),
            Value::Literal(_) => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// JSON form of the value.
    ///
    /// Absent struct members are dropped; absent sequence elements become
    /// `null`, as JSON has no hole.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Literal(l) => l.to_json(),
            Value::Struct(map) => {
                let mut out = Map::with_capacity(map.len());
                for (k, v) in map.iter() {
                    if matches!(v, Value::Literal(Literal::Absent)) {
                        continue;
                    }
                    out.insert(k.clone(), v.to_json());
                }
                serde_json::Value::Object(out)
            }
            Value::Sequence(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Literal(Literal::Null),
            serde_json::Value::Bool(b) => Value::Literal(Literal::Bool(b)),
            serde_json::Value::Number(n) => Value::Literal(Literal::Number(n)),
            serde_json::Value::String(s) => Value::Literal(Literal::String(s)),
            serde_json::Value::Array(arr) => {
                Value::from_sequence(arr.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(obj) => {
                Value::from_struct(obj.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<&serde_json::Value> for Value {
    fn from(v: &serde_json::Value) -> Self {
        Value::from(v.clone())
    }
}

impl From<Literal> for Value {
    fn from(l: Literal) -> Self {
        Value::Literal(l)
    }
}

impl From<StructMap> for Value {
    fn from(map: StructMap) -> Self {
        Value::from_struct(map)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::from_sequence(items)
    }
}

macro_rules! value_from_literal {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::Literal(Literal::from(v))
                }
            }
        )*
    };
}

value_from_literal!(bool, i32, i64, u32, u64, f64, &str, String);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn classifies_once_from_json() {
        assert_eq!(Value::from(json!(1)).kind(), ValueKind::Literal);
        assert_eq!(Value::from(json!({"a": 1})).kind(), ValueKind::Struct);
        assert_eq!(Value::from(json!([1, 2])).kind(), ValueKind::Sequence);
        assert_eq!(Value::from(json!(null)), Value::null());
    }

    #[test]
    fn struct_keeps_member_order() {
        let v = Value::from(json!({"z": 1, "a": 2, "m": 3}));
        let keys: Vec<&str> = v.as_struct().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn get_by_key_and_index() {
        let v = Value::from(json!({"list": [10, 20]}));
        let list = v.get("list").unwrap();
        assert_eq!(list.get("1"), Some(&Value::from(20)));
        assert_eq!(list.get("2"), None);
        assert_eq!(list.get("x"), None);
        assert_eq!(Value::from(5).get("0"), None);
    }

    #[test]
    fn to_json_drops_absent_members() {
        let mut map = StructMap::new();
        map.insert("a".into(), Value::from(1));
        map.insert("b".into(), Value::absent());
        let v = Value::from_struct(map);
        assert_eq!(v.to_json(), json!({"a": 1}));

        let seq = Value::from_sequence(vec![Value::absent(), Value::from("x")]);
        assert_eq!(seq.to_json(), json!([null, "x"]));
    }

    #[test]
    fn json_roundtrip_preserves_shape() {
        let doc = json!({"a": [1, {"b": true}], "c": "s", "d": null, "e": 1.5});
        assert_eq!(Value::from(doc.clone()).to_json(), doc);
    }

    #[test]
    fn non_finite_float_becomes_null() {
        assert_eq!(Literal::from(f64::NAN), Literal::Null);
        assert_eq!(Literal::from(2.5).as_f64(), Some(2.5));
    }

    #[test]
    fn literal_total_order() {
        let mut xs = vec![
            Literal::from("b"),
            Literal::from(3),
            Literal::Null,
            Literal::from(true),
            Literal::Absent,
            Literal::from(-1.5),
            Literal::from("a"),
        ];
        xs.sort_by(|a, b| a.total_cmp(b));
        assert_eq!(
            xs,
            vec![
                Literal::Absent,
                Literal::Null,
                Literal::from(true),
                Literal::from(-1.5),
                Literal::from(3),
                Literal::from("a"),
                Literal::from("b"),
            ]
        );
    }
}
