//! Typed field values produced by the decoder

use indexmap::{IndexMap, IndexSet};
use serde_json::{Map, Number, Value};

/// A decoded field value
///
/// Sentinels (`-1`, `"NONE"`, empty tags) never reach this type; the decoder
/// turns them into an absent field instead.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    /// Integer scalar
    Int(i64),

    /// Float scalar
    Float(f64),

    /// Boolean scalar (explicit `false` is kept for filters)
    Bool(bool),

    /// String scalar or localization key
    Str(String),

    /// Reference to another entity's identifier
    EnumRef(String),

    /// Ordered list of strings
    ListOfStr(Vec<String>),

    /// Sparse key -> integer map
    IntMap(IndexMap<String, i64>),

    /// Keys whose boolean value is true
    BoolSet(IndexSet<String>),

    /// Sparse key -> string map
    StrMap(IndexMap<String, String>),

    /// Key -> list of strings
    ListMap(IndexMap<String, Vec<String>>),

    /// 2D key -> (key -> integer) map
    NestedMap(IndexMap<String, IndexMap<String, i64>>),
}

impl TypedValue {
    /// Text content for string-like scalars
    pub fn as_text(&self) -> Option<&str> {
        match self {
            TypedValue::Str(s) | TypedValue::EnumRef(s) => Some(s),
            _ => None,
        }
    }

    /// Whether this is a collection with no entries
    pub fn is_empty_collection(&self) -> bool {
        match self {
            TypedValue::ListOfStr(v) => v.is_empty(),
            TypedValue::IntMap(m) => m.is_empty(),
            TypedValue::BoolSet(s) => s.is_empty(),
            TypedValue::StrMap(m) => m.is_empty(),
            TypedValue::ListMap(m) => m.is_empty(),
            TypedValue::NestedMap(m) => m.is_empty(),
            _ => false,
        }
    }

    /// Convert to a JSON value, preserving key order
    ///
    /// Non-finite floats have no JSON representation and become `None`.
    pub fn to_json(&self) -> Option<Value> {
        let value = match self {
            TypedValue::Int(i) => Value::from(*i),
            TypedValue::Float(f) => Value::Number(Number::from_f64(*f)?),
            TypedValue::Bool(b) => Value::Bool(*b),
            TypedValue::Str(s) | TypedValue::EnumRef(s) => Value::String(s.clone()),
            TypedValue::ListOfStr(items) => {
                Value::Array(items.iter().cloned().map(Value::String).collect())
            }
            TypedValue::BoolSet(keys) => {
                Value::Array(keys.iter().cloned().map(Value::String).collect())
            }
            TypedValue::IntMap(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), Value::from(*v)))
                    .collect::<Map<_, _>>(),
            ),
            TypedValue::StrMap(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                    .collect::<Map<_, _>>(),
            ),
            TypedValue::ListMap(map) => Value::Object(
                map.iter()
                    .map(|(k, items)| {
                        let items = items.iter().cloned().map(Value::String).collect();
                        (k.clone(), Value::Array(items))
                    })
                    .collect::<Map<_, _>>(),
            ),
            TypedValue::NestedMap(map) => Value::Object(
                map.iter()
                    .map(|(k, inner)| {
                        let inner = inner
                            .iter()
                            .map(|(ik, iv)| (ik.clone(), Value::from(*iv)))
                            .collect::<Map<_, _>>();
                        (k.clone(), Value::Object(inner))
                    })
                    .collect::<Map<_, _>>(),
            ),
        };
        Some(value)
    }
}
