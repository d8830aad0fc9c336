//! Decoded records and their normalized form

use crate::value::TypedValue;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};

/// One decoded record, before filtering and normalization
#[derive(Debug, Clone, PartialEq)]
pub struct RawEntry {
    /// Identifier (value of the identifier field)
    pub id: String,

    /// Decoded fields in source order, keyed by source field name
    pub fields: IndexMap<String, TypedValue>,
}

impl RawEntry {
    /// Create an entry with no fields
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: IndexMap::new(),
        }
    }

    /// Builder-style field insertion
    pub fn with_field(mut self, name: impl Into<String>, value: TypedValue) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    /// Look up a field by its source name
    pub fn get(&self, name: &str) -> Option<&TypedValue> {
        self.fields.get(name)
    }
}

/// One normalized record, keyed by output field names
///
/// Serializes as its field object; the identifier is the key of the
/// enclosing `entries` map.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct NormalizedEntity {
    /// Output fields
    pub fields: Map<String, Value>,
}

impl NormalizedEntity {
    /// Create an empty entity
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a field by output key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Insert a field, returning the previous value if any
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.fields.insert(key.into(), value)
    }

    /// Number of output fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the entity has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
