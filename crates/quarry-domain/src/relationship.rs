//! Relationship declarations for reverse indexing
//!
//! Source data only stores references in one direction (a tech lists its
//! prerequisites, nothing lists what a tech unlocks). A `ReverseIndexSpec`
//! names one such forward field and the reverse field to synthesize on the
//! target side.

use serde::{Deserialize, Serialize};

/// Shape of the forward reference field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cardinality {
    /// One identifier per source entity
    Single,

    /// A list of identifiers (or a keyed map whose keys are identifiers)
    #[default]
    Multi,
}

/// One forward -> reverse relationship declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReverseIndexSpec {
    /// Category holding the forward reference
    pub source_category: String,

    /// Output key of the forward reference field
    pub source_field: String,

    /// Category the references point into
    pub target_category: String,

    /// Output key of the synthesized reverse field (always a list)
    pub reverse_field: String,

    /// Shape of the forward field
    #[serde(default)]
    pub cardinality: Cardinality,
}

impl ReverseIndexSpec {
    /// Create a new relationship declaration
    pub fn new(
        source_category: impl Into<String>,
        source_field: impl Into<String>,
        target_category: impl Into<String>,
        reverse_field: impl Into<String>,
        cardinality: Cardinality,
    ) -> Self {
        Self {
            source_category: source_category.into(),
            source_field: source_field.into(),
            target_category: target_category.into(),
            reverse_field: reverse_field.into(),
            cardinality,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_from_toml_defaults_to_multi() {
        let spec: ReverseIndexSpec = toml::from_str(
            r#"
            source_category = "technologies"
            source_field = "techPrereq"
            target_category = "technologies"
            reverse_field = "requiredBy"
        "#,
        )
        .unwrap();

        assert_eq!(spec.cardinality, Cardinality::Multi);
        assert_eq!(spec.reverse_field, "requiredBy");
    }

    #[test]
    fn test_single_cardinality() {
        let spec: ReverseIndexSpec = toml::from_str(
            r#"
            source_category = "units"
            source_field = "unitTrait"
            target_category = "traits"
            reverse_field = "units"
            cardinality = "single"
        "#,
        )
        .unwrap();
        assert_eq!(spec.cardinality, Cardinality::Single);
    }
}
