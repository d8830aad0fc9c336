//! Category registry - the full declarative configuration of a run

use crate::category::CategoryDef;
use crate::relationship::ReverseIndexSpec;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// All category definitions plus the relationships between them
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Registry {
    /// Category definitions, in output order
    #[serde(default)]
    pub categories: Vec<CategoryDef>,

    /// Reverse relationships synthesized after every category is built
    #[serde(default)]
    pub reverse_indexes: Vec<ReverseIndexSpec>,
}

impl Registry {
    /// Validate internal consistency
    ///
    /// Category names must be unique and non-empty; every reverse index must
    /// reference declared categories.
    pub fn validate(&self) -> Result<(), String> {
        let mut names = HashSet::new();
        for category in &self.categories {
            if category.name.is_empty() {
                return Err("category name cannot be empty".to_string());
            }
            if category.source_file.is_empty() {
                return Err(format!("category '{}' has no source_file", category.name));
            }
            if !names.insert(category.name.as_str()) {
                return Err(format!("duplicate category '{}'", category.name));
            }
        }

        for spec in &self.reverse_indexes {
            for name in [&spec.source_category, &spec.target_category] {
                if !names.contains(name.as_str()) {
                    return Err(format!(
                        "reverse index '{}' references unknown category '{}'",
                        spec.reverse_field, name
                    ));
                }
            }
            if spec.reverse_field.is_empty() {
                return Err(format!(
                    "reverse index on '{}.{}' has an empty reverse_field",
                    spec.source_category, spec.source_field
                ));
            }
        }

        Ok(())
    }

    /// Get a category by name
    pub fn category(&self, name: &str) -> Option<&CategoryDef> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// Category names in declaration order
    pub fn names(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.name.as_str()).collect()
    }
}
