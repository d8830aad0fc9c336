//! Declarative category definitions
//!
//! A category is pure data: which file to read, which expansions to merge,
//! which records to keep and which fields carry localization keys. There is
//! no per-category code anywhere in the engine.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Definition of one output category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryDef {
    /// Output name (also the output file stem)
    pub name: String,

    /// Human-readable name used in progress output
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// Base source file (contains a schema template record)
    pub source_file: String,

    /// Expansion files merged into the base set (no schema template)
    #[serde(default)]
    pub expansion_files: Vec<String>,

    /// Inclusion predicate evaluated on each decoded record
    #[serde(default)]
    pub filter: Predicate,

    /// Fields whose values are localization keys
    #[serde(default)]
    pub text_fields: Vec<TextBinding>,

    /// Source field names never emitted
    #[serde(default)]
    pub exclude_fields: BTreeSet<String>,

    /// Source field names whose empty collections are still emitted
    #[serde(default)]
    pub keep_empty: BTreeSet<String>,
}

impl CategoryDef {
    /// Create a category with no expansions, filter or text bindings
    pub fn new(name: impl Into<String>, source_file: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: None,
            source_file: source_file.into(),
            expansion_files: Vec::new(),
            filter: Predicate::Always,
            text_fields: Vec::new(),
            exclude_fields: BTreeSet::new(),
            keep_empty: BTreeSet::new(),
        }
    }

    /// Display name, falling back to the category name
    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }

    /// Find the text binding for a source field
    pub fn text_binding(&self, source_field: &str) -> Option<&TextBinding> {
        self.text_fields.iter().find(|b| b.source == source_field)
    }
}

/// A field whose raw value is a localization key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextBinding {
    /// Source field name (e.g. `Name`)
    pub source: String,

    /// Output field name (e.g. `name`)
    pub output: String,

    /// Prepended to the raw value to form the localization key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_prefix: Option<String>,
}

impl TextBinding {
    /// Create a binding without a key prefix
    pub fn new(source: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            output: output.into(),
            key_prefix: None,
        }
    }

    /// Localization key for a raw field value
    pub fn key_for(&self, raw: &str) -> String {
        match &self.key_prefix {
            Some(prefix) => format!("{prefix}{raw}"),
            None => raw.to_string(),
        }
    }
}

/// Boolean expression over a record's decoded fields
///
/// A closed set of node types so that filters stay portable data.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    /// Accept every record
    #[default]
    Always,

    /// Field is present and equal to a literal
    Equals {
        /// Source field name
        field: String,
        /// Expected value
        value: Literal,
    },

    /// Field is present (any value, including explicit `false`)
    Present(String),

    /// Negation
    Not(Box<Predicate>),

    /// Conjunction (empty list accepts)
    All(Vec<Predicate>),

    /// Disjunction (empty list rejects)
    Any(Vec<Predicate>),

    /// Boolean flag that defaults to true: reject only an explicit `false`
    DefaultTrue(String),

    /// Boolean flag that defaults to false: accept only an explicit `true`
    DefaultFalse(String),
}

/// Literal operand of an equality predicate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    /// Boolean literal
    Bool(bool),
    /// Integer literal
    Int(i64),
    /// Float literal
    Float(f64),
    /// String literal
    Str(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_toml() {
        let toml = r#"
            name = "technologies"
            display_name = "Technologies"
            source_file = "tech.xml"
            expansion_files = ["tech-wog.xml"]
            filter = { not = { present = "GameContentRequired" } }
            exclude_fields = ["zIconName"]

            [[text_fields]]
            source = "Name"
            output = "name"
        "#;

        let def: CategoryDef = toml::from_str(toml).unwrap();
        assert_eq!(def.display_name(), "Technologies");
        assert_eq!(def.expansion_files, vec!["tech-wog.xml"]);
        assert_eq!(
            def.filter,
            Predicate::Not(Box::new(Predicate::Present("GameContentRequired".into())))
        );
        assert!(def.exclude_fields.contains("zIconName"));
        assert_eq!(def.text_binding("Name").unwrap().output, "name");
    }

    #[test]
    fn test_filter_defaults_to_always() {
        let def: CategoryDef = toml::from_str(
            r#"
            name = "units"
            source_file = "unit.xml"
        "#,
        )
        .unwrap();
        assert_eq!(def.filter, Predicate::Always);
        assert_eq!(def.display_name(), "units");
    }

    #[test]
    fn test_compound_predicate_from_toml() {
        #[derive(Deserialize)]
        struct Wrapper {
            filter: Predicate,
        }

        let wrapper: Wrapper = toml::from_str(
            r#"
            filter = { all = [
                { default_true = "bShow" },
                { equals = { field = "iTier", value = 2 } },
                { any = [ { present = "eUnitType" }, { default_false = "bSpecial" } ] },
            ] }
        "#,
        )
        .unwrap();

        match wrapper.filter {
            Predicate::All(parts) => {
                assert_eq!(parts.len(), 3);
                assert_eq!(parts[0], Predicate::DefaultTrue("bShow".into()));
                assert_eq!(
                    parts[1],
                    Predicate::Equals {
                        field: "iTier".into(),
                        value: Literal::Int(2)
                    }
                );
            }
            other => panic!("unexpected predicate: {:?}", other),
        }
    }

    #[test]
    fn test_text_binding_key_prefix() {
        let mut binding = TextBinding::new("eNation", "nationName");
        assert_eq!(binding.key_for("NATION_ROME"), "NATION_ROME");
        binding.key_prefix = Some("TEXT_".to_string());
        assert_eq!(binding.key_for("NATION_ROME"), "TEXT_NATION_ROME");
    }
}
