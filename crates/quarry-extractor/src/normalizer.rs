//! Field normalizer
//!
//! Turns a filtered `RawEntry` into the output shape: prefixes stripped,
//! localization keys resolved, `false` and empty collections dropped.

use crate::config::ExtractorConfig;
use crate::diagnostics::Diagnostics;
use crate::text::TextResolver;
use quarry_domain::{output_key, CategoryDef, NormalizedEntity, RawEntry, TextBinding, TypedValue};
use serde_json::Value;

/// Normalize one record of a category
pub fn normalize(
    def: &CategoryDef,
    entry: &RawEntry,
    resolver: &TextResolver,
    config: &ExtractorConfig,
    diagnostics: &mut Diagnostics,
) -> NormalizedEntity {
    let mut entity = NormalizedEntity::new();

    for (name, value) in &entry.fields {
        if *name == config.identifier_field || def.exclude_fields.contains(name) {
            continue;
        }
        if matches!(value, TypedValue::Bool(false)) {
            continue;
        }
        if value.is_empty_collection() && !config.keep_empty && !def.keep_empty.contains(name) {
            continue;
        }

        if let Some(binding) = def.text_binding(name) {
            let mut resolve = |raw: &str| resolve_text(binding, raw, entry, name, resolver, diagnostics);
            let resolved = match value {
                TypedValue::ListOfStr(items) => {
                    Some(Value::Array(items.iter().map(|i| Value::String(resolve(i))).collect()))
                }
                other => match other.as_text() {
                    Some(raw) => Some(Value::String(resolve(raw))),
                    None => other.to_json(),
                },
            };
            if let Some(resolved) = resolved {
                entity.insert(binding.output.clone(), resolved);
            }
            continue;
        }

        if let Some(json) = value.to_json() {
            entity.insert(output_key(name), json);
        }
    }

    entity
}

fn resolve_text(
    binding: &TextBinding,
    raw: &str,
    entry: &RawEntry,
    field: &str,
    resolver: &TextResolver,
    diagnostics: &mut Diagnostics,
) -> String {
    let key = binding.key_for(raw);
    let resolution = resolver.lookup_form(&key, 0);
    if let Some(diagnostic) = resolution.diagnostic(&key) {
        diagnostics.record(diagnostic.entity(entry.id.clone()).field(field));
    }
    resolution.text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticKind;
    use crate::text::TextDictionary;
    use indexmap::{IndexMap, IndexSet};
    use serde_json::json;

    fn resolver() -> TextResolver {
        let mut dictionary = TextDictionary::new(vec!["en-US".to_string()]);
        dictionary.insert("TEXT_UNIT_WARRIOR", "en-US", vec!["Warrior".into(), "Warriors".into()]);
        dictionary.insert("TEXT_HELP_A", "en-US", vec!["Fights {TEXT_HELP_B}".into()]);
        dictionary.insert("TEXT_HELP_B", "en-US", vec!["bravely".into()]);
        TextResolver::new(dictionary, "en-US", None, &ExtractorConfig::default()).unwrap()
    }

    fn warrior() -> RawEntry {
        RawEntry::new("UNIT_WARRIOR")
            .with_field("zType", TypedValue::Str("UNIT_WARRIOR".into()))
            .with_field("Name", TypedValue::Str("TEXT_UNIT_WARRIOR".into()))
            .with_field("iStrength", TypedValue::Int(40))
            .with_field("bMelee", TypedValue::Bool(true))
            .with_field("bHidden", TypedValue::Bool(false))
            .with_field("zIconName", TypedValue::Str("UNIT_WARRIOR_ICON".into()))
            .with_field("aeUpgrades", TypedValue::ListOfStr(vec![]))
    }

    fn category() -> CategoryDef {
        let mut def = CategoryDef::new("units", "unit.xml");
        def.text_fields.push(TextBinding::new("Name", "name"));
        def.exclude_fields.insert("zIconName".to_string());
        def
    }

    #[test]
    fn test_strength_and_melee() {
        let mut diagnostics = Diagnostics::new();
        let entity = normalize(
            &category(),
            &warrior(),
            &resolver(),
            &ExtractorConfig::default(),
            &mut diagnostics,
        );

        assert_eq!(
            serde_json::to_value(&entity).unwrap(),
            json!({"name": "Warrior", "strength": 40, "melee": true})
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_meaningful_empty_kept() {
        let mut def = category();
        def.keep_empty.insert("aeUpgrades".to_string());
        let entity = normalize(
            &def,
            &warrior(),
            &resolver(),
            &ExtractorConfig::default(),
            &mut Diagnostics::new(),
        );
        assert_eq!(entity.get("upgrades"), Some(&json!([])));
    }

    #[test]
    fn test_text_list_and_prefix() {
        let mut def = category();
        let mut help = TextBinding::new("aeHelp", "help");
        help.key_prefix = Some("TEXT_HELP_".to_string());
        def.text_fields.push(help);

        let entry = RawEntry::new("UNIT_WARRIOR")
            .with_field("aeHelp", TypedValue::ListOfStr(vec!["A".into(), "B".into()]));
        let entity = normalize(
            &def,
            &entry,
            &resolver(),
            &ExtractorConfig::default(),
            &mut Diagnostics::new(),
        );

        assert_eq!(entity.get("help"), Some(&json!(["Fights bravely", "bravely"])));
    }

    #[test]
    fn test_text_bound_false_and_empty_dropped() {
        let mut def = category();
        def.text_fields.push(TextBinding::new("aeHelp", "help"));
        def.text_fields.push(TextBinding::new("bFlag", "flag"));

        // an aeHelp list holding only NONE decodes to an empty list
        let entry = RawEntry::new("UNIT_WARRIOR")
            .with_field("Name", TypedValue::Str("TEXT_UNIT_WARRIOR".into()))
            .with_field("aeHelp", TypedValue::ListOfStr(vec![]))
            .with_field("bFlag", TypedValue::Bool(false));
        let mut diagnostics = Diagnostics::new();
        let entity = normalize(
            &def,
            &entry,
            &resolver(),
            &ExtractorConfig::default(),
            &mut diagnostics,
        );

        assert_eq!(serde_json::to_value(&entity).unwrap(), json!({"name": "Warrior"}));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_missing_text_key_reported_with_context() {
        let entry = RawEntry::new("UNIT_SCOUT").with_field("Name", TypedValue::Str("TEXT_UNIT_SCOUT".into()));
        let mut diagnostics = Diagnostics::scoped("units");
        let entity = normalize(
            &category(),
            &entry,
            &resolver(),
            &ExtractorConfig::default(),
            &mut diagnostics,
        );

        assert_eq!(entity.get("name"), Some(&json!("TEXT_UNIT_SCOUT")));
        let d = &diagnostics.entries()[0];
        assert_eq!(d.kind, DiagnosticKind::MissingLocalizationKey);
        assert_eq!(d.entity.as_deref(), Some("UNIT_SCOUT"));
        assert_eq!(d.field.as_deref(), Some("Name"));
    }

    #[test]
    fn test_maps_keep_keys_and_nesting() {
        let mut cost = IndexMap::new();
        cost.insert("YIELD_IRON".to_string(), 50);
        cost.insert("YIELD_FOOD".to_string(), 100);
        let mut inner_lush = IndexMap::new();
        inner_lush.insert("YIELD_FOOD".to_string(), 40);
        let mut inner_arid = IndexMap::new();
        inner_arid.insert("YIELD_FOOD".to_string(), -40);
        let mut terrain = IndexMap::new();
        terrain.insert("TERRAIN_LUSH".to_string(), inner_lush);
        terrain.insert("TERRAIN_ARID".to_string(), inner_arid);
        let valid: IndexSet<String> = ["TERRAIN_LUSH".to_string()].into_iter().collect();

        let entry = RawEntry::new("IMPROVEMENT_FARM")
            .with_field("aiYieldCost", TypedValue::IntMap(cost))
            .with_field("aaiYieldTerrain", TypedValue::NestedMap(terrain))
            .with_field("abTerrainValid", TypedValue::BoolSet(valid));
        let entity = normalize(
            &CategoryDef::new("improvements", "improvement.xml"),
            &entry,
            &resolver(),
            &ExtractorConfig::default(),
            &mut Diagnostics::new(),
        );

        assert_eq!(
            serde_json::to_value(&entity).unwrap(),
            json!({
                "yieldCost": {"YIELD_IRON": 50, "YIELD_FOOD": 100},
                "yieldTerrain": {
                    "TERRAIN_LUSH": {"YIELD_FOOD": 40},
                    "TERRAIN_ARID": {"YIELD_FOOD": -40}
                },
                "terrainValid": ["TERRAIN_LUSH"]
            })
        );
    }
}
