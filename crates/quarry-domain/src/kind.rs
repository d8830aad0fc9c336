//! Field kinds - the naming-convention type oracle
//!
//! Every field name in a source file carries a short lowercase marker that
//! announces its structural type (`iCost`, `aeTechPrereq`, `aaiYieldTerrain`).
//! This module owns the one prefix table: both classification and output-key
//! normalization go through it, so they can never disagree.

/// Structural kind of a field, derived from its name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Scalar integer (`i`)
    Int,

    /// Scalar float (`f`)
    Float,

    /// Scalar boolean (`b`)
    Bool,

    /// Scalar string (`z`, or an unprefixed capitalized name)
    Str,

    /// Enum/identifier reference (`e`)
    EnumRef,

    /// Ordered list of scalar values (`ae`)
    List,

    /// Sparse key -> integer map (`ai`)
    IntMap,

    /// Sparse key -> boolean map, stored as the set of true keys (`ab`)
    BoolSet,

    /// Sparse key -> string map (`az`)
    StrMap,

    /// Sparse key -> list map (`aae`)
    ListMap,

    /// Sparse 2D map key -> (key -> integer) (`aai`)
    NestedMap,
}

/// Prefix table, longest marker first so `aai` is never shadowed by `ai`.
const PREFIXES: &[(&str, Kind)] = &[
    ("aai", Kind::NestedMap),
    ("aae", Kind::ListMap),
    ("ae", Kind::List),
    ("ai", Kind::IntMap),
    ("ab", Kind::BoolSet),
    ("az", Kind::StrMap),
    ("i", Kind::Int),
    ("f", Kind::Float),
    ("b", Kind::Bool),
    ("z", Kind::Str),
    ("e", Kind::EnumRef),
];

/// Outcome of classifying a field name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    /// Kind derived from the name
    pub kind: Kind,

    /// Length of the recognized prefix (0 when none matched)
    pub prefix_len: usize,

    /// True when the name starts with a lowercase marker that is not in the table
    pub unrecognized: bool,
}

impl Kind {
    /// Get the kind name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Int => "int",
            Kind::Float => "float",
            Kind::Bool => "bool",
            Kind::Str => "str",
            Kind::EnumRef => "enum_ref",
            Kind::List => "list",
            Kind::IntMap => "int_map",
            Kind::BoolSet => "bool_set",
            Kind::StrMap => "str_map",
            Kind::ListMap => "list_map",
            Kind::NestedMap => "nested_map",
        }
    }

    /// Whether values of this kind are a single text node
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Kind::Int | Kind::Float | Kind::Bool | Kind::Str | Kind::EnumRef
        )
    }

    /// Whether values of this kind are keyed `Pair` groups
    pub fn is_keyed(&self) -> bool {
        matches!(
            self,
            Kind::IntMap | Kind::BoolSet | Kind::StrMap | Kind::ListMap | Kind::NestedMap
        )
    }
}

/// Classify a field name by its naming-convention prefix
///
/// # Examples
///
/// ```
/// use quarry_domain::kind::{classify, Kind};
///
/// assert_eq!(classify("iCost").kind, Kind::Int);
/// assert_eq!(classify("aaiYieldTerrain").kind, Kind::NestedMap);
/// assert_eq!(classify("Name").kind, Kind::Str);
/// ```
pub fn classify(name: &str) -> Classification {
    for (prefix, kind) in PREFIXES {
        if let Some(rest) = name.strip_prefix(prefix) {
            if rest.chars().next().is_some_and(|c| c.is_ascii_uppercase()) {
                return Classification {
                    kind: *kind,
                    prefix_len: prefix.len(),
                    unrecognized: false,
                };
            }
        }
    }

    let marker_len = name
        .chars()
        .take_while(|c| c.is_ascii_lowercase())
        .count();
    let unrecognized = marker_len > 0
        && name[marker_len..]
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_uppercase());

    Classification {
        kind: Kind::Str,
        prefix_len: 0,
        unrecognized,
    }
}

/// Produce the output key for a field name
///
/// Strips a recognized prefix and lower-cases the first remaining character.
///
/// ```
/// use quarry_domain::kind::output_key;
///
/// assert_eq!(output_key("iCost"), "cost");
/// assert_eq!(output_key("zIconName"), "iconName");
/// assert_eq!(output_key("EffectPlayer"), "effectPlayer");
/// ```
pub fn output_key(name: &str) -> String {
    let rest = &name[classify(name).prefix_len..];
    let mut chars = rest.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_longest_prefix_wins() {
        assert_eq!(classify("aaiYieldTerrain").kind, Kind::NestedMap);
        assert_eq!(classify("aaeUnitTraits").kind, Kind::ListMap);
        assert_eq!(classify("aeTechPrereq").kind, Kind::List);
        assert_eq!(classify("aiYieldCost").kind, Kind::IntMap);
        assert_eq!(classify("abTerrainValid").kind, Kind::BoolSet);
        assert_eq!(classify("azHelpText").kind, Kind::StrMap);
    }

    #[test]
    fn test_scalar_prefixes() {
        assert_eq!(classify("iStrength").kind, Kind::Int);
        assert_eq!(classify("fScale").kind, Kind::Float);
        assert_eq!(classify("bMelee").kind, Kind::Bool);
        assert_eq!(classify("zIconName").kind, Kind::Str);
        assert_eq!(classify("eUnitType").kind, Kind::EnumRef);
    }

    #[test]
    fn test_prefix_requires_uppercase_boundary() {
        // "items" is not an `i` field
        let c = classify("items");
        assert_eq!(c.kind, Kind::Str);
        assert_eq!(c.prefix_len, 0);
        assert!(!c.unrecognized);
    }

    #[test]
    fn test_unrecognized_marker() {
        let c = classify("xyWeird");
        assert_eq!(c.kind, Kind::Str);
        assert!(c.unrecognized);
        assert_eq!(output_key("xyWeird"), "xyWeird");
    }

    #[test]
    fn test_unprefixed_capitalized_name() {
        let c = classify("GameContentRequired");
        assert_eq!(c.kind, Kind::Str);
        assert!(!c.unrecognized);
        assert_eq!(output_key("GameContentRequired"), "gameContentRequired");
    }

    #[test]
    fn test_output_key() {
        assert_eq!(output_key("iCost"), "cost");
        assert_eq!(output_key("bHide"), "hide");
        assert_eq!(output_key("aeNationValid"), "nationValid");
        assert_eq!(output_key("aaiYieldTerrain"), "yieldTerrain");
    }

    proptest! {
        #[test]
        fn prop_int_marker_always_int(rest in "[A-Z][A-Za-z]{0,12}") {
            let name = format!("i{rest}");
            prop_assert_eq!(classify(&name).kind, Kind::Int);
        }

        #[test]
        fn prop_output_key_drops_exactly_the_prefix(
            prefix in prop::sample::select(vec!["aai", "aae", "ae", "ai", "ab", "az", "i", "f", "b", "z", "e"]),
            rest in "[A-Z][a-z]{0,12}",
        ) {
            let name = format!("{prefix}{rest}");
            let key = output_key(&name);
            prop_assert_eq!(key.len(), rest.len());
            prop_assert_eq!(&key[1..], &rest[1..]);
            prop_assert!(key.chars().next().is_some_and(|c| c.is_ascii_lowercase()));
        }
    }
}
