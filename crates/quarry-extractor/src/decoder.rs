//! Generic entry decoder
//!
//! Turns the `Entry` records of one source file into `RawEntry` values using
//! nothing but each field's name (through the classifier) and the shape of
//! its children. Sentinels are removed here; explicit `false` is kept for the
//! filter stage.

use crate::config::ExtractorConfig;
use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::error::ExtractorError;
use crate::xml::{parse_document, XmlNode};
use indexmap::{IndexMap, IndexSet};
use quarry_domain::{classify, Kind, RawEntry, TypedValue};
use tracing::debug;

const NONE_SENTINEL: &str = "NONE";
const RECORD_TAG: &str = "Entry";
const PAIR_TAG: &str = "Pair";
const SUB_PAIR_TAG: &str = "SubPair";
const INDEX_TAG: &str = "zIndex";
const SUB_INDEX_TAG: &str = "zSubIndex";
const INT_VALUE_TAG: &str = "iValue";
const BOOL_VALUE_TAG: &str = "bValue";
const STR_VALUE_TAG: &str = "zValue";

/// Role of a source file within its category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Base file; its first identifier-less record is the schema template
    Base,
    /// Expansion file; every record is data
    Expansion,
}

/// Structural shape of a field element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Empty,
    Text,
    Items,
    Pairs(Kind),
}

fn shape_of(node: &XmlNode) -> Shape {
    if node.children.is_empty() {
        return if node.text.is_some() {
            Shape::Text
        } else {
            Shape::Empty
        };
    }

    let Some(pair) = node.child(PAIR_TAG) else {
        return Shape::Items;
    };

    let kind = if pair.child(SUB_PAIR_TAG).is_some() {
        Kind::NestedMap
    } else if pair.child(INT_VALUE_TAG).is_some() {
        Kind::IntMap
    } else if pair.child(BOOL_VALUE_TAG).is_some() {
        Kind::BoolSet
    } else if pair.children_named(STR_VALUE_TAG).count() > 1 {
        Kind::ListMap
    } else {
        Kind::StrMap
    };
    Shape::Pairs(kind)
}

/// Pick the kind to decode with: the element's shape overrides the name
/// when the name promises something the children contradict.
fn effective_kind(name_kind: Kind, shape: Shape) -> Kind {
    match shape {
        Shape::Pairs(pair_kind) if !name_kind.is_keyed() => pair_kind,
        Shape::Items if name_kind.is_scalar() => Kind::List,
        _ => name_kind,
    }
}

/// Decode every record of one source file
pub fn decode_file(
    file: &str,
    bytes: &[u8],
    source_kind: SourceKind,
    config: &ExtractorConfig,
    diagnostics: &mut Diagnostics,
) -> Result<Vec<RawEntry>, ExtractorError> {
    let root = parse_document(bytes).map_err(|reason| ExtractorError::MalformedSource {
        file: file.to_string(),
        reason,
    })?;

    let mut template_skipped = source_kind == SourceKind::Expansion;
    let mut entries = Vec::new();

    for (index, record) in root.children_named(RECORD_TAG).enumerate() {
        let id = record
            .child_text(&config.identifier_field)
            .filter(|id| *id != NONE_SENTINEL);

        let Some(id) = id else {
            if !template_skipped {
                template_skipped = true;
                debug!("Skipping schema template record in {}", file);
            } else {
                diagnostics.record(
                    Diagnostic::new(
                        DiagnosticKind::MissingIdentifier,
                        format!("record #{} in {} has no {}", index, file, config.identifier_field),
                    )
                    .field(config.identifier_field.clone()),
                );
            }
            continue;
        };

        entries.push(decode_entry(id, record, config, diagnostics));
    }

    debug!("Decoded {} records from {}", entries.len(), file);
    Ok(entries)
}

/// Decode one record's fields
pub fn decode_entry(
    id: &str,
    record: &XmlNode,
    config: &ExtractorConfig,
    diagnostics: &mut Diagnostics,
) -> RawEntry {
    let mut entry = RawEntry::new(id);
    for field in &record.children {
        let mut decoder = FieldDecoder {
            entity: id,
            field: &field.name,
            config,
            diagnostics: &mut *diagnostics,
        };
        if let Some(value) = decoder.decode(field) {
            entry.fields.insert(field.name.clone(), value);
        }
    }
    entry
}

struct FieldDecoder<'a> {
    entity: &'a str,
    field: &'a str,
    config: &'a ExtractorConfig,
    diagnostics: &'a mut Diagnostics,
}

impl FieldDecoder<'_> {
    fn decode(&mut self, node: &XmlNode) -> Option<TypedValue> {
        let classification = classify(self.field);
        let shape = shape_of(node);
        if shape == Shape::Empty {
            return None;
        }

        let kind = effective_kind(classification.kind, shape);
        if classification.unrecognized && kind == classification.kind {
            self.warn(
                DiagnosticKind::UnrecognizedFieldName,
                format!("unknown naming-convention prefix, decoded as {}", kind.as_str()),
            );
        }

        match kind {
            Kind::Int => self.decode_int(node.text.as_deref()?),
            Kind::Float => self.decode_float(node.text.as_deref()?),
            Kind::Bool => {
                let text = node.text.as_deref()?;
                Some(TypedValue::Bool(text == "1" || text.eq_ignore_ascii_case("true")))
            }
            Kind::Str => non_sentinel(node.text.as_deref()?).map(TypedValue::Str),
            Kind::EnumRef => non_sentinel(node.text.as_deref()?).map(TypedValue::EnumRef),
            Kind::List => Some(TypedValue::ListOfStr(
                node.children
                    .iter()
                    .filter_map(|c| c.text.as_deref().and_then(non_sentinel))
                    .collect(),
            )),
            Kind::IntMap => Some(TypedValue::IntMap(self.decode_int_pairs(node))),
            Kind::BoolSet => Some(TypedValue::BoolSet(decode_bool_pairs(node))),
            Kind::StrMap => Some(TypedValue::StrMap(decode_str_pairs(node))),
            Kind::ListMap => Some(TypedValue::ListMap(decode_list_pairs(node))),
            Kind::NestedMap => Some(TypedValue::NestedMap(self.decode_nested_pairs(node))),
        }
    }

    fn decode_int(&mut self, text: &str) -> Option<TypedValue> {
        if text == NONE_SENTINEL {
            return None;
        }
        match text.parse::<i64>() {
            Ok(-1) => None,
            Ok(value) => Some(TypedValue::Int(value)),
            Err(_) => {
                if !self.config.allows_int_text(self.field) {
                    self.warn(
                        DiagnosticKind::TypeCoercionFailure,
                        format!("expected integer, got '{}'; kept as string", text),
                    );
                }
                Some(TypedValue::Str(text.to_string()))
            }
        }
    }

    fn decode_float(&mut self, text: &str) -> Option<TypedValue> {
        if text == NONE_SENTINEL {
            return None;
        }
        match text.parse::<f64>() {
            Ok(value) if value.is_finite() => Some(TypedValue::Float(value)),
            _ => {
                self.warn(
                    DiagnosticKind::TypeCoercionFailure,
                    format!("expected float, got '{}'; kept as string", text),
                );
                Some(TypedValue::Str(text.to_string()))
            }
        }
    }

    fn decode_int_pairs(&mut self, node: &XmlNode) -> IndexMap<String, i64> {
        let mut map = IndexMap::new();
        for pair in node.children_named(PAIR_TAG) {
            let (Some(key), Some(value)) = (pair.child_text(INDEX_TAG), pair.child_text(INT_VALUE_TAG))
            else {
                continue;
            };
            match value.parse::<i64>() {
                Ok(value) => {
                    map.insert(key.to_string(), value);
                }
                Err(_) => self.warn(
                    DiagnosticKind::TypeCoercionFailure,
                    format!("map entry '{}' has non-integer value '{}'; skipped", key, value),
                ),
            }
        }
        map
    }

    fn decode_nested_pairs(&mut self, node: &XmlNode) -> IndexMap<String, IndexMap<String, i64>> {
        let mut map = IndexMap::new();
        for pair in node.children_named(PAIR_TAG) {
            let Some(key) = pair.child_text(INDEX_TAG) else {
                continue;
            };
            let mut inner = IndexMap::new();
            for sub in pair.children_named(SUB_PAIR_TAG) {
                let (Some(sub_key), Some(value)) =
                    (sub.child_text(SUB_INDEX_TAG), sub.child_text(INT_VALUE_TAG))
                else {
                    continue;
                };
                match value.parse::<i64>() {
                    Ok(value) => {
                        inner.insert(sub_key.to_string(), value);
                    }
                    Err(_) => self.warn(
                        DiagnosticKind::TypeCoercionFailure,
                        format!(
                            "map entry '{}.{}' has non-integer value '{}'; skipped",
                            key, sub_key, value
                        ),
                    ),
                }
            }
            if !inner.is_empty() {
                map.insert(key.to_string(), inner);
            }
        }
        map
    }

    fn warn(&mut self, kind: DiagnosticKind, message: String) {
        self.diagnostics.record(
            Diagnostic::new(kind, message)
                .entity(self.entity)
                .field(self.field),
        );
    }
}

fn non_sentinel(text: &str) -> Option<String> {
    (text != NONE_SENTINEL).then(|| text.to_string())
}

fn decode_bool_pairs(node: &XmlNode) -> IndexSet<String> {
    node.children_named(PAIR_TAG)
        .filter(|pair| pair.child_text(BOOL_VALUE_TAG) == Some("1"))
        .filter_map(|pair| pair.child_text(INDEX_TAG).map(str::to_string))
        .collect()
}

fn decode_str_pairs(node: &XmlNode) -> IndexMap<String, String> {
    node.children_named(PAIR_TAG)
        .filter_map(|pair| {
            let key = pair.child_text(INDEX_TAG)?;
            let value = non_sentinel(pair.child_text(STR_VALUE_TAG)?)?;
            Some((key.to_string(), value))
        })
        .collect()
}

fn decode_list_pairs(node: &XmlNode) -> IndexMap<String, Vec<String>> {
    node.children_named(PAIR_TAG)
        .filter_map(|pair| {
            let key = pair.child_text(INDEX_TAG)?;
            let values: Vec<String> = pair
                .children_named(STR_VALUE_TAG)
                .filter_map(|v| v.text.as_deref().and_then(non_sentinel))
                .collect();
            (!values.is_empty()).then(|| (key.to_string(), values))
        })
        .collect()
}
