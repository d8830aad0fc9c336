//! Emitted documents

use crate::entry::NormalizedEntity;
use indexmap::IndexMap;
use serde::Serialize;

/// Metadata block shared by every emitted document
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputMeta {
    /// Category name (or `textForms` for the forms document)
    pub category: String,

    /// Active language identifier
    pub language: String,

    /// ISO 8601 extraction timestamp
    pub extracted_at: String,

    /// Optional game version string
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_version: Option<String>,
}

/// Final per-category document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryOutput {
    /// Metadata block
    pub meta: OutputMeta,

    /// Entities keyed by identifier, ordered by identifier
    pub entries: IndexMap<String, NormalizedEntity>,
}

/// Supplementary document listing every multi-form localization key
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormsDocument {
    /// Metadata block
    pub meta: OutputMeta,

    /// Key -> ordered grammatical forms
    pub forms: IndexMap<String, Vec<String>>,
}
