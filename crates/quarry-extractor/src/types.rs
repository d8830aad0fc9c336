//! Intermediate and final results of a run

use crate::diagnostics::Diagnostics;
use indexmap::IndexMap;
use quarry_domain::{CategoryOutput, FormsDocument, NormalizedEntity};

/// One category after normalization, before reverse indexing
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySnapshot {
    /// Category name
    pub name: String,

    /// Entities keyed by identifier, ordered by identifier
    pub entries: IndexMap<String, NormalizedEntity>,
}

impl CategorySnapshot {
    /// Create a snapshot, sorting entries by identifier
    pub fn new(name: impl Into<String>, mut entries: IndexMap<String, NormalizedEntity>) -> Self {
        entries.sort_keys();
        Self {
            name: name.into(),
            entries,
        }
    }

    /// Number of entities
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the snapshot has no entities
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A category whose build was aborted
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryFailure {
    /// Category name
    pub category: String,

    /// Error message
    pub reason: String,

    /// Whether the failure makes the whole run unsuccessful
    pub fatal: bool,
}

/// Everything a run produced
#[derive(Debug, Clone)]
pub struct RunOutput {
    /// Final documents for every category that built, in registry order
    pub outputs: Vec<CategoryOutput>,

    /// Keys with more than one grammatical form
    pub forms: FormsDocument,

    /// Every diagnostic recorded during the run
    pub diagnostics: Diagnostics,

    /// Categories that were aborted
    pub failures: Vec<CategoryFailure>,
}

impl RunOutput {
    /// Whether no fatal failure occurred
    pub fn is_success(&self) -> bool {
        !self.failures.iter().any(|f| f.fatal)
    }

    /// Total number of emitted entities
    pub fn total_entries(&self) -> usize {
        self.outputs.iter().map(|o| o.entries.len()).sum()
    }

    /// Output for one category
    pub fn output(&self, category: &str) -> Option<&CategoryOutput> {
        self.outputs.iter().find(|o| o.meta.category == category)
    }
}
