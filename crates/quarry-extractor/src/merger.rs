//! Expansion merger
//!
//! Combines the base record set of a category with the record sets of its
//! expansion files. New identifiers append in file order; any collision is a
//! data-integrity error.

use crate::error::ExtractorError;
use quarry_domain::RawEntry;
use std::collections::HashSet;

/// Record set decoded from one file
#[derive(Debug, Clone)]
pub struct FileRecords {
    /// File the records were decoded from
    pub file: String,
    /// Decoded records in file order
    pub entries: Vec<RawEntry>,
}

impl FileRecords {
    /// Create a record set
    pub fn new(file: impl Into<String>, entries: Vec<RawEntry>) -> Self {
        Self {
            file: file.into(),
            entries,
        }
    }
}

/// Merge a base record set with its expansions
///
/// Fails with `DuplicateIdentifier` on the first identifier seen twice,
/// whether the repeat is inside the base file or in any expansion.
pub fn merge(
    category: &str,
    base: FileRecords,
    expansions: Vec<FileRecords>,
) -> Result<Vec<RawEntry>, ExtractorError> {
    let mut seen = HashSet::new();
    let mut merged = Vec::with_capacity(
        base.entries.len() + expansions.iter().map(|e| e.entries.len()).sum::<usize>(),
    );

    for records in std::iter::once(base).chain(expansions) {
        for entry in records.entries {
            if !seen.insert(entry.id.clone()) {
                return Err(ExtractorError::DuplicateIdentifier {
                    category: category.to_string(),
                    id: entry.id,
                    file: records.file,
                });
            }
            merged.push(entry);
        }
    }

    Ok(merged)
}
