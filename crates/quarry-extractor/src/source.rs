//! In-memory source provider and read helpers

use crate::error::ExtractorError;
use quarry_domain::SourceProvider;
use std::collections::BTreeMap;
use std::convert::Infallible;

/// Source files held in memory, keyed by file name
///
/// Used for tests and for embedding small data sets.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: BTreeMap<String, Vec<u8>>,
}

impl MemorySource {
    /// Create an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style file insertion
    pub fn with_file(mut self, name: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        self.insert(name, contents);
        self
    }

    /// Add or replace a file
    pub fn insert(&mut self, name: impl Into<String>, contents: impl Into<Vec<u8>>) {
        self.files.insert(name.into(), contents.into());
    }

    /// Number of files held
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether no files are held
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl SourceProvider for MemorySource {
    type Error = Infallible;

    fn read(&self, name: &str) -> Result<Option<Vec<u8>>, Self::Error> {
        Ok(self.files.get(name).cloned())
    }

    fn list(&self) -> Result<Vec<String>, Self::Error> {
        // BTreeMap keys are already sorted
        Ok(self.files.keys().cloned().collect())
    }
}

/// Read a file that must exist
pub(crate) fn read_required<S: SourceProvider>(
    source: &S,
    name: &str,
) -> Result<Vec<u8>, ExtractorError> {
    read_optional(source, name)?.ok_or_else(|| ExtractorError::MissingSource(name.to_string()))
}

/// Read a file that may be absent
pub(crate) fn read_optional<S: SourceProvider>(
    source: &S,
    name: &str,
) -> Result<Option<Vec<u8>>, ExtractorError> {
    source
        .read(name)
        .map_err(|e| ExtractorError::Source(format!("{}: {}", name, e)))
}

/// List files with a name prefix
pub(crate) fn list_matching<S: SourceProvider>(
    source: &S,
    prefix: &str,
) -> Result<Vec<String>, ExtractorError> {
    source
        .list_matching(prefix)
        .map_err(|e| ExtractorError::Source(e.to_string()))
}
