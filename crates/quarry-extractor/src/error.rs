//! Error types for the Extractor

use thiserror::Error;

/// Errors that can occur during extraction
///
/// Only structural failures surface here. Per-record and per-field problems
/// are recovered locally and reported through `Diagnostics`.
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Source file is not well-formed XML
    #[error("Malformed source '{file}': {reason}")]
    MalformedSource {
        /// File name
        file: String,
        /// Parser message
        reason: String,
    },

    /// Required source file does not exist
    #[error("Missing source file: {0}")]
    MissingSource(String),

    /// Source provider failed to read or list files
    #[error("Source error: {0}")]
    Source(String),

    /// Identifier appears more than once after merging expansions
    #[error("Duplicate identifier '{id}' in category '{category}' (from {file})")]
    DuplicateIdentifier {
        /// Category name
        category: String,
        /// Colliding identifier
        id: String,
        /// File the second occurrence came from
        file: String,
    },

    /// Requested language is not in the language table
    #[error("Unknown language '{language}'. Valid options: {valid}")]
    UnknownLanguage {
        /// Requested language
        language: String,
        /// Comma-separated valid options
        valid: String,
    },

    /// Category build task failed to complete
    #[error("Worker error: {0}")]
    Worker(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ExtractorError {
    /// Whether this error must fail the whole run rather than one category
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            ExtractorError::MalformedSource { .. } | ExtractorError::MissingSource(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatality() {
        let malformed = ExtractorError::MalformedSource {
            file: "tech.xml".into(),
            reason: "unexpected end".into(),
        };
        assert!(!malformed.is_fatal());
        assert!(!ExtractorError::MissingSource("unit.xml".into()).is_fatal());

        let duplicate = ExtractorError::DuplicateIdentifier {
            category: "technologies".into(),
            id: "TECH_X".into(),
            file: "tech-wog.xml".into(),
        };
        assert!(duplicate.is_fatal());
        assert!(duplicate.to_string().contains("TECH_X"));
    }
}
