//! Diagnostics collected during a run
//!
//! Recoverable problems never abort a category build. Each one is recorded
//! here with enough context to find it in the source data, and the merged
//! report is surfaced at the end of the run.

use std::collections::BTreeMap;
use std::fmt;

/// Kind of recoverable problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticKind {
    /// A source file could not be parsed
    MalformedSource,
    /// A base source file does not exist
    MissingSource,
    /// Field name has an unknown lowercase prefix
    UnrecognizedFieldName,
    /// Numeric field held non-numeric text
    TypeCoercionFailure,
    /// Record had no identifier
    MissingIdentifier,
    /// Localization key has no entry
    MissingLocalizationKey,
    /// Nested text references exceeded the depth bound
    RecursionDepthExceeded,
    /// Expansion record reused an identifier
    DuplicateIdentifier,
    /// Reverse field replaced an existing forward field
    ReverseFieldCollision,
}

impl DiagnosticKind {
    /// Get the kind name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticKind::MalformedSource => "malformed_source",
            DiagnosticKind::MissingSource => "missing_source",
            DiagnosticKind::UnrecognizedFieldName => "unrecognized_field_name",
            DiagnosticKind::TypeCoercionFailure => "type_coercion_failure",
            DiagnosticKind::MissingIdentifier => "missing_identifier",
            DiagnosticKind::MissingLocalizationKey => "missing_localization_key",
            DiagnosticKind::RecursionDepthExceeded => "recursion_depth_exceeded",
            DiagnosticKind::DuplicateIdentifier => "duplicate_identifier",
            DiagnosticKind::ReverseFieldCollision => "reverse_field_collision",
        }
    }

    /// Default severity for this kind
    pub fn severity(&self) -> Severity {
        match self {
            DiagnosticKind::MalformedSource
            | DiagnosticKind::MissingSource
            | DiagnosticKind::DuplicateIdentifier => Severity::Error,
            _ => Severity::Warning,
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Recovered locally
    Warning,
    /// Aborted a category
    Error,
}

/// One recorded problem
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// What went wrong
    pub kind: DiagnosticKind,
    /// Category being built, if any
    pub category: Option<String>,
    /// Entity identifier, if known
    pub entity: Option<String>,
    /// Source field name, if relevant
    pub field: Option<String>,
    /// Human-readable detail
    pub message: String,
}

impl Diagnostic {
    /// Create a diagnostic with only a kind and message
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            category: None,
            entity: None,
            field: None,
            message: message.into(),
        }
    }

    /// Attach a category name, overriding the collector's scope
    pub fn category(mut self, name: impl Into<String>) -> Self {
        self.category = Some(name.into());
        self
    }

    /// Attach an entity identifier
    pub fn entity(mut self, id: impl Into<String>) -> Self {
        self.entity = Some(id.into());
        self
    }

    /// Attach a field name
    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.field = Some(name.into());
        self
    }

    /// Severity of this diagnostic
    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.kind)?;
        if let Some(category) = &self.category {
            write!(f, " {}", category)?;
        }
        if let Some(entity) = &self.entity {
            write!(f, " {}", entity)?;
        }
        if let Some(field) = &self.field {
            write!(f, ".{}", field)?;
        }
        write!(f, ": {}", self.message)
    }
}

/// Collector for diagnostics
///
/// Each category build owns one; the orchestrator merges them at the end.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    scope: Option<String>,
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Create an unscoped collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a collector that tags every diagnostic with a category
    pub fn scoped(category: impl Into<String>) -> Self {
        Self {
            scope: Some(category.into()),
            entries: Vec::new(),
        }
    }

    /// Record a diagnostic
    pub fn record(&mut self, mut diagnostic: Diagnostic) {
        if diagnostic.category.is_none() {
            diagnostic.category = self.scope.clone();
        }
        match diagnostic.severity() {
            Severity::Error => tracing::error!("{}", diagnostic),
            Severity::Warning => tracing::warn!("{}", diagnostic),
        }
        self.entries.push(diagnostic);
    }

    /// Move every diagnostic from another collector into this one
    pub fn merge(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    /// All recorded diagnostics
    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    /// Number of recorded diagnostics
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Count of diagnostics of one kind
    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.entries.iter().filter(|d| d.kind == kind).count()
    }

    /// Counts per kind, ordered by kind
    pub fn counts(&self) -> BTreeMap<DiagnosticKind, usize> {
        let mut counts = BTreeMap::new();
        for diagnostic in &self.entries {
            *counts.entry(diagnostic.kind).or_insert(0) += 1;
        }
        counts
    }

    /// Whether any error-severity diagnostic was recorded
    pub fn has_errors(&self) -> bool {
        self.entries.iter().any(|d| d.severity() == Severity::Error)
    }

    /// Generate a summary report
    pub fn summary(&self) -> String {
        if self.entries.is_empty() {
            return "No diagnostics".to_string();
        }

        let mut lines = vec![format!("Diagnostics: {} total", self.entries.len())];
        for (kind, count) in self.counts() {
            lines.push(format!("  {}: {}", kind, count));
        }
        lines.join("\n")
    }
}
