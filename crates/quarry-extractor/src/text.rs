//! Localization dictionary and resolver
//!
//! The dictionary is built once per run from the language table and every
//! localization file, then frozen inside a `TextResolver`. Lookups are pure:
//! problems are reported back as a `Resolution` issue and turned into
//! diagnostics by the caller, which knows the entity and field involved.

use crate::config::{ExtractorConfig, MissingKeyPolicy};
use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::error::ExtractorError;
use crate::source::{list_matching, read_required};
use crate::xml::parse_document;
use indexmap::IndexMap;
use quarry_domain::SourceProvider;
use regex::{Captures, Regex};
use std::collections::HashMap;
use tracing::{debug, info};

const TEXT_REFERENCE_PATTERN: &str = r"\{((?:GENDERED_)?TEXT_\w+)\}";
const FORM_SEPARATOR: char = '~';
const MASCULINE: &str = "GRAMMATICAL_GENDER_MASCULINE";

/// One row of the language table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Language {
    /// Language identifier (e.g. `LANGUAGE_ENGLISH`)
    pub id: String,
    /// Column name used in localization files (e.g. `en-US`)
    pub column: String,
}

/// Available languages, parsed from the language table
#[derive(Debug, Clone, Default)]
pub struct LanguageTable {
    languages: Vec<Language>,
}

impl LanguageTable {
    /// Parse the language table document
    pub fn parse(bytes: &[u8]) -> Result<Self, String> {
        let root = parse_document(bytes)?;
        let languages = root
            .children_named("Entry")
            .filter_map(|entry| {
                let column = entry.child_text("zFieldName")?;
                Some(Language {
                    id: entry.child_text("zType").unwrap_or_default().to_string(),
                    column: column.to_string(),
                })
            })
            .collect();
        Ok(Self { languages })
    }

    /// Localization column for a language id or column name
    pub fn column_for(&self, language: &str) -> Result<&str, ExtractorError> {
        self.languages
            .iter()
            .find(|l| l.column == language || l.id == language)
            .map(|l| l.column.as_str())
            .ok_or_else(|| ExtractorError::UnknownLanguage {
                language: language.to_string(),
                valid: self
                    .languages
                    .iter()
                    .map(|l| l.column.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

/// Localization keys mapped to per-language grammatical forms
///
/// Only the columns requested at construction are retained.
#[derive(Debug, Clone, Default)]
pub struct TextDictionary {
    columns: Vec<String>,
    entries: HashMap<String, HashMap<String, Vec<String>>>,
    gendered: HashMap<String, String>,
}

impl TextDictionary {
    /// Create an empty dictionary retaining the given language columns
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            ..Self::default()
        }
    }

    /// Add every record of one localization file
    ///
    /// Keys already present are overridden column by column.
    pub fn add_text_file(&mut self, bytes: &[u8]) -> Result<usize, String> {
        let root = parse_document(bytes)?;
        let mut added = 0;
        for entry in root.children_named("Entry") {
            let Some(key) = entry.child_text("zType") else {
                continue;
            };
            for column in &self.columns {
                let Some(text) = entry.child_text(column) else {
                    continue;
                };
                let forms = text.split(FORM_SEPARATOR).map(str::to_string).collect();
                self.entries
                    .entry(key.to_string())
                    .or_default()
                    .insert(column.clone(), forms);
                added += 1;
            }
        }
        Ok(added)
    }

    /// Add the gendered-key indirections of one gendered-text file
    pub fn add_gendered_file(&mut self, bytes: &[u8]) -> Result<usize, String> {
        let root = parse_document(bytes)?;
        let mut added = 0;
        for entry in root.children_named("Entry") {
            let (Some(key), Some(texts)) = (entry.child_text("zType"), entry.child("Texts")) else {
                continue;
            };
            let masculine = texts
                .children_named("Pair")
                .find(|pair| pair.child_text("zIndex") == Some(MASCULINE))
                .and_then(|pair| pair.child_text("zValue"));
            if let Some(target) = masculine {
                self.gendered.insert(key.to_string(), target.to_string());
                added += 1;
            }
        }
        Ok(added)
    }

    /// Insert forms for a key directly
    pub fn insert(&mut self, key: impl Into<String>, column: impl Into<String>, forms: Vec<String>) {
        self.entries
            .entry(key.into())
            .or_default()
            .insert(column.into(), forms);
    }

    /// Map a gendered key to its masculine plain key
    pub fn insert_gendered(&mut self, key: impl Into<String>, target: impl Into<String>) {
        self.gendered.insert(key.into(), target.into());
    }

    /// Number of keys with forms in a column
    pub fn len_for(&self, column: &str) -> usize {
        self.entries.values().filter(|e| e.contains_key(column)).count()
    }
}

/// Problem encountered while resolving a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionIssue {
    /// The key has no entry in the active (or fallback) language
    MissingKey,
    /// References were still present when the depth bound was reached
    DepthExceeded,
}

/// Outcome of resolving one key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Resolved text
    pub text: String,
    /// Problem to report, if any
    pub issue: Option<ResolutionIssue>,
}

impl Resolution {
    /// Diagnostic describing the issue, if any
    pub fn diagnostic(&self, key: &str) -> Option<Diagnostic> {
        match self.issue? {
            ResolutionIssue::MissingKey => Some(Diagnostic::new(
                DiagnosticKind::MissingLocalizationKey,
                format!("no localization entry for '{}'", key),
            )),
            ResolutionIssue::DepthExceeded => Some(Diagnostic::new(
                DiagnosticKind::RecursionDepthExceeded,
                format!("unresolved references remain in '{}': {}", key, self.text),
            )),
        }
    }
}

/// Immutable localization resolver for one active language
#[derive(Debug, Clone)]
pub struct TextResolver {
    dictionary: TextDictionary,
    column: String,
    fallback: Option<String>,
    max_depth: usize,
    missing_key_policy: MissingKeyPolicy,
    pattern: Regex,
}

impl TextResolver {
    /// Create a resolver over a built dictionary
    pub fn new(
        dictionary: TextDictionary,
        column: impl Into<String>,
        fallback: Option<String>,
        config: &ExtractorConfig,
    ) -> Result<Self, ExtractorError> {
        let pattern = Regex::new(TEXT_REFERENCE_PATTERN)
            .map_err(|e| ExtractorError::Config(format!("text reference pattern: {}", e)))?;
        Ok(Self {
            dictionary,
            column: column.into(),
            fallback,
            max_depth: config.max_resolve_depth,
            missing_key_policy: config.missing_key_policy,
            pattern,
        })
    }

    /// Build the resolver from a data source
    ///
    /// Reads the language table, then every localization file and every
    /// gendered-text file in sorted name order.
    pub fn load<S: SourceProvider>(
        source: &S,
        config: &ExtractorConfig,
    ) -> Result<Self, ExtractorError> {
        let language_file = &config.language_file;
        let table = LanguageTable::parse(&read_required(source, language_file)?).map_err(
            |reason| ExtractorError::MalformedSource {
                file: language_file.clone(),
                reason,
            },
        )?;

        let column = table.column_for(&config.language)?.to_string();
        let fallback = config
            .fallback_language
            .as_deref()
            .map(|language| table.column_for(language).map(str::to_string))
            .transpose()?;

        let mut columns = vec![column.clone()];
        columns.extend(fallback.iter().cloned());
        let mut dictionary = TextDictionary::new(columns);

        for file in list_matching(source, &config.text_file_prefix)? {
            let added = dictionary
                .add_text_file(&read_required(source, &file)?)
                .map_err(|reason| ExtractorError::MalformedSource {
                    file: file.clone(),
                    reason,
                })?;
            debug!("Loaded {} localized texts from {}", added, file);
        }

        for file in list_matching(source, &config.gendered_file_prefix)? {
            let added = dictionary
                .add_gendered_file(&read_required(source, &file)?)
                .map_err(|reason| ExtractorError::MalformedSource {
                    file: file.clone(),
                    reason,
                })?;
            debug!("Loaded {} gendered keys from {}", added, file);
        }

        let resolver = Self::new(dictionary, column, fallback, config)?;
        info!(
            "{} text entries loaded for '{}'",
            resolver.len(),
            config.language
        );
        Ok(resolver)
    }

    /// Localization column of the active language
    pub fn column(&self) -> &str {
        &self.column
    }

    /// Number of keys with forms in the active language
    pub fn len(&self) -> usize {
        self.dictionary.len_for(&self.column)
    }

    /// Whether the active language has no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All raw forms of a key in the active language
    ///
    /// Gendered keys take one hop to their masculine key first. When the
    /// active language has no entry, the fallback language is consulted.
    pub fn forms(&self, key: &str) -> Option<&[String]> {
        let key = self
            .dictionary
            .gendered
            .get(key)
            .map(String::as_str)
            .unwrap_or(key);
        let columns = self.dictionary.entries.get(key)?;
        columns
            .get(&self.column)
            .or_else(|| self.fallback.as_ref().and_then(|f| columns.get(f)))
            .map(Vec::as_slice)
    }

    /// First form of a key, recursively expanded
    pub fn resolve(&self, key: &str, diagnostics: &mut Diagnostics) -> String {
        self.resolve_form(key, 0, diagnostics)
    }

    /// Selected form of a key, recursively expanded
    ///
    /// An out-of-range index selects the first form.
    pub fn resolve_form(&self, key: &str, index: usize, diagnostics: &mut Diagnostics) -> String {
        let resolution = self.lookup_form(key, index);
        if let Some(diagnostic) = resolution.diagnostic(key) {
            diagnostics.record(diagnostic);
        }
        resolution.text
    }

    /// Resolve a form without recording diagnostics
    pub fn lookup_form(&self, key: &str, index: usize) -> Resolution {
        let form = self
            .forms(key)
            .and_then(|forms| forms.get(index).or_else(|| forms.first()));

        match form {
            Some(form) => self.expand(form),
            None => Resolution {
                text: match self.missing_key_policy {
                    MissingKeyPolicy::RawKey => key.to_string(),
                    MissingKeyPolicy::Empty => String::new(),
                },
                issue: Some(ResolutionIssue::MissingKey),
            },
        }
    }

    /// Substitute nested references pass by pass
    ///
    /// Stops when no reference to a known key remains or the depth bound is
    /// reached. References to missing keys stay verbatim.
    fn expand(&self, text: &str) -> Resolution {
        let mut current = text.to_string();
        for _ in 0..self.max_depth {
            if !self.has_known_reference(&current) {
                return Resolution {
                    text: current,
                    issue: None,
                };
            }
            current = self
                .pattern
                .replace_all(&current, |caps: &Captures| {
                    self.forms(&caps[1])
                        .and_then(|forms| forms.first())
                        .cloned()
                        .unwrap_or_else(|| caps[0].to_string())
                })
                .into_owned();
        }

        let issue = self
            .has_known_reference(&current)
            .then_some(ResolutionIssue::DepthExceeded);
        Resolution {
            text: current,
            issue,
        }
    }

    fn has_known_reference(&self, text: &str) -> bool {
        self.pattern
            .captures_iter(text)
            .any(|caps| self.forms(&caps[1]).is_some())
    }

    /// Every key with more than one form in the active language, sorted by key
    pub fn multi_form_keys(&self) -> IndexMap<String, Vec<String>> {
        let mut keys: Vec<(&String, &Vec<String>)> = self
            .dictionary
            .entries
            .iter()
            .filter_map(|(key, columns)| Some((key, columns.get(&self.column)?)))
            .filter(|(_, forms)| forms.len() > 1)
            .collect();
        keys.sort_by(|a, b| a.0.cmp(b.0));
        keys.into_iter()
            .map(|(key, forms)| (key.clone(), forms.clone()))
            .collect()
    }
}
