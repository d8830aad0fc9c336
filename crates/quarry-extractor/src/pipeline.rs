//! Pipeline orchestrator
//!
//! Builds the shared extraction context once, runs every category build on
//! the blocking pool (bounded by a semaphore), waits for all of them, then
//! applies reverse-index patches and assembles the final documents.

use crate::config::ExtractorConfig;
use crate::decoder::{decode_file, SourceKind};
use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::error::ExtractorError;
use crate::filter::evaluate;
use crate::merger::{merge, FileRecords};
use crate::normalizer::normalize;
use crate::reverse_index::{apply_patches, build_reverse_indexes};
use crate::source::{read_optional, read_required};
use crate::text::TextResolver;
use crate::types::{CategoryFailure, CategorySnapshot, RunOutput};
use indexmap::IndexMap;
use quarry_domain::{
    CategoryDef, CategoryOutput, FormsDocument, OutputMeta, Registry, SourceProvider,
};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Category name used in the forms document's metadata
pub const FORMS_CATEGORY: &str = "textForms";

/// Immutable state shared by every category build
#[derive(Debug, Clone)]
pub struct ExtractionContext {
    /// Run configuration
    pub config: ExtractorConfig,

    /// Localization resolver for the active language
    pub resolver: TextResolver,
}

impl ExtractionContext {
    /// Validate the configuration and load the localization tables
    pub fn load<S: SourceProvider>(
        source: &S,
        config: ExtractorConfig,
    ) -> Result<Self, ExtractorError> {
        config.validate().map_err(ExtractorError::Config)?;
        let resolver = TextResolver::load(source, &config)?;
        Ok(Self { config, resolver })
    }
}

/// Build one category: decode, merge, filter and normalize
///
/// Per-record problems go to `diagnostics`; an error aborts this category
/// only.
pub fn build_category<S: SourceProvider>(
    def: &CategoryDef,
    source: &S,
    context: &ExtractionContext,
    diagnostics: &mut Diagnostics,
) -> Result<CategorySnapshot, ExtractorError> {
    let config = &context.config;

    let bytes = read_required(source, &def.source_file)?;
    let base = FileRecords::new(
        def.source_file.clone(),
        decode_file(&def.source_file, &bytes, SourceKind::Base, config, diagnostics)?,
    );

    let mut expansions = Vec::with_capacity(def.expansion_files.len());
    for file in &def.expansion_files {
        let Some(bytes) = read_optional(source, file)? else {
            debug!("Expansion file {} not present, skipping", file);
            continue;
        };
        let entries = decode_file(file, &bytes, SourceKind::Expansion, config, diagnostics)?;
        expansions.push(FileRecords::new(file.clone(), entries));
    }

    let merged = merge(&def.name, base, expansions)?;
    let total = merged.len();

    let mut entries = IndexMap::new();
    for entry in merged.iter().filter(|e| evaluate(&def.filter, e)) {
        let entity = normalize(def, entry, &context.resolver, config, diagnostics);
        entries.insert(entry.id.clone(), entity);
    }

    debug!(
        "Category '{}': {} of {} records passed the filter",
        def.name,
        entries.len(),
        total
    );
    Ok(CategorySnapshot::new(def.name.clone(), entries))
}

fn diagnostic_kind(error: &ExtractorError) -> Option<DiagnosticKind> {
    match error {
        ExtractorError::MalformedSource { .. } => Some(DiagnosticKind::MalformedSource),
        ExtractorError::MissingSource(_) => Some(DiagnosticKind::MissingSource),
        ExtractorError::DuplicateIdentifier { .. } => Some(DiagnosticKind::DuplicateIdentifier),
        _ => None,
    }
}

/// Runs a full extraction over a source
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: ExtractorConfig,
    game_version: Option<String>,
}

impl Pipeline {
    /// Create a pipeline, validating the configuration
    pub fn new(config: ExtractorConfig) -> Result<Self, ExtractorError> {
        config.validate().map_err(ExtractorError::Config)?;
        Ok(Self {
            config,
            game_version: None,
        })
    }

    /// Embed a game version string in every document's metadata
    pub fn with_game_version(mut self, version: impl Into<String>) -> Self {
        self.game_version = Some(version.into());
        self
    }

    /// Configuration in use
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extract every category of the registry
    ///
    /// Structural failures (unreadable language table, unknown language,
    /// worker panics) return an error. Category-level failures are reported
    /// in `RunOutput::failures` and do not stop the other categories.
    pub async fn run<S>(&self, source: Arc<S>, registry: &Registry) -> Result<RunOutput, ExtractorError>
    where
        S: SourceProvider + 'static,
    {
        info!("Loading text dictionary for '{}'...", self.config.language);
        let context = {
            let source = Arc::clone(&source);
            let config = self.config.clone();
            tokio::task::spawn_blocking(move || ExtractionContext::load(source.as_ref(), config))
                .await
                .map_err(|e| ExtractorError::Worker(format!("Task join error: {}", e)))??
        };
        let context = Arc::new(context);

        let semaphore = Arc::new(Semaphore::new(self.config.workers));
        let mut tasks = JoinSet::new();

        for (index, def) in registry.categories.iter().cloned().enumerate() {
            let permit = Arc::clone(&semaphore)
                .acquire_owned()
                .await
                .map_err(|e| ExtractorError::Worker(e.to_string()))?;
            let source = Arc::clone(&source);
            let context = Arc::clone(&context);

            info!("Processing '{}'...", def.display_name());
            tasks.spawn_blocking(move || {
                let _permit = permit;
                let mut diagnostics = Diagnostics::scoped(def.name.clone());
                let result = build_category(&def, source.as_ref(), &context, &mut diagnostics);
                (index, def, result, diagnostics)
            });
        }

        let mut diagnostics = Diagnostics::new();
        let mut failures = Vec::new();
        let mut built = Vec::with_capacity(registry.categories.len());

        // Barrier: every build finishes before reverse indexing starts
        while let Some(joined) = tasks.join_next().await {
            let (index, def, result, category_diagnostics) =
                joined.map_err(|e| ExtractorError::Worker(format!("Task join error: {}", e)))?;
            diagnostics.merge(category_diagnostics);

            match result {
                Ok(snapshot) => {
                    info!("  {} entries in '{}'", snapshot.len(), def.display_name());
                    built.push((index, snapshot));
                }
                Err(error) => {
                    warn!("Category '{}' aborted: {}", def.name, error);
                    if let Some(kind) = diagnostic_kind(&error) {
                        diagnostics.record(Diagnostic::new(kind, error.to_string()).category(def.name.clone()));
                    }
                    failures.push(CategoryFailure {
                        category: def.name.clone(),
                        reason: error.to_string(),
                        fatal: error.is_fatal(),
                    });
                }
            }
        }

        built.sort_by_key(|(index, _)| *index);
        let snapshots: Vec<CategorySnapshot> = built.into_iter().map(|(_, s)| s).collect();

        let patches = build_reverse_indexes(&snapshots, &registry.reverse_indexes, &mut diagnostics);
        debug!("Applying {} reverse-index fields", patches.len());
        let snapshots = apply_patches(snapshots, patches);

        let extracted_at = chrono::Utc::now().to_rfc3339();
        let outputs = snapshots
            .into_iter()
            .map(|snapshot| CategoryOutput {
                meta: self.meta(&snapshot.name, &extracted_at),
                entries: snapshot.entries,
            })
            .collect();
        let forms = FormsDocument {
            meta: self.meta(FORMS_CATEGORY, &extracted_at),
            forms: context.resolver.multi_form_keys(),
        };

        info!(
            "Extraction complete: {} categories built, {} failed, {} diagnostics",
            registry.categories.len() - failures.len(),
            failures.len(),
            diagnostics.len()
        );

        Ok(RunOutput {
            outputs,
            forms,
            diagnostics,
            failures,
        })
    }

    fn meta(&self, category: &str, extracted_at: &str) -> OutputMeta {
        OutputMeta {
            category: category.to_string(),
            language: self.config.language.clone(),
            extracted_at: extracted_at.to_string(),
            game_version: self.game_version.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemorySource;

    const LANGUAGES: &str = r#"<Root><Entry><zType>LANGUAGE_ENGLISH</zType><zFieldName>en-US</zFieldName></Entry></Root>"#;

    #[test]
    fn test_invalid_config_rejected() {
        let config = ExtractorConfig {
            workers: 0,
            ..ExtractorConfig::default()
        };
        assert!(matches!(Pipeline::new(config), Err(ExtractorError::Config(_))));
    }

    #[test]
    fn test_missing_expansion_is_skipped() {
        let source = MemorySource::new()
            .with_file("language.xml", LANGUAGES)
            .with_file(
                "tech.xml",
                "<Root><Entry><zType/></Entry><Entry><zType>TECH_A</zType><iCost>10</iCost></Entry></Root>",
            );
        let context = ExtractionContext::load(&source, ExtractorConfig::default()).unwrap();
        let mut def = CategoryDef::new("technologies", "tech.xml");
        def.expansion_files.push("tech-missing.xml".to_string());

        let mut diagnostics = Diagnostics::new();
        let snapshot = build_category(&def, &source, &context, &mut diagnostics).unwrap();
        assert_eq!(snapshot.len(), 1);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_missing_base_file() {
        let source = MemorySource::new().with_file("language.xml", LANGUAGES);
        let context = ExtractionContext::load(&source, ExtractorConfig::default()).unwrap();
        let def = CategoryDef::new("units", "unit.xml");

        let result = build_category(&def, &source, &context, &mut Diagnostics::new());
        assert!(matches!(result, Err(ExtractorError::MissingSource(_))));
    }

    #[test]
    fn test_run_on_current_thread_runtime() {
        let source = Arc::new(MemorySource::new().with_file("language.xml", LANGUAGES));
        let pipeline = Pipeline::new(ExtractorConfig::default())
            .unwrap()
            .with_game_version("1.0.70000");

        let output = tokio_test::block_on(pipeline.run(source, &Registry::default())).unwrap();
        assert!(output.is_success());
        assert!(output.outputs.is_empty());
        assert_eq!(output.forms.meta.category, FORMS_CATEGORY);
        assert_eq!(output.forms.meta.game_version.as_deref(), Some("1.0.70000"));
    }
}
