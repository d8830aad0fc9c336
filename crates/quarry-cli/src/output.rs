//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use crate::writer::WrittenFile;
use colored::*;
use quarry_domain::Registry;
use quarry_extractor::{Diagnostics, RunOutput, Severity};
use serde_json::json;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Number of individual diagnostics shown in table mode.
const DIAGNOSTIC_PREVIEW: usize = 20;

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format the result of an extraction run.
    pub fn format_run(&self, output: &RunOutput, written: &[WrittenFile]) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.format_run_json(output, written),
            OutputFormat::Table => Ok(self.format_run_table(output, written)),
        }
    }

    fn format_run_json(&self, output: &RunOutput, written: &[WrittenFile]) -> Result<String> {
        let failures: Vec<_> = output
            .failures
            .iter()
            .map(|f| json!({"category": f.category, "reason": f.reason, "fatal": f.fatal}))
            .collect();
        let diagnostics: serde_json::Map<String, serde_json::Value> = output
            .diagnostics
            .counts()
            .into_iter()
            .map(|(kind, count)| (kind.to_string(), json!(count)))
            .collect();

        Ok(serde_json::to_string_pretty(&json!({
            "success": output.is_success(),
            "files": written,
            "failures": failures,
            "diagnostics": diagnostics,
        }))?)
    }

    fn format_run_table(&self, output: &RunOutput, written: &[WrittenFile]) -> String {
        let mut builder = Builder::default();
        builder.push_record(["Category", "Entries", "Output"]);
        for file in written {
            builder.push_record([
                file.category.clone(),
                file.entries.to_string(),
                file.path.display().to_string(),
            ]);
        }
        for failure in &output.failures {
            builder.push_record([
                failure.category.clone(),
                "-".to_string(),
                self.colorize(&failure.reason, "red"),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        let mut lines = vec![table.to_string()];
        if !output.diagnostics.is_empty() {
            lines.push(self.format_diagnostics(&output.diagnostics));
        }
        let skipped = output.failures.iter().filter(|f| !f.fatal).count();
        if skipped > 0 {
            lines.push(self.warning(&format!("{} categories skipped", skipped)));
        }
        lines.push(if output.is_success() {
            self.success(&format!("Extracted {} entries", output.total_entries()))
        } else {
            self.error("Extraction finished with fatal errors")
        });
        lines.join("\n")
    }

    /// Format collected diagnostics: the per-kind summary and the first few entries.
    pub fn format_diagnostics(&self, diagnostics: &Diagnostics) -> String {
        let mut lines = vec![diagnostics.summary()];
        for diagnostic in diagnostics.entries().iter().take(DIAGNOSTIC_PREVIEW) {
            let line = format!("  {}", diagnostic);
            lines.push(match diagnostic.severity() {
                Severity::Error => self.colorize(&line, "red"),
                Severity::Warning => self.colorize(&line, "yellow"),
            });
        }
        if diagnostics.len() > DIAGNOSTIC_PREVIEW {
            lines.push(format!("  ... and {} more", diagnostics.len() - DIAGNOSTIC_PREVIEW));
        }
        lines.join("\n")
    }

    /// Format the category registry.
    pub fn format_categories(&self, registry: &Registry) -> Result<String> {
        if self.format == OutputFormat::Json {
            return Ok(serde_json::to_string_pretty(registry)?);
        }
        if registry.categories.is_empty() {
            return Ok(self.colorize("No categories registered.", "yellow"));
        }

        let mut builder = Builder::default();
        builder.push_record(["Name", "Display Name", "Source", "Expansions", "Text Fields"]);
        for category in &registry.categories {
            let text_fields: Vec<_> = category.text_fields.iter().map(|b| b.source.as_str()).collect();
            builder.push_record([
                category.name.clone(),
                category.display_name().to_string(),
                category.source_file.clone(),
                category.expansion_files.len().to_string(),
                text_fields.join(", "),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        Ok(table.to_string())
    }

    /// Format a localization lookup.
    ///
    /// `selected` is the resolved text of one requested form, if any.
    pub fn format_resolution(&self, key: &str, forms: &[String], selected: Option<&str>) -> Result<String> {
        if self.format == OutputFormat::Json {
            return Ok(serde_json::to_string_pretty(&json!({
                "key": key,
                "forms": forms,
                "text": selected,
            }))?);
        }
        if let Some(text) = selected {
            return Ok(text.to_string());
        }

        let mut builder = Builder::default();
        builder.push_record(["Form", "Text"]);
        for (index, form) in forms.iter().enumerate() {
            builder.push_record([index.to_string(), form.clone()]);
        }
        let mut table = builder.build();
        table.with(Style::rounded());
        Ok(format!("{}\n{}", self.info(key), table))
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use quarry_domain::{CategoryDef, CategoryOutput, FormsDocument, OutputMeta};
    use quarry_extractor::{CategoryFailure, Diagnostic, DiagnosticKind};
    use std::path::PathBuf;

    fn meta(category: &str) -> OutputMeta {
        OutputMeta {
            category: category.to_string(),
            language: "en-US".to_string(),
            extracted_at: "2026-01-01T00:00:00+00:00".to_string(),
            game_version: None,
        }
    }

    fn run_output(failures: Vec<CategoryFailure>) -> RunOutput {
        let mut diagnostics = Diagnostics::new();
        diagnostics.record(
            Diagnostic::new(DiagnosticKind::MissingLocalizationKey, "no localization entry for 'TEXT_X'")
                .entity("TECH_X"),
        );
        RunOutput {
            outputs: vec![CategoryOutput {
                meta: meta("technologies"),
                entries: IndexMap::new(),
            }],
            forms: FormsDocument {
                meta: meta("textForms"),
                forms: IndexMap::new(),
            },
            diagnostics,
            failures,
        }
    }

    fn written() -> Vec<WrittenFile> {
        vec![WrittenFile {
            category: "technologies".to_string(),
            entries: 0,
            path: PathBuf::from("output/technologies.json"),
        }]
    }

    #[test]
    fn test_run_table() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_run(&run_output(vec![]), &written()).unwrap();
        assert!(output.contains("Category"));
        assert!(output.contains("output/technologies.json"));
        assert!(output.contains("missing_localization_key: 1"));
        assert!(output.contains("✓ Extracted 0 entries"));
    }

    #[test]
    fn test_run_table_reports_skipped_categories() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let failure = CategoryFailure {
            category: "units".to_string(),
            reason: "Source file not found: unit.xml".to_string(),
            fatal: false,
        };
        let output = formatter.format_run(&run_output(vec![failure]), &written()).unwrap();
        assert!(output.contains("⚠ 1 categories skipped"));
        assert!(output.contains("✓ Extracted 0 entries"));
    }

    #[test]
    fn test_run_json_with_fatal_failure() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let failure = CategoryFailure {
            category: "units".to_string(),
            reason: "Duplicate identifier".to_string(),
            fatal: true,
        };
        let output = formatter.format_run(&run_output(vec![failure]), &written()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["success"], json!(false));
        assert_eq!(value["failures"][0]["category"], json!("units"));
        assert_eq!(value["diagnostics"]["missing_localization_key"], json!(1));
        assert_eq!(value["files"][0]["entries"], json!(0));
    }

    #[test]
    fn test_categories_table() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let mut def = CategoryDef::new("technologies", "tech.xml");
        def.display_name = Some("Technologies".to_string());
        let registry = Registry {
            categories: vec![def],
            reverse_indexes: vec![],
        };
        let output = formatter.format_categories(&registry).unwrap();
        assert!(output.contains("Technologies"));
        assert!(output.contains("tech.xml"));

        let empty = formatter.format_categories(&Registry::default()).unwrap();
        assert!(empty.contains("No categories registered"));
    }

    #[test]
    fn test_resolution_formats() {
        let forms: Vec<String> = ["Rome", "Roman", "a Roman", "Romans"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let table = Formatter::new(OutputFormat::Table, false);
        let listing = table.format_resolution("TEXT_NATION_ROME", &forms, None).unwrap();
        assert!(listing.contains("a Roman"));
        assert_eq!(
            table.format_resolution("TEXT_NATION_ROME", &forms, Some("Romans")).unwrap(),
            "Romans"
        );

        let json = Formatter::new(OutputFormat::Json, false);
        let value: serde_json::Value =
            serde_json::from_str(&json.format_resolution("TEXT_NATION_ROME", &forms, None).unwrap())
                .unwrap();
        assert_eq!(value["forms"][3], json!("Romans"));
        assert!(value["text"].is_null());
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.success("test"), "✓ test");
        assert_eq!(formatter.warning("careful"), "⚠ careful");
    }
}
