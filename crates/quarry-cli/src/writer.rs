//! Writing run results to disk.

use crate::error::Result;
use quarry_extractor::RunOutput;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// File name of the grammatical forms document.
pub const FORMS_FILE_NAME: &str = "text-forms.json";

/// One file written by a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WrittenFile {
    /// Category name, or `textForms`
    pub category: String,
    /// Number of entries in the document
    pub entries: usize,
    /// Output path
    pub path: PathBuf,
}

/// Write every category document and the forms document.
pub fn write_run(output_dir: &Path, output: &RunOutput) -> Result<Vec<WrittenFile>> {
    fs::create_dir_all(output_dir)?;
    let mut written = Vec::with_capacity(output.outputs.len() + 1);

    for document in &output.outputs {
        let path = output_dir.join(format!("{}.json", document.meta.category));
        write_json(&path, document)?;
        info!("  {} entries -> {}", document.entries.len(), path.display());
        written.push(WrittenFile {
            category: document.meta.category.clone(),
            entries: document.entries.len(),
            path,
        });
    }

    let path = output_dir.join(FORMS_FILE_NAME);
    write_json(&path, &output.forms)?;
    written.push(WrittenFile {
        category: output.forms.meta.category.clone(),
        entries: output.forms.forms.len(),
        path,
    });

    Ok(written)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
