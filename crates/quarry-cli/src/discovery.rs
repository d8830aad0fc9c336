//! Locating game data on disk.

use crate::error::{CliError, Result};
use quarry_domain::SourceProvider;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Location of the entity files inside a game installation.
const INFOS_SUBDIR: [&str; 3] = ["Reference", "XML", "Infos"];

/// Find the Infos directory for a game path.
///
/// Accepts either an installation directory (`<path>/Reference/XML/Infos`)
/// or a directory that already holds the language table.
pub fn resolve_infos_dir(game_path: &Path, language_file: &str) -> Result<PathBuf> {
    let nested: PathBuf = INFOS_SUBDIR.iter().fold(game_path.to_path_buf(), |p, s| p.join(s));
    if nested.is_dir() {
        return Ok(nested);
    }
    if game_path.join(language_file).is_file() {
        return Ok(game_path.to_path_buf());
    }
    Err(CliError::InfosNotFound(nested.display().to_string()))
}

/// Source files read from one directory.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    /// Create a source over a directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory being read.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl SourceProvider for DirectorySource {
    type Error = io::Error;

    fn read(&self, name: &str) -> std::result::Result<Option<Vec<u8>>, Self::Error> {
        match fs::read(self.root.join(name)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn list(&self) -> std::result::Result<Vec<String>, Self::Error> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                if let Some(name) = entry.file_name().to_str() {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }
}
