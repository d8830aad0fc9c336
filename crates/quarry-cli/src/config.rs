//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use quarry_domain::Registry;
use quarry_extractor::ExtractorConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Registry compiled into the binary.
pub const DEFAULT_REGISTRY: &str = include_str!("../config/categories.toml");

/// Configuration file name looked up in the working and config directories.
pub const CONFIG_FILE_NAME: &str = "quarry.toml";

/// CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Extraction engine settings
    #[serde(default)]
    pub extractor: ExtractorConfig,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
}

impl Config {
    /// Path of the per-user configuration file, if a config directory exists.
    pub fn user_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("quarry").join(CONFIG_FILE_NAME))
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. Otherwise `./quarry.toml` and then the
    /// per-user file are tried, falling back to defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }

        let candidates = std::iter::once(PathBuf::from(CONFIG_FILE_NAME)).chain(Self::user_path());
        for path in candidates {
            if path.is_file() {
                return Self::load_from(&path);
            }
        }

        debug!("No configuration file found, using defaults");
        Ok(Self::default())
    }

    /// Load and validate configuration from a file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config: Config = toml::from_str(&contents)?;
        config.extractor.validate().map_err(CliError::Config)?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

/// Load a category registry, or the built-in one when no path is given.
pub fn load_registry(path: Option<&Path>) -> Result<Registry> {
    let registry: Registry = match path {
        Some(path) => {
            let contents = fs::read_to_string(path).map_err(|e| {
                CliError::Registry(format!("Failed to read {}: {}", path.display(), e))
            })?;
            toml::from_str(&contents)?
        }
        None => toml::from_str(DEFAULT_REGISTRY)?,
    };
    registry.validate().map_err(CliError::Registry)?;
    Ok(registry)
}

/// Restrict a registry to the named categories.
///
/// Unknown names are reported and skipped. Reverse indexes survive only when
/// both of their categories are selected. An empty selection keeps everything.
pub fn select_categories(registry: &Registry, names: &[String]) -> Registry {
    if names.is_empty() {
        return registry.clone();
    }

    for name in names {
        if registry.category(name).is_none() {
            warn!("Unknown category '{}', skipping", name);
        }
    }

    let categories: Vec<_> = registry
        .categories
        .iter()
        .filter(|c| names.contains(&c.name))
        .cloned()
        .collect();
    let reverse_indexes = registry
        .reverse_indexes
        .iter()
        .filter(|spec| {
            names.contains(&spec.source_category) && names.contains(&spec.target_category)
        })
        .cloned()
        .collect();

    Registry {
        categories,
        reverse_indexes,
    }
}
