//! Configuration for the Extractor

use serde::{Deserialize, Serialize};

/// What the resolver emits for a localization key with no entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingKeyPolicy {
    /// Emit the key itself
    #[default]
    RawKey,
    /// Emit an empty string
    Empty,
}

/// Configuration for the Extractor
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Active language (language id or localization column name)
    pub language: String,

    /// Language used when the active one has no entry for a key
    pub fallback_language: Option<String>,

    /// Maximum number of nested text-reference expansion passes
    pub max_resolve_depth: usize,

    /// Output for unknown localization keys
    pub missing_key_policy: MissingKeyPolicy,

    /// Maximum concurrent category builds
    pub workers: usize,

    /// Field holding each record's identifier
    pub identifier_field: String,

    /// Integer-marked fields that legitimately hold text
    pub int_text_fields: Vec<String>,

    /// Emit empty collections for every field (categories can opt in per field)
    pub keep_empty: bool,

    /// Language table file name
    pub language_file: String,

    /// Prefix of localization file names
    pub text_file_prefix: String,

    /// Prefix of gendered-text file names
    pub gendered_file_prefix: String,
}

impl ExtractorConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.language.is_empty() {
            return Err("language cannot be empty".to_string());
        }
        if self.max_resolve_depth == 0 {
            return Err("max_resolve_depth must be greater than 0".to_string());
        }
        if self.workers == 0 {
            return Err("workers must be greater than 0".to_string());
        }
        if self.identifier_field.is_empty() {
            return Err("identifier_field cannot be empty".to_string());
        }
        if self.text_file_prefix.is_empty() || self.gendered_file_prefix.is_empty() {
            return Err("localization file prefixes cannot be empty".to_string());
        }
        Ok(())
    }

    /// Whether an integer-marked field is allowed to hold text
    pub fn allows_int_text(&self, field: &str) -> bool {
        self.int_text_fields.iter().any(|f| f == field)
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            language: "en-US".to_string(),
            fallback_language: None,
            max_resolve_depth: 5,
            missing_key_policy: MissingKeyPolicy::RawKey,
            workers: 4,
            identifier_field: "zType".to_string(),
            int_text_fields: vec!["iTriggerSubject".to_string()],
            keep_empty: false,
            language_file: "language.xml".to_string(),
            text_file_prefix: "text-".to_string(),
            gendered_file_prefix: "genderedText".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ExtractorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_resolve_depth, 5);
        assert!(config.allows_int_text("iTriggerSubject"));
        assert!(!config.allows_int_text("iCost"));
    }

    #[test]
    fn test_invalid_workers() {
        let mut config = ExtractorConfig::default();
        config.workers = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_depth() {
        let mut config = ExtractorConfig::default();
        config.max_resolve_depth = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = ExtractorConfig::from_toml(
            r#"
            language = "de-DE"
            fallback_language = "en-US"
            missing_key_policy = "empty"
        "#,
        )
        .unwrap();

        assert_eq!(config.language, "de-DE");
        assert_eq!(config.fallback_language.as_deref(), Some("en-US"));
        assert_eq!(config.missing_key_policy, MissingKeyPolicy::Empty);
        assert_eq!(config.workers, 4);
        assert_eq!(config.identifier_field, "zType");
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ExtractorConfig::default();
        let toml_str = config.to_toml().unwrap();
        let parsed = ExtractorConfig::from_toml(&toml_str).unwrap();

        assert_eq!(config.language, parsed.language);
        assert_eq!(config.max_resolve_depth, parsed.max_resolve_depth);
        assert_eq!(config.int_text_fields, parsed.int_text_fields);
    }
}
