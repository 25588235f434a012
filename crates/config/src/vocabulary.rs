//! Vocabulary files
//!
//! A vocabulary file carries both word lists:
//!
//! ```yaml
//! interrupt_words: [stop, wait, no]
//! ignore_words: [yeah, ok, uh-huh]
//! ```
//!
//! YAML, JSON and TOML are accepted, picked by file extension.

use serde::{Deserialize, Serialize};
use std::path::Path;

use barge_in_core::Vocabulary;

use crate::ConfigError;

/// On-disk vocabulary definition
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VocabularyFile {
    #[serde(default)]
    pub interrupt_words: Vec<String>,
    #[serde(default)]
    pub ignore_words: Vec<String>,
}

impl VocabularyFile {
    /// Read and parse a vocabulary file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::ParseError(format!("Failed to read vocabulary file: {}", e))
        })?;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match extension.as_deref() {
            Some("json") => serde_json::from_str(&content).map_err(|e| {
                ConfigError::ParseError(format!("Failed to parse vocabulary JSON: {}", e))
            }),
            Some("toml") => toml::from_str(&content).map_err(|e| {
                ConfigError::ParseError(format!("Failed to parse vocabulary TOML: {}", e))
            }),
            Some("yaml") | Some("yml") | None => serde_yaml::from_str(&content).map_err(|e| {
                ConfigError::ParseError(format!("Failed to parse vocabulary YAML: {}", e))
            }),
            Some(other) => Err(ConfigError::InvalidValue {
                field: "interrupt.vocabulary_path".to_string(),
                message: format!("Unsupported vocabulary file extension '{}'", other),
            }),
        }
    }

    /// Build the immutable vocabulary
    pub fn build(&self) -> Result<Vocabulary, ConfigError> {
        Ok(Vocabulary::new(&self.interrupt_words, &self.ignore_words)?)
    }
}
