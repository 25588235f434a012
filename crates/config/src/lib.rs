//! Configuration management for the barge-in interrupt gate
//!
//! Supports loading configuration from:
//! - YAML/TOML/JSON files (`config/default.*`, `config/{env}.*`)
//! - Environment variables (`BARGE_IN__` prefix, `__` separator)
//! - Vocabulary files referenced from `interrupt.vocabulary_path`

pub mod constants;
pub mod settings;
pub mod vocabulary;

pub use settings::{
    load_settings, load_settings_from, InterruptConfig, ObservabilityConfig, RuntimeEnvironment,
    Settings, TrackerConfig,
};
pub use vocabulary::VocabularyFile;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Invalid vocabulary: {0}")]
    Vocabulary(#[from] barge_in_core::Error),
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
