//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

use barge_in_core::{TranscriptGate, Vocabulary};

use crate::constants::{env, tracker, vocabulary};
use crate::vocabulary::VocabularyFile;
use crate::ConfigError;

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    /// Development mode - relaxed validation, warnings only
    #[default]
    Development,
    /// Staging mode - stricter validation
    Staging,
    /// Production mode - all validations enforced
    Production,
}

impl RuntimeEnvironment {
    /// Check if strict validation should be applied
    pub fn is_strict(&self) -> bool {
        matches!(self, Self::Production | Self::Staging)
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Runtime environment (development, staging, production)
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    /// Logging configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,

    /// Vocabularies and transcript gating
    #[serde(default)]
    pub interrupt: InterruptConfig,

    /// Session tracker configuration
    #[serde(default)]
    pub tracker: TrackerConfig,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_observability()?;
        self.validate_tracker()?;
        self.validate_interrupt()?;
        Ok(())
    }

    fn validate_observability(&self) -> Result<(), ConfigError> {
        const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
        let level = self.observability.log_level.to_lowercase();
        if !LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "observability.log_level".to_string(),
                message: format!(
                    "Must be one of {}, got '{}'",
                    LEVELS.join(", "),
                    self.observability.log_level
                ),
            });
        }
        Ok(())
    }

    fn validate_tracker(&self) -> Result<(), ConfigError> {
        let cfg = &self.tracker;

        if cfg.event_buffer == 0 {
            return Err(ConfigError::InvalidValue {
                field: "tracker.event_buffer".to_string(),
                message: "Must be at least 1".to_string(),
            });
        }

        if cfg.event_buffer > tracker::MAX_EVENT_BUFFER {
            return Err(ConfigError::InvalidValue {
                field: "tracker.event_buffer".to_string(),
                message: format!(
                    "Too large (maximum {}), got {}",
                    tracker::MAX_EVENT_BUFFER,
                    cfg.event_buffer
                ),
            });
        }

        if cfg.history_limit == 0 {
            tracing::warn!("tracker.history_limit is 0, transition history will not be kept");
        }

        Ok(())
    }

    fn validate_interrupt(&self) -> Result<(), ConfigError> {
        let vocab = self.interrupt.vocabulary()?;

        if vocab.ignore_words().next().is_none() {
            let message = "Ignore vocabulary is empty, every utterance will interrupt";
            if self.environment.is_strict() {
                return Err(ConfigError::InvalidValue {
                    field: "interrupt.ignore_words".to_string(),
                    message: message.to_string(),
                });
            }
            tracing::warn!("{}", message);
        }

        if self.interrupt.transcript_gate == TranscriptGate::AnyTranscript {
            tracing::debug!("Partial transcripts are evaluated while the agent is speaking");
        }

        Ok(())
    }
}

/// Vocabulary and transcript settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterruptConfig {
    /// Explicit interrupt cues
    #[serde(default = "default_interrupt_words")]
    pub interrupt_words: Vec<String>,

    /// Backchannel/filler words
    #[serde(default = "default_ignore_words")]
    pub ignore_words: Vec<String>,

    /// Vocabulary file (YAML/JSON/TOML); replaces the inline lists when set
    #[serde(default)]
    pub vocabulary_path: Option<String>,

    /// Whether partial transcripts are classified
    #[serde(default)]
    pub transcript_gate: TranscriptGate,
}

fn default_interrupt_words() -> Vec<String> {
    vocabulary::INTERRUPT_WORDS
        .iter()
        .map(|w| w.to_string())
        .collect()
}

fn default_ignore_words() -> Vec<String> {
    vocabulary::IGNORE_WORDS.iter().map(|w| w.to_string()).collect()
}

impl Default for InterruptConfig {
    fn default() -> Self {
        Self {
            interrupt_words: default_interrupt_words(),
            ignore_words: default_ignore_words(),
            vocabulary_path: None,
            transcript_gate: TranscriptGate::default(),
        }
    }
}

impl InterruptConfig {
    /// Build the immutable vocabulary
    pub fn vocabulary(&self) -> Result<Arc<Vocabulary>, ConfigError> {
        let vocab = match &self.vocabulary_path {
            Some(path) => {
                let file = VocabularyFile::load(path)?;
                tracing::info!(path = %path, "Loaded vocabulary file");
                file.build()?
            },
            None => Vocabulary::new(&self.interrupt_words, &self.ignore_words)?,
        };
        Ok(Arc::new(vocab))
    }
}

/// Session tracker settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Event channel capacity
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,

    /// Transition records kept in memory
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

fn default_event_buffer() -> usize {
    tracker::EVENT_BUFFER
}
fn default_history_limit() -> usize {
    tracker::HISTORY_LIMIT
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            event_buffer: default_event_buffer(),
            history_limit: default_history_limit(),
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub log_json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
        }
    }
}

/// Load settings from files and environment
///
/// Priority (highest to lowest):
/// 1. Environment variables (BARGE_IN__ prefix)
/// 2. config/{env}.yaml (if env specified)
/// 3. config/default.yaml
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    load_settings_from(Path::new("config"), env)
}

/// Load settings rooted at a specific config directory
pub fn load_settings_from(config_dir: &Path, env_name: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    builder = builder.add_source(
        File::with_name(&config_dir.join("default").to_string_lossy()).required(false),
    );

    if let Some(env_name) = env_name {
        builder = builder
            .add_source(File::with_name(&config_dir.join(env_name).to_string_lossy()).required(false));
    }

    builder = builder.add_source(
        Environment::with_prefix(env::PREFIX)
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("interrupt.interrupt_words")
            .with_list_parse_key("interrupt.ignore_words"),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    settings.validate()?;

    Ok(settings)
}
