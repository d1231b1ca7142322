//! Configuration file parsing for the server.
//!
//! Loads storage, inference, classifier and logging settings from TOML.
//! Every field has a default, so an absent or partial file is fine.

use scrivener_classifier::ClassifierConfig;
use scrivener_llm::ollama::{DEFAULT_ENDPOINT, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// A value is out of range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Server configuration loaded from TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrivenerConfig {
    /// Where notes live
    pub storage: StorageConfig,

    /// Local inference backend
    pub inference: InferenceConfig,

    /// Classification policy
    pub classifier: ClassifierConfig,

    /// Log output
    pub logging: LoggingConfig,
}

/// Storage settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Notes directory; platform data directory when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes_dir: Option<PathBuf>,
}

/// Inference backend settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Consult the model at all
    pub enabled: bool,

    /// Ollama endpoint
    pub endpoint: String,

    /// Model name
    pub model: String,

    /// HTTP client timeout (seconds)
    pub request_timeout_secs: u64,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset (e.g. "info", "scrivener_store=debug")
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl ScrivenerConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: ScrivenerConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `explicit` if given, else from the default location if a
    /// file exists there, else defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.is_file() => Self::from_file(path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// `<config_dir>/scrivener/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("scrivener").join("config.toml"))
    }

    /// Check ranges that serde cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.inference.enabled {
            if self.inference.endpoint.trim().is_empty() {
                return Err(ConfigError::Invalid("inference.endpoint cannot be empty".to_string()));
            }
            if self.inference.model.trim().is_empty() {
                return Err(ConfigError::Invalid("inference.model cannot be empty".to_string()));
            }
        }
        if self.inference.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "inference.request_timeout_secs must be greater than 0".to_string(),
            ));
        }
        self.classifier
            .validate()
            .map_err(|e| ConfigError::Invalid(format!("classifier: {}", e)))
    }

    /// Resolved notes directory
    pub fn notes_dir(&self) -> PathBuf {
        if let Some(dir) = &self.storage.notes_dir {
            return dir.clone();
        }
        match dirs::data_dir() {
            Some(data) => data.join("scrivener").join("notes"),
            None => dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".scrivener")
                .join("notes"),
        }
    }
}
