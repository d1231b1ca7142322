//! Configuration for the classification engine

use scrivener_domain::{Category, CategorySet};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tunables for inference retries and tag selection
///
/// The caps and keyword sets are policy, not law; every field can be
/// overridden from the `[classifier]` table of the server config.
///
/// # Examples
///
/// ```
/// use scrivener_classifier::ClassifierConfig;
///
/// let config = ClassifierConfig::default();
/// assert_eq!(config.max_inference_tags, 3);
/// assert_eq!(config.max_fallback_tags, 2);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Timeout for one inference attempt (milliseconds)
    pub attempt_timeout_ms: u64,

    /// Attempts before giving up on inference
    pub max_attempts: u32,

    /// Backoff before the second attempt; doubles for each later one
    /// (milliseconds)
    pub backoff_base_ms: u64,

    /// Upper bound on the whole inference phase, backoff included
    /// (milliseconds)
    pub deadline_ms: u64,

    /// Most tags taken from an inference answer
    pub max_inference_tags: usize,

    /// Most tags taken from the keyword fallback
    pub max_fallback_tags: usize,

    /// Minimum keyword hits for a category to be selected
    pub min_keyword_score: usize,

    /// Whitelisted categories in tie-break order
    pub categories: Vec<Category>,
}

impl ClassifierConfig {
    /// Per-attempt timeout as a Duration
    pub fn attempt_timeout(&self) -> Duration {
        Duration::from_millis(self.attempt_timeout_ms)
    }

    /// Overall inference deadline as a Duration
    pub fn deadline(&self) -> Duration {
        Duration::from_millis(self.deadline_ms)
    }

    /// Backoff to wait after the given failed attempt (1-based)
    pub fn backoff_after(&self, attempt: u32) -> Duration {
        let factor = 2u64.saturating_pow(attempt.saturating_sub(1));
        Duration::from_millis(self.backoff_base_ms.saturating_mul(factor))
    }

    /// Build the validated whitelist
    pub fn category_set(&self) -> Result<CategorySet, String> {
        CategorySet::new(self.categories.clone())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_attempts == 0 {
            return Err("max_attempts must be greater than 0".to_string());
        }
        if self.attempt_timeout_ms == 0 {
            return Err("attempt_timeout_ms must be greater than 0".to_string());
        }
        if self.deadline_ms == 0 {
            return Err("deadline_ms must be greater than 0".to_string());
        }
        if self.max_inference_tags == 0 {
            return Err("max_inference_tags must be greater than 0".to_string());
        }
        if self.max_fallback_tags == 0 {
            return Err("max_fallback_tags must be greater than 0".to_string());
        }
        if self.min_keyword_score == 0 {
            return Err("min_keyword_score must be greater than 0".to_string());
        }
        if self.categories.is_empty() {
            return Err("at least one category is required".to_string());
        }
        self.category_set().map(|_| ())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        let config: Self =
            toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            attempt_timeout_ms: 5_000,
            max_attempts: 3,
            backoff_base_ms: 250,
            deadline_ms: 15_000,
            max_inference_tags: 3,
            max_fallback_tags: 2,
            min_keyword_score: 1,
            categories: CategorySet::default().iter().cloned().collect(),
        }
    }
}
