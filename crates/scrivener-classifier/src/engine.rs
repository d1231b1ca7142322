//! Classification engine: inference with bounded retries, keyword fallback

use crate::config::ClassifierConfig;
use crate::error::ClassificationError;
use crate::keywords::KeywordClassifier;
use crate::parser::parse_tags;
use crate::prompt::PromptBuilder;
use scrivener_domain::{normalize_tags, CategorySet, InferenceProvider};
use serde::Serialize;
use std::fmt;
use tracing::{debug, info, warn};

/// Where a set of tags came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TagSource {
    /// Read from an inference answer
    Inference,
    /// Produced by the keyword fallback
    Keyword,
    /// Manual tags were supplied; nothing was classified
    Skipped,
}

impl fmt::Display for TagSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TagSource::Inference => "inference",
            TagSource::Keyword => "keyword",
            TagSource::Skipped => "skipped",
        };
        f.write_str(name)
    }
}

/// Outcome of tagging a note
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Tags to store on the note
    pub tags: Vec<String>,
    /// How the tags were obtained
    pub source: TagSource,
}

impl Classification {
    /// Whether the tags were assigned automatically
    pub fn is_automatic(&self) -> bool {
        self.source != TagSource::Skipped
    }
}

/// Assigns whitelisted tags to notes
///
/// Inference is tried first when a provider is configured. Every attempt
/// is bounded by `attempt_timeout`, the whole sequence by `deadline`, so
/// callers never wait longer than the deadline plus the keyword pass.
/// Any inference failure ends in the deterministic keyword classifier;
/// classification itself never fails.
///
/// # Examples
///
/// ```
/// use scrivener_classifier::{ClassificationEngine, ClassifierConfig, TagSource};
/// use scrivener_llm::MockProvider;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let engine: ClassificationEngine<MockProvider> =
///     ClassificationEngine::new(None, ClassifierConfig::default()).unwrap();
///
/// let result = engine.classify("Budget Plan", "monthly budget").await;
/// assert_eq!(result.tags, vec!["Finance"]);
/// assert_eq!(result.source, TagSource::Keyword);
/// # }
/// ```
pub struct ClassificationEngine<P> {
    provider: Option<P>,
    categories: CategorySet,
    keywords: KeywordClassifier,
    config: ClassifierConfig,
}

impl<P: InferenceProvider> ClassificationEngine<P> {
    /// Create an engine; `None` disables inference entirely
    pub fn new(provider: Option<P>, config: ClassifierConfig) -> Result<Self, ClassificationError> {
        config.validate().map_err(ClassificationError::Config)?;
        let categories = config
            .category_set()
            .map_err(ClassificationError::Config)?;
        let keywords = KeywordClassifier::new(
            categories.clone(),
            config.min_keyword_score,
            config.max_fallback_tags,
        );

        Ok(Self {
            provider,
            categories,
            keywords,
            config,
        })
    }

    /// The category whitelist
    pub fn categories(&self) -> &CategorySet {
        &self.categories
    }

    /// Engine configuration
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Whether an inference backend is configured
    pub fn inference_enabled(&self) -> bool {
        self.provider.is_some()
    }

    /// Tags for a note, honouring manual tags
    ///
    /// Manual tags that survive normalisation are returned untouched with
    /// [`TagSource::Skipped`] and no inference call is made.
    pub async fn resolve(&self, title: &str, content: &str, manual: Option<&[String]>) -> Classification {
        if let Some(manual) = manual {
            let tags = normalize_tags(manual);
            if !tags.is_empty() {
                debug!("Manual tags supplied, skipping classification");
                return Classification {
                    tags,
                    source: TagSource::Skipped,
                };
            }
        }
        self.classify(title, content).await
    }

    /// Classify a note, falling back to keywords if inference fails
    pub async fn classify(&self, title: &str, content: &str) -> Classification {
        if let Some(provider) = &self.provider {
            match self.infer(provider, title, content).await {
                Ok(tags) => {
                    info!(
                        "Classified via inference ({}): {:?}",
                        provider.model_name(),
                        tags
                    );
                    return Classification {
                        tags,
                        source: TagSource::Inference,
                    };
                }
                Err(e) => warn!("{}; falling back to keyword classifier", e),
            }
        }

        let tags = self.keywords.classify(title, content);
        info!("Classified via keywords: {:?}", tags);
        Classification {
            tags,
            source: TagSource::Keyword,
        }
    }

    async fn infer(&self, provider: &P, title: &str, content: &str) -> Result<Vec<String>, ClassificationError> {
        let prompt = PromptBuilder::new(title, content, &self.categories)
            .with_max_tags(self.config.max_inference_tags)
            .build();

        match tokio::time::timeout(self.config.deadline(), self.attempt_all(provider, &prompt)).await {
            Ok(result) => result,
            Err(_) => Err(ClassificationError::DeadlineExceeded(self.config.deadline_ms)),
        }
    }

    async fn attempt_all(&self, provider: &P, prompt: &str) -> Result<Vec<String>, ClassificationError> {
        let max_attempts = self.config.max_attempts;
        let mut last_error = ClassificationError::Inference("no attempt made".to_string());

        for attempt in 1..=max_attempts {
            debug!("Inference attempt {}/{}", attempt, max_attempts);
            match tokio::time::timeout(self.config.attempt_timeout(), provider.generate(prompt)).await {
                // An answer without usable categories will not improve on retry
                Ok(Ok(text)) => return parse_tags(&text, &self.categories, self.config.max_inference_tags),
                Ok(Err(e)) => {
                    warn!("Inference attempt {}/{} failed: {}", attempt, max_attempts, e);
                    last_error = ClassificationError::Inference(e.to_string());
                }
                Err(_) => {
                    warn!(
                        "Inference attempt {}/{} timed out after {} ms",
                        attempt, max_attempts, self.config.attempt_timeout_ms
                    );
                    last_error = ClassificationError::Timeout(self.config.attempt_timeout_ms);
                }
            }

            if attempt < max_attempts {
                tokio::time::sleep(self.config.backoff_after(attempt)).await;
            }
        }

        Err(last_error)
    }
}
