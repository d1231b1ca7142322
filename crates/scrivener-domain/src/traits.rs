//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use std::fmt::Display;
use std::future::Future;

/// Trait for the local inference backend used by classification
///
/// Implemented by the infrastructure layer (scrivener-llm). Implementations
/// make a single attempt per call; retry, timeout and fallback policy
/// belong to the caller.
pub trait InferenceProvider: Send + Sync {
    /// Error type for inference operations
    type Error: Display + Send;

    /// Generate a non-streamed completion for `prompt`
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String, Self::Error>> + Send;

    /// Model identifier, for logging
    fn model_name(&self) -> &str;
}
