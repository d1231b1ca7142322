//! Scrivener Inference Adapters
//!
//! Implementations of the `InferenceProvider` trait from `scrivener-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic, scriptable mock for testing
//! - `OllamaProvider`: Local Ollama `/api/generate` integration
//!
//! Providers make exactly one attempt per call. Timeouts, retries and the
//! keyword fallback are the classification engine's job.
//!
//! # Examples
//!
//! ```
//! use scrivener_domain::InferenceProvider;
//! use scrivener_llm::MockProvider;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let provider = MockProvider::new(r#"["Coding"]"#);
//! let result = provider.generate("test prompt").await.unwrap();
//! assert_eq!(result, r#"["Coding"]"#);
//! # }
//! ```

#![warn(missing_docs)]

pub mod ollama;

use scrivener_domain::InferenceProvider;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;

pub use ollama::OllamaProvider;

/// Errors that can occur during inference calls
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from the backend
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

#[derive(Debug)]
struct MockState {
    default_reply: Result<String, String>,
    scripted: VecDeque<Result<String, String>>,
    call_count: usize,
    prompts: Vec<String>,
}

/// Mock inference provider for deterministic testing
///
/// Replies come from a script queue first, then from the default reply.
/// Clones share state, so a test can keep a handle to inspect calls after
/// handing the provider to the engine.
///
/// # Examples
///
/// ```
/// use scrivener_llm::MockProvider;
///
/// let mut provider = MockProvider::failing("backend down");
/// provider.push_response(r#"["Finance"]"#);
/// assert_eq!(provider.call_count(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    state: Arc<Mutex<MockState>>,
    delay: Option<Duration>,
}

impl MockProvider {
    /// Create a MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self::with_default(Ok(response.into()))
    }

    /// Create a MockProvider that fails every call
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_default(Err(message.into()))
    }

    fn with_default(default_reply: Result<String, String>) -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                default_reply,
                scripted: VecDeque::new(),
                call_count: 0,
                prompts: Vec::new(),
            })),
            delay: None,
        }
    }

    /// Sleep this long before every reply
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Queue a successful reply for the next unscripted call
    pub fn push_response(&mut self, response: impl Into<String>) {
        self.lock().scripted.push_back(Ok(response.into()));
    }

    /// Queue a failure for the next unscripted call
    pub fn push_error(&mut self, message: impl Into<String>) {
        self.lock().scripted.push_back(Err(message.into()));
    }

    /// Get the number of times generate was called
    pub fn call_count(&self) -> usize {
        self.lock().call_count
    }

    /// Prompts received so far
    pub fn prompts(&self) -> Vec<String> {
        self.lock().prompts.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("[]")
    }
}

impl InferenceProvider for MockProvider {
    type Error = LlmError;

    async fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        let reply = {
            let mut state = self.lock();
            state.call_count += 1;
            state.prompts.push(prompt.to_string());
            match state.scripted.pop_front() {
                Some(reply) => reply,
                None => state.default_reply.clone(),
            }
        };

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        reply.map_err(LlmError::Other)
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_provider_default() {
        let provider = MockProvider::new("Test response");
        let result = provider.generate("any prompt").await;
        assert_eq!(result.unwrap(), "Test response");
    }

    #[tokio::test]
    async fn test_mock_provider_script_then_default() {
        let mut provider = MockProvider::new("default");
        provider.push_error("first fails");
        provider.push_response("second works");

        assert!(matches!(provider.generate("a").await, Err(LlmError::Other(_))));
        assert_eq!(provider.generate("b").await.unwrap(), "second works");
        assert_eq!(provider.generate("c").await.unwrap(), "default");
        assert_eq!(provider.prompts(), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_mock_provider_failing() {
        let provider = MockProvider::failing("down");
        let err = provider.generate("x").await.unwrap_err();
        assert_eq!(err.to_string(), "LLM error: down");
    }

    #[tokio::test]
    async fn test_mock_provider_clone_shares_state() {
        let provider1 = MockProvider::new("test");
        let provider2 = provider1.clone();

        provider1.generate("test").await.unwrap();

        assert_eq!(provider1.call_count(), 1);
        assert_eq!(provider2.call_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_provider_delay() {
        let provider = MockProvider::new("slow").with_delay(Duration::from_millis(50));
        let result =
            tokio::time::timeout(Duration::from_millis(5), provider.generate("x")).await;
        assert!(result.is_err(), "delayed reply should not beat a shorter timeout");
    }
}
