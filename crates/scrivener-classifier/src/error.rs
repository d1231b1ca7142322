//! Error types for classification

use thiserror::Error;

/// Reasons the inference path did not produce tags
///
/// These never reach the caller of the engine: every variant ends in the
/// keyword fallback.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClassificationError {
    /// A single attempt exceeded its timeout
    #[error("Inference attempt timed out after {0} ms")]
    Timeout(u64),

    /// The overall inference deadline passed
    #[error("Inference deadline of {0} ms exceeded")]
    DeadlineExceeded(u64),

    /// The provider reported a failure
    #[error("Inference failed: {0}")]
    Inference(String),

    /// The provider answered but no whitelisted category could be read
    #[error("Unusable inference output: {0}")]
    Unusable(String),

    /// Invalid engine configuration
    #[error("Configuration error: {0}")]
    Config(String),
}
