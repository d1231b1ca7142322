//! Scrivener Classification Engine
//!
//! Assigns tags from a fixed category whitelist to notes.
//!
//! # Pipeline
//!
//! 1. Manual tags short-circuit everything
//! 2. Inference: prompt the local model, bounded by per-attempt timeouts,
//!    exponential backoff and an overall deadline
//! 3. Parse the answer, keeping only whitelisted names
//! 4. Keyword fallback when inference fails or says nothing usable
//!
//! The engine never returns an error to its caller; a classification is
//! always produced, possibly with no tags.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod engine;
pub mod error;
pub mod keywords;
pub mod parser;
pub mod prompt;

pub use config::ClassifierConfig;
pub use engine::{Classification, ClassificationEngine, TagSource};
pub use error::ClassificationError;
pub use keywords::KeywordClassifier;
pub use parser::parse_tags;
pub use prompt::PromptBuilder;
