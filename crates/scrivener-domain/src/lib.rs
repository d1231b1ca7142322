//! Scrivener Domain Layer
//!
//! Core model shared by every other crate: the persisted [`Note`], its
//! identifier, the category whitelist used for automatic tagging, and the
//! trait boundary to the inference backend.
//!
//! ## Key Concepts
//!
//! - **Note**: The persisted unit - title, content, tags and timestamps
//! - **NoteId**: Timestamp-derived identifier that doubles as the file name
//! - **Category**: A whitelisted tag name plus the keywords that indicate it
//! - **InferenceProvider**: The only side-effecting dependency of classification
//!
//! ## Architecture
//!
//! - Pure data and validation only
//! - Storage and inference implementations live in other crates

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod category;
pub mod note;
pub mod traits;

// Re-exports for convenience
pub use category::{Category, CategorySet};
pub use note::{normalize_tags, NewNote, Note, NoteId, NoteUpdate};
pub use traits::InferenceProvider;
