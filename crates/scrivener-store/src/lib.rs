//! Scrivener Storage Layer
//!
//! Durable note storage: one JSON file per note in a single directory, with
//! an in-memory index rebuilt at startup.
//!
//! # Architecture
//!
//! - `FileStore` owns both the directory and the index; nothing else touches either
//! - Writes go to `<id>.json.tmp`, are synced, then renamed over `<id>.json`
//! - Failed I/O is retried once before it is reported
//! - Corrupted records are skipped at load time and listed in a [`LoadReport`]
//!
//! # Examples
//!
//! ```no_run
//! use scrivener_domain::NewNote;
//! use scrivener_store::FileStore;
//!
//! let (mut store, report) = FileStore::open("/tmp/notes").unwrap();
//! println!("loaded {} notes, skipped {}", report.loaded, report.skipped.len());
//!
//! let note = store.create(NewNote {
//!     title: "Hello".to_string(),
//!     content: "Hi there".to_string(),
//!     tags: vec!["Greeting".to_string()],
//!     auto_tagged: true,
//! }).unwrap();
//! assert_eq!(store.get(&note.id).unwrap().title, "Hello");
//! ```

#![warn(missing_docs)]

mod atomic;
mod file_store;

use scrivener_domain::NoteId;
use std::path::PathBuf;
use thiserror::Error;

pub use file_store::{FileStore, LoadReport, SkippedRecord};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// The storage directory cannot be created, read or written
    #[error("Storage directory unusable: {}: {source}", path.display())]
    Directory {
        /// Directory path
        path: PathBuf,
        /// Underlying failure
        #[source]
        source: std::io::Error,
    },

    /// I/O failure while reading or writing a record
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Record could not be encoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Note not found
    #[error("Note not found: {0}")]
    NotFound(NoteId),

    /// Record violates a note invariant
    #[error("Invalid data: {0}")]
    InvalidData(String),
}
