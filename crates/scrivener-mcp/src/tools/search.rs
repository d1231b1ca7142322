//! Search tools - Text search, tag lookup and listing

use scrivener_domain::Note;
use scrivener_store::FileStore;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::registry::ToolParams;

/// Parameters for text search
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchParams {
    /// Text to look for
    pub query: String,
}

impl ToolParams for SearchParams {
    fn validate(&self) -> Result<(), String> {
        if self.query.trim().is_empty() {
            return Err("query cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Parameters for tag lookup
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TagParams {
    /// Tag to match exactly (case-insensitive)
    pub tag: String,
}

impl ToolParams for TagParams {
    fn validate(&self) -> Result<(), String> {
        if self.tag.trim().is_empty() {
            return Err("tag cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Parameters for listing notes
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListParams {
    /// Maximum number of notes
    #[serde(default)]
    pub limit: Option<usize>,
}

impl ToolParams for ListParams {
    fn validate(&self) -> Result<(), String> {
        if self.limit == Some(0) {
            return Err("limit must be at least 1".to_string());
        }
        Ok(())
    }
}

/// Result of text search
#[derive(Debug, Serialize)]
pub struct SearchResult {
    /// Query text
    pub query: String,
    /// Number of results found
    pub count: usize,
    /// Matching notes, most recently updated first
    pub notes: Vec<Note>,
}

/// Result of tag lookup
#[derive(Debug, Serialize)]
pub struct TagSearchResult {
    /// Tag searched for
    pub tag: String,
    /// Number of results found
    pub count: usize,
    /// Matching notes, most recently updated first
    pub notes: Vec<Note>,
}

/// Result of listing
#[derive(Debug, Serialize)]
pub struct ListResult {
    /// Number of notes returned
    pub count: usize,
    /// Notes, most recently updated first
    pub notes: Vec<Note>,
}

/// Handle search_notes tool invocation
///
/// The query is matched as given; surrounding whitespace is significant.
pub fn handle_search(store: &FileStore, params: SearchParams) -> SearchResult {
    let notes = store.search(&params.query);
    debug!("search '{}' matched {} notes", params.query, notes.len());
    SearchResult {
        query: params.query,
        count: notes.len(),
        notes,
    }
}

/// Handle search_by_tag tool invocation
pub fn handle_search_by_tag(store: &FileStore, params: TagParams) -> TagSearchResult {
    let tag = params.tag.trim().to_string();
    let notes = store.search_by_tag(&tag);
    TagSearchResult {
        tag,
        count: notes.len(),
        notes,
    }
}

/// Handle list_notes tool invocation
pub fn handle_list(store: &FileStore, params: ListParams) -> ListResult {
    let notes = store.list(params.limit);
    ListResult {
        count: notes.len(),
        notes,
    }
}
