//! MCP tool implementations

mod create;
mod delete;
mod search;
mod update;

pub use create::{handle_create, CreateParams};
pub use delete::{handle_delete, DeleteResult};
pub use search::{
    handle_list, handle_search, handle_search_by_tag, ListParams, ListResult, SearchParams,
    SearchResult, TagParams, TagSearchResult,
};
pub use update::{handle_retag, handle_update, UpdateParams};

use scrivener_classifier::ClassificationEngine;
use scrivener_domain::{Category, InferenceProvider, NoteId};
use scrivener_store::FileStore;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::McpError;
use crate::registry::{ToolCall, ToolParams};

/// Parameters naming a single note
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NoteRef {
    /// Note id
    #[serde(alias = "note_id")]
    pub id: NoteId,
}

impl ToolParams for NoteRef {}

/// Parameters for tools that take none
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NoParams {}

impl ToolParams for NoParams {}

/// Result of list_categories
#[derive(Debug, Serialize)]
pub struct CategoriesResult {
    /// Whether a model is consulted before the keyword fallback
    pub inference_enabled: bool,
    /// Whitelisted categories with their fallback keywords
    pub categories: Vec<Category>,
}

/// Run a validated tool call against the store
pub async fn execute<P: InferenceProvider>(
    store: &mut FileStore,
    engine: &ClassificationEngine<P>,
    call: ToolCall,
) -> Result<Value, McpError> {
    let value = match call {
        ToolCall::CreateNote(params) => serde_json::to_value(handle_create(store, engine, params).await?)?,
        ToolCall::SearchNotes(params) => serde_json::to_value(handle_search(store, params))?,
        ToolCall::SearchByTag(params) => serde_json::to_value(handle_search_by_tag(store, params))?,
        ToolCall::ListNotes(params) => serde_json::to_value(handle_list(store, params))?,
        ToolCall::UpdateNote(params) => serde_json::to_value(handle_update(store, params)?)?,
        ToolCall::DeleteNote(params) => serde_json::to_value(handle_delete(store, params)?)?,
        ToolCall::GetNote(params) => serde_json::to_value(store.get(&params.id)?)?,
        ToolCall::RetagNote(params) => serde_json::to_value(handle_retag(store, engine, params).await?)?,
        ToolCall::ListCategories => serde_json::to_value(CategoriesResult {
            inference_enabled: engine.inference_enabled(),
            categories: engine.categories().iter().cloned().collect(),
        })?,
    };
    Ok(value)
}
