//! Update tools - Edit a note or re-run its classification

use scrivener_classifier::ClassificationEngine;
use scrivener_domain::{normalize_tags, InferenceProvider, Note, NoteId, NoteUpdate};
use scrivener_store::FileStore;
use serde::Deserialize;
use tracing::info;

use crate::error::McpError;
use crate::registry::ToolParams;
use crate::tools::NoteRef;

/// Parameters for updating a note
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateParams {
    /// Note to update
    #[serde(alias = "note_id")]
    pub id: NoteId,
    /// New title
    #[serde(default)]
    pub title: Option<String>,
    /// New content
    #[serde(default)]
    pub content: Option<String>,
    /// New manual tags
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

impl ToolParams for UpdateParams {
    fn validate(&self) -> Result<(), String> {
        if self.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err("title cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Handle update_note tool invocation
///
/// Only supplied fields change. Supplied tags are manual; the note is never
/// re-classified here (see `retag_note`).
pub fn handle_update(store: &mut FileStore, params: UpdateParams) -> Result<Note, McpError> {
    let update = NoteUpdate {
        title: params.title,
        content: params.content,
        tags: params.tags.as_deref().map(normalize_tags),
    };
    Ok(store.update(&params.id, update)?)
}

/// Handle retag_note tool invocation
pub async fn handle_retag<P: InferenceProvider>(
    store: &mut FileStore,
    engine: &ClassificationEngine<P>,
    params: NoteRef,
) -> Result<Note, McpError> {
    let (title, content) = {
        let note = store.get(&params.id)?;
        (note.title.clone(), note.content.clone())
    };

    let classification = engine.classify(&title, &content).await;
    info!(
        "Retagged {} from {}: {:?}",
        params.id, classification.source, classification.tags
    );
    Ok(store.retag(&params.id, classification.tags)?)
}
