//! Create tool - Store a new note, tagging it automatically

use scrivener_classifier::ClassificationEngine;
use scrivener_domain::{normalize_tags, InferenceProvider, NewNote, Note};
use scrivener_store::FileStore;
use serde::Deserialize;
use tracing::info;

use crate::error::McpError;
use crate::registry::ToolParams;

/// Parameters for creating a note
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateParams {
    /// Note title
    pub title: String,
    /// Note content
    pub content: String,
    /// Manual tags; when non-empty, classification is skipped
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    /// Classify when no manual tags are given
    #[serde(default = "default_auto_tag")]
    pub auto_tag: bool,
}

fn default_auto_tag() -> bool {
    true
}

impl ToolParams for CreateParams {
    fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("title cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Handle create_note tool invocation
///
/// Tag resolution, in order: manual tags win; `auto_tag = false` stores
/// the note untagged; otherwise the classification engine decides.
pub async fn handle_create<P: InferenceProvider>(
    store: &mut FileStore,
    engine: &ClassificationEngine<P>,
    params: CreateParams,
) -> Result<Note, McpError> {
    let (tags, auto_tagged) = if params.auto_tag {
        let classification = engine
            .resolve(&params.title, &params.content, params.tags.as_deref())
            .await;
        info!(
            "Tags for '{}' from {}: {:?}",
            params.title, classification.source, classification.tags
        );
        let automatic = classification.is_automatic();
        (classification.tags, automatic)
    } else {
        (normalize_tags(params.tags.as_deref().unwrap_or_default()), false)
    };

    let note = store.create(NewNote {
        title: params.title,
        content: params.content,
        tags,
        auto_tagged,
    })?;
    Ok(note)
}
