//! Notes exposed as MCP resources
//!
//! Every stored note is listed as `note:///<id>` and reads back as a small
//! markdown document.

use scrivener_domain::{Note, NoteId};
use scrivener_store::FileStore;
use serde::Deserialize;
use serde_json::Value;

use crate::error::McpError;
use crate::protocol::{ReadResourceResponse, Resource, ResourceContents, ResourceListResponse};
use crate::registry::{parse_params, ToolParams};

/// URI prefix of note resources
pub const NOTE_URI_PREFIX: &str = "note:///";

const MIME_TYPE: &str = "text/markdown";

/// Parameters for resources/read
#[derive(Debug, Deserialize)]
pub struct ReadResourceParams {
    /// Resource URI
    pub uri: String,
}

impl ToolParams for ReadResourceParams {
    fn validate(&self) -> Result<(), String> {
        parse_uri(&self.uri).map(|_| ())
    }
}

/// URI of the resource for `id`
pub fn note_uri(id: &NoteId) -> String {
    format!("{}{}", NOTE_URI_PREFIX, id)
}

/// Extract the note id from a `note:///<id>` URI
pub fn parse_uri(uri: &str) -> Result<NoteId, String> {
    let id = uri
        .strip_prefix(NOTE_URI_PREFIX)
        .ok_or_else(|| format!("unsupported resource URI '{}'", uri))?;
    NoteId::parse(id)
}

/// Handle resources/list
pub fn list_resources(store: &FileStore) -> ResourceListResponse {
    let resources = store
        .list(None)
        .into_iter()
        .map(|note| Resource {
            uri: note_uri(&note.id),
            description: format!("Note created on {}", note.created_at.to_rfc3339()),
            name: note.title,
            mime_type: MIME_TYPE,
        })
        .collect();
    ResourceListResponse { resources }
}

/// Handle resources/read
pub fn read_resource(store: &FileStore, params: Value) -> Result<ReadResourceResponse, McpError> {
    let params: ReadResourceParams = parse_params(params)?;
    let id = parse_uri(&params.uri).map_err(McpError::InvalidParams)?;
    let note = store.get(&id)?;

    Ok(ReadResourceResponse {
        contents: vec![ResourceContents {
            uri: params.uri,
            mime_type: MIME_TYPE,
            text: render(note),
        }],
    })
}

fn render(note: &Note) -> String {
    let mut text = format!("# {}\n\n{}\n\n---\n", note.title, note.content);
    text.push_str(&format!("Created: {}\n", note.created_at.to_rfc3339()));
    text.push_str(&format!("Updated: {}\n", note.updated_at.to_rfc3339()));
    if !note.tags.is_empty() {
        text.push_str(&format!("Tags: {}\n", note.tags.join(", ")));
    }
    text
}
