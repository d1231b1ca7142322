//! Delete tool - Remove a note

use scrivener_domain::NoteId;
use scrivener_store::FileStore;
use serde::Serialize;

use crate::error::McpError;
use crate::tools::NoteRef;

/// Result of deleting a note
#[derive(Debug, Serialize)]
pub struct DeleteResult {
    /// Id of the removed note
    pub id: NoteId,
    /// Always true; a missing note is a `NotFound` error
    pub deleted: bool,
}

/// Handle delete_note tool invocation
pub fn handle_delete(store: &mut FileStore, params: NoteRef) -> Result<DeleteResult, McpError> {
    let removed = store.delete(&params.id)?;
    Ok(DeleteResult {
        id: removed.id,
        deleted: true,
    })
}
