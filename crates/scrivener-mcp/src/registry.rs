//! Tool registry: the closed set of operations the server exposes
//!
//! Every tool pairs a name with a JSON Schema for clients and a typed
//! parameter struct for the server. Arguments are deserialized and
//! validated here, before any handler runs.

use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};

use crate::error::McpError;
use crate::protocol::ToolDefinition;
use crate::tools::{
    CreateParams, ListParams, NoParams, NoteRef, SearchParams, TagParams, UpdateParams,
};

/// Parameter structs accepted by tools
pub trait ToolParams: DeserializeOwned {
    /// Semantic checks that the schema cannot express
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Every tool the server knows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    /// Create a note, auto-tagging it unless tags are supplied
    CreateNote,
    /// Substring search over title, content and tags
    SearchNotes,
    /// Exact tag lookup
    SearchByTag,
    /// All notes, most recent first
    ListNotes,
    /// Partial update of a note
    UpdateNote,
    /// Delete a note
    DeleteNote,
    /// Fetch one note
    GetNote,
    /// Re-run classification on a note
    RetagNote,
    /// The category whitelist
    ListCategories,
}

impl ToolKind {
    /// All tools, in the order `tools/list` reports them
    pub const ALL: [ToolKind; 9] = [
        ToolKind::CreateNote,
        ToolKind::SearchNotes,
        ToolKind::SearchByTag,
        ToolKind::ListNotes,
        ToolKind::UpdateNote,
        ToolKind::DeleteNote,
        ToolKind::GetNote,
        ToolKind::RetagNote,
        ToolKind::ListCategories,
    ];

    /// Wire name
    pub fn name(self) -> &'static str {
        match self {
            ToolKind::CreateNote => "create_note",
            ToolKind::SearchNotes => "search_notes",
            ToolKind::SearchByTag => "search_by_tag",
            ToolKind::ListNotes => "list_notes",
            ToolKind::UpdateNote => "update_note",
            ToolKind::DeleteNote => "delete_note",
            ToolKind::GetNote => "get_note",
            ToolKind::RetagNote => "retag_note",
            ToolKind::ListCategories => "list_categories",
        }
    }

    /// Look a tool up by wire name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// One-line description for clients
    pub fn description(self) -> &'static str {
        match self {
            ToolKind::CreateNote => {
                "Create a new note. Tags are assigned automatically from the category list unless tags are given"
            }
            ToolKind::SearchNotes => "Search notes by text in title, content or tags (case-insensitive)",
            ToolKind::SearchByTag => "Find notes carrying a specific tag",
            ToolKind::ListNotes => "List notes, most recently updated first",
            ToolKind::UpdateNote => "Update the title, content or tags of an existing note",
            ToolKind::DeleteNote => "Delete a note",
            ToolKind::GetNote => "Get a note by id",
            ToolKind::RetagNote => "Re-classify a note and replace its tags with automatic ones",
            ToolKind::ListCategories => "List the categories available for automatic tagging",
        }
    }

    /// JSON Schema of the tool's arguments
    pub fn input_schema(self) -> Value {
        let id = json!({"type": "string", "description": "Note id"});
        let tags = json!({"type": "array", "items": {"type": "string"}, "description": "Manual tags"});

        match self {
            ToolKind::CreateNote => json!({
                "type": "object",
                "properties": {
                    "title": {"type": "string", "description": "Note title", "minLength": 1},
                    "content": {"type": "string", "description": "Note content"},
                    "tags": tags,
                    "auto_tag": {"type": "boolean", "description": "Classify when no tags are given (default: true)", "default": true}
                },
                "required": ["title", "content"],
                "additionalProperties": false
            }),
            ToolKind::SearchNotes => json!({
                "type": "object",
                "properties": {
                    "query": {"type": "string", "description": "Text to search for", "minLength": 1}
                },
                "required": ["query"],
                "additionalProperties": false
            }),
            ToolKind::SearchByTag => json!({
                "type": "object",
                "properties": {
                    "tag": {"type": "string", "description": "Tag to look for", "minLength": 1}
                },
                "required": ["tag"],
                "additionalProperties": false
            }),
            ToolKind::ListNotes => json!({
                "type": "object",
                "properties": {
                    "limit": {"type": "integer", "description": "Maximum number of notes", "minimum": 1}
                },
                "additionalProperties": false
            }),
            ToolKind::UpdateNote => json!({
                "type": "object",
                "properties": {
                    "id": id,
                    "title": {"type": "string", "description": "New title", "minLength": 1},
                    "content": {"type": "string", "description": "New content"},
                    "tags": tags
                },
                "required": ["id"],
                "additionalProperties": false
            }),
            ToolKind::DeleteNote | ToolKind::GetNote | ToolKind::RetagNote => json!({
                "type": "object",
                "properties": {"id": id},
                "required": ["id"],
                "additionalProperties": false
            }),
            ToolKind::ListCategories => json!({
                "type": "object",
                "properties": {},
                "additionalProperties": false
            }),
        }
    }

    /// Definition reported by `tools/list`
    pub fn definition(self) -> ToolDefinition {
        ToolDefinition {
            name: self.name(),
            description: self.description(),
            input_schema: self.input_schema(),
        }
    }
}

/// All tool definitions
pub fn tool_definitions() -> Vec<ToolDefinition> {
    ToolKind::ALL.into_iter().map(ToolKind::definition).collect()
}

/// A tool invocation with validated arguments
#[derive(Debug)]
pub enum ToolCall {
    /// `create_note`
    CreateNote(CreateParams),
    /// `search_notes`
    SearchNotes(SearchParams),
    /// `search_by_tag`
    SearchByTag(TagParams),
    /// `list_notes`
    ListNotes(ListParams),
    /// `update_note`
    UpdateNote(UpdateParams),
    /// `delete_note`
    DeleteNote(NoteRef),
    /// `get_note`
    GetNote(NoteRef),
    /// `retag_note`
    RetagNote(NoteRef),
    /// `list_categories`
    ListCategories,
}

impl ToolCall {
    /// Deserialize and validate arguments for `kind`
    pub fn parse(kind: ToolKind, arguments: Value) -> Result<Self, McpError> {
        let call = match kind {
            ToolKind::CreateNote => ToolCall::CreateNote(parse_params(arguments)?),
            ToolKind::SearchNotes => ToolCall::SearchNotes(parse_params(arguments)?),
            ToolKind::SearchByTag => ToolCall::SearchByTag(parse_params(arguments)?),
            ToolKind::ListNotes => ToolCall::ListNotes(parse_params(arguments)?),
            ToolKind::UpdateNote => ToolCall::UpdateNote(parse_params(arguments)?),
            ToolKind::DeleteNote => ToolCall::DeleteNote(parse_params(arguments)?),
            ToolKind::GetNote => ToolCall::GetNote(parse_params(arguments)?),
            ToolKind::RetagNote => ToolCall::RetagNote(parse_params(arguments)?),
            ToolKind::ListCategories => {
                parse_params::<NoParams>(arguments)?;
                ToolCall::ListCategories
            }
        };
        Ok(call)
    }

    /// The tool being invoked
    pub fn kind(&self) -> ToolKind {
        match self {
            ToolCall::CreateNote(_) => ToolKind::CreateNote,
            ToolCall::SearchNotes(_) => ToolKind::SearchNotes,
            ToolCall::SearchByTag(_) => ToolKind::SearchByTag,
            ToolCall::ListNotes(_) => ToolKind::ListNotes,
            ToolCall::UpdateNote(_) => ToolKind::UpdateNote,
            ToolCall::DeleteNote(_) => ToolKind::DeleteNote,
            ToolCall::GetNote(_) => ToolKind::GetNote,
            ToolCall::RetagNote(_) => ToolKind::RetagNote,
            ToolCall::ListCategories => ToolKind::ListCategories,
        }
    }
}

pub(crate) fn parse_params<T: ToolParams>(arguments: Value) -> Result<T, McpError> {
    let arguments = match arguments {
        Value::Null => Value::Object(Map::new()),
        object @ Value::Object(_) => object,
        _ => return Err(McpError::InvalidParams("arguments must be an object".to_string())),
    };

    let params: T =
        serde_json::from_value(arguments).map_err(|e| McpError::InvalidParams(e.to_string()))?;
    params.validate().map_err(McpError::InvalidParams)?;
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invalid(kind: ToolKind, arguments: Value) -> String {
        match ToolCall::parse(kind, arguments) {
            Err(McpError::InvalidParams(reason)) => reason,
            other => panic!("expected InvalidParams, got {:?}", other),
        }
    }

    #[test]
    fn test_names_round_trip() {
        for kind in ToolKind::ALL {
            assert_eq!(ToolKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(ToolKind::from_name("delete_everything"), None);
    }

    #[test]
    fn test_definitions_have_object_schemas() {
        let definitions = tool_definitions();
        assert_eq!(definitions.len(), 9);
        for definition in definitions {
            assert_eq!(definition.input_schema["type"], "object");
            assert!(!definition.description.is_empty());
        }
    }

    #[test]
    fn test_create_params_defaults() {
        let call = ToolCall::parse(
            ToolKind::CreateNote,
            json!({"title": "Hello", "content": "Hi"}),
        )
        .unwrap();
        match call {
            ToolCall::CreateNote(params) => {
                assert!(params.auto_tag);
                assert!(params.tags.is_none());
            }
            other => panic!("unexpected call {:?}", other),
        }
    }

    #[test]
    fn test_missing_and_mistyped_fields() {
        assert!(invalid(ToolKind::CreateNote, json!({"content": "x"})).contains("title"));
        assert!(invalid(ToolKind::CreateNote, json!({"title": 5, "content": "x"})).contains("invalid type"));
        assert!(invalid(ToolKind::SearchNotes, json!({})).contains("query"));
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let reason = invalid(ToolKind::SearchNotes, json!({"query": "a", "limit": 3}));
        assert!(reason.contains("unknown field"));
        invalid(ToolKind::ListCategories, json!({"verbose": true}));
    }

    #[test]
    fn test_semantic_validation() {
        invalid(ToolKind::CreateNote, json!({"title": "   ", "content": "x"}));
        invalid(ToolKind::SearchNotes, json!({"query": ""}));
        invalid(ToolKind::SearchByTag, json!({"tag": " "}));
        invalid(ToolKind::ListNotes, json!({"limit": 0}));
        invalid(ToolKind::ListNotes, json!({"limit": -1}));
        invalid(ToolKind::UpdateNote, json!({"id": "20240101_000000_000", "title": ""}));
        invalid(ToolKind::GetNote, json!({"id": "../etc/passwd"}));
        invalid(ToolKind::GetNote, json!("not an object"));
    }

    #[test]
    fn test_note_id_alias() {
        let call = ToolCall::parse(ToolKind::DeleteNote, json!({"note_id": "20240101_000000_000"})).unwrap();
        assert_eq!(call.kind(), ToolKind::DeleteNote);
    }

    #[test]
    fn test_missing_arguments_mean_empty_object() {
        assert!(ToolCall::parse(ToolKind::ListNotes, Value::Null).is_ok());
        assert!(ToolCall::parse(ToolKind::ListCategories, Value::Null).is_ok());
    }
}
