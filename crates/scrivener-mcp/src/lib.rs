//! Scrivener MCP Server
//!
//! Model Context Protocol server that stores notes on disk and tags them
//! automatically, for use with AI clients (Claude Desktop, Cline, etc.).
//!
//! Provides 9 MCP tools:
//! - `create_note` - Create a note, auto-tagging it unless tags are given
//! - `search_notes` - Text search over title, content and tags
//! - `search_by_tag` - Notes carrying a tag
//! - `list_notes` - Most recently updated notes
//! - `update_note` - Partial update
//! - `delete_note` - Remove a note
//! - `get_note` - Fetch one note
//! - `retag_note` - Re-run classification
//! - `list_categories` - The auto-tagging whitelist
//!
//! Tools can be invoked through `tools/call` or by using the tool name as
//! the JSON-RPC method. Every note is also readable as a `note:///<id>`
//! resource through `resources/list` and `resources/read`.
//!
//! # Example
//!
//! ```no_run
//! use scrivener_classifier::{ClassificationEngine, ClassifierConfig};
//! use scrivener_llm::OllamaProvider;
//! use scrivener_mcp::McpServer;
//! use scrivener_store::FileStore;
//!
//! let (store, _report) = FileStore::open("/tmp/notes").unwrap();
//! let provider = OllamaProvider::default_endpoint("qwen2.5:7b").unwrap();
//! let engine = ClassificationEngine::new(Some(provider), ClassifierConfig::default()).unwrap();
//!
//! let mut server = McpServer::new(store, engine).unwrap();
//! server.run().unwrap();
//! ```

#![warn(missing_docs)]

pub mod config;
mod error;
pub mod protocol;
pub mod registry;
pub mod resources;
mod server;
pub mod tools;

pub use config::{ConfigError, ScrivenerConfig};
pub use error::{codes, McpError};
pub use registry::{ToolCall, ToolKind};
pub use server::{McpServer, SessionState};
