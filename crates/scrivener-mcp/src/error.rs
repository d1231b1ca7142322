//! Error types for MCP server operations.

use scrivener_domain::NoteId;
use scrivener_store::StoreError;
use serde_json::{json, Value};
use thiserror::Error;

/// JSON-RPC error codes used by the server
pub mod codes {
    /// Line is not valid JSON
    pub const PARSE_ERROR: i32 = -32700;
    /// Envelope is not a valid JSON-RPC request
    pub const INVALID_REQUEST: i32 = -32600;
    /// Unknown method or tool
    pub const METHOD_NOT_FOUND: i32 = -32601;
    /// Parameters failed validation
    pub const INVALID_PARAMS: i32 = -32602;
    /// Unexpected server-side failure
    pub const INTERNAL_ERROR: i32 = -32603;
    /// Referenced note does not exist
    pub const NOT_FOUND: i32 = -32001;
    /// Request arrived before `initialize`
    pub const NOT_READY: i32 = -32002;
    /// Request arrived after `shutdown`
    pub const SHUTTING_DOWN: i32 = -32003;
}

/// MCP server error types
#[derive(Error, Debug)]
pub enum McpError {
    /// Line could not be decoded as JSON
    #[error("Parse error: {0}")]
    Parse(String),

    /// Malformed JSON-RPC envelope or out-of-order handshake
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Method or tool not found
    #[error("Method not found: {0}")]
    MethodNotFound(String),

    /// Parameters rejected before reaching a handler
    #[error("Invalid params: {0}")]
    InvalidParams(String),

    /// Note does not exist
    #[error("Note not found: {0}")]
    NotFound(NoteId),

    /// Handshake has not completed
    #[error("Server not initialized")]
    NotReady,

    /// Server is shutting down
    #[error("Server is shutting down")]
    ShuttingDown,

    /// Anything else that went wrong while handling a request
    #[error("Internal error: {0}")]
    Internal(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// IO error on the transport
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl McpError {
    /// Convert to JSON-RPC error code
    pub fn error_code(&self) -> i32 {
        match self {
            McpError::Parse(_) => codes::PARSE_ERROR,
            McpError::InvalidRequest(_) => codes::INVALID_REQUEST,
            McpError::MethodNotFound(_) => codes::METHOD_NOT_FOUND,
            McpError::InvalidParams(_) => codes::INVALID_PARAMS,
            McpError::NotFound(_) => codes::NOT_FOUND,
            McpError::NotReady => codes::NOT_READY,
            McpError::ShuttingDown => codes::SHUTTING_DOWN,
            McpError::Internal(_) | McpError::JsonError(_) | McpError::IoError(_) => {
                codes::INTERNAL_ERROR
            }
        }
    }

    /// Structured `data` member for the error object
    pub fn data(&self) -> Option<Value> {
        match self {
            McpError::NotFound(id) => Some(json!({ "id": id })),
            _ => None,
        }
    }

    /// Whether the failure is the server's fault rather than the caller's
    pub fn is_internal(&self) -> bool {
        self.error_code() == codes::INTERNAL_ERROR
    }
}

impl From<StoreError> for McpError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => McpError::NotFound(id),
            StoreError::InvalidData(msg) => McpError::InvalidParams(msg),
            other => McpError::Internal(other.to_string()),
        }
    }
}
