//! MCP protocol types (JSON-RPC 2.0)

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::McpError;

/// Protocol revision announced during the handshake
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// A validated JSON-RPC request or notification
#[derive(Debug, Clone, PartialEq)]
pub struct JsonRpcRequest {
    /// Request ID; `None` for notifications
    pub id: Option<Value>,
    /// Method name
    pub method: String,
    /// Method parameters (always an object)
    pub params: Value,
}

/// Envelope rejection, carrying whatever id could be recovered
#[derive(Debug)]
pub struct EnvelopeError {
    /// Id to echo in the error response
    pub id: Option<Value>,
    /// Reason
    pub error: McpError,
}

impl JsonRpcRequest {
    /// Validate a decoded JSON value as a JSON-RPC envelope
    pub fn from_value(value: Value) -> Result<Self, EnvelopeError> {
        let Value::Object(mut object) = value else {
            return Err(invalid(None, "request must be a JSON object"));
        };

        // Echo the id back only if it is a usable one
        let id = match object.remove("id") {
            Some(id @ (Value::String(_) | Value::Number(_))) => Some(id),
            Some(Value::Null) => return Err(invalid(None, "id must not be null")),
            Some(_) => return Err(invalid(None, "id must be a string or a number")),
            None => None,
        };

        match object.get("jsonrpc") {
            Some(Value::String(v)) if v == "2.0" => {}
            _ => return Err(invalid(id, "jsonrpc must be \"2.0\"")),
        }

        let method = match object.remove("method") {
            Some(Value::String(method)) => method,
            Some(_) => return Err(invalid(id, "method must be a string")),
            None => return Err(invalid(id, "missing method")),
        };

        let params = match object.remove("params") {
            None | Some(Value::Null) => Value::Object(Map::new()),
            Some(params @ Value::Object(_)) => params,
            Some(_) => return Err(invalid(id, "params must be an object")),
        };

        if id.is_none() && !is_notification(&method) {
            return Err(invalid(None, "missing id"));
        }

        Ok(Self { id, method, params })
    }

    /// Whether this message expects no response
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

/// Methods that may arrive without an id
pub fn is_notification(method: &str) -> bool {
    method == "exit" || method.starts_with("notifications/")
}

fn invalid(id: Option<Value>, reason: &str) -> EnvelopeError {
    EnvelopeError {
        id,
        error: McpError::InvalidRequest(reason.to_string()),
    }
}

/// JSON-RPC response (success)
#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    /// JSON-RPC version (must be "2.0")
    pub jsonrpc: &'static str,
    /// Request ID
    pub id: Option<Value>,
    /// Result data
    pub result: Value,
}

/// JSON-RPC error response
#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    /// JSON-RPC version (must be "2.0")
    pub jsonrpc: &'static str,
    /// Request ID
    pub id: Option<Value>,
    /// Error details
    pub error: ErrorDetail,
}

/// Error detail structure
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    /// Error code
    pub code: i32,
    /// Error message
    pub message: String,
    /// Structured details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcResponse {
    /// Create a new success response
    pub fn new(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result,
        }
    }
}

impl JsonRpcError {
    /// Create an error response from a server error
    pub fn from_error(id: Option<Value>, error: &McpError) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            error: ErrorDetail {
                code: error.error_code(),
                message: error.to_string(),
                data: error.data(),
            },
        }
    }
}

/// MCP tool list response
#[derive(Debug, Serialize)]
pub struct ToolListResponse {
    /// Available tools
    pub tools: Vec<ToolDefinition>,
}

/// Tool definition
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    /// Tool name
    pub name: &'static str,
    /// Tool description
    pub description: &'static str,
    /// Input schema (JSON Schema)
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// MCP server info
#[derive(Debug, Serialize)]
pub struct ServerInfo {
    /// Server name
    pub name: String,
    /// Server version
    pub version: String,
}

/// Initialize response
#[derive(Debug, Serialize)]
pub struct InitializeResponse {
    /// Protocol version
    #[serde(rename = "protocolVersion")]
    pub protocol_version: String,
    /// Server info
    #[serde(rename = "serverInfo")]
    pub server_info: ServerInfo,
    /// Capabilities
    pub capabilities: Capabilities,
}

/// Server capabilities
#[derive(Debug, Serialize)]
pub struct Capabilities {
    /// Tools capability
    pub tools: ToolsCapability,
    /// Resources capability
    pub resources: ResourcesCapability,
}

/// Tools capability
#[derive(Debug, Serialize)]
pub struct ToolsCapability {
    /// Whether the tool list can change at runtime
    #[serde(rename = "listChanged")]
    pub list_changed: bool,
}

/// Resources capability
#[derive(Debug, Serialize)]
pub struct ResourcesCapability {
    /// Whether clients may subscribe to resource changes
    pub subscribe: bool,
    /// Whether the resource list can change at runtime
    #[serde(rename = "listChanged")]
    pub list_changed: bool,
}

/// A resource entry in `resources/list`
#[derive(Debug, Serialize)]
pub struct Resource {
    /// Resource URI
    pub uri: String,
    /// Display name
    pub name: String,
    /// MIME type of the rendered contents
    #[serde(rename = "mimeType")]
    pub mime_type: &'static str,
    /// Short description
    pub description: String,
}

/// Result of `resources/list`
#[derive(Debug, Serialize)]
pub struct ResourceListResponse {
    /// Available resources
    pub resources: Vec<Resource>,
}

/// Rendered contents of one resource
#[derive(Debug, Serialize)]
pub struct ResourceContents {
    /// Resource URI
    pub uri: String,
    /// MIME type of `text`
    #[serde(rename = "mimeType")]
    pub mime_type: &'static str,
    /// Rendered text
    pub text: String,
}

/// Result of `resources/read`
#[derive(Debug, Serialize)]
pub struct ReadResourceResponse {
    /// Contents of the requested resource
    pub contents: Vec<ResourceContents>,
}

/// Result of `tools/call`
#[derive(Debug, Serialize)]
pub struct CallToolResult {
    /// Human-readable rendering of the result
    pub content: Vec<TextContent>,
    /// The result itself
    #[serde(rename = "structuredContent")]
    pub structured_content: Value,
    /// Always false; failures are reported as JSON-RPC errors
    #[serde(rename = "isError")]
    pub is_error: bool,
}

/// A text content block
#[derive(Debug, Serialize)]
pub struct TextContent {
    /// Content type, always "text"
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// Text
    pub text: String,
}

impl CallToolResult {
    /// Wrap a tool's structured result
    pub fn from_value(value: Value) -> Result<Self, McpError> {
        let text = serde_json::to_string_pretty(&value)?;
        Ok(Self {
            content: vec![TextContent { kind: "text", text }],
            structured_content: value,
            is_error: false,
        })
    }
}
