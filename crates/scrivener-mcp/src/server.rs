//! MCP server implementation

use scrivener_classifier::ClassificationEngine;
use scrivener_domain::InferenceProvider;
use scrivener_store::FileStore;
use serde::Serialize;
use serde_json::{json, Value};
use std::io::{BufRead, Write};
use std::panic::{self, AssertUnwindSafe};
use tokio::runtime::{Builder, Runtime};
use tracing::{debug, error, info, warn};

use crate::error::McpError;
use crate::protocol::*;
use crate::registry::{tool_definitions, ToolCall, ToolKind};
use crate::resources;
use crate::tools;

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for `initialize`
    Uninitialized,
    /// Serving requests
    Ready,
    /// `shutdown` received; only `exit` is accepted
    ShuttingDown,
}

/// MCP Server
///
/// Handles Model Context Protocol requests via stdio transport. Requests
/// are processed one at a time; each tool runs to completion on a
/// current-thread runtime before the next line is read.
pub struct McpServer<P> {
    store: FileStore,
    engine: ClassificationEngine<P>,
    runtime: Runtime,
    state: SessionState,
    exit_requested: bool,
}

impl<P: InferenceProvider> McpServer<P> {
    /// Create a new MCP server over an opened store
    pub fn new(store: FileStore, engine: ClassificationEngine<P>) -> Result<Self, McpError> {
        let runtime = Builder::new_current_thread().enable_all().build()?;

        Ok(Self {
            store,
            engine,
            runtime,
            state: SessionState::Uninitialized,
            exit_requested: false,
        })
    }

    /// Current lifecycle state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The note store
    pub fn store(&self) -> &FileStore {
        &self.store
    }

    /// Run the MCP server (stdio transport)
    ///
    /// Reads JSON-RPC requests from stdin and writes responses to stdout.
    pub fn run(&mut self) -> Result<(), McpError> {
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        self.serve(stdin.lock(), stdout.lock())
    }

    /// Serve newline-delimited JSON-RPC until EOF or `exit`
    ///
    /// Lines are read as raw bytes; a line that is not UTF-8 is answered
    /// with a parse error like any other malformed payload.
    pub fn serve<R: BufRead, W: Write>(&mut self, mut reader: R, mut writer: W) -> Result<(), McpError> {
        info!("MCP server started ({} notes)", self.store.len());

        let mut buf = Vec::new();
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }

            let response = match std::str::from_utf8(&buf) {
                Ok(line) if line.trim().is_empty() => continue,
                Ok(line) => {
                    debug!("Received request: {}", line.trim_end());
                    self.handle_line(line)
                }
                Err(e) => {
                    error!("Request is not valid UTF-8: {}", e);
                    Some(error_value(None, &McpError::Parse(e.to_string())))
                }
            };

            if let Some(response) = response {
                self.write_response(&mut writer, &response)?;
            }
            if self.exit_requested {
                break;
            }
        }

        info!("MCP server stopped");
        Ok(())
    }

    /// Handle one line of input, returning the response to send, if any
    pub fn handle_line(&mut self, line: &str) -> Option<Value> {
        let raw: Value = match serde_json::from_str(line) {
            Ok(raw) => raw,
            Err(e) => {
                error!("Failed to parse request: {}", e);
                return Some(error_value(None, &McpError::Parse(e.to_string())));
            }
        };

        let request = match JsonRpcRequest::from_value(raw) {
            Ok(request) => request,
            Err(rejected) => {
                warn!("Rejected request: {}", rejected.error);
                return Some(error_value(rejected.id, &rejected.error));
            }
        };

        if request.is_notification() {
            self.handle_notification(&request.method);
            return None;
        }

        let id = request.id.clone();
        let response = match self.handle_request(&request.method, request.params) {
            Ok(result) => to_value(JsonRpcResponse::new(id, result)),
            Err(e) => {
                if e.is_internal() {
                    error!("{} failed: {}", request.method, e);
                } else {
                    debug!("{} rejected: {}", request.method, e);
                }
                error_value(id, &e)
            }
        };
        Some(response)
    }

    fn handle_notification(&mut self, method: &str) {
        match method {
            "exit" => {
                info!("Exit requested");
                self.exit_requested = true;
            }
            "notifications/initialized" => debug!("Client finished initialization"),
            other => debug!("Ignoring notification {}", other),
        }
    }

    /// Route a request according to the session state
    fn handle_request(&mut self, method: &str, params: Value) -> Result<Value, McpError> {
        if is_notification(method) {
            self.handle_notification(method);
            return Ok(Value::Null);
        }

        match self.state {
            SessionState::ShuttingDown => Err(McpError::ShuttingDown),
            SessionState::Uninitialized => match method {
                "initialize" => self.handle_initialize(),
                _ => Err(McpError::NotReady),
            },
            SessionState::Ready => match method {
                "initialize" => Err(McpError::InvalidRequest("already initialized".to_string())),
                "ping" => Ok(json!({})),
                "shutdown" => {
                    info!("Shutdown requested");
                    self.state = SessionState::ShuttingDown;
                    Ok(Value::Null)
                }
                "tools/list" => Ok(serde_json::to_value(ToolListResponse {
                    tools: tool_definitions(),
                })?),
                "tools/call" => self.handle_tool_call(params),
                "resources/list" => Ok(serde_json::to_value(resources::list_resources(&self.store))?),
                "resources/read" => Ok(serde_json::to_value(resources::read_resource(&self.store, params)?)?),
                other => match ToolKind::from_name(other) {
                    Some(kind) => self.invoke(kind, params),
                    None => Err(McpError::MethodNotFound(other.to_string())),
                },
            },
        }
    }

    /// Handle initialize request
    fn handle_initialize(&mut self) -> Result<Value, McpError> {
        let response = InitializeResponse {
            protocol_version: PROTOCOL_VERSION.to_string(),
            server_info: ServerInfo {
                name: "scrivener-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            capabilities: Capabilities {
                tools: ToolsCapability {
                    list_changed: false,
                },
                resources: ResourcesCapability {
                    subscribe: false,
                    list_changed: false,
                },
            },
        };

        self.state = SessionState::Ready;
        info!("Session initialized");
        Ok(serde_json::to_value(response)?)
    }

    /// Handle tools/call request
    fn handle_tool_call(&mut self, params: Value) -> Result<Value, McpError> {
        let tool_name = match params.get("name") {
            Some(Value::String(name)) => name.clone(),
            Some(_) => return Err(McpError::InvalidParams("tool name must be a string".to_string())),
            None => return Err(McpError::InvalidParams("missing tool name".to_string())),
        };
        let kind = ToolKind::from_name(&tool_name)
            .ok_or_else(|| McpError::MethodNotFound(format!("tool {}", tool_name)))?;
        let arguments = params.get("arguments").cloned().unwrap_or(Value::Null);

        let result = self.invoke(kind, arguments)?;
        Ok(serde_json::to_value(CallToolResult::from_value(result)?)?)
    }

    /// Validate arguments and run the tool, containing panics
    fn invoke(&mut self, kind: ToolKind, arguments: Value) -> Result<Value, McpError> {
        let call = ToolCall::parse(kind, arguments)?;
        debug!("Invoking {}", kind.name());

        let store = &mut self.store;
        let engine = &self.engine;
        let runtime = &self.runtime;
        match panic::catch_unwind(AssertUnwindSafe(|| {
            runtime.block_on(tools::execute(store, engine, call))
        })) {
            Ok(result) => result,
            Err(_) => Err(McpError::Internal(format!("{} handler panicked", kind.name()))),
        }
    }

    /// Write response to the transport
    fn write_response<W: Write>(&self, writer: &mut W, response: &Value) -> Result<(), McpError> {
        let response_str = serde_json::to_string(response)?;
        writeln!(writer, "{}", response_str)?;
        writer.flush()?;
        debug!("Sent response: {}", response_str);
        Ok(())
    }
}

fn error_value(id: Option<Value>, error: &McpError) -> Value {
    to_value(JsonRpcError::from_error(id, error))
}

/// Envelope types hold only strings, numbers and `Value`s
fn to_value<T: Serialize>(envelope: T) -> Value {
    serde_json::to_value(envelope).unwrap_or_else(|e| {
        json!({
            "jsonrpc": "2.0",
            "id": null,
            "error": {"code": crate::error::codes::INTERNAL_ERROR, "message": e.to_string()}
        })
    })
}
