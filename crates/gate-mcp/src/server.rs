//! MCP server over stdio
//!
//! Reads one JSON message per line from stdin and writes one response per
//! line to stdout. JSON-RPC 2.0 requests are handled as MCP methods; any
//! other JSON object is passed to the dispatcher as a plain request envelope.

use std::io::{BufRead, Write};

use gate_session::new_session_id;
use serde_json::{Value, json};

use crate::dispatcher::ToolDispatcher;
use crate::protocol::{
    INTERNAL_ERROR, INVALID_PARAMS, INVALID_REQUEST, InitializeParams, InitializeResult,
    JsonRpcRequest, JsonRpcResponse, METHOD_NOT_FOUND, PARSE_ERROR, PROTOCOL_VERSION,
    ServerCapabilities, ServerInfo, ToolCallParams, ToolResult, ToolsCapability,
};
use crate::{Error, Result};

pub const SERVER_NAME: &str = "toolgate";

/// MCP server bound to one connection.
///
/// `initialize` opens the connection's session (a fresh id, or the one the
/// client asks to resume) when the dispatcher has a session store; every
/// later tool call on the connection is audited against it.
pub struct McpServer {
    dispatcher: ToolDispatcher,
    session_id: Option<String>,
}

impl McpServer {
    pub fn new(dispatcher: ToolDispatcher) -> Self {
        Self {
            dispatcher,
            session_id: None,
        }
    }

    /// Session opened by `initialize`, if any
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn dispatcher(&self) -> &ToolDispatcher {
        &self.dispatcher
    }

    /// Serve stdin/stdout until stdin closes
    pub async fn run(&mut self) -> Result<()> {
        let stdin = std::io::stdin();
        let mut stdout = std::io::stdout();

        tracing::info!(tools = self.dispatcher.registry().len(), "MCP server ready, listening on stdio");

        for line in stdin.lock().lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            tracing::debug!(request = %line, "Received message");

            match self.handle_message(&line).await {
                Ok(response) if !response.is_empty() => {
                    writeln!(stdout, "{response}")?;
                    stdout.flush()?;
                }
                Ok(_) => {} // notification
                Err(e) => {
                    let error_response =
                        JsonRpcResponse::error(None, INTERNAL_ERROR, format!("Internal error: {e}"));
                    writeln!(stdout, "{}", serde_json::to_string(&error_response)?)?;
                    stdout.flush()?;
                }
            }
        }

        tracing::info!("stdin closed, shutting down");
        Ok(())
    }

    /// Handle one raw message.
    ///
    /// Returns the serialized response, or an empty string for notifications.
    pub async fn handle_message(&mut self, message: &str) -> Result<String> {
        let value: Value = match serde_json::from_str(message) {
            Ok(value) => value,
            Err(e) => {
                let response = JsonRpcResponse::error(None, PARSE_ERROR, format!("Parse error: {e}"));
                return serde_json::to_string(&response).map_err(Error::from);
            }
        };

        if value.get("jsonrpc").is_none() {
            let response = self.dispatcher.dispatch(&value, self.session_id.as_deref()).await;
            return serde_json::to_string(&response).map_err(Error::from);
        }

        let id = value.get("id").cloned();
        let request: JsonRpcRequest = match serde_json::from_value(value) {
            Ok(request) => request,
            Err(e) => {
                let response = JsonRpcResponse::error(id, INVALID_REQUEST, format!("Invalid request: {e}"));
                return serde_json::to_string(&response).map_err(Error::from);
            }
        };

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(request.id, request.params)?,
            "initialized" | "notifications/initialized" => return Ok(String::new()),
            "ping" => JsonRpcResponse::success(request.id, json!({})),
            "tools/list" => self.handle_tools_list(request.id)?,
            "tools/call" => self.handle_tools_call(request.id, request.params).await?,
            _ if request.is_notification() => return Ok(String::new()),
            _ => JsonRpcResponse::error(
                request.id,
                METHOD_NOT_FOUND,
                format!("Method not found: {}", request.method),
            ),
        };

        serde_json::to_string(&response).map_err(Error::from)
    }

    fn handle_initialize(&mut self, id: Option<Value>, params: Value) -> Result<JsonRpcResponse> {
        let params: InitializeParams = if params.is_null() {
            InitializeParams::default()
        } else {
            match serde_json::from_value(params) {
                Ok(params) => params,
                Err(e) => {
                    return Ok(JsonRpcResponse::error(id, INVALID_PARAMS, format!("Invalid params: {e}")));
                }
            }
        };

        if self.dispatcher.session_store().is_some() {
            let session_id = params.session_id.unwrap_or_else(new_session_id);
            tracing::info!(session_id = %session_id, "Session opened");
            self.session_id = Some(session_id);
        }

        if let Some(client) = &params.client_info {
            tracing::info!(client = %client.name, version = ?client.version, "Client connected");
        }

        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: ToolsCapability { list_changed: false },
            },
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            session_id: self.session_id.clone(),
        };

        Ok(JsonRpcResponse::success(id, serde_json::to_value(result)?))
    }

    fn handle_tools_list(&self, id: Option<Value>) -> Result<JsonRpcResponse> {
        let tools = serde_json::to_value(self.dispatcher.registry().definitions())?;
        Ok(JsonRpcResponse::success(id, json!({ "tools": tools })))
    }

    async fn handle_tools_call(&self, id: Option<Value>, params: Value) -> Result<JsonRpcResponse> {
        let params: ToolCallParams = match serde_json::from_value(params) {
            Ok(params) => params,
            Err(e) => {
                return Ok(JsonRpcResponse::error(id, INVALID_PARAMS, format!("Invalid params: {e}")));
            }
        };

        // Tool failures are results with isError set, not protocol errors.
        let tool_result = match self
            .dispatcher
            .call_tool(&params.name, params.arguments, None, self.session_id.as_deref())
            .await
        {
            Ok(value) => ToolResult::from_value(&value),
            Err(e) => {
                tracing::warn!(tool = %params.name, kind = e.kind(), error = %e, "Tool call failed");
                ToolResult::error(e.to_string())
            }
        };

        Ok(JsonRpcResponse::success(id, serde_json::to_value(tool_result)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use gate_session::InMemorySessionStore;

    use crate::registry::{ToolDescriptor, ToolRegistry, sync_handler};

    fn server(with_sessions: bool) -> McpServer {
        let mut registry = ToolRegistry::new();
        registry
            .register(ToolDescriptor::new("echo", "Echo", sync_handler(|_| Ok(json!("hi")))))
            .unwrap();
        let mut dispatcher = ToolDispatcher::new(Arc::new(registry));
        if with_sessions {
            dispatcher = dispatcher.with_session_store(Arc::new(InMemorySessionStore::new()));
        }
        McpServer::new(dispatcher)
    }

    #[tokio::test]
    async fn initialize_opens_session() {
        let mut server = server(true);
        let response = server
            .handle_message(r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#)
            .await
            .unwrap();
        let parsed: Value = serde_json::from_str(&response).unwrap();
        let session_id = parsed["result"]["sessionId"].as_str().unwrap();
        assert_eq!(Some(session_id), server.session_id());
        assert_eq!(parsed["result"]["serverInfo"]["name"], "toolgate");
    }

    #[tokio::test]
    async fn initialize_resumes_requested_session() {
        let mut server = server(true);
        server
            .handle_message(
                r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"sessionId":"abc"}}"#,
            )
            .await
            .unwrap();
        assert_eq!(server.session_id(), Some("abc"));
    }

    #[tokio::test]
    async fn initialize_without_store_has_no_session() {
        let mut server = server(false);
        let response = server
            .handle_message(r#"{"jsonrpc":"2.0","id":1,"method":"initialize"}"#)
            .await
            .unwrap();
        assert!(!response.contains("sessionId"));
        assert!(server.session_id().is_none());
    }

    #[tokio::test]
    async fn ping() {
        let mut server = server(false);
        let response = server
            .handle_message(r#"{"jsonrpc":"2.0","id":"p","method":"ping"}"#)
            .await
            .unwrap();
        let parsed: Value = serde_json::from_str(&response).unwrap();
        assert_eq!(parsed["id"], "p");
        assert_eq!(parsed["result"], json!({}));
    }

    #[tokio::test]
    async fn unknown_notification_is_silent() {
        let mut server = server(false);
        let response = server
            .handle_message(r#"{"jsonrpc":"2.0","method":"notifications/cancelled"}"#)
            .await
            .unwrap();
        assert!(response.is_empty());
    }

    #[tokio::test]
    async fn invalid_json_is_parse_error() {
        let mut server = server(false);
        let response = server.handle_message(r#"{"invalid json"#).await.unwrap();
        assert!(response.contains("-32700"));
    }

    #[tokio::test]
    async fn plain_envelope_goes_to_dispatcher() {
        let mut server = server(false);
        let response = server
            .handle_message(r#"{"action":"list_tools"}"#)
            .await
            .unwrap();
        let parsed: Value = serde_json::from_str(&response).unwrap();
        assert_eq!(parsed["status"], "success");
        assert_eq!(parsed["tools"][0]["name"], "echo");
    }
}
