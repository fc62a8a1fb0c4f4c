//! Request dispatch
//!
//! Turns a request body into a response body. Every failure becomes a
//! structured error response; [`ToolDispatcher::dispatch`] never errors.

use std::sync::Arc;

use gate_session::{SessionContext, SessionStore};
use serde_json::{Map, Value, json};

use crate::audit::InvocationContext;
use crate::registry::{ToolArguments, ToolDescriptor, ToolRegistry};
use crate::{Error, Result};

pub const LIST_TOOLS_ACTION: &str = "list_tools";
pub const CALL_TOOL_ACTION: &str = "call_tool";

/// A parsed request envelope
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchRequest {
    /// `{"action": "list_tools"}`
    ListTools,
    /// `{"tool": <name>, "args": <object|array>, "kwargs"?: {...}, "session_id"?: <id>}`
    CallTool {
        tool: String,
        args: Value,
        kwargs: Option<Map<String, Value>>,
        session_id: Option<String>,
    },
}

impl DispatchRequest {
    /// Parse an envelope. `name` and `arguments` are accepted as aliases of
    /// `tool` and `args`; `action` defaults to `call_tool`.
    pub fn parse(body: &Value) -> Result<Self> {
        let Some(fields) = body.as_object() else {
            return Err(Error::invalid_request("request body must be a JSON object"));
        };

        match fields.get("action").map(Value::as_str) {
            Some(Some(LIST_TOOLS_ACTION)) => return Ok(Self::ListTools),
            Some(Some(CALL_TOOL_ACTION)) | None => {}
            Some(Some(other)) => {
                return Err(Error::invalid_request(format!("unknown action '{other}'")));
            }
            Some(None) => return Err(Error::invalid_request("'action' must be a string")),
        }

        let tool = fields
            .get("tool")
            .or_else(|| fields.get("name"))
            .and_then(Value::as_str)
            .ok_or_else(|| Error::invalid_request("missing tool name"))?
            .to_string();

        let args = fields
            .get("args")
            .or_else(|| fields.get("arguments"))
            .cloned()
            .unwrap_or(Value::Null);

        let kwargs = match fields.get("kwargs") {
            None | Some(Value::Null) => None,
            Some(Value::Object(map)) => Some(map.clone()),
            Some(_) => return Err(Error::invalid_request("'kwargs' must be an object")),
        };

        let session_id = match fields.get("session_id") {
            None | Some(Value::Null) => None,
            Some(Value::String(id)) => Some(id.clone()),
            Some(_) => return Err(Error::invalid_request("'session_id' must be a string")),
        };

        Ok(Self::CallTool {
            tool,
            args,
            kwargs,
            session_id,
        })
    }
}

/// Routes requests to registered tools.
///
/// Holds the shared registry and, optionally, the store sessions live in.
/// Without a store every invocation runs unaudited.
#[derive(Clone)]
pub struct ToolDispatcher {
    registry: Arc<ToolRegistry>,
    sessions: Option<Arc<dyn SessionStore>>,
}

impl ToolDispatcher {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self {
            registry,
            sessions: None,
        }
    }

    pub fn with_session_store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.sessions = Some(store);
        self
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn session_store(&self) -> Option<&Arc<dyn SessionStore>> {
        self.sessions.as_ref()
    }

    /// Context for an invocation on `session_id`, if there is both an id and a store
    pub fn context_for(&self, session_id: Option<&str>) -> InvocationContext {
        match (&self.sessions, session_id) {
            (Some(store), Some(id)) => {
                InvocationContext::with_session(SessionContext::new(Arc::clone(store), id))
            }
            _ => InvocationContext::detached(),
        }
    }

    /// Bind arguments and run a tool through its audited handler
    pub async fn call_tool(
        &self,
        name: &str,
        args: Value,
        kwargs: Option<Map<String, Value>>,
        session_id: Option<&str>,
    ) -> Result<Value> {
        let descriptor = self
            .registry
            .get(name)
            .ok_or_else(|| Error::UnknownTool(name.to_string()))?;
        let bound = bind(descriptor, args, kwargs)?;
        let ctx = self.context_for(session_id);

        tracing::debug!(tool = %name, session_id = ?session_id, "Invoking tool");
        descriptor.handler.call(&ctx, &bound).await
    }

    /// Handle one request body.
    ///
    /// `session_id` is the transport-level session (e.g. a header); a
    /// `session_id` inside the envelope takes precedence.
    pub async fn dispatch(&self, body: &Value, session_id: Option<&str>) -> Value {
        let request = match DispatchRequest::parse(body) {
            Ok(request) => request,
            Err(error) => {
                tracing::warn!(%error, "Rejected request");
                return error_response(&error);
            }
        };

        match request {
            DispatchRequest::ListTools => json!({
                "status": "success",
                "tools": self.registry.definitions(),
            }),
            DispatchRequest::CallTool {
                tool,
                args,
                kwargs,
                session_id: envelope_session,
            } => {
                let session_id = envelope_session.as_deref().or(session_id);
                match self.call_tool(&tool, args, kwargs, session_id).await {
                    Ok(result) => json!({
                        "status": "success",
                        "tool": tool,
                        "result": result,
                    }),
                    Err(error) => {
                        tracing::warn!(tool = %tool, kind = error.kind(), %error, "Tool call failed");
                        error_response(&error)
                    }
                }
            }
        }
    }
}

impl std::fmt::Debug for ToolDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolDispatcher")
            .field("tools", &self.registry.names())
            .field("sessions", &self.sessions.is_some())
            .finish()
    }
}

/// `{"status": "error", "error": {"kind", "message"}}`
pub fn error_response(error: &Error) -> Value {
    json!({
        "status": "error",
        "error": {
            "kind": error.kind(),
            "message": error.to_string(),
        },
    })
}

fn bind(
    descriptor: &ToolDescriptor,
    args: Value,
    kwargs: Option<Map<String, Value>>,
) -> Result<ToolArguments> {
    let Some(kwargs) = kwargs else {
        return descriptor.bind(args);
    };
    let positional = match args {
        Value::Null => Vec::new(),
        Value::Array(values) => values,
        _ => {
            return Err(Error::invalid_arguments(
                "'args' must be an array when 'kwargs' is given",
            ));
        }
    };
    descriptor.bind_parts(positional, kwargs)
}
