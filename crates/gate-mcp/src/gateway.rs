//! Authorizer in front of the dispatcher

use std::io::{BufRead, Write};

use gate_auth::{Authorizer, AuthorizerEvent};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::Result;
use crate::dispatcher::{ToolDispatcher, error_response};

/// Header carrying the caller's session id
pub const SESSION_HEADER: &str = "Mcp-Session-Id";

/// An inbound HTTP-shaped request: headers, the resource being invoked, and a JSON body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GatewayRequest {
    #[serde(flatten)]
    pub event: AuthorizerEvent,
    #[serde(default)]
    pub body: Value,
}

impl GatewayRequest {
    pub fn new(method_arn: impl Into<String>, body: Value) -> Self {
        Self {
            event: AuthorizerEvent::new(method_arn),
            body,
        }
    }

    /// Add a header (builder pattern)
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.event = self.event.with_header(name, value);
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.event.header(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayResponse {
    pub status_code: u16,
    pub body: Value,
}

/// Authorize, then dispatch.
#[derive(Debug, Clone)]
pub struct Gateway {
    authorizer: Authorizer,
    dispatcher: ToolDispatcher,
}

impl Gateway {
    pub fn new(authorizer: Authorizer, dispatcher: ToolDispatcher) -> Self {
        Self {
            authorizer,
            dispatcher,
        }
    }

    pub fn dispatcher(&self) -> &ToolDispatcher {
        &self.dispatcher
    }

    /// Denied requests get `403` and never reach a tool. Everything that
    /// passes authorization gets `200` with the dispatcher's response,
    /// including structured tool errors.
    pub async fn handle(&self, request: &GatewayRequest) -> GatewayResponse {
        let decision = self.authorizer.authorize(&request.event);
        if !decision.is_allowed() {
            return GatewayResponse {
                status_code: 403,
                body: json!({
                    "status": "error",
                    "error": {
                        "kind": "forbidden",
                        "message": format!("not authorized to invoke {}", decision.resource_arn),
                    },
                }),
            };
        }

        let session_id = request.header(SESSION_HEADER).filter(|id| !id.is_empty());
        let body = self.dispatcher.dispatch(&request.body, session_id).await;
        GatewayResponse {
            status_code: 200,
            body,
        }
    }

    /// Handle one JSON-encoded request; an unparseable line gets `400`
    pub async fn handle_line(&self, line: &str) -> Result<String> {
        let response = match serde_json::from_str::<GatewayRequest>(line) {
            Ok(request) => self.handle(&request).await,
            Err(e) => {
                tracing::warn!(error = %e, "Rejected malformed gateway request");
                GatewayResponse {
                    status_code: 400,
                    body: error_response(&crate::Error::from(e)),
                }
            }
        };
        Ok(serde_json::to_string(&response)?)
    }

    /// Read one request per stdin line, write one response per stdout line
    pub async fn run(&self) -> Result<()> {
        let stdin = std::io::stdin();
        let mut stdout = std::io::stdout();

        tracing::info!(
            tools = self.dispatcher.registry().len(),
            "Gateway ready, reading requests from stdin"
        );

        for line in stdin.lock().lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            writeln!(stdout, "{}", self.handle_line(&line).await?)?;
            stdout.flush()?;
        }

        tracing::info!("stdin closed, shutting down");
        Ok(())
    }
}
