//! Calling the gateway's tool endpoint

use std::time::Duration;

use reqwest::Client;
use serde_json::{Value, json};
use url::Url;

use crate::Result;
use crate::oauth::check_status;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Header carrying the caller's session id
pub const SESSION_HEADER: &str = "Mcp-Session-Id";

/// Bearer-authenticated client for one tool endpoint
#[derive(Clone)]
pub struct ToolApiClient {
    http: Client,
    endpoint: Url,
    token: String,
    session_id: Option<String>,
}

impl ToolApiClient {
    pub fn new(endpoint: Url, token: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("gate-client/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            endpoint,
            token: token.into(),
            session_id: None,
        })
    }

    /// Send `Mcp-Session-Id` with every request (builder pattern)
    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// `{"action": "list_tools"}`
    pub async fn list_tools(&self) -> Result<Value> {
        self.post(&json!({ "action": "list_tools" })).await
    }

    /// `{"action": "call_tool", "tool": name, "args": args}`
    pub async fn call_tool(&self, name: &str, args: Value) -> Result<Value> {
        self.post(&json!({ "action": "call_tool", "tool": name, "args": args }))
            .await
    }

    async fn post(&self, body: &Value) -> Result<Value> {
        let mut request = self
            .http
            .post(self.endpoint.clone())
            .bearer_auth(&self.token)
            .json(body);
        if let Some(session_id) = &self.session_id {
            request = request.header(SESSION_HEADER, session_id);
        }

        let response = request.send().await?;
        tracing::debug!(status = %response.status(), url = %self.endpoint, "Tool endpoint responded");
        Ok(check_status(response).await?.json().await?)
    }
}

impl std::fmt::Debug for ToolApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolApiClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("session_id", &self.session_id)
            .finish_non_exhaustive()
    }
}
