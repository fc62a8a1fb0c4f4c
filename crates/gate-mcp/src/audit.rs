//! Session-scoped invocation auditing
//!
//! [`AuditedHandler`] wraps a tool handler and records each invocation on
//! the active session: which function ran, with which arguments, and what it
//! returned. Without an active session the wrapper is a pass-through.

use std::sync::Arc;

use async_trait::async_trait;
use gate_session::SessionContext;
use serde_json::Value;

use crate::Result;
use crate::registry::{ToolArguments, ToolHandler};

/// Session attribute holding the registered name of the last tool run
pub const FUNCTION_ATTR: &str = "function";
/// Session attribute holding `{"args": [...], "kwargs": {...}}`
pub const ARGUMENTS_ATTR: &str = "arguments";
/// Session attribute holding the string-coerced return value
pub const RESULT_ATTR: &str = "result";

/// Per-invocation context handed to every handler
#[derive(Debug, Clone, Default)]
pub struct InvocationContext {
    session: Option<SessionContext>,
}

impl InvocationContext {
    /// Context with no active session
    pub fn detached() -> Self {
        Self::default()
    }

    pub fn with_session(session: SessionContext) -> Self {
        Self {
            session: Some(session),
        }
    }

    pub fn session(&self) -> Option<&SessionContext> {
        self.session.as_ref()
    }
}

/// Audit middleware around one registered handler
pub struct AuditedHandler {
    name: String,
    inner: Arc<dyn ToolHandler>,
}

impl AuditedHandler {
    pub fn new(name: impl Into<String>, inner: Arc<dyn ToolHandler>) -> Self {
        Self {
            name: name.into(),
            inner,
        }
    }
}

#[async_trait]
impl ToolHandler for AuditedHandler {
    async fn call(&self, ctx: &InvocationContext, args: &ToolArguments) -> Result<Value> {
        let Some(session_ctx) = ctx.session() else {
            return self.inner.call(ctx, args).await;
        };

        let mut session = session_ctx.load()?;
        session.set(FUNCTION_ATTR, self.name.as_str());
        session.set(ARGUMENTS_ATTR, args.audit_record());
        session.remove(RESULT_ATTR);

        match self.inner.call(ctx, args).await {
            Ok(value) => {
                session.set(RESULT_ATTR, result_text(&value));
                session_ctx.save(&session)?;
                tracing::debug!(
                    tool = %self.name,
                    session_id = %session_ctx.session_id(),
                    "Recorded invocation"
                );
                Ok(value)
            }
            Err(error) => {
                // The handler's error wins over a failed audit write.
                if let Err(save_error) = session_ctx.save(&session) {
                    tracing::warn!(
                        tool = %self.name,
                        session_id = %session_ctx.session_id(),
                        error = %save_error,
                        "Failed to record failed invocation"
                    );
                }
                Err(error)
            }
        }
    }
}

/// Strings are stored as-is; anything else as its JSON text
pub fn result_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
