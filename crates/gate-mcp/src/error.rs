//! Error types for the gateway

use thiserror::Error;

/// Result type alias for gateway operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while registering, dispatching or serving tools
#[derive(Debug, Error)]
pub enum Error {
    /// A tool with this name is already registered
    #[error("duplicate tool name: {0}")]
    DuplicateName(String),

    /// Unknown tool requested
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// Arguments missing, mistyped or unexpected for the tool's schema
    #[error("invalid arguments: {message}")]
    InvalidArguments { message: String },

    /// Request body is not a recognised envelope
    #[error("invalid request: {message}")]
    InvalidRequest { message: String },

    /// The tool handler itself failed
    #[error("tool failed: {message}")]
    Tool { message: String },

    /// Authorizer configuration or header failure
    #[error("authorization error: {0}")]
    Auth(#[from] gate_auth::Error),

    /// Session store failure
    #[error("session error: {0}")]
    Session(#[from] gate_session::Error),

    /// Product catalog failure
    #[error("catalog error: {0}")]
    Catalog(#[from] gate_catalog::Error),

    /// Error during JSON serialization/deserialization
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration missing or invalid
    #[error("configuration error: {message}")]
    Config { message: String },

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

impl Error {
    pub fn invalid_arguments(message: impl Into<String>) -> Self {
        Self::InvalidArguments {
            message: message.into(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    pub fn tool(message: impl Into<String>) -> Self {
        Self::Tool {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Stable machine-readable label used in structured error responses
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DuplicateName(_) => "duplicate_name",
            Self::UnknownTool(_) => "unknown_tool",
            Self::InvalidArguments { .. } => "invalid_arguments",
            Self::InvalidRequest { .. } | Self::Json(_) => "invalid_request",
            Self::Tool { .. } => "tool_error",
            Self::Auth(_) => "forbidden",
            Self::Session(_) => "session_error",
            Self::Catalog(_) => "catalog_error",
            Self::Io(_) | Self::Config { .. } | Self::TomlParse(_) => "internal_error",
        }
    }
}
