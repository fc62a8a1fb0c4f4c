//! Error types for gate-client

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Client id or secret not configured for the chosen profile
    #[error("client id and secret must be set for profile '{profile}' ({id_var}, {secret_var})")]
    MissingCredentials {
        profile: String,
        id_var: &'static str,
        secret_var: &'static str,
    },

    /// Transport failure or undecodable body
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("{url} returned {status}: {body}")]
    Status { status: u16, url: String, body: String },

    /// A response was missing something the client needs
    #[error("response from {url} has no '{field}'")]
    MissingField { url: String, field: &'static str },

    /// Token could not be inspected
    #[error(transparent)]
    Auth(#[from] gate_auth::Error),

    /// Not enough configuration to proceed
    #[error("{message}")]
    Config { message: String },

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}
