//! Error types for gate-auth

/// Result type for gate-auth operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while extracting, validating or decoding credentials
///
/// None of these reach the transport layer from the authorizer path: the
/// [`Authorizer`](crate::Authorizer) converts every one of them into a Deny
/// decision. Only [`decode_payload`](crate::decode_payload) surfaces them to
/// its caller.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request carried no Authorization header
    #[error("Authorization header missing")]
    MissingHeader,

    /// The Authorization header is not of the form `Bearer <token>`
    #[error("Malformed Authorization header: {reason}")]
    MalformedHeader { reason: String },

    /// The presented token does not match the configured secret
    #[error("Invalid token")]
    InvalidCredential,

    /// The token does not have exactly three dot-separated segments
    #[error("Invalid token format: expected 3 segments, found {segments}")]
    Format { segments: usize },

    /// The payload segment is not valid base64url-encoded JSON
    #[error("Failed to decode token payload: {message}")]
    Decode { message: String },
}

impl Error {
    /// Create a malformed-header error with the given reason
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedHeader {
            reason: reason.into(),
        }
    }

    /// Create a decode error with the given message
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Whether this error belongs to the authorizer path (always a Deny)
    pub fn is_authorization_failure(&self) -> bool {
        matches!(
            self,
            Self::MissingHeader | Self::MalformedHeader { .. } | Self::InvalidCredential
        )
    }
}
