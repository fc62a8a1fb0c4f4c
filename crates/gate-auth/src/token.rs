//! Token payload decoding
//!
//! A diagnostic helper for three-segment tokens (`header.payload.signature`).
//! Decoding does NOT verify the signature and must never be used to make an
//! authorization decision.

use base64::{Engine as _, engine::general_purpose::URL_SAFE};
use serde_json::{Map, Value};

use crate::{Error, Result};

/// Number of dot-separated segments in a well-formed token
pub const TOKEN_SEGMENTS: usize = 3;

/// Decode the payload (middle segment) of a three-segment token.
///
/// The segment is padded with `=` to a multiple of four characters before
/// base64url decoding, so both padded and unpadded encodings are accepted.
///
/// # Errors
///
/// - [`Error::Format`] if the token does not have exactly three segments
/// - [`Error::Decode`] if the payload is not base64url, not JSON, or not a
///   JSON object
pub fn decode_payload(token: &str) -> Result<Map<String, Value>> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != TOKEN_SEGMENTS {
        return Err(Error::Format {
            segments: segments.len(),
        });
    }

    let payload = segments[1];
    let mut padded = String::with_capacity(payload.len() + 3);
    padded.push_str(payload);
    while padded.len() % 4 != 0 {
        padded.push('=');
    }

    let bytes = URL_SAFE
        .decode(padded.as_bytes())
        .map_err(|e| Error::decode(format!("invalid base64url: {e}")))?;
    let value: Value =
        serde_json::from_slice(&bytes).map_err(|e| Error::decode(format!("invalid JSON: {e}")))?;

    match value {
        Value::Object(map) => Ok(map),
        other => Err(Error::decode(format!(
            "payload is not a JSON object (found {})",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Read-only view over a decoded token payload
#[derive(Debug, Clone, PartialEq)]
pub struct TokenClaims {
    claims: Map<String, Value>,
}

impl TokenClaims {
    /// Decode the payload of `token` into a claims view
    pub fn decode(token: &str) -> Result<Self> {
        decode_payload(token).map(Self::from)
    }

    /// Scopes granted to the token, taken from the space-delimited `scope` claim
    pub fn scopes(&self) -> Vec<&str> {
        self.claims
            .get("scope")
            .and_then(Value::as_str)
            .map(|s| s.split_whitespace().collect())
            .unwrap_or_default()
    }

    /// Whether `scope` is among the granted scopes
    pub fn has_scope(&self, scope: &str) -> bool {
        self.scopes().contains(&scope)
    }

    /// OAuth client the token was issued to (`client_id` claim)
    pub fn client_id(&self) -> Option<&str> {
        self.claims.get("client_id").and_then(Value::as_str)
    }

    /// Expiry as seconds since the epoch (`exp` claim)
    pub fn expires_at(&self) -> Option<i64> {
        self.claims.get("exp").and_then(Value::as_i64)
    }

    /// Raw claim lookup
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.claims.get(name)
    }

    /// The full claim mapping
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.claims
    }
}

impl From<Map<String, Value>> for TokenClaims {
    fn from(claims: Map<String, Value>) -> Self {
        Self { claims }
    }
}
