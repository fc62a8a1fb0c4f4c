//! Unsigned token builder.
//!
//! Produces `header.payload.signature` strings shaped like the access tokens
//! an OAuth provider issues, without any real signature. Good enough for the
//! decode-only paths; never accepted by anything that verifies signatures.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::{Value, json};

/// Placeholder signature segment
pub const FAKE_SIGNATURE: &str = "c2lnbmF0dXJl";

/// Encode `payload` as the middle segment of an unsigned token.
///
/// # Panics
/// Panics if `payload` cannot be serialized (never for a `Value`).
pub fn encode_token(payload: &Value) -> String {
    encode_token_with_header(&json!({"alg": "none", "typ": "JWT"}), payload)
}

/// Encode a token with an explicit header segment.
pub fn encode_token_with_header(header: &Value, payload: &Value) -> String {
    format!(
        "{}.{}.{}",
        segment(header),
        segment(payload),
        FAKE_SIGNATURE
    )
}

/// A token resembling a client-credentials access token for `client_id`.
pub fn access_token(client_id: &str, scope: &str) -> String {
    encode_token(&json!({
        "sub": client_id,
        "client_id": client_id,
        "token_use": "access",
        "scope": scope,
        "exp": 4_102_444_800_i64,
    }))
}

fn segment(value: &Value) -> String {
    let bytes = serde_json::to_vec(value)
        .unwrap_or_else(|e| panic!("token segment serialization failed: {e}"));
    URL_SAFE_NO_PAD.encode(bytes)
}
