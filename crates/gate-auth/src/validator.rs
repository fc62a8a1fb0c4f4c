//! Bearer token validation
//!
//! The authorizer path compares the presented token against a single
//! configured secret. There is no expiry or signature check; the comparison
//! runs in constant time so response latency does not leak how many leading
//! bytes matched.

use subtle::ConstantTimeEq;

use crate::{Error, Result};

/// HTTP authentication scheme accepted by the authorizer
pub const BEARER_SCHEME: &str = "Bearer";

/// Compare a presented token with the expected secret.
///
/// Returns `true` only when both strings are byte-for-byte equal.
pub fn validate(presented: &str, expected: &str) -> bool {
    presented.as_bytes().ct_eq(expected.as_bytes()).into()
}

/// Validates bearer credentials against a configured secret
#[derive(Clone)]
pub struct TokenValidator {
    expected: String,
}

impl TokenValidator {
    /// Create a validator for the given expected secret
    pub fn new(expected: impl Into<String>) -> Self {
        Self {
            expected: expected.into(),
        }
    }

    /// Check a raw token (without the scheme prefix)
    pub fn validate(&self, presented: &str) -> bool {
        validate(presented, &self.expected)
    }

    /// Check the full value of an Authorization header.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedHeader`] when the value does not use the
    /// `Bearer` scheme, and [`Error::InvalidCredential`] when the token does
    /// not match.
    pub fn check_header(&self, header_value: &str) -> Result<()> {
        let token = bearer_token(header_value)?;
        if self.validate(token) {
            Ok(())
        } else {
            Err(Error::InvalidCredential)
        }
    }
}

impl std::fmt::Debug for TokenValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenValidator")
            .field("expected", &"<redacted>")
            .finish()
    }
}

/// Extract the token from a `Bearer <token>` header value.
///
/// The scheme match is exact (`Bearer` followed by a single space); the
/// token itself is returned untouched, so surrounding whitespace is part of
/// what gets compared.
pub fn bearer_token(header_value: &str) -> Result<&str> {
    let (scheme, token) = header_value
        .split_once(' ')
        .ok_or_else(|| Error::malformed("expected `Bearer <token>`"))?;
    if scheme != BEARER_SCHEME {
        return Err(Error::malformed(format!("unsupported scheme `{scheme}`")));
    }
    Ok(token)
}
