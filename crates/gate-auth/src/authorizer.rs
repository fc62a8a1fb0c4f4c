//! Request authorizer
//!
//! Turns an inbound gateway event into an [`AuthorizationDecision`]. Every
//! failure (missing header, wrong scheme, wrong token) becomes a Deny; the
//! authorizer itself never returns an error.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::decision::{AuthorizationDecision, DEFAULT_PRINCIPAL, decide};
use crate::validator::TokenValidator;
use crate::{Error, Result};

/// Header carrying the bearer credential
pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// Event delivered to the authorizer by the gateway
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizerEvent {
    #[serde(default)]
    pub headers: Option<BTreeMap<String, String>>,
    pub method_arn: String,
}

impl AuthorizerEvent {
    pub fn new(method_arn: impl Into<String>) -> Self {
        Self {
            headers: None,
            method_arn: method_arn.into(),
        }
    }

    /// Add a header (builder pattern)
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), value.into());
        self
    }

    /// Look up a header by name, ignoring ASCII case
    pub fn header(&self, name: &str) -> Option<&str> {
        let headers = self.headers.as_ref()?;
        headers
            .get(name)
            .or_else(|| {
                headers
                    .iter()
                    .find(|(k, _)| k.eq_ignore_ascii_case(name))
                    .map(|(_, v)| v)
            })
            .map(String::as_str)
    }
}

/// Gateway authorizer: [`TokenValidator`] followed by the decision builder
#[derive(Debug, Clone)]
pub struct Authorizer {
    validator: TokenValidator,
    principal: String,
}

impl Authorizer {
    /// Create an authorizer that allows callers presenting `expected_token`
    pub fn new(expected_token: impl Into<String>) -> Self {
        Self {
            validator: TokenValidator::new(expected_token),
            principal: DEFAULT_PRINCIPAL.to_string(),
        }
    }

    /// Report `principal` on Allow decisions (builder pattern)
    pub fn with_principal(mut self, principal: impl Into<String>) -> Self {
        self.principal = principal.into();
        self
    }

    pub fn principal(&self) -> &str {
        &self.principal
    }

    /// Decide whether the event may invoke its `methodArn`.
    pub fn authorize(&self, event: &AuthorizerEvent) -> AuthorizationDecision {
        match self.check(event) {
            Ok(()) => {
                tracing::debug!(
                    principal = %self.principal,
                    resource = %event.method_arn,
                    "Authorization granted"
                );
                decide(true, &self.principal, &event.method_arn)
            }
            Err(error) => {
                tracing::warn!(
                    %error,
                    resource = %event.method_arn,
                    "Authorization error"
                );
                decide(false, &self.principal, &event.method_arn)
            }
        }
    }

    fn check(&self, event: &AuthorizerEvent) -> Result<()> {
        let header = event
            .header(AUTHORIZATION_HEADER)
            .filter(|v| !v.is_empty())
            .ok_or(Error::MissingHeader)?;
        self.validator.check_header(header)
    }
}
