//! Authorization decisions and the gateway policy document they render to

use serde::{Deserialize, Serialize};

/// IAM policy language version stamped on every decision
pub const POLICY_VERSION: &str = "2012-10-17";

/// The only action a decision ever grants or denies
pub const INVOKE_ACTION: &str = "execute-api:Invoke";

/// Principal reported on every Deny decision
pub const UNAUTHORIZED_PRINCIPAL: &str = "unauthorized";

/// Principal reported on Allow decisions unless configured otherwise
pub const DEFAULT_PRINCIPAL: &str = "test-user";

/// Outcome of an authorization check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    Allow,
    Deny,
}

impl Effect {
    pub fn is_allow(self) -> bool {
        self == Effect::Allow
    }
}

/// An allow/deny decision for one caller and one resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationDecision {
    pub principal_id: String,
    pub effect: Effect,
    /// Always the exact resource the caller asked for, on Allow and Deny alike
    pub resource_arn: String,
    pub policy_version: String,
}

/// Build a decision for a validated (or rejected) credential.
///
/// `principal` is only used when `is_valid` is true; rejected callers are
/// always reported as [`UNAUTHORIZED_PRINCIPAL`].
pub fn decide(is_valid: bool, principal: &str, resource_arn: &str) -> AuthorizationDecision {
    if is_valid {
        AuthorizationDecision::allow(principal, resource_arn)
    } else {
        AuthorizationDecision::deny(resource_arn)
    }
}

impl AuthorizationDecision {
    pub fn allow(principal: impl Into<String>, resource_arn: impl Into<String>) -> Self {
        Self {
            principal_id: principal.into(),
            effect: Effect::Allow,
            resource_arn: resource_arn.into(),
            policy_version: POLICY_VERSION.to_string(),
        }
    }

    pub fn deny(resource_arn: impl Into<String>) -> Self {
        Self {
            principal_id: UNAUTHORIZED_PRINCIPAL.to_string(),
            effect: Effect::Deny,
            resource_arn: resource_arn.into(),
            policy_version: POLICY_VERSION.to_string(),
        }
    }

    pub fn is_allowed(&self) -> bool {
        self.effect.is_allow()
    }

    /// Render the decision as the policy document the gateway consumes
    pub fn to_response(&self) -> AuthorizerResponse {
        AuthorizerResponse {
            principal_id: self.principal_id.clone(),
            policy_document: PolicyDocument {
                version: self.policy_version.clone(),
                statement: vec![PolicyStatement {
                    action: INVOKE_ACTION.to_string(),
                    effect: self.effect,
                    resource: self.resource_arn.clone(),
                }],
            },
        }
    }
}

/// Wire shape returned to the gateway
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizerResponse {
    pub principal_id: String,
    pub policy_document: PolicyDocument,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyDocument {
    pub version: String,
    pub statement: Vec<PolicyStatement>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyStatement {
    pub action: String,
    pub effect: Effect,
    pub resource: String,
}
