//! Gateway authorization for toolgate
//!
//! This crate holds the leaf components that sit in front of tool
//! invocation:
//!
//! - **Token validation** ([`TokenValidator`]): exact, constant-time match of
//!   a presented bearer token against one configured secret.
//! - **Decisions** ([`AuthorizationDecision`], [`decide`]): allow/deny
//!   documents scoped to the exact resource the caller requested.
//! - **Authorizer** ([`Authorizer`]): event in, decision out. Never errors;
//!   every failure is a Deny.
//! - **Payload decoding** ([`decode_payload`], [`TokenClaims`]): diagnostic
//!   inspection of three-segment tokens without signature verification.

pub mod authorizer;
pub mod decision;
pub mod error;
pub mod token;
pub mod validator;

pub use authorizer::{AUTHORIZATION_HEADER, Authorizer, AuthorizerEvent};
pub use decision::{
    AuthorizationDecision, AuthorizerResponse, DEFAULT_PRINCIPAL, Effect, POLICY_VERSION,
    PolicyDocument, PolicyStatement, UNAUTHORIZED_PRINCIPAL, decide,
};
pub use error::{Error, Result};
pub use token::{TokenClaims, decode_payload};
pub use validator::{TokenValidator, bearer_token, validate};
