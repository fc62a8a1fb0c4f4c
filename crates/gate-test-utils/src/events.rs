//! Gateway-shaped fixtures.

use serde_json::{Value, json};

/// Resource ARN used by authorizer fixtures
pub const TEST_METHOD_ARN: &str =
    "arn:aws:execute-api:eu-central-1:123456789012:abcdef1234/prod/POST/add_two_numbers/mcp";

/// Expected bearer secret used across the test suites
pub const TEST_SECRET: &str = "secret123";

/// Authorizer event JSON with an optional `Authorization` header value.
pub fn authorizer_event(authorization: Option<&str>, method_arn: &str) -> Value {
    match authorization {
        Some(value) => json!({
            "type": "REQUEST",
            "methodArn": method_arn,
            "headers": { "Authorization": value },
        }),
        None => json!({
            "type": "REQUEST",
            "methodArn": method_arn,
            "headers": {},
        }),
    }
}

/// `Bearer <token>` header value
pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

/// Tool invocation envelope
pub fn tool_call(tool: &str, args: Value) -> Value {
    json!({ "tool": tool, "args": args })
}

/// Discovery request
pub fn list_tools() -> Value {
    json!({ "action": "list_tools" })
}
