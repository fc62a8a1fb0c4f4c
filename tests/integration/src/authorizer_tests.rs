//! Authorizer events as the gateway delivers them

use gate_auth::{Authorizer, AuthorizerEvent};
use gate_mcp::GatewayRequest;
use gate_test_utils::events::{TEST_METHOD_ARN, TEST_SECRET, authorizer_event, bearer};
use pretty_assertions::assert_eq;
use serde_json::json;

fn decide(event: serde_json::Value) -> serde_json::Value {
    let event: AuthorizerEvent = serde_json::from_value(event).unwrap();
    let decision = Authorizer::new(TEST_SECRET).authorize(&event);
    serde_json::to_value(decision.to_response()).unwrap()
}

#[test]
fn allow_document() {
    let document = decide(authorizer_event(Some(&bearer(TEST_SECRET)), TEST_METHOD_ARN));

    assert_eq!(
        document,
        json!({
            "principalId": "test-user",
            "policyDocument": {
                "Version": "2012-10-17",
                "Statement": [{
                    "Action": "execute-api:Invoke",
                    "Effect": "Allow",
                    "Resource": TEST_METHOD_ARN
                }]
            }
        })
    );
}

#[test]
fn wrong_token_deny_document() {
    let document = decide(authorizer_event(Some("Bearer wrong"), TEST_METHOD_ARN));

    assert_eq!(document["principalId"], "unauthorized");
    assert_eq!(document["policyDocument"]["Statement"][0]["Effect"], "Deny");
    assert_eq!(document["policyDocument"]["Statement"][0]["Resource"], TEST_METHOD_ARN);
}

#[test]
fn missing_header_deny_document() {
    let document = decide(authorizer_event(None, TEST_METHOD_ARN));

    assert_eq!(document["policyDocument"]["Statement"][0]["Effect"], "Deny");
}

#[test]
fn event_without_headers_object_is_denied() {
    let document = decide(json!({"methodArn": TEST_METHOD_ARN}));

    assert_eq!(document["principalId"], "unauthorized");
}

#[test]
fn gateway_request_carries_the_event() {
    let mut event = authorizer_event(Some(&bearer(TEST_SECRET)), TEST_METHOD_ARN);
    event["body"] = json!({"action": "list_tools"});

    let request: GatewayRequest = serde_json::from_value(event).unwrap();

    assert_eq!(request.event.method_arn, TEST_METHOD_ARN);
    assert_eq!(request.header("authorization"), Some("Bearer secret123"));
    assert_eq!(request.body, json!({"action": "list_tools"}));
}
