//! End-to-end gateway flow
//!
//! Configuration -> authorizer -> dispatcher -> audited tool -> file session
//! store, with the product catalog served by a mock HTTP server.

use gate_mcp::{Gateway, GatewayConfig, GatewayRequest, SESSION_HEADER};
use gate_session::{FileSessionStore, SessionStore};
use gate_test_utils::events::{TEST_METHOD_ARN, TEST_SECRET, bearer, list_tools, tool_call};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TABLE: &str = "mcp_sessions";

struct Harness {
    gateway: Gateway,
    sessions: TempDir,
    _catalog: MockServer,
}

impl Harness {
    async fn new(catalog_status: u16) -> Self {
        let catalog = MockServer::start().await;
        let response = if catalog_status == 200 {
            ResponseTemplate::new(200).set_body_json(products())
        } else {
            ResponseTemplate::new(catalog_status)
        };
        Mock::given(method("GET"))
            .and(path("/products"))
            .respond_with(response)
            .mount(&catalog)
            .await;

        let sessions = TempDir::new().unwrap();
        let env = [
            ("DUMMY_BEARER_TOKEN", TEST_SECRET.to_string()),
            ("SESSION_TABLE_NAME", TABLE.to_string()),
            ("TOOLGATE_SESSION_DIR", sessions.path().display().to_string()),
            ("TOOLGATE_CATALOG_URL", catalog.uri()),
        ];
        let config = GatewayConfig::load_with(None, |key| {
            env.iter().find(|(k, _)| *k == key).map(|(_, v)| v.clone())
        })
        .unwrap();

        Self {
            gateway: config.gateway().unwrap(),
            sessions,
            _catalog: catalog,
        }
    }

    fn store(&self) -> FileSessionStore {
        FileSessionStore::open(self.sessions.path().join(TABLE)).unwrap()
    }

    fn session(&self, id: &str) -> Option<serde_json::Map<String, Value>> {
        self.store().get(id).unwrap()
    }
}

fn products() -> Value {
    json!({
        "products": [
            {"id": 1, "title": "Mascara", "price": 9.99, "stock": 99, "brand": "Essence"},
            {"id": 2, "title": "Palette", "price": 19.99, "stock": 0},
            {"id": 3, "title": "Lipstick", "price": 12.5, "stock": 7}
        ],
        "total": 3,
        "skip": 0,
        "limit": 30
    })
}

fn authorized(body: Value, session: &str) -> GatewayRequest {
    GatewayRequest::new(TEST_METHOD_ARN, body)
        .with_header("Authorization", bearer(TEST_SECRET))
        .with_header(SESSION_HEADER, session)
}

fn ids(value: &Value) -> Vec<u64> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_u64().unwrap())
        .collect()
}

#[tokio::test]
async fn missing_bearer_is_forbidden_and_not_audited() {
    let harness = Harness::new(200).await;
    let request = GatewayRequest::new(TEST_METHOD_ARN, tool_call("add_two_numbers", json!({"a": 1, "b": 2})))
        .with_header(SESSION_HEADER, "anon");

    let response = harness.gateway.handle(&request).await;

    assert_eq!(response.status_code, 403);
    assert_eq!(response.body["error"]["kind"], "forbidden");
    assert!(harness.session("anon").is_none());
}

#[tokio::test]
async fn wrong_bearer_is_forbidden() {
    let harness = Harness::new(200).await;
    let request = GatewayRequest::new(TEST_METHOD_ARN, list_tools())
        .with_header("Authorization", "Bearer wrong");

    let response = harness.gateway.handle(&request).await;

    assert_eq!(response.status_code, 403);
}

#[tokio::test]
async fn add_two_numbers_end_to_end() {
    let harness = Harness::new(200).await;

    let response = harness
        .gateway
        .handle(&authorized(tool_call("add_two_numbers", json!({"a": 2, "b": 3})), "e2e-1"))
        .await;

    assert_eq!(response.status_code, 200);
    assert_eq!(response.body["status"], "success");
    assert_eq!(response.body["result"], 5);

    let session = harness.session("e2e-1").unwrap();
    assert_eq!(session["function"], "add_two_numbers");
    assert_eq!(session["arguments"], json!({"args": [], "kwargs": {"a": 2, "b": 3}}));
    assert_eq!(session["result"], "5");
}

#[tokio::test]
async fn catalog_tools_read_the_upstream() {
    let harness = Harness::new(200).await;

    let response = harness
        .gateway
        .handle(&authorized(
            tool_call("filter_by_price_range", json!({"min_price": 10, "max_price": 20})),
            "e2e-2",
        ))
        .await;
    assert_eq!(ids(&response.body["result"]), vec![2, 3]);

    let response = harness
        .gateway
        .handle(&authorized(
            tool_call("filter_by_stock_availability", json!([1])),
            "e2e-2",
        ))
        .await;
    assert_eq!(ids(&response.body["result"]), vec![1, 3]);
    // Unknown product fields pass through untouched
    assert_eq!(response.body["result"][0]["brand"], "Essence");

    let session = harness.session("e2e-2").unwrap();
    assert_eq!(session["function"], "filter_by_stock_availability");
    assert_eq!(session["arguments"], json!({"args": [1], "kwargs": {}}));
    let recorded: Value = serde_json::from_str(session["result"].as_str().unwrap()).unwrap();
    assert_eq!(ids(&recorded), vec![1, 3]);
}

#[tokio::test]
async fn upstream_failure_is_structured_and_leaves_no_result() {
    let harness = Harness::new(500).await;

    let response = harness
        .gateway
        .handle(&authorized(tool_call("fetch_all_products", json!({})), "e2e-3"))
        .await;

    assert_eq!(response.status_code, 200);
    assert_eq!(response.body["status"], "error");
    assert_eq!(response.body["error"]["kind"], "catalog_error");

    let session = harness.session("e2e-3").unwrap();
    assert_eq!(session["function"], "fetch_all_products");
    assert!(session.get("result").is_none());
}

#[tokio::test]
async fn sessions_accumulate_across_requests() {
    let harness = Harness::new(200).await;

    harness
        .gateway
        .handle(&authorized(tool_call("add_two_numbers", json!({"a": 1, "b": 1})), "e2e-4"))
        .await;
    harness
        .gateway
        .handle(&authorized(tool_call("fetch_all_products", Value::Null), "e2e-4"))
        .await;

    // Last invocation wins; the record is still a single session
    let session = harness.session("e2e-4").unwrap();
    assert_eq!(session["function"], "fetch_all_products");
    let page: Value = serde_json::from_str(session["result"].as_str().unwrap()).unwrap();
    assert_eq!(page["total"], 3);
}

#[tokio::test]
async fn discovery_through_the_gateway() {
    let harness = Harness::new(200).await;

    let response = harness.gateway.handle(&authorized(list_tools(), "e2e-5")).await;

    assert_eq!(response.status_code, 200);
    let names: Vec<&str> = response.body["tools"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec![
            "add_two_numbers",
            "fetch_all_products",
            "filter_by_price_range",
            "filter_by_stock_availability",
        ]
    );
    // Listing is not a tool invocation
    assert!(harness.session("e2e-5").is_none());
}
