//! MCP Protocol Compliance Integration Tests
//!
//! ID preservation, error codes, notifications and end-to-end tool calls
//! through [`McpServer::handle_message`].

use std::sync::Arc;

use gate_catalog::{Product, ProductPage, StaticCatalog};
use gate_mcp::{McpServer, ServerProfile, ToolDispatcher, ToolRegistry};
use gate_session::{InMemorySessionStore, SessionStore};
use serde_json::{Map, Value, json};

fn catalog() -> StaticCatalog {
    let products = [(1, 9.99, 5), (2, 49.5, 0), (3, 120.0, 40)]
        .into_iter()
        .map(|(id, price, stock)| Product {
            id,
            title: format!("Product {id}"),
            price,
            stock,
            extra: Map::new(),
        })
        .collect();
    StaticCatalog::new(ProductPage::new(products))
}

fn setup_server(store: Option<Arc<InMemorySessionStore>>) -> McpServer {
    let registry = ToolRegistry::with_builtins(ServerProfile::All, Arc::new(catalog())).unwrap();
    let mut dispatcher = ToolDispatcher::new(Arc::new(registry));
    if let Some(store) = store {
        dispatcher = dispatcher.with_session_store(store);
    }
    McpServer::new(dispatcher)
}

async fn send(server: &mut McpServer, request: &str) -> Value {
    serde_json::from_str(&server.handle_message(request).await.unwrap()).unwrap()
}

fn tool_text(response: &Value) -> &str {
    response["result"]["content"][0]["text"].as_str().unwrap()
}

// ==========================================================================
// JSON-RPC 2.0 ID Preservation
// ==========================================================================

#[tokio::test]
async fn test_numeric_id_preserved_in_response() {
    let mut server = setup_server(None);
    let response = send(&mut server, r#"{"jsonrpc":"2.0","id":42,"method":"initialize","params":{}}"#).await;

    assert_eq!(response["id"], 42, "Numeric ID must be echoed back exactly");
    assert_eq!(response["jsonrpc"], "2.0");
}

#[tokio::test]
async fn test_string_id_preserved_in_response() {
    let mut server = setup_server(None);
    let response = send(&mut server, r#"{"jsonrpc":"2.0","id":"req-7","method":"tools/list"}"#).await;

    assert_eq!(response["id"], "req-7");
}

// ==========================================================================
// Error codes
// ==========================================================================

#[tokio::test]
async fn test_unknown_method_is_32601() {
    let mut server = setup_server(None);
    let response = send(&mut server, r#"{"jsonrpc":"2.0","id":1,"method":"resources/list"}"#).await;

    assert_eq!(response["error"]["code"], -32601);
    assert!(response.get("result").is_none());
}

#[tokio::test]
async fn test_tools_call_without_name_is_32602() {
    let mut server = setup_server(None);
    let response = send(
        &mut server,
        r#"{"jsonrpc":"2.0","id":1,"method":"tools/call","params":{"arguments":{}}}"#,
    )
    .await;

    assert_eq!(response["error"]["code"], -32602);
}

#[tokio::test]
async fn test_missing_method_is_32600() {
    let mut server = setup_server(None);
    let response = send(&mut server, r#"{"jsonrpc":"2.0","id":9}"#).await;

    assert_eq!(response["error"]["code"], -32600);
    assert_eq!(response["id"], 9);
}

#[tokio::test]
async fn test_notifications_get_no_response() {
    let mut server = setup_server(None);
    for request in [
        r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
        r#"{"jsonrpc":"2.0","method":"initialized"}"#,
    ] {
        assert!(server.handle_message(request).await.unwrap().is_empty());
    }
}

// ==========================================================================
// Tools
// ==========================================================================

#[tokio::test]
async fn test_tools_list_has_schemas() {
    let mut server = setup_server(None);
    let response = send(&mut server, r#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#).await;

    let tools = response["result"]["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 4);
    let price = tools
        .iter()
        .find(|t| t["name"] == "filter_by_price_range")
        .unwrap();
    assert_eq!(price["inputSchema"]["properties"]["min_price"]["type"], "number");
    assert_eq!(price["inputSchema"]["required"], json!(["min_price", "max_price"]));
}

#[tokio::test]
async fn test_tools_call_add_two_numbers() {
    let mut server = setup_server(None);
    let response = send(
        &mut server,
        r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"add_two_numbers","arguments":{"a":2,"b":3}}}"#,
    )
    .await;

    assert_eq!(tool_text(&response), "5");
    assert!(response["result"].get("isError").is_none());
}

#[tokio::test]
async fn test_tools_call_price_filter() {
    let mut server = setup_server(None);
    let response = send(
        &mut server,
        r#"{"jsonrpc":"2.0","id":4,"method":"tools/call","params":{"name":"filter_by_price_range","arguments":{"min_price":9.99,"max_price":49.5}}}"#,
    )
    .await;

    let products: Value = serde_json::from_str(tool_text(&response)).unwrap();
    let ids: Vec<u64> = products
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 2]);
}

#[tokio::test]
async fn test_tools_call_unknown_tool_is_error_result() {
    let mut server = setup_server(None);
    let response = send(
        &mut server,
        r#"{"jsonrpc":"2.0","id":5,"method":"tools/call","params":{"name":"unknown_tool","arguments":{}}}"#,
    )
    .await;

    // Tool errors are successful responses with isError set
    assert!(response.get("error").is_none());
    assert_eq!(response["result"]["isError"], true);
    assert!(tool_text(&response).contains("unknown tool"));
}

#[tokio::test]
async fn test_tools_call_bad_arguments_is_error_result() {
    let mut server = setup_server(None);
    let response = send(
        &mut server,
        r#"{"jsonrpc":"2.0","id":6,"method":"tools/call","params":{"name":"filter_by_stock_availability","arguments":{"min_stock":"lots"}}}"#,
    )
    .await;

    assert_eq!(response["result"]["isError"], true);
    assert!(tool_text(&response).contains("min_stock"));
}

// ==========================================================================
// Sessions
// ==========================================================================

#[tokio::test]
async fn test_session_opened_by_initialize_audits_calls() {
    let store = Arc::new(InMemorySessionStore::new());
    let mut server = setup_server(Some(store.clone()));

    let init = send(&mut server, r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#).await;
    let session_id = init["result"]["sessionId"].as_str().unwrap().to_string();

    send(
        &mut server,
        r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"filter_by_stock_availability","arguments":{"min_stock":1}}}"#,
    )
    .await;

    let saved = store.get(&session_id).unwrap().unwrap();
    assert_eq!(saved["function"], "filter_by_stock_availability");
    assert_eq!(saved["arguments"], json!({"args": [], "kwargs": {"min_stock": 1}}));
    assert!(saved["result"].as_str().unwrap().contains("\"id\":3"));
}

#[tokio::test]
async fn test_calls_before_initialize_are_not_audited() {
    let store = Arc::new(InMemorySessionStore::new());
    let mut server = setup_server(Some(store.clone()));

    send(
        &mut server,
        r#"{"jsonrpc":"2.0","id":1,"method":"tools/call","params":{"name":"add_two_numbers","arguments":{"a":1,"b":2}}}"#,
    )
    .await;

    assert!(store.is_empty().unwrap());
}
