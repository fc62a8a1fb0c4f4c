use gate_catalog::{Error, HttpCatalog, ProductCatalog, filter_by_price_range};
use pretty_assertions::assert_eq;
use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn products_body() -> serde_json::Value {
    json!({
        "products": [
            {"id": 1, "title": "Essence Mascara", "price": 9.99, "stock": 99, "category": "beauty"},
            {"id": 2, "title": "Eyeshadow Palette", "price": 19.99, "stock": 34, "category": "beauty"},
            {"id": 3, "title": "Powder Canister", "price": 14.99, "stock": 0, "category": "beauty"}
        ],
        "total": 194,
        "skip": 0,
        "limit": 3
    })
}

async fn catalog_for(server: &MockServer) -> HttpCatalog {
    HttpCatalog::new(&Url::parse(&server.uri()).unwrap()).unwrap()
}

#[tokio::test]
async fn fetches_product_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(products_body()))
        .expect(1)
        .mount(&server)
        .await;

    let page = catalog_for(&server).await.fetch_all().await.unwrap();
    assert_eq!(page.products.len(), 3);
    assert_eq!(page.total, Some(194));
    assert_eq!(page.products[0].extra["category"], "beauty");

    let mid = filter_by_price_range(&page.products, 10.0, 15.0);
    assert_eq!(mid.len(), 1);
    assert_eq!(mid[0].id, 3);
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = catalog_for(&server).await.fetch_all().await.unwrap_err();
    match err {
        Error::Status { status, url } => {
            assert_eq!(status, 503);
            assert!(url.ends_with("/products"));
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = catalog_for(&server).await.fetch_all().await.unwrap_err();
    assert!(matches!(err, Error::Http(_)));
}
