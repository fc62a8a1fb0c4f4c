//! Product records and the filters the tools apply to them

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One catalog entry. Fields the tools do not inspect are kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    pub price: f64,
    pub stock: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A page of products as returned by `GET /products`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductPage {
    pub products: Vec<Product>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
}

impl ProductPage {
    pub fn new(products: Vec<Product>) -> Self {
        let total = products.len() as u64;
        Self {
            products,
            total: Some(total),
            skip: Some(0),
            limit: Some(total),
        }
    }
}

/// Products whose price lies in `[min_price, max_price]`
pub fn filter_by_price_range(products: &[Product], min_price: f64, max_price: f64) -> Vec<Product> {
    products
        .iter()
        .filter(|p| min_price <= p.price && p.price <= max_price)
        .cloned()
        .collect()
}

/// Products with at least `min_stock` units in stock
pub fn filter_by_stock(products: &[Product], min_stock: i64) -> Vec<Product> {
    products
        .iter()
        .filter(|p| p.stock >= min_stock)
        .cloned()
        .collect()
}
