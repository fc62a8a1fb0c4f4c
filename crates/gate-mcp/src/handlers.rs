//! Builtin tool handlers
//!
//! Arithmetic plus three product catalog queries. Handlers only compute;
//! session auditing is applied by the registry when they are registered.

use std::sync::Arc;

use async_trait::async_trait;
use gate_catalog::{ProductCatalog, filter_by_price_range, filter_by_stock};
use serde_json::Value;

use crate::audit::InvocationContext;
use crate::registry::{ToolArguments, ToolHandler};
use crate::{Error, Result};

/// `add_two_numbers(a, b)`
#[derive(Debug, Default)]
pub struct AddTwoNumbers;

#[async_trait]
impl ToolHandler for AddTwoNumbers {
    async fn call(&self, _ctx: &InvocationContext, args: &ToolArguments) -> Result<Value> {
        let a = args.i64("a")?;
        let b = args.i64("b")?;
        a.checked_add(b)
            .map(Value::from)
            .ok_or_else(|| Error::tool(format!("{a} + {b} overflows a 64-bit integer")))
    }
}

/// `fetch_all_products()`: the catalog's full product page
pub struct FetchAllProducts {
    catalog: Arc<dyn ProductCatalog>,
}

impl FetchAllProducts {
    pub fn new(catalog: Arc<dyn ProductCatalog>) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl ToolHandler for FetchAllProducts {
    async fn call(&self, _ctx: &InvocationContext, _args: &ToolArguments) -> Result<Value> {
        let page = self.catalog.fetch_all().await?;
        Ok(serde_json::to_value(page)?)
    }
}

/// `filter_by_price_range(min_price, max_price)`, bounds inclusive
pub struct FilterByPriceRange {
    catalog: Arc<dyn ProductCatalog>,
}

impl FilterByPriceRange {
    pub fn new(catalog: Arc<dyn ProductCatalog>) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl ToolHandler for FilterByPriceRange {
    async fn call(&self, _ctx: &InvocationContext, args: &ToolArguments) -> Result<Value> {
        let min_price = args.f64("min_price")?;
        let max_price = args.f64("max_price")?;
        let page = self.catalog.fetch_all().await?;
        let matched = filter_by_price_range(&page.products, min_price, max_price);
        tracing::debug!(min_price, max_price, matched = matched.len(), "Filtered by price");
        Ok(serde_json::to_value(matched)?)
    }
}

/// `filter_by_stock_availability(min_stock)`
pub struct FilterByStockAvailability {
    catalog: Arc<dyn ProductCatalog>,
}

impl FilterByStockAvailability {
    pub fn new(catalog: Arc<dyn ProductCatalog>) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl ToolHandler for FilterByStockAvailability {
    async fn call(&self, _ctx: &InvocationContext, args: &ToolArguments) -> Result<Value> {
        let min_stock = args.i64("min_stock")?;
        let page = self.catalog.fetch_all().await?;
        let matched = filter_by_stock(&page.products, min_stock);
        tracing::debug!(min_stock, matched = matched.len(), "Filtered by stock");
        Ok(serde_json::to_value(matched)?)
    }
}
