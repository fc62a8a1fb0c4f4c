//! Product catalog access for toolgate
//!
//! A deliberately thin fetch contract: [`ProductCatalog::fetch_all`] returns
//! one [`ProductPage`], and the price/stock filters run locally on it.

pub mod client;
pub mod error;
pub mod product;

pub use client::{DEFAULT_CATALOG_URL, HttpCatalog, ProductCatalog, StaticCatalog};
pub use error::{Error, Result};
pub use product::{Product, ProductPage, filter_by_price_range, filter_by_stock};
