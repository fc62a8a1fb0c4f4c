//! Builtin tool registrations, grouped into server profiles

use std::sync::Arc;

use clap::ValueEnum;
use gate_catalog::ProductCatalog;
use serde::{Deserialize, Serialize};

use super::store::ToolRegistry;
use super::types::{ParamKind, ParamSpec, ToolDescriptor};
use crate::Result;
use crate::handlers::{AddTwoNumbers, FetchAllProducts, FilterByPriceRange, FilterByStockAvailability};

/// Which builtin tools a server exposes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ServerProfile {
    /// `add_two_numbers` only
    Math,
    /// The three product catalog tools
    Catalog,
    #[default]
    All,
}

impl ServerProfile {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Math => "math",
            Self::Catalog => "catalog",
            Self::All => "all",
        }
    }

    fn includes_math(self) -> bool {
        matches!(self, Self::Math | Self::All)
    }

    fn includes_catalog(self) -> bool {
        matches!(self, Self::Catalog | Self::All)
    }
}

impl std::str::FromStr for ServerProfile {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        <Self as ValueEnum>::from_str(s, true)
    }
}

impl std::fmt::Display for ServerProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Descriptors for every builtin in `profile`
pub fn builtin_descriptors(
    profile: ServerProfile,
    catalog: Arc<dyn ProductCatalog>,
) -> Vec<ToolDescriptor> {
    let mut tools = Vec::new();

    if profile.includes_math() {
        tools.push(
            ToolDescriptor::new("add_two_numbers", "Add two integers", Arc::new(AddTwoNumbers))
                .param(ParamSpec::required("a", ParamKind::Integer, "First addend"))
                .param(ParamSpec::required("b", ParamKind::Integer, "Second addend")),
        );
    }

    if profile.includes_catalog() {
        tools.push(ToolDescriptor::new(
            "fetch_all_products",
            "Fetch every product from the catalog",
            Arc::new(FetchAllProducts::new(Arc::clone(&catalog))),
        ));
        tools.push(
            ToolDescriptor::new(
                "filter_by_price_range",
                "Products priced between min_price and max_price, inclusive",
                Arc::new(FilterByPriceRange::new(Arc::clone(&catalog))),
            )
            .param(ParamSpec::required("min_price", ParamKind::Number, "Lowest price"))
            .param(ParamSpec::required("max_price", ParamKind::Number, "Highest price")),
        );
        tools.push(
            ToolDescriptor::new(
                "filter_by_stock_availability",
                "Products with at least min_stock units in stock",
                Arc::new(FilterByStockAvailability::new(catalog)),
            )
            .param(ParamSpec::required("min_stock", ParamKind::Integer, "Minimum units in stock")),
        );
    }

    tools
}

impl ToolRegistry {
    /// Create a registry pre-populated with the builtins of `profile`.
    pub fn with_builtins(profile: ServerProfile, catalog: Arc<dyn ProductCatalog>) -> Result<Self> {
        let mut registry = Self::new();
        for descriptor in builtin_descriptors(profile, catalog) {
            registry.register(descriptor)?;
        }
        tracing::debug!(profile = %profile, tools = registry.len(), "Loaded builtin tools");
        Ok(registry)
    }
}
