//! Product catalog fetch contract and its implementations

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::product::ProductPage;
use crate::{Error, Result};

/// Public demo catalog the tools talk to unless configured otherwise
pub const DEFAULT_CATALOG_URL: &str = "https://dummyjson.com";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Something that can list every product
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    async fn fetch_all(&self) -> Result<ProductPage>;
}

/// Catalog served over HTTP at `{base_url}/products`
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    client: Client,
    products_url: Url,
}

impl HttpCatalog {
    pub fn new(base_url: &Url) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("toolgate/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            products_url: products_url(base_url)?,
        })
    }

    pub fn products_url(&self) -> &Url {
        &self.products_url
    }
}

#[async_trait]
impl ProductCatalog for HttpCatalog {
    async fn fetch_all(&self) -> Result<ProductPage> {
        tracing::debug!(url = %self.products_url, "Fetching products");
        let response = self.client.get(self.products_url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                url: self.products_url.to_string(),
            });
        }

        let page: ProductPage = response.json().await?;
        tracing::debug!(count = page.products.len(), "Fetched products");
        Ok(page)
    }
}

/// Catalog backed by a fixed page, for offline use and tests
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    page: ProductPage,
}

impl StaticCatalog {
    pub fn new(page: ProductPage) -> Self {
        Self { page }
    }
}

#[async_trait]
impl ProductCatalog for StaticCatalog {
    async fn fetch_all(&self) -> Result<ProductPage> {
        Ok(self.page.clone())
    }
}

/// Append the `products` segment, keeping any path prefix on the base URL
fn products_url(base_url: &Url) -> Result<Url> {
    let mut url = base_url.clone();
    url.path_segments_mut()
        .map_err(|_| Error::InvalidUrl {
            url: base_url.to_string(),
        })?
        .pop_if_empty()
        .push("products");
    Ok(url)
}
