//! Error types for gate-catalog

/// Result type for catalog operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while fetching products
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Transport or body decoding failure
    #[error("Catalog request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The catalog answered with a non-success status
    #[error("Catalog returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    /// The configured base URL cannot carry a path
    #[error("Invalid catalog URL: {url}")]
    InvalidUrl { url: String },
}
