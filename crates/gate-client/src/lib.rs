//! Client side of toolgate
//!
//! Obtains an access token with the OAuth2 client-credentials grant and
//! calls the gateway's tool endpoint with it.

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod oauth;

pub use api::ToolApiClient;
pub use config::{ClientProfile, Credentials};
pub use error::{Error, Result};
pub use oauth::{AuthServerMetadata, OAuthClient, TokenResponse, well_known_url};
