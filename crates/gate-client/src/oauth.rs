//! OAuth2 metadata discovery and client-credentials token requests

use std::time::Duration;

use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::Url;

use crate::config::Credentials;
use crate::{Error, Result};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Path of the authorization server metadata document (RFC 8414)
pub const WELL_KNOWN_PATH: &str = "/.well-known/oauth-authorization-server";

/// Authorization server metadata. Only the fields the client uses are typed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthServerMetadata {
    #[serde(default)]
    pub issuer: Option<String>,
    #[serde(default)]
    pub token_endpoint: Option<String>,
    #[serde(default)]
    pub scopes_supported: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Successful token endpoint response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct OAuthClient {
    http: Client,
}

impl OAuthClient {
    pub fn new() -> Result<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("gate-client/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http })
    }

    /// GET the metadata document at `url`
    pub async fn fetch_metadata(&self, url: &Url) -> Result<AuthServerMetadata> {
        tracing::debug!(url = %url, "Fetching OAuth metadata");
        let response = check_status(self.http.get(url.clone()).send().await?).await?;
        Ok(response.json().await?)
    }

    /// Run the client-credentials grant against `token_url`.
    ///
    /// Credentials go in an HTTP Basic header; the form body carries
    /// `grant_type=client_credentials` and, when set, `scope`.
    pub async fn request_token(&self, token_url: &Url, credentials: &Credentials) -> Result<TokenResponse> {
        let mut form = vec![("grant_type", "client_credentials")];
        if let Some(scope) = credentials.scope.as_deref() {
            form.push(("scope", scope));
        }

        tracing::debug!(url = %token_url, client_id = %credentials.client_id, "Requesting access token");
        let response = self
            .http
            .post(token_url.clone())
            .basic_auth(&credentials.client_id, Some(&credentials.client_secret))
            .form(&form)
            .send()
            .await?;
        let token: TokenResponse = check_status(response).await?.json().await?;
        tracing::info!(client_id = %credentials.client_id, expires_in = ?token.expires_in, "Obtained access token");
        Ok(token)
    }

    /// Token endpoint advertised by the metadata document at `metadata_url`
    pub async fn discover_token_endpoint(&self, metadata_url: &Url) -> Result<Url> {
        let metadata = self.fetch_metadata(metadata_url).await?;
        let endpoint = metadata.token_endpoint.ok_or_else(|| Error::MissingField {
            url: metadata_url.to_string(),
            field: "token_endpoint",
        })?;
        Ok(Url::parse(&endpoint)?)
    }
}

/// `{origin}/.well-known/oauth-authorization-server`
pub fn well_known_url(base: &Url) -> Result<Url> {
    Ok(base.join(WELL_KNOWN_PATH)?)
}

/// Turn a non-2xx response into [`Error::Status`], keeping the body text
pub(crate) async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let url = response.url().to_string();
    let body = response.text().await.unwrap_or_default();
    Err(Error::Status {
        status: status.as_u16(),
        url,
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_known_replaces_path() {
        let base = Url::parse("https://abc.execute-api.eu-central-1.amazonaws.com/api_wrapper/mcp").unwrap();
        assert_eq!(
            well_known_url(&base).unwrap().as_str(),
            "https://abc.execute-api.eu-central-1.amazonaws.com/.well-known/oauth-authorization-server"
        );
    }

    #[test]
    fn metadata_keeps_unknown_fields() {
        let metadata: AuthServerMetadata = serde_json::from_value(serde_json::json!({
            "issuer": "https://issuer.example",
            "token_endpoint": "https://issuer.example/oauth2/token",
            "grant_types_supported": ["client_credentials"]
        }))
        .unwrap();
        assert_eq!(metadata.token_endpoint.as_deref(), Some("https://issuer.example/oauth2/token"));
        assert!(metadata.scopes_supported.is_empty());
        assert!(metadata.extra.contains_key("grant_types_supported"));
    }
}
