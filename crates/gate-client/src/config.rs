//! Credential profiles
//!
//! Each profile names a client registered with the authorization server and
//! the scopes it asks for. Values come from the environment.

use clap::ValueEnum;

use crate::{Error, Result};

pub const CLIENT_ALL_ID: &str = "CLIENT_ALL_ID";
pub const CLIENT_ALL_SECRET: &str = "CLIENT_ALL_SECRET";
pub const ALL_SCOPES: &str = "ALL_SCOPES";
pub const CLIENT_FETCH_ALL_ID: &str = "CLIENT_FETCH_ALL_ID";
pub const CLIENT_FETCH_ALL_SECRET: &str = "CLIENT_FETCH_ALL_SECRET";
pub const FETCH_ALL_SCOPES: &str = "FETCH_ALL_SCOPES";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ClientProfile {
    /// Client allowed every tool
    #[default]
    All,
    /// Client limited to fetching the full product list
    #[value(alias = "fetch_all")]
    FetchAll,
}

impl ClientProfile {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::FetchAll => "fetch-all",
        }
    }

    /// `(id, secret, scopes)` variable names
    pub fn env_vars(self) -> (&'static str, &'static str, &'static str) {
        match self {
            Self::All => (CLIENT_ALL_ID, CLIENT_ALL_SECRET, ALL_SCOPES),
            Self::FetchAll => (CLIENT_FETCH_ALL_ID, CLIENT_FETCH_ALL_SECRET, FETCH_ALL_SCOPES),
        }
    }
}

/// Client-credentials grant inputs
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    /// Space-delimited scopes; omitted from the request when unset
    pub scope: Option<String>,
}

impl Credentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            scope: None,
        }
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    pub fn from_env(profile: ClientProfile) -> Result<Self> {
        Self::from_lookup(profile, |key| std::env::var(key).ok())
    }

    /// Read a profile through `lookup`; empty values count as unset
    pub fn from_lookup<F>(profile: ClientProfile, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let (id_var, secret_var, scope_var) = profile.env_vars();
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        match (get(id_var), get(secret_var)) {
            (Some(client_id), Some(client_secret)) => Ok(Self {
                client_id,
                client_secret,
                scope: get(scope_var),
            }),
            _ => Err(Error::MissingCredentials {
                profile: profile.as_str().to_string(),
                id_var,
                secret_var,
            }),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("scope", &self.scope)
            .finish()
    }
}
