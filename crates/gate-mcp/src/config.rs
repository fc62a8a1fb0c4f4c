//! Gateway configuration
//!
//! An optional TOML file, overridden field by field by environment
//! variables. Environment access goes through a lookup function so the
//! layering can be exercised without touching the process environment.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use gate_auth::{Authorizer, DEFAULT_PRINCIPAL};
use gate_catalog::{DEFAULT_CATALOG_URL, HttpCatalog, ProductCatalog};
use gate_session::{FileSessionStore, InMemorySessionStore, SessionStore};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::dispatcher::ToolDispatcher;
use crate::gateway::Gateway;
use crate::registry::{ServerProfile, ToolRegistry};
use crate::{Error, Result};

pub const TOKEN_ENV: &str = "DUMMY_BEARER_TOKEN";
pub const PRINCIPAL_ENV: &str = "TOOLGATE_PRINCIPAL_ID";
pub const SESSION_TABLE_ENV: &str = "SESSION_TABLE_NAME";
pub const SESSION_DIR_ENV: &str = "TOOLGATE_SESSION_DIR";
pub const SESSION_TTL_ENV: &str = "TOOLGATE_SESSION_TTL_SECS";
pub const CATALOG_URL_ENV: &str = "TOOLGATE_CATALOG_URL";
pub const PROFILE_ENV: &str = "TOOLGATE_PROFILE";

pub const DEFAULT_SESSION_TABLE: &str = "sessions";
pub const DEFAULT_SESSION_TTL_SECS: u64 = 3600;

fn default_principal() -> String {
    DEFAULT_PRINCIPAL.to_string()
}

fn default_table() -> String {
    DEFAULT_SESSION_TABLE.to_string()
}

fn default_ttl() -> u64 {
    DEFAULT_SESSION_TTL_SECS
}

fn default_catalog_url() -> String {
    DEFAULT_CATALOG_URL.to_string()
}

/// `[auth]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSection {
    /// Expected bearer secret
    #[serde(default)]
    pub token: Option<String>,
    /// Principal reported on Allow
    #[serde(default = "default_principal")]
    pub principal: String,
}

impl Default for AuthSection {
    fn default() -> Self {
        Self {
            token: None,
            principal: default_principal(),
        }
    }
}

/// `[session]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSection {
    /// Namespace the sessions live in
    #[serde(default = "default_table")]
    pub table: String,
    /// Root for file-backed tables; sessions stay in memory when unset
    #[serde(default)]
    pub dir: Option<PathBuf>,
    /// Seconds a record lives after its last write; 0 disables expiry
    #[serde(default = "default_ttl")]
    pub ttl_secs: u64,
}

impl Default for SessionSection {
    fn default() -> Self {
        Self {
            table: default_table(),
            dir: None,
            ttl_secs: default_ttl(),
        }
    }
}

/// `[catalog]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSection {
    #[serde(default = "default_catalog_url")]
    pub url: String,
}

impl Default for CatalogSection {
    fn default() -> Self {
        Self {
            url: default_catalog_url(),
        }
    }
}

/// `[server]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSection {
    #[serde(default)]
    pub profile: ServerProfile,
}

/// Resolved gateway configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default)]
    pub auth: AuthSection,
    #[serde(default)]
    pub session: SessionSection,
    #[serde(default)]
    pub catalog: CatalogSection,
    #[serde(default)]
    pub server: ServerSection,
}

impl GatewayConfig {
    /// Parse TOML content
    pub fn parse(content: &str) -> Result<Self> {
        let config: GatewayConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Read the optional config file, then apply the process environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with(path, |key| std::env::var(key).ok())
    }

    /// Like [`GatewayConfig::load`] with an explicit environment lookup
    pub fn load_with<F>(path: Option<&Path>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match path {
            Some(path) => {
                tracing::debug!(path = ?path, "Loading config file");
                Self::parse(&std::fs::read_to_string(path)?)?
            }
            None => Self::default(),
        };
        config.apply_env(lookup)?;
        Ok(config)
    }

    /// Override fields from environment variables that are set
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup(TOKEN_ENV) {
            self.auth.token = Some(token);
        }
        if let Some(principal) = lookup(PRINCIPAL_ENV) {
            self.auth.principal = principal;
        }
        if let Some(table) = lookup(SESSION_TABLE_ENV) {
            self.session.table = table;
        }
        if let Some(dir) = lookup(SESSION_DIR_ENV) {
            self.session.dir = Some(PathBuf::from(dir));
        }
        if let Some(ttl) = lookup(SESSION_TTL_ENV) {
            self.session.ttl_secs = ttl.trim().parse().map_err(|_| {
                Error::config(format!("{SESSION_TTL_ENV} must be a whole number of seconds, got '{ttl}'"))
            })?;
        }
        if let Some(url) = lookup(CATALOG_URL_ENV) {
            self.catalog.url = url;
        }
        if let Some(profile) = lookup(PROFILE_ENV) {
            self.server.profile = profile
                .parse()
                .map_err(|_| Error::config(format!("unknown {PROFILE_ENV} '{profile}'")))?;
        }
        Ok(())
    }

    /// The expected bearer secret; must be set and non-empty
    pub fn expected_token(&self) -> Result<&str> {
        match self.auth.token.as_deref() {
            Some(token) if !token.is_empty() => Ok(token),
            _ => Err(Error::config(format!("{TOKEN_ENV} is not set"))),
        }
    }

    pub fn authorizer(&self) -> Result<Authorizer> {
        Ok(Authorizer::new(self.expected_token()?).with_principal(&self.auth.principal))
    }

    /// File store under `<dir>/<table>` when a directory is configured,
    /// otherwise a process-local map
    pub fn session_store(&self) -> Result<Arc<dyn SessionStore>> {
        if self.session.table.is_empty() {
            return Err(Error::config(format!("{SESSION_TABLE_ENV} must not be empty")));
        }
        match &self.session.dir {
            Some(dir) => {
                let mut store = FileSessionStore::open(dir.join(&self.session.table))?;
                if self.session.ttl_secs > 0 {
                    store = store.with_ttl(Duration::from_secs(self.session.ttl_secs));
                }
                Ok(Arc::new(store))
            }
            None => Ok(Arc::new(InMemorySessionStore::new())),
        }
    }

    pub fn catalog(&self) -> Result<Arc<dyn ProductCatalog>> {
        let url = Url::parse(&self.catalog.url)
            .map_err(|e| Error::config(format!("invalid catalog url '{}': {e}", self.catalog.url)))?;
        Ok(Arc::new(HttpCatalog::new(&url)?))
    }

    pub fn registry(&self) -> Result<ToolRegistry> {
        ToolRegistry::with_builtins(self.server.profile, self.catalog()?)
    }

    /// Registry plus session store
    pub fn dispatcher(&self) -> Result<ToolDispatcher> {
        Ok(ToolDispatcher::new(Arc::new(self.registry()?)).with_session_store(self.session_store()?))
    }

    pub fn gateway(&self) -> Result<Gateway> {
        Ok(Gateway::new(self.authorizer()?, self.dispatcher()?))
    }
}
