//! Session store capability and the in-memory backend

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::session::Attributes;
use crate::{Error, Result};

/// Durable key-value store for session attribute mappings.
///
/// Any backend can implement this; the gateway only ever reads a whole
/// mapping and writes a whole mapping back. There is no compare-and-swap:
/// concurrent writers to one session id race and the last `put` wins.
/// Expiry and eviction are the backend's business.
pub trait SessionStore: Send + Sync {
    /// Fetch the attributes stored under `session_id`, if any
    fn get(&self, session_id: &str) -> Result<Option<Attributes>>;

    /// Replace the attributes stored under `session_id`
    fn put(&self, session_id: &str, attributes: &Attributes) -> Result<()>;
}

/// Process-local store, mostly for tests and single-process deployments
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: Mutex<HashMap<String, Attributes>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions; a poisoned map is an error, not empty
    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, Attributes>>> {
        self.sessions
            .lock()
            .map_err(|_| Error::backend("in-memory session map poisoned"))
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self, session_id: &str) -> Result<Option<Attributes>> {
        ensure_session_id(session_id)?;
        Ok(self.lock()?.get(session_id).cloned())
    }

    fn put(&self, session_id: &str, attributes: &Attributes) -> Result<()> {
        ensure_session_id(session_id)?;
        self.lock()?
            .insert(session_id.to_string(), attributes.clone());
        Ok(())
    }
}

/// Reject empty session ids; stores never key on ""
pub(crate) fn ensure_session_id(session_id: &str) -> Result<()> {
    if session_id.is_empty() {
        return Err(Error::InvalidSessionId {
            id: session_id.to_string(),
        });
    }
    Ok(())
}
