//! Session record and per-request session context

use std::sync::Arc;

use serde_json::{Map, Value};
use uuid::Uuid;

use crate::Result;
use crate::store::SessionStore;

/// Attribute mapping held by a session
pub type Attributes = Map<String, Value>;

/// Generate a fresh session identifier
pub fn new_session_id() -> String {
    Uuid::new_v4().to_string()
}

/// Working copy of one session's attributes
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    id: String,
    attributes: Attributes,
}

impl Session {
    /// Create an empty session
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            attributes: Attributes::new(),
        }
    }

    /// Rehydrate a session from stored attributes
    pub fn from_attributes(id: impl Into<String>, attributes: Attributes) -> Self {
        Self {
            id: id.into(),
            attributes,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Set an attribute, replacing any previous value
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.attributes.insert(name.into(), value.into());
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.attributes.remove(name)
    }

    /// The full attribute mapping, as persisted
    pub fn raw(&self) -> &Attributes {
        &self.attributes
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

/// The active session of one request: an id plus the store that owns it
///
/// Resolution is lazy. [`SessionContext::load`] returns the stored record, or
/// a fresh empty session when the store has none; nothing is written until
/// [`SessionContext::save`].
#[derive(Clone)]
pub struct SessionContext {
    store: Arc<dyn SessionStore>,
    session_id: String,
}

impl SessionContext {
    pub fn new(store: Arc<dyn SessionStore>, session_id: impl Into<String>) -> Self {
        Self {
            store,
            session_id: session_id.into(),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Load the session, creating an empty working copy if the store has none
    pub fn load(&self) -> Result<Session> {
        match self.store.get(&self.session_id)? {
            Some(attributes) => Ok(Session::from_attributes(&self.session_id, attributes)),
            None => {
                tracing::debug!(session_id = %self.session_id, "Creating new session");
                Ok(Session::new(&self.session_id))
            }
        }
    }

    /// Persist the session's full attribute mapping
    pub fn save(&self, session: &Session) -> Result<()> {
        self.store.put(session.id(), session.raw())
    }
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("session_id", &self.session_id)
            .finish_non_exhaustive()
    }
}
