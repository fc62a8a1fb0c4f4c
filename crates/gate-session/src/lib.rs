//! Session storage for toolgate
//!
//! Sessions are plain attribute mappings keyed by a session id. The gateway
//! uses them only to audit tool invocations (which function ran, with which
//! arguments, and what it returned).
//!
//! Persistence is a capability trait, [`SessionStore`], so any key-value
//! backend can sit behind it. Two backends ship with the crate:
//!
//! - [`InMemorySessionStore`]: process-local map
//! - [`FileSessionStore`]: one JSON file per session, atomic writes, optional TTL

pub mod error;
pub mod file;
pub mod session;
pub mod store;

pub use error::{Error, Result};
pub use file::FileSessionStore;
pub use session::{Attributes, Session, SessionContext, new_session_id};
pub use store::{InMemorySessionStore, SessionStore};
