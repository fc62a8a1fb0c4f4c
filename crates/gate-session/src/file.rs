//! File-backed session store
//!
//! One JSON record per session under a directory. Writes go to a temp file
//! in the same directory and are renamed into place, so a reader never sees a
//! half-written record. Read-modify-write cycles are NOT serialised.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Utc;
use fs2::FileExt;
use serde::{Deserialize, Serialize};

use crate::session::Attributes;
use crate::store::{SessionStore, ensure_session_id};
use crate::{Error, Result};

/// Longest session id the file store accepts
pub const MAX_SESSION_ID_LEN: usize = 128;

/// On-disk record for one session
#[derive(Debug, Serialize, Deserialize)]
struct SessionRecord {
    session_id: String,
    /// Seconds since the epoch after which the record reads as absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    expires_at: Option<i64>,
    attributes: Attributes,
}

/// Session store keeping one JSON file per session
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    dir: PathBuf,
    ttl: Option<Duration>,
}

impl FileSessionStore {
    /// Open (creating if needed) a store rooted at `dir`
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| Error::io(&dir, e))?;
        tracing::debug!(dir = ?dir, "Opened file session store");
        Ok(Self { dir, ttl: None })
    }

    /// Expire records `ttl` after their last write (builder pattern)
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, session_id: &str) -> Result<PathBuf> {
        ensure_session_id(session_id)?;
        let valid = session_id.len() <= MAX_SESSION_ID_LEN
            && session_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(Error::InvalidSessionId {
                id: session_id.to_string(),
            });
        }
        Ok(self.dir.join(format!("{session_id}.json")))
    }

    fn expires_at(&self) -> Option<i64> {
        let ttl = i64::try_from(self.ttl?.as_secs()).unwrap_or(i64::MAX);
        Some(Utc::now().timestamp().saturating_add(ttl))
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, session_id: &str) -> Result<Option<Attributes>> {
        let path = self.record_path(session_id)?;
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Error::io(&path, e)),
        };
        let record: SessionRecord = serde_json::from_str(&content)?;

        if let Some(expires_at) = record.expires_at {
            if expires_at <= Utc::now().timestamp() {
                tracing::debug!(session_id, expires_at, "Session record expired");
                return Ok(None);
            }
        }

        Ok(Some(record.attributes))
    }

    fn put(&self, session_id: &str, attributes: &Attributes) -> Result<()> {
        let path = self.record_path(session_id)?;
        let record = SessionRecord {
            session_id: session_id.to_string(),
            expires_at: self.expires_at(),
            attributes: attributes.clone(),
        };
        let content = serde_json::to_vec_pretty(&record)?;
        write_atomic(&path, &content)?;
        tracing::debug!(session_id, path = ?path, "Persisted session");
        Ok(())
    }
}

/// Write `content` to `path` via a unique temp file renamed into place
///
/// Every write gets its own temp file, so concurrent writers never share one.
/// The temp file is removed when any step before the rename fails.
fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let prefix = format!(
        ".{}.",
        path.file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default()
    );

    let mut temp_file = tempfile::Builder::new()
        .prefix(&prefix)
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|e| Error::io(dir, e))?;
    let temp_path = temp_file.path().to_path_buf();

    temp_file.as_file().lock_exclusive().map_err(|_| Error::LockFailed {
        path: path.to_path_buf(),
    })?;
    temp_file
        .write_all(content)
        .map_err(|e| Error::io(&temp_path, e))?;
    temp_file
        .as_file()
        .sync_all()
        .map_err(|e| Error::io(&temp_path, e))?;
    temp_file.as_file().unlock().map_err(|_| Error::LockFailed {
        path: path.to_path_buf(),
    })?;

    // On failure the returned NamedTempFile is dropped, which deletes it
    temp_file.persist(path).map_err(|e| Error::io(path, e.error))?;
    Ok(())
}
