//! Session store fixtures.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use gate_session::{Attributes, Error, FileSessionStore, Result, SessionStore};
use tempfile::TempDir;

/// Store whose writes always fail; reads succeed with no data.
///
/// Counts attempted writes so tests can assert "at most once, no retries".
#[derive(Debug, Default)]
pub struct FailingSessionStore {
    puts: AtomicUsize,
}

impl FailingSessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `put` calls seen so far
    pub fn put_attempts(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }
}

impl SessionStore for FailingSessionStore {
    fn get(&self, _session_id: &str) -> Result<Option<Attributes>> {
        Ok(None)
    }

    fn put(&self, _session_id: &str, _attributes: &Attributes) -> Result<()> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        Err(Error::backend("simulated write failure"))
    }
}

/// A temporary directory holding a [`FileSessionStore`].
pub struct TestSessionDir {
    temp_dir: TempDir,
    store: FileSessionStore,
}

impl Default for TestSessionDir {
    fn default() -> Self {
        Self::new()
    }
}

impl TestSessionDir {
    /// Create a fresh store in a new temporary directory.
    ///
    /// # Panics
    /// Panics if the temporary directory cannot be created.
    pub fn new() -> Self {
        let temp_dir = TempDir::new()
            .unwrap_or_else(|e| panic!("TestSessionDir: failed to create temp dir: {e}"));
        let store = FileSessionStore::open(temp_dir.path())
            .unwrap_or_else(|e| panic!("TestSessionDir: failed to open store: {e}"));
        Self { temp_dir, store }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn store(&self) -> FileSessionStore {
        self.store.clone()
    }

    /// Read a stored session back, panicking if it is absent.
    pub fn read(&self, session_id: &str) -> Attributes {
        self.store
            .get(session_id)
            .unwrap_or_else(|e| panic!("TestSessionDir::read({session_id}): {e}"))
            .unwrap_or_else(|| panic!("TestSessionDir::read({session_id}): no such session"))
    }

    /// Assert a record file exists for `session_id`.
    pub fn assert_session_exists(&self, session_id: &str) {
        let path = self.root().join(format!("{session_id}.json"));
        assert!(path.exists(), "expected session record at {}", path.display());
    }
}
