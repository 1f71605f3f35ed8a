//! Local durable cache: editor state and store credentials between sessions.
//!
//! DESIGN
//! ======
//! The cache is a synchronous string-keyed store holding one UTF-8 JSON
//! document per key. It is the system of record for the grid between runs.
//!
//! ERROR HANDLING
//! ==============
//! `read_json` keeps "missing" (`Ok(None)`) and "unreadable"
//! (`Err(CacheError::Decode)`) apart so each caller picks its own recovery.
//! The editor-state accessors never propagate: a failed save is logged and
//! dropped, and a failed load falls back to the default grid. Losing a corrupt
//! cache never touches remote artifacts.

use std::fmt;
use std::fs;
use std::io;
use std::path::PathBuf;

use canvas::grid::Grid;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

pub const EDITOR_STATE_KEY: &str = "editor-state";
pub const CREDENTIALS_KEY: &str = "store-credentials";

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cache i/o failed: {0}")]
    Io(#[from] io::Error),
    #[error("cache encode failed: {0}")]
    Encode(String),
    #[error("cache decode failed for {key}: {message}")]
    Decode { key: String, message: String },
}

// =============================================================================
// KEY-VALUE STORES
// =============================================================================

/// Synchronous string-keyed storage.
pub trait KeyValueStore: Send {
    /// Read `key`, or `Ok(None)` when it has never been written.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing storage can't be read.
    fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Write `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing storage can't be written.
    fn set(&mut self, key: &str, value: &str) -> Result<(), CacheError>;
}

/// One `<key>.json` file per key inside a directory.
///
/// The directory is created on first write.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), CacheError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, value)?;
        fs::rename(&staging, &path)?;
        Ok(())
    }
}

// =============================================================================
// CREDENTIALS
// =============================================================================

/// Identifies and authenticates against the remote store namespace.
#[derive(Clone, PartialEq, Eq, Serialize, serde::Deserialize)]
pub struct Credentials {
    pub token: String,
    pub owner: String,
    pub repo: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
}

impl Credentials {
    /// Whether token, owner, and repo are all present.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        [&self.token, &self.owner, &self.repo].iter().all(|v| !v.trim().is_empty())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &"<redacted>")
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("branch", &self.branch)
            .finish()
    }
}

// =============================================================================
// LOCAL CACHE
// =============================================================================

/// Typed access to the two cache records.
pub struct LocalCache {
    store: Box<dyn KeyValueStore>,
}

impl LocalCache {
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Self { store: Box::new(store) }
    }

    /// Read and parse the JSON document under `key`.
    ///
    /// # Errors
    ///
    /// `Decode` when the stored text isn't a valid `T`; `Io` when the store
    /// can't be read.
    pub fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        let Some(raw) = self.store.get(key)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| CacheError::Decode { key: key.to_owned(), message: e.to_string() })
    }

    /// Serialize `value` and write it under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn write_json<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), CacheError> {
        let raw = serde_json::to_string(value).map_err(|e| CacheError::Encode(e.to_string()))?;
        self.store.set(key, &raw)
    }

    /// Persist the editor grid. Failures are logged, not returned.
    pub fn save_editor(&mut self, grid: &Grid) {
        match self.write_json(EDITOR_STATE_KEY, grid) {
            Ok(()) => debug!(width = grid.width(), height = grid.height(), "editor state saved"),
            Err(e) => warn!(error = %e, "failed to save editor state"),
        }
    }

    /// Restore the editor grid, or the default grid when nothing usable is stored.
    #[must_use]
    pub fn load_editor(&self) -> Grid {
        match self.read_json::<Grid>(EDITOR_STATE_KEY) {
            Ok(Some(grid)) => grid,
            Ok(None) => Grid::default(),
            Err(e) => {
                warn!(error = %e, "discarding unreadable editor state");
                Grid::default()
            }
        }
    }

    /// Persist store credentials. Failures are logged, not returned.
    pub fn save_credentials(&mut self, credentials: &Credentials) {
        if let Err(e) = self.write_json(CREDENTIALS_KEY, credentials) {
            warn!(error = %e, "failed to save store credentials");
        }
    }

    /// Stored credentials, if any parse.
    #[must_use]
    pub fn load_credentials(&self) -> Option<Credentials> {
        match self.read_json::<Credentials>(CREDENTIALS_KEY) {
            Ok(found) => found,
            Err(e) => {
                warn!(error = %e, "discarding unreadable store credentials");
                None
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod test_helpers {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use super::*;

    /// Process-local store; nothing survives the process.
    #[derive(Debug, Clone, Default)]
    pub struct MemoryStore {
        entries: HashMap<String, String>,
    }

    impl MemoryStore {
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl KeyValueStore for MemoryStore {
        fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
            Ok(self.entries.get(key).cloned())
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), CacheError> {
            self.entries.insert(key.to_owned(), value.to_owned());
            Ok(())
        }
    }

    /// Store whose contents and write count stay observable after it is
    /// moved into a `LocalCache`.
    #[derive(Clone, Default)]
    pub struct SharedStore {
        pub entries: Arc<Mutex<HashMap<String, String>>>,
        pub writes: Arc<AtomicUsize>,
    }

    impl SharedStore {
        pub fn write_count(&self) -> usize {
            self.writes.load(Ordering::SeqCst)
        }

        pub fn raw(&self, key: &str) -> Option<String> {
            self.entries.lock().unwrap().get(key).cloned()
        }

        pub fn put_raw(&self, key: &str, value: &str) {
            self.entries.lock().unwrap().insert(key.to_owned(), value.to_owned());
        }
    }

    impl KeyValueStore for SharedStore {
        fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
            Ok(self.raw(key))
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), CacheError> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.put_raw(key, value);
            Ok(())
        }
    }

    /// Store that fails every operation.
    pub struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
            Err(io::Error::other("disk gone").into())
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), CacheError> {
            Err(io::Error::other("disk gone").into())
        }
    }
}

#[cfg(test)]
#[path = "cache_test.rs"]
mod tests;
