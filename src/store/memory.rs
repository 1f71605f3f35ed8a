//! In-memory versioned store for tests.
//!
//! Tokens are `rev-<n>` from a store-wide counter, so every write produces a
//! fresh token even when the content is unchanged. Every trait call is
//! recorded. Tests can seed blobs and schedule an external write that lands
//! right after the next `get` of a path, opening the read-then-write window on
//! demand.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{Blob, ContentStore, Entry, StoreError, VersionToken, WriteReceipt, file_name};

/// One recorded trait call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Get(String),
    Put { path: String, version: Option<String> },
    Delete { path: String, version: String },
    List(String),
}

#[derive(Default)]
struct Inner {
    files: BTreeMap<String, Blob>,
    revision: u64,
    calls: Vec<Call>,
    after_get: HashMap<String, String>,
    offline: bool,
}

impl Inner {
    fn next_token(&mut self) -> VersionToken {
        self.revision += 1;
        VersionToken(format!("rev-{}", self.revision))
    }

    fn write(&mut self, path: &str, content: &str) -> VersionToken {
        let version = self.next_token();
        let blob = Blob { content: content.to_owned(), version: version.clone(), url: Some(format!("memory://{path}")) };
        self.files.insert(path.to_owned(), blob);
        version
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.offline { Err(StoreError::Transport("store offline".into())) } else { Ok(()) }
    }
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write directly, as another client would. Not recorded.
    pub fn seed(&self, path: &str, content: &str) -> VersionToken {
        self.inner.lock().unwrap().write(path, content)
    }

    /// Remove directly, as another client would. Not recorded.
    pub fn remove(&self, path: &str) {
        self.inner.lock().unwrap().files.remove(path);
    }

    /// After the next recorded `get` of `path` returns, write `content` there externally.
    pub fn write_after_next_get(&self, path: &str, content: &str) {
        self.inner.lock().unwrap().after_get.insert(path.to_owned(), content.to_owned());
    }

    /// Fail every subsequent call with `Transport`.
    pub fn set_offline(&self, offline: bool) {
        self.inner.lock().unwrap().offline = offline;
    }

    pub fn content(&self, path: &str) -> Option<String> {
        self.inner.lock().unwrap().files.get(path).map(|b| b.content.clone())
    }

    pub fn version(&self, path: &str) -> Option<VersionToken> {
        self.inner.lock().unwrap().files.get(path).map(|b| b.version.clone())
    }

    pub fn paths(&self) -> Vec<String> {
        self.inner.lock().unwrap().files.keys().cloned().collect()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.inner.lock().unwrap().calls.clear();
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn get(&self, path: &str) -> Result<Blob, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::Get(path.to_owned()));
        inner.check_online()?;
        let found = inner.files.get(path).cloned();
        if let Some(content) = inner.after_get.remove(path) {
            inner.write(path, &content);
        }
        found.ok_or_else(|| StoreError::NotFound(path.to_owned()))
    }

    async fn put(
        &self,
        path: &str,
        content: &str,
        version: Option<&VersionToken>,
        _message: &str,
    ) -> Result<WriteReceipt, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::Put { path: path.to_owned(), version: version.map(|v| v.0.clone()) });
        inner.check_online()?;
        let current = inner.files.get(path).map(|b| b.version.clone());
        if current.as_ref() != version {
            return Err(StoreError::Conflict(path.to_owned()));
        }
        let version = inner.write(path, content);
        Ok(WriteReceipt { version, url: Some(format!("memory://{path}")) })
    }

    async fn delete(&self, path: &str, version: &VersionToken, _message: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::Delete { path: path.to_owned(), version: version.0.clone() });
        inner.check_online()?;
        match inner.files.get(path) {
            None => Err(StoreError::NotFound(path.to_owned())),
            Some(blob) if &blob.version != version => Err(StoreError::Conflict(path.to_owned())),
            Some(_) => {
                inner.files.remove(path);
                Ok(())
            }
        }
    }

    async fn list(&self, dir: &str) -> Result<Vec<Entry>, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::List(dir.to_owned()));
        inner.check_online()?;
        let prefix = format!("{}/", dir.trim_end_matches('/'));
        Ok(inner
            .files
            .keys()
            .filter(|p| p.strip_prefix(&prefix).is_some_and(|rest| !rest.contains('/')))
            .map(|p| Entry { path: p.clone(), name: file_name(p).to_owned() })
            .collect())
    }
}
