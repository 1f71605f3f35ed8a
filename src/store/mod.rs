//! Versioned content store: named UTF-8 blobs guarded by version tokens.
//!
//! DESIGN
//! ======
//! Every stored blob carries an opaque version token. Writes that update or
//! delete a blob must present the token of the revision they replace, and the
//! store rejects stale tokens with `Conflict`. Creates present no token.
//! Nothing here retries. A conflict goes back to the caller, who decides
//! whether to re-run the whole operation.
//!
//! `write_current` is the one read-then-write primitive: it discovers the
//! current token with `get` and immediately writes over that revision. A
//! writer that lands between the two calls makes the `put` fail with
//! `Conflict` rather than being silently overwritten.

pub mod github;
#[cfg(test)]
pub mod memory;

use std::fmt;

use async_trait::async_trait;
use tracing::debug;

use crate::error::ErrorCode;

// =============================================================================
// TYPES
// =============================================================================

/// Opaque revision identifier issued by the store (a git blob sha for GitHub).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionToken(pub String);

impl fmt::Display for VersionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A blob together with the revision it was read at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    pub content: String,
    pub version: VersionToken,
    /// Browsable location of the blob, when the store has one.
    pub url: Option<String>,
}

/// Outcome of a successful `put`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteReceipt {
    pub version: VersionToken,
    /// Browsable location of the written blob, when the store has one.
    pub url: Option<String>,
}

/// One file in a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Full store path, e.g. `pixel-art/pixel-art-1700000000000.json`.
    pub path: String,
    /// Final path segment.
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("version conflict on {0}")]
    Conflict(String),
    #[error("store request failed: {0}")]
    Transport(String),
    #[error("decode failed: {0}")]
    Decode(String),
}

impl ErrorCode for StoreError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "E_NOT_FOUND",
            Self::Conflict(_) => "E_CONFLICT",
            Self::Transport(_) => "E_TRANSPORT",
            Self::Decode(_) => "E_DECODE",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Conflict(_) | Self::Transport(_))
    }
}

// =============================================================================
// TRAIT
// =============================================================================

/// Remote store of path-addressed blobs with optimistic concurrency.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Read the blob at `path`.
    async fn get(&self, path: &str) -> Result<Blob, StoreError>;

    /// Write `content` at `path`.
    ///
    /// `version: None` creates; the store decides what happens if the path
    /// already exists. `Some(token)` replaces exactly that revision and fails
    /// with `Conflict` if the current revision differs. The receipt carries
    /// the new token.
    async fn put(
        &self,
        path: &str,
        content: &str,
        version: Option<&VersionToken>,
        message: &str,
    ) -> Result<WriteReceipt, StoreError>;

    /// Delete revision `version` of `path`; `Conflict` if it is no longer current.
    async fn delete(&self, path: &str, version: &VersionToken, message: &str) -> Result<(), StoreError>;

    /// Files directly inside `dir`. A directory that doesn't exist lists as empty.
    async fn list(&self, dir: &str) -> Result<Vec<Entry>, StoreError>;
}

// =============================================================================
// PRIMITIVES
// =============================================================================

/// `get` that maps `NotFound` to `None`.
///
/// # Errors
///
/// Propagates every other store error.
pub async fn read_optional(store: &dyn ContentStore, path: &str) -> Result<Option<Blob>, StoreError> {
    match store.get(path).await {
        Ok(blob) => Ok(Some(blob)),
        Err(StoreError::NotFound(_)) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Overwrite whatever revision of `path` is current, creating it if absent.
///
/// # Errors
///
/// `Conflict` if another writer replaced the blob between the read and the
/// write; otherwise any error from either call.
pub async fn write_current(
    store: &dyn ContentStore,
    path: &str,
    content: &str,
    message: &str,
) -> Result<WriteReceipt, StoreError> {
    let current = read_optional(store, path).await?.map(|blob| blob.version);
    debug!(path, version = ?current, "conditional write");
    store.put(path, content, current.as_ref(), message).await
}

/// Final `/`-separated segment of `path`.
#[must_use]
pub fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
