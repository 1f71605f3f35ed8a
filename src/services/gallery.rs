//! Artifact repository: the gallery and the display indirection record.
//!
//! DESIGN
//! ======
//! The repository holds no state of its own beyond the store handle and a
//! path stamp. Every artifact it returns is a possibly-stale copy annotated
//! with the version token it was read at.
//!
//! Creates go straight to `put` with no token. Paths carry a strictly
//! increasing millisecond stamp, so two exports from one repository never
//! collide and the store decides what a collision with another client means.
//! The display record is updated with `write_current`; deletes present the
//! artifact's last-known token. Nothing retries.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use canvas::grid::Grid;
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use super::artifact::{Artifact, DisplayRecord, format_timestamp};
use crate::config::StoreLayout;
use crate::store::{ContentStore, StoreError, VersionToken, read_optional, write_current};

#[derive(Clone)]
pub struct ArtifactRepository {
    store: Arc<dyn ContentStore>,
    layout: StoreLayout,
    last_stamp: Arc<AtomicI64>,
}

impl ArtifactRepository {
    #[must_use]
    pub fn new(store: Arc<dyn ContentStore>, layout: StoreLayout) -> Self {
        Self { store, layout, last_stamp: Arc::new(AtomicI64::new(0)) }
    }

    /// Millisecond stamp for the next artifact: wall clock, bumped past the previous stamp.
    fn next_stamp(&self) -> i64 {
        let now = i64::try_from(OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000).unwrap_or(i64::MAX);
        match self.last_stamp.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| Some(now.max(last + 1))) {
            Ok(previous) | Err(previous) => now.max(previous + 1),
        }
    }

    fn artifact_path(&self, stamp: i64) -> String {
        let name = format!("pixel-art-{stamp}.json");
        if self.layout.artifacts_dir.is_empty() { name } else { format!("{}/{name}", self.layout.artifacts_dir) }
    }

    // =========================================================================
    // ARTIFACTS
    // =========================================================================

    /// Store `grid` as a new artifact.
    ///
    /// # Errors
    ///
    /// Any store error from the `put`; `Conflict` if the path already exists.
    pub async fn create_artifact(&self, grid: &Grid) -> Result<Artifact, StoreError> {
        let stamp = self.next_stamp();
        let created_at = OffsetDateTime::from_unix_timestamp_nanos(i128::from(stamp) * 1_000_000)
            .map_err(|e| StoreError::Decode(format!("timestamp out of range: {e}")))?;
        let mut artifact = Artifact::from_grid(self.artifact_path(stamp), grid, created_at);
        let content = artifact.encode()?;
        let message = format!("Add pixel art: {}", format_timestamp(created_at)?);

        let receipt = self.store.put(&artifact.path, &content, None, &message).await?;
        info!(path = %artifact.path, width = artifact.width, height = artifact.height, "artifact created");
        artifact.version = Some(receipt.version);
        artifact.url = receipt.url;
        Ok(artifact)
    }

    /// Load one artifact.
    ///
    /// # Errors
    ///
    /// `NotFound` if absent, `Decode` if its content is malformed, or any
    /// transport error.
    pub async fn get_artifact(&self, path: &str) -> Result<Artifact, StoreError> {
        let blob = self.store.get(path).await?;
        let mut artifact = Artifact::decode(path, &blob.content, Some(blob.version))?;
        artifact.url = blob.url;
        Ok(artifact)
    }

    /// Every readable artifact, newest first.
    ///
    /// Entries that vanish or fail to decode between the listing and the read
    /// are skipped.
    ///
    /// # Errors
    ///
    /// Transport failures and conflicts abort the listing.
    pub async fn list_gallery(&self) -> Result<Vec<Artifact>, StoreError> {
        let entries = self.store.list(&self.layout.artifacts_dir).await?;
        let mut artifacts = Vec::with_capacity(entries.len());
        for entry in entries.iter().filter(|e| e.name.ends_with(".json")) {
            match self.get_artifact(&entry.path).await {
                Ok(artifact) => artifacts.push(artifact),
                Err(e @ (StoreError::Decode(_) | StoreError::NotFound(_))) => {
                    warn!(path = %entry.path, error = %e, "skipping gallery entry");
                }
                Err(e) => return Err(e),
            }
        }
        artifacts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        debug!(count = artifacts.len(), "gallery listed");
        Ok(artifacts)
    }

    /// Delete `artifact` at the revision it was read at.
    ///
    /// # Errors
    ///
    /// `Conflict` if the artifact changed or has no known token; `NotFound`
    /// if it's already gone.
    pub async fn delete_artifact(&self, artifact: &Artifact) -> Result<(), StoreError> {
        let version = artifact.version.as_ref().ok_or_else(|| StoreError::Conflict(artifact.path.clone()))?;
        let message = format!("Delete pixel art: {}", artifact.name);
        self.store.delete(&artifact.path, version, &message).await?;
        info!(path = %artifact.path, "artifact deleted");
        Ok(())
    }

    // =========================================================================
    // DISPLAY RECORD
    // =========================================================================

    /// Point the display record at `path`, creating the record if absent.
    ///
    /// # Errors
    ///
    /// `Conflict` if another writer updated the record between the read and
    /// the write.
    pub async fn set_active_display(&self, path: &str) -> Result<VersionToken, StoreError> {
        let record = DisplayRecord { image: path.to_owned() };
        let content = serde_json::to_string_pretty(&record).map_err(|e| StoreError::Decode(e.to_string()))?;
        let message = format!("Update display config to show: {path}");
        let receipt = write_current(self.store.as_ref(), &self.layout.display_path, &content, &message).await?;
        info!(image = path, "display updated");
        Ok(receipt.version)
    }

    /// The artifact the display record names, or `None` when no display is set.
    ///
    /// A missing record, an unreadable record, and a record naming a missing
    /// artifact all count as "no display set".
    ///
    /// # Errors
    ///
    /// Transport failures, and `Decode` when the named artifact is malformed.
    pub async fn get_active_display(&self) -> Result<Option<Artifact>, StoreError> {
        let Some(blob) = read_optional(self.store.as_ref(), &self.layout.display_path).await? else {
            return Ok(None);
        };
        let record = match serde_json::from_str::<DisplayRecord>(&blob.content) {
            Ok(record) => record,
            Err(e) => {
                warn!(path = %self.layout.display_path, error = %e, "ignoring unreadable display record");
                return Ok(None);
            }
        };
        match self.get_artifact(&record.image).await {
            Ok(artifact) => Ok(Some(artifact)),
            Err(StoreError::NotFound(_)) => {
                debug!(image = %record.image, "display record names a missing artifact");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Create an artifact from `grid` and make it the active display.
    ///
    /// # Errors
    ///
    /// Errors from either step. If the display update fails the new artifact
    /// still exists in the gallery.
    pub async fn export(&self, grid: &Grid) -> Result<Artifact, StoreError> {
        let artifact = self.create_artifact(grid).await?;
        self.set_active_display(&artifact.path).await?;
        Ok(artifact)
    }
}

#[cfg(test)]
#[path = "gallery_test.rs"]
mod tests;
