//! Editor controller: owns the grid and sequences cache and store calls.
//!
//! DESIGN
//! ======
//! The editor is the single owner of the engine (grid, paint session, surface
//! bounds). Pointer events go through [`StrokeInput`]; every
//! `PersistRequested` the engine emits becomes exactly one cache write.
//! Explicit grid operations (resize, clear, load, color change) persist
//! immediately.
//!
//! Remote operations borrow a repository that exists only once credentials
//! are configured. `export_job` snapshots the grid into a detached
//! [`ExportJob`], so a host can run the export on its runtime and keep
//! feeding pointer events to the editor while the request is in flight.

use std::sync::Arc;

use canvas::color::Color;
use canvas::engine::{Action, EngineCore};
use canvas::grid::{Grid, GridError};
use canvas::input::{Buttons, StrokeInput};
use canvas::mapper::{Point, Rect};
use tracing::{info, warn};

use super::artifact::Artifact;
use super::gallery::ArtifactRepository;
use crate::cache::{Credentials, LocalCache};
use crate::config::StoreSettings;
use crate::error::ErrorCode;
use crate::store::StoreError;
use crate::store::github::GitHubStore;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error("remote store is not configured")]
    NotConfigured,
    #[error("credentials need a token, owner, and repository")]
    IncompleteCredentials,
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ErrorCode for EditorError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotConfigured => "E_NOT_CONFIGURED",
            Self::IncompleteCredentials => "E_CREDENTIALS",
            Self::Grid(_) => "E_GRID",
            Self::Store(e) => e.error_code(),
        }
    }

    fn retryable(&self) -> bool {
        match self {
            Self::Store(e) => e.retryable(),
            _ => false,
        }
    }
}

/// An export detached from the editor: a grid snapshot plus the repository.
pub struct ExportJob {
    repository: ArtifactRepository,
    snapshot: Grid,
}

impl ExportJob {
    #[must_use]
    pub fn snapshot(&self) -> &Grid {
        &self.snapshot
    }

    /// Create the artifact and make it the active display.
    ///
    /// # Errors
    ///
    /// Store errors from either step.
    pub async fn run(self) -> Result<Artifact, EditorError> {
        Ok(self.repository.export(&self.snapshot).await?)
    }
}

pub struct Editor {
    engine: EngineCore,
    cache: LocalCache,
    settings: StoreSettings,
    repository: Option<ArtifactRepository>,
    gallery: Vec<Artifact>,
}

fn connect(credentials: &Credentials, settings: &StoreSettings) -> Result<ArtifactRepository, EditorError> {
    if !credentials.is_complete() {
        return Err(EditorError::IncompleteCredentials);
    }
    let store = GitHubStore::new(credentials, settings)?;
    Ok(ArtifactRepository::new(Arc::new(store), settings.layout.clone()))
}

impl Editor {
    /// Restore the grid and credentials from `cache`.
    ///
    /// Missing or unusable credentials leave the editor unconfigured.
    #[must_use]
    pub fn open(cache: LocalCache, settings: StoreSettings) -> Self {
        let engine = EngineCore::new(cache.load_editor());
        let repository = cache.load_credentials().and_then(|credentials| match connect(&credentials, &settings) {
            Ok(repository) => Some(repository),
            Err(e) => {
                warn!(error = %e, "stored credentials unusable");
                None
            }
        });
        Self { engine, cache, settings, repository, gallery: Vec::new() }
    }

    /// Use `repository` for remote operations instead of the configured store.
    #[must_use]
    pub fn with_repository(mut self, repository: ArtifactRepository) -> Self {
        self.repository = Some(repository);
        self
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.engine.grid
    }

    /// Gallery as of the last refresh, newest first.
    #[must_use]
    pub fn gallery(&self) -> &[Artifact] {
        &self.gallery
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.repository.is_some()
    }

    #[must_use]
    pub fn is_stroke_active(&self) -> bool {
        self.engine.session.is_stroke_active()
    }

    fn repository(&self) -> Result<&ArtifactRepository, EditorError> {
        self.repository.as_ref().ok_or(EditorError::NotConfigured)
    }

    fn persist(&mut self) {
        self.cache.save_editor(&self.engine.grid);
    }

    // =========================================================================
    // LOCAL OPERATIONS
    // =========================================================================

    pub fn set_surface_bounds(&mut self, bounds: Rect) {
        self.engine.set_bounds(bounds);
    }

    pub fn select_color(&mut self, color: Color) {
        self.engine.select_color(color);
        self.persist();
    }

    /// Reallocate the grid at `width` x `height`, filled with the default color.
    ///
    /// # Errors
    ///
    /// `Grid` for out-of-range dimensions; nothing is changed or persisted.
    pub fn resize_grid(&mut self, width: usize, height: usize) -> Result<(), EditorError> {
        self.engine.resize(width, height)?;
        self.persist();
        Ok(())
    }

    pub fn clear(&mut self) {
        self.engine.clear();
        self.persist();
    }

    /// Replace the grid with `artifact`'s snapshot.
    ///
    /// # Errors
    ///
    /// `Grid` if the artifact's cells don't fit its dimensions.
    pub fn load_artifact_into_editor(&mut self, artifact: &Artifact) -> Result<(), EditorError> {
        self.engine.grid.replace_from(artifact.width, artifact.height, artifact.cells.clone())?;
        self.persist();
        info!(path = %artifact.path, "artifact loaded into editor");
        Ok(())
    }

    /// Save `credentials` and point remote operations at their namespace.
    ///
    /// # Errors
    ///
    /// `IncompleteCredentials` if a field is blank; `Store` if the client
    /// can't be built. Nothing is saved on error.
    pub fn configure_store(&mut self, credentials: &Credentials) -> Result<(), EditorError> {
        let repository = connect(credentials, &self.settings)?;
        self.cache.save_credentials(credentials);
        self.repository = Some(repository);
        self.gallery.clear();
        info!(owner = %credentials.owner, repo = %credentials.repo, "remote store configured");
        Ok(())
    }

    // =========================================================================
    // REMOTE OPERATIONS
    // =========================================================================

    /// Snapshot the grid for an export that runs independently of the editor.
    ///
    /// # Errors
    ///
    /// `NotConfigured` without credentials.
    pub fn export_job(&self) -> Result<ExportJob, EditorError> {
        Ok(ExportJob { repository: self.repository()?.clone(), snapshot: self.engine.grid.clone() })
    }

    /// Export the current grid and make it the active display.
    ///
    /// # Errors
    ///
    /// `NotConfigured`, or the store error from either step.
    pub async fn export_current_grid(&self) -> Result<Artifact, EditorError> {
        self.export_job()?.run().await
    }

    /// Reload the gallery from the store.
    ///
    /// # Errors
    ///
    /// `NotConfigured` or a store error; the previous gallery is kept.
    pub async fn refresh_gallery(&mut self) -> Result<&[Artifact], EditorError> {
        let gallery = self.repository()?.list_gallery().await?;
        self.gallery = gallery;
        Ok(&self.gallery)
    }

    /// Point the display record at `artifact`.
    ///
    /// # Errors
    ///
    /// `NotConfigured` or a store error, including `Conflict`.
    pub async fn set_active(&self, artifact: &Artifact) -> Result<(), EditorError> {
        self.repository()?.set_active_display(&artifact.path).await?;
        Ok(())
    }

    /// Delete `artifact` and drop it from the cached gallery.
    ///
    /// # Errors
    ///
    /// `NotConfigured` or a store error; the cached gallery is left as is.
    pub async fn delete_from_gallery(&mut self, artifact: &Artifact) -> Result<(), EditorError> {
        self.repository()?.delete_artifact(artifact).await?;
        self.gallery.retain(|a| a.path != artifact.path);
        Ok(())
    }

    /// The artifact currently on display, if one is set.
    ///
    /// # Errors
    ///
    /// `NotConfigured` or a store error.
    pub async fn current_display(&self) -> Result<Option<Artifact>, EditorError> {
        Ok(self.repository()?.get_active_display().await?)
    }

    /// Fetch the artifact at `path` and load it into the editor.
    ///
    /// # Errors
    ///
    /// `NotConfigured`, or a store error such as `NotFound` or `Decode`.
    pub async fn load_from_store(&mut self, path: &str) -> Result<Artifact, EditorError> {
        let artifact = self.repository()?.get_artifact(path).await?;
        self.load_artifact_into_editor(&artifact)?;
        Ok(artifact)
    }

    fn apply(&mut self, actions: Vec<Action>) -> Vec<Action> {
        for _ in actions.iter().filter(|a| matches!(a, Action::PersistRequested)) {
            self.persist();
        }
        actions
    }
}

impl StrokeInput for Editor {
    fn on_stroke_start(&mut self, position: Point) -> Vec<Action> {
        let actions = self.engine.on_stroke_start(position);
        self.apply(actions)
    }

    fn on_stroke_move(&mut self, position: Point, buttons: Buttons) -> Vec<Action> {
        let actions = self.engine.on_stroke_move(position, buttons);
        self.apply(actions)
    }

    fn on_stroke_end(&mut self, position: Point) -> Vec<Action> {
        let actions = self.engine.on_stroke_end(position);
        self.apply(actions)
    }

    fn on_stroke_cancel(&mut self, position: Point) -> Vec<Action> {
        let actions = self.engine.on_stroke_cancel(position);
        self.apply(actions)
    }
}

#[cfg(test)]
#[path = "editor_test.rs"]
mod tests;
