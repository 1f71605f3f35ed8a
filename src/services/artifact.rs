//! Persisted artifact format.
//!
//! One JSON document per artifact:
//!
//! ```json
//! { "width": 8, "height": 8, "pixels": ["#000000", ...], "colors": ["#000000"], "timestamp": "2024-05-01T12:00:00.123Z" }
//! ```
//!
//! A `null` pixel decodes as the default fill. `colors` is informational and
//! is recomputed from the pixels when missing. `timestamp` is required: it is
//! the only gallery sort key.

use canvas::color::Color;
use canvas::consts::{DEFAULT_FILL, DEFAULT_SELECTED};
use canvas::grid::Grid;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::store::{StoreError, VersionToken, file_name};

/// One persisted grid snapshot plus its store metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub path: String,
    pub name: String,
    pub width: usize,
    pub height: usize,
    pub cells: Vec<Color>,
    pub palette_used: Vec<Color>,
    pub created_at: OffsetDateTime,
    /// Token this copy was read or written at; `None` before the first write.
    pub version: Option<VersionToken>,
    /// Where the store shows this artifact, when it reports one.
    pub url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ArtifactRecord {
    width: usize,
    height: usize,
    pixels: Vec<Option<Color>>,
    #[serde(default)]
    colors: Option<Vec<Color>>,
    timestamp: String,
}

/// The display indirection record: `{ "image": "<artifact path>" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayRecord {
    pub image: String,
}

impl Artifact {
    /// Snapshot `grid` as an unsaved artifact at `path`.
    #[must_use]
    pub fn from_grid(path: impl Into<String>, grid: &Grid, created_at: OffsetDateTime) -> Self {
        let path = path.into();
        Self {
            name: file_name(&path).to_owned(),
            path,
            width: grid.width(),
            height: grid.height(),
            cells: grid.cells().to_vec(),
            palette_used: grid.palette_used(),
            created_at,
            version: None,
            url: None,
        }
    }

    /// The artifact as an editor grid, with the selected color reset to default.
    ///
    /// # Errors
    ///
    /// Returns the grid error if dimensions and cells disagree.
    pub fn to_grid(&self) -> Result<Grid, canvas::grid::GridError> {
        Grid::from_parts(self.width, self.height, self.cells.clone(), DEFAULT_SELECTED)
    }

    /// Pretty-printed JSON document.
    ///
    /// # Errors
    ///
    /// `Decode` if the timestamp can't be formatted.
    pub fn encode(&self) -> Result<String, StoreError> {
        let record = ArtifactRecord {
            width: self.width,
            height: self.height,
            pixels: self.cells.iter().copied().map(Some).collect(),
            colors: Some(self.palette_used.clone()),
            timestamp: format_timestamp(self.created_at)?,
        };
        serde_json::to_string_pretty(&record).map_err(|e| StoreError::Decode(e.to_string()))
    }

    /// Parse the document stored at `path`.
    ///
    /// # Errors
    ///
    /// `Decode` for malformed JSON, invalid dimensions, a pixel count that
    /// disagrees with the dimensions, or an unparseable timestamp.
    pub fn decode(path: &str, content: &str, version: Option<VersionToken>) -> Result<Self, StoreError> {
        let record: ArtifactRecord =
            serde_json::from_str(content).map_err(|e| StoreError::Decode(format!("{path}: {e}")))?;
        let cells = record.pixels.into_iter().map(|p| p.unwrap_or(DEFAULT_FILL)).collect();
        let grid = Grid::from_parts(record.width, record.height, cells, DEFAULT_SELECTED)
            .map_err(|e| StoreError::Decode(format!("{path}: {e}")))?;
        let created_at = OffsetDateTime::parse(&record.timestamp, &Rfc3339)
            .map_err(|e| StoreError::Decode(format!("{path}: bad timestamp {:?}: {e}", record.timestamp)))?;
        let palette_used = record.colors.unwrap_or_else(|| grid.palette_used());

        Ok(Self {
            path: path.to_owned(),
            name: file_name(path).to_owned(),
            width: grid.width(),
            height: grid.height(),
            cells: grid.cells().to_vec(),
            palette_used,
            created_at,
            version,
            url: None,
        })
    }
}

/// RFC 3339 in UTC, e.g. `2024-05-01T12:00:00.123Z`.
pub(crate) fn format_timestamp(at: OffsetDateTime) -> Result<String, StoreError> {
    at.to_offset(time::UtcOffset::UTC)
        .format(&Rfc3339)
        .map_err(|e| StoreError::Decode(format!("timestamp format: {e}")))
}

#[cfg(test)]
#[path = "artifact_test.rs"]
mod tests;
