//! Grid model: dimensions, per-cell colors, and the selected paint color.
//!
//! `Grid` keeps `cells.len() == width * height` at all times. Every
//! constructor and mutator that changes dimensions re-fills the cells with
//! [`DEFAULT_FILL`]; existing art is never rescaled or reflowed.
//!
//! The serde form (`GridRecord`) is the editor-state document stored in
//! the local cache: `{ width, height, selectedColor, pixels }`, where a
//! `null` pixel means the default fill.

#[cfg(test)]
#[path = "grid_test.rs"]
mod grid_test;

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::consts::{DEFAULT_FILL, DEFAULT_HEIGHT, DEFAULT_SELECTED, DEFAULT_WIDTH, MAX_DIMENSION};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("invalid grid dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    #[error("cell count mismatch: expected {expected}, got {actual}")]
    CellCountMismatch { expected: usize, actual: usize },
}

/// A fixed-size grid of colored cells, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GridRecord", into = "GridRecord")]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Color>,
    selected_color: Color,
}

impl Default for Grid {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            cells: vec![DEFAULT_FILL; DEFAULT_WIDTH * DEFAULT_HEIGHT],
            selected_color: DEFAULT_SELECTED,
        }
    }
}

fn check_dimensions(width: usize, height: usize) -> Result<(), GridError> {
    let valid = |d: usize| (1..=MAX_DIMENSION).contains(&d);
    if valid(width) && valid(height) {
        Ok(())
    } else {
        Err(GridError::InvalidDimensions { width, height })
    }
}

impl Grid {
    /// A `width` x `height` grid filled with the default color.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDimensions` if either side is outside `1..=MAX_DIMENSION`.
    pub fn new(width: usize, height: usize) -> Result<Self, GridError> {
        check_dimensions(width, height)?;
        Ok(Self { width, height, cells: vec![DEFAULT_FILL; width * height], selected_color: DEFAULT_SELECTED })
    }

    /// Build a grid from a persisted snapshot.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDimensions` or `CellCountMismatch` when the parts
    /// don't describe a valid grid.
    pub fn from_parts(width: usize, height: usize, cells: Vec<Color>, selected_color: Color) -> Result<Self, GridError> {
        check_dimensions(width, height)?;
        let expected = width * height;
        if cells.len() != expected {
            return Err(GridError::CellCountMismatch { expected, actual: cells.len() });
        }
        Ok(Self { width, height, cells, selected_color })
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    #[must_use]
    pub fn cells(&self) -> &[Color] {
        &self.cells
    }

    #[must_use]
    pub fn cell(&self, index: usize) -> Option<Color> {
        self.cells.get(index).copied()
    }

    #[must_use]
    pub fn selected_color(&self) -> Color {
        self.selected_color
    }

    /// Row-major index of `(col, row)`, or `None` outside the grid.
    #[must_use]
    pub fn index_of(&self, col: usize, row: usize) -> Option<usize> {
        (col < self.width && row < self.height).then_some(row * self.width + col)
    }

    pub fn select_color(&mut self, color: Color) {
        self.selected_color = color;
    }

    /// Write the selected color into `cells[index]`.
    ///
    /// Out-of-range indices are ignored. Returns whether a cell was written.
    pub fn paint(&mut self, index: usize) -> bool {
        let color = self.selected_color;
        match self.cells.get_mut(index) {
            Some(cell) => {
                *cell = color;
                true
            }
            None => false,
        }
    }

    /// Change dimensions, discarding all cells.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDimensions` and leaves the grid unchanged if either
    /// side is out of range.
    pub fn resize(&mut self, width: usize, height: usize) -> Result<(), GridError> {
        check_dimensions(width, height)?;
        self.width = width;
        self.height = height;
        self.cells = vec![DEFAULT_FILL; width * height];
        Ok(())
    }

    /// Replace dimensions and cells wholesale from a snapshot.
    ///
    /// The selected color is reset to [`DEFAULT_SELECTED`].
    ///
    /// # Errors
    ///
    /// Same checks as [`Grid::from_parts`]; on error the grid is unchanged.
    pub fn replace_from(&mut self, width: usize, height: usize, cells: Vec<Color>) -> Result<(), GridError> {
        *self = Self::from_parts(width, height, cells, DEFAULT_SELECTED)?;
        Ok(())
    }

    /// Fill every cell with the default color.
    pub fn clear(&mut self) {
        self.cells.fill(DEFAULT_FILL);
    }

    /// Distinct colors present, in first-seen order.
    #[must_use]
    pub fn palette_used(&self) -> Vec<Color> {
        let mut seen = Vec::new();
        for color in &self.cells {
            if !seen.contains(color) {
                seen.push(*color);
            }
        }
        seen
    }
}

/// Wire form of [`Grid`] used by the local editor-state cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridRecord {
    pub width: usize,
    pub height: usize,
    #[serde(default = "default_selected")]
    pub selected_color: Color,
    #[serde(default)]
    pub pixels: Vec<Option<Color>>,
}

fn default_selected() -> Color {
    DEFAULT_SELECTED
}

impl TryFrom<GridRecord> for Grid {
    type Error = GridError;

    fn try_from(record: GridRecord) -> Result<Self, Self::Error> {
        let cells = record.pixels.into_iter().map(|p| p.unwrap_or(DEFAULT_FILL)).collect();
        Self::from_parts(record.width, record.height, cells, record.selected_color)
    }
}

impl From<Grid> for GridRecord {
    fn from(grid: Grid) -> Self {
        Self {
            width: grid.width,
            height: grid.height,
            selected_color: grid.selected_color,
            pixels: grid.cells.into_iter().map(Some).collect(),
        }
    }
}
