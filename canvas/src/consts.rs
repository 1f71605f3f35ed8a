//! Shared constants for the canvas crate.

use crate::color::Color;

// ── Grid ────────────────────────────────────────────────────────

/// Width of a fresh grid, in cells.
pub const DEFAULT_WIDTH: usize = 16;

/// Height of a fresh grid, in cells.
pub const DEFAULT_HEIGHT: usize = 16;

/// Largest accepted width or height, in cells.
pub const MAX_DIMENSION: usize = 256;

// ── Colors ──────────────────────────────────────────────────────

/// Color written into every cell on creation, resize, and clear.
pub const DEFAULT_FILL: Color = Color::BLACK;

/// Color selected when the editor starts or loads an artifact.
pub const DEFAULT_SELECTED: Color = Color::WHITE;

/// Built-in palette offered by the editor.
pub const PALETTE: [(&str, Color); 2] = [("Black", Color::BLACK), ("White", Color::WHITE)];
