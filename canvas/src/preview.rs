//! Plain-text grid preview for terminals and logs.

#[cfg(test)]
#[path = "preview_test.rs"]
mod preview_test;

use crate::grid::Grid;

/// Glyph for cells at or above half luminance.
const LIGHT: &str = "██";
/// Glyph for darker cells.
const DARK: &str = "··";

/// Render `grid` as one text line per row, two glyph columns per cell.
///
/// Every row, including the last, ends with a newline.
#[must_use]
pub fn render_text(grid: &Grid) -> String {
    let mut out = String::new();
    for row in grid.cells().chunks(grid.width()) {
        out.extend(row.iter().map(|c| if c.luminance() >= 0.5 { LIGHT } else { DARK }));
        out.push('\n');
    }
    out
}
