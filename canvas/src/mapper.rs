#[cfg(test)]
#[path = "mapper_test.rs"]
mod mapper_test;

/// A point in screen space (CSS pixels, or any consistent unit).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// On-screen rectangle occupied by the grid surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    /// Whether `point` lies in the half-open box `[left, left+width) x [top, top+height)`.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        (self.left..self.left + self.width).contains(&point.x) && (self.top..self.top + self.height).contains(&point.y)
    }

    fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// Map a screen point to the row-major index of the cell under it.
///
/// The surface `bounds` is split into `width` x `height` equal cells;
/// `col = floor((x - left) / cell_width)`, likewise for `row`. Returns `None`
/// for points outside `bounds`, for an empty grid, or for a surface without
/// area. Floating-point rounding just inside the right or bottom edge is
/// clamped to the last column or row.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
#[must_use]
pub fn cell_at(point: Point, bounds: Rect, width: usize, height: usize) -> Option<usize> {
    if width == 0 || height == 0 || !bounds.has_area() || !bounds.contains(point) {
        return None;
    }
    let cell_width = bounds.width / width as f64;
    let cell_height = bounds.height / height as f64;
    let col = ((point.x - bounds.left) / cell_width).floor().max(0.0) as usize;
    let row = ((point.y - bounds.top) / cell_height).floor().max(0.0) as usize;
    Some(row.min(height - 1) * width + col.min(width - 1))
}
