//! Input model: pointer buttons, stroke state, and the host-facing input trait.
//!
//! The UI layer translates its native pointer events into calls on
//! [`StrokeInput`]. Start events come from the grid surface; move, end, and
//! cancel events must be forwarded from the window level, since a stroke
//! that began on the grid can finish anywhere.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::engine::Action;
use crate::mapper::Point;

/// Bitmask of pressed pointer buttons, as reported with a move event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Buttons(pub u16);

impl Buttons {
    /// No buttons pressed.
    pub const NONE: Self = Self(0);
    /// Primary button (left mouse, or touch / pen contact).
    pub const PRIMARY: Self = Self(1);

    /// Whether any button is held.
    #[must_use]
    pub fn any_pressed(self) -> bool {
        self.0 != 0
    }
}

/// Paint stroke state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrokeState {
    /// No stroke in progress.
    #[default]
    Idle,
    /// A stroke is in progress.
    Stroking {
        /// Cell painted most recently during this stroke, if any.
        last_painted: Option<usize>,
    },
}

/// Pointer event sink implemented by the paint engine and its hosts.
pub trait StrokeInput {
    /// Primary pointer went down over the grid surface.
    fn on_stroke_start(&mut self, position: Point) -> Vec<Action>;

    /// Pointer moved anywhere in the window.
    fn on_stroke_move(&mut self, position: Point, buttons: Buttons) -> Vec<Action>;

    /// Pointer released anywhere in the window.
    fn on_stroke_end(&mut self, position: Point) -> Vec<Action>;

    /// Pointer interaction interrupted by the platform.
    fn on_stroke_cancel(&mut self, position: Point) -> Vec<Action>;
}
