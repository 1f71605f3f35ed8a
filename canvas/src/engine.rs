use crate::color::Color;
use crate::grid::{Grid, GridError};
use crate::input::{Buttons, StrokeInput, StrokeState};
use crate::mapper::{self, Point, Rect};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// A cell now holds `color`; the host should repaint it.
    CellPainted { index: usize, color: Color },
    /// A stroke ended; the host should persist the grid exactly once.
    PersistRequested,
}

/// Stroke state machine: pointer events in, de-duplicated cell writes out.
///
/// The session never owns the grid. Each event borrows the grid it paints
/// into, so the grid's owner can still resize, clear, or replace it between
/// events.
#[derive(Debug, Clone, Default)]
pub struct PaintSession {
    state: StrokeState,
}

impl PaintSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> StrokeState {
        self.state
    }

    #[must_use]
    pub fn is_stroke_active(&self) -> bool {
        matches!(self.state, StrokeState::Stroking { .. })
    }

    /// Begin a stroke, painting `cell` when the press landed on one.
    ///
    /// A start while already stroking restarts de-duplication without
    /// requesting a persist.
    pub fn start(&mut self, grid: &mut Grid, cell: Option<usize>) -> Vec<Action> {
        self.state = StrokeState::Stroking { last_painted: None };
        let mut actions = Vec::new();
        if let Some(index) = cell {
            self.paint(grid, index, &mut actions);
        }
        actions
    }

    /// Continue the stroke. A move with no buttons held ends it.
    pub fn advance(&mut self, grid: &mut Grid, cell: Option<usize>, buttons: Buttons) -> Vec<Action> {
        let StrokeState::Stroking { last_painted } = self.state else {
            return Vec::new();
        };
        if !buttons.any_pressed() {
            return self.finish();
        }
        let mut actions = Vec::new();
        match cell {
            Some(index) if Some(index) != last_painted => self.paint(grid, index, &mut actions),
            _ => {}
        }
        actions
    }

    /// End the stroke (release or cancel). Requests one persist if a stroke was active.
    pub fn finish(&mut self) -> Vec<Action> {
        match self.state {
            StrokeState::Idle => Vec::new(),
            StrokeState::Stroking { .. } => {
                self.state = StrokeState::Idle;
                vec![Action::PersistRequested]
            }
        }
    }

    fn paint(&mut self, grid: &mut Grid, index: usize, actions: &mut Vec<Action>) {
        self.state = StrokeState::Stroking { last_painted: Some(index) };
        if grid.paint(index) {
            actions.push(Action::CellPainted { index, color: grid.selected_color() });
        }
    }
}

/// Grid, paint session, and surface bounds bundled for a host.
///
/// Hosts forward pointer events through [`StrokeInput`] and apply the
/// returned actions. Until [`EngineCore::set_bounds`] is called the surface
/// has no area and no point maps to a cell.
#[derive(Debug, Clone)]
pub struct EngineCore {
    pub grid: Grid,
    pub session: PaintSession,
    pub bounds: Rect,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::new(Grid::default())
    }
}

impl EngineCore {
    #[must_use]
    pub fn new(grid: Grid) -> Self {
        Self { grid, session: PaintSession::new(), bounds: Rect::new(0.0, 0.0, 0.0, 0.0) }
    }

    // --- Surface ---

    /// Update the on-screen rectangle occupied by the grid.
    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    /// The cell under `position`, if any.
    #[must_use]
    pub fn cell_at(&self, position: Point) -> Option<usize> {
        mapper::cell_at(position, self.bounds, self.grid.width(), self.grid.height())
    }

    // --- Grid operations ---

    pub fn select_color(&mut self, color: Color) {
        self.grid.select_color(color);
    }

    /// Reallocate the grid. A stroke in progress keeps going on the new cells.
    ///
    /// # Errors
    ///
    /// Returns the grid's dimension error; the grid is unchanged.
    pub fn resize(&mut self, width: usize, height: usize) -> Result<(), GridError> {
        self.grid.resize(width, height)
    }

    pub fn clear(&mut self) {
        self.grid.clear();
    }

    /// Replace the grid wholesale.
    pub fn load(&mut self, grid: Grid) {
        self.grid = grid;
    }
}

impl StrokeInput for EngineCore {
    fn on_stroke_start(&mut self, position: Point) -> Vec<Action> {
        let cell = self.cell_at(position);
        self.session.start(&mut self.grid, cell)
    }

    fn on_stroke_move(&mut self, position: Point, buttons: Buttons) -> Vec<Action> {
        let cell = self.cell_at(position);
        self.session.advance(&mut self.grid, cell, buttons)
    }

    fn on_stroke_end(&mut self, _position: Point) -> Vec<Action> {
        self.session.finish()
    }

    fn on_stroke_cancel(&mut self, _position: Point) -> Vec<Action> {
        self.session.finish()
    }
}
