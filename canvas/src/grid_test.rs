use super::*;

// =============================================================
// Construction
// =============================================================

#[test]
fn default_is_sixteen_square_black_with_white_selected() {
    let grid = Grid::default();
    assert_eq!((grid.width(), grid.height()), (16, 16));
    assert_eq!(grid.cells().len(), 256);
    assert!(grid.cells().iter().all(|c| *c == Color::BLACK));
    assert_eq!(grid.selected_color(), Color::WHITE);
}

#[test]
fn new_rejects_zero_and_oversized() {
    assert_eq!(Grid::new(0, 4), Err(GridError::InvalidDimensions { width: 0, height: 4 }));
    assert!(Grid::new(4, MAX_DIMENSION + 1).is_err());
    assert!(Grid::new(MAX_DIMENSION, 1).is_ok());
}

#[test]
fn from_parts_checks_cell_count() {
    let err = Grid::from_parts(2, 2, vec![Color::WHITE; 3], Color::WHITE).unwrap_err();
    assert_eq!(err, GridError::CellCountMismatch { expected: 4, actual: 3 });
}

// =============================================================
// Resize / clear
// =============================================================

#[test]
fn resize_refills_to_new_length_for_many_sizes() {
    let mut grid = Grid::default();
    for (w, h) in [(1, 1), (8, 8), (3, 17), (32, 2), (64, 64)] {
        grid.select_color(Color::WHITE);
        grid.paint(0);
        grid.resize(w, h).unwrap();
        assert_eq!(grid.cells().len(), w * h);
        assert!(grid.cells().iter().all(|c| *c == DEFAULT_FILL));
    }
}

#[test]
fn resize_invalid_leaves_grid_untouched() {
    let mut grid = Grid::new(4, 4).unwrap();
    grid.paint(5);
    let before = grid.clone();
    assert!(grid.resize(0, 0).is_err());
    assert_eq!(grid, before);
}

#[test]
fn resize_keeps_selected_color() {
    let mut grid = Grid::default();
    grid.select_color(Color::rgb(1, 2, 3));
    grid.resize(8, 8).unwrap();
    assert_eq!(grid.selected_color(), Color::rgb(1, 2, 3));
}

#[test]
fn clear_fills_default_and_keeps_dimensions() {
    let mut grid = Grid::new(3, 2).unwrap();
    for i in 0..6 {
        grid.paint(i);
    }
    grid.clear();
    assert_eq!((grid.width(), grid.height()), (3, 2));
    assert!(grid.cells().iter().all(|c| *c == DEFAULT_FILL));
}

// =============================================================
// Paint
// =============================================================

#[test]
fn paint_writes_selected_color() {
    let mut grid = Grid::new(2, 2).unwrap();
    grid.select_color(Color::rgb(9, 9, 9));
    assert!(grid.paint(3));
    assert_eq!(grid.cell(3), Some(Color::rgb(9, 9, 9)));
    assert_eq!(grid.cell(0), Some(Color::BLACK));
}

#[test]
fn paint_out_of_range_is_noop() {
    let mut grid = Grid::new(2, 2).unwrap();
    let before = grid.clone();
    assert!(!grid.paint(4));
    assert!(!grid.paint(usize::MAX));
    assert_eq!(grid, before);
}

#[test]
fn index_of_is_row_major() {
    let grid = Grid::new(4, 3).unwrap();
    assert_eq!(grid.index_of(0, 0), Some(0));
    assert_eq!(grid.index_of(3, 0), Some(3));
    assert_eq!(grid.index_of(1, 2), Some(9));
    assert_eq!(grid.index_of(4, 0), None);
    assert_eq!(grid.index_of(0, 3), None);
}

#[test]
fn palette_used_is_distinct_in_first_seen_order() {
    let red = Color::rgb(255, 0, 0);
    let mut grid = Grid::new(3, 1).unwrap();
    grid.select_color(red);
    grid.paint(1);
    assert_eq!(grid.palette_used(), vec![Color::BLACK, red]);
}

#[test]
fn replace_from_swaps_everything_and_resets_selection() {
    let mut grid = Grid::new(2, 2).unwrap();
    grid.select_color(Color::rgb(1, 2, 3));
    let red = Color::rgb(255, 0, 0);
    grid.replace_from(3, 1, vec![red, Color::BLACK, red]).unwrap();
    assert_eq!((grid.width(), grid.height()), (3, 1));
    assert_eq!(grid.cells(), &[red, Color::BLACK, red]);
    assert_eq!(grid.selected_color(), Color::WHITE);
}

#[test]
fn replace_from_rejects_bad_snapshot_and_keeps_grid() {
    let mut grid = Grid::new(2, 2).unwrap();
    let before = grid.clone();
    let err = grid.replace_from(2, 2, vec![Color::WHITE]).unwrap_err();
    assert_eq!(err, GridError::CellCountMismatch { expected: 4, actual: 1 });
    assert_eq!(grid, before);
}

// =============================================================
// Serde (editor-state record)
// =============================================================

#[test]
fn record_json_shape() {
    let grid = Grid::new(1, 2).unwrap();
    let json = serde_json::to_value(&grid).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "width": 1,
            "height": 2,
            "selectedColor": "#ffffff",
            "pixels": ["#000000", "#000000"],
        })
    );
}

#[test]
fn record_null_pixels_mean_default_fill() {
    let grid: Grid =
        serde_json::from_str(r##"{"width":2,"height":1,"selectedColor":"#ff0000","pixels":[null,"#ffffff"]}"##)
            .unwrap();
    assert_eq!(grid.cells(), &[Color::BLACK, Color::WHITE]);
    assert_eq!(grid.selected_color(), Color::rgb(255, 0, 0));
}

#[test]
fn record_with_wrong_pixel_count_is_rejected() {
    let result = serde_json::from_str::<Grid>(r#"{"width":2,"height":2,"pixels":[null]}"#);
    assert!(result.is_err());
}

#[test]
fn record_missing_selected_color_defaults_to_white() {
    let grid: Grid = serde_json::from_str(r#"{"width":1,"height":1,"pixels":[null]}"#).unwrap();
    assert_eq!(grid.selected_color(), Color::WHITE);
}
