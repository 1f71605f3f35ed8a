use super::*;

const EPS: f64 = 1e-6;

fn surface() -> Rect {
    Rect::new(10.0, 20.0, 160.0, 80.0)
}

#[test]
fn top_left_corner_is_index_zero() {
    assert_eq!(cell_at(Point::new(10.0, 20.0), surface(), 16, 8), Some(0));
}

#[test]
fn just_inside_bottom_right_is_last_index() {
    let r = surface();
    let pt = Point::new(r.left + r.width - EPS, r.top + r.height - EPS);
    assert_eq!(cell_at(pt, r, 16, 8), Some(16 * 8 - 1));
}

#[test]
fn last_index_for_awkward_ratios() {
    for (w, h) in [(3, 7), (13, 11), (32, 32), (1, 1)] {
        let r = Rect::new(0.3, 0.7, 100.0, 100.0);
        let pt = Point::new(r.left + r.width - EPS, r.top + r.height - EPS);
        assert_eq!(cell_at(pt, r, w, h), Some(w * h - 1), "{w}x{h}");
    }
}

#[test]
fn exact_right_and_bottom_edges_are_outside() {
    let r = surface();
    assert_eq!(cell_at(Point::new(r.left + r.width, 30.0), r, 16, 8), None);
    assert_eq!(cell_at(Point::new(20.0, r.top + r.height), r, 16, 8), None);
}

#[test]
fn points_left_or_above_are_outside() {
    let r = surface();
    assert_eq!(cell_at(Point::new(r.left - EPS, 30.0), r, 16, 8), None);
    assert_eq!(cell_at(Point::new(20.0, r.top - EPS), r, 16, 8), None);
    assert_eq!(cell_at(Point::new(-1000.0, -1000.0), r, 16, 8), None);
}

#[test]
fn interior_point_uses_floor() {
    // Cells are 10x10; (35, 45) relative to (10, 20) is col 2, row 2.
    assert_eq!(cell_at(Point::new(35.0, 45.0), surface(), 16, 8), Some(2 * 16 + 2));
    // Exactly on a cell boundary belongs to the next cell.
    assert_eq!(cell_at(Point::new(30.0, 20.0), surface(), 16, 8), Some(2));
}

#[test]
fn non_square_cells() {
    // 4x2 grid over 100x10: cells are 25 wide, 5 tall.
    let r = Rect::new(0.0, 0.0, 100.0, 10.0);
    assert_eq!(cell_at(Point::new(74.9, 5.1), r, 4, 2), Some(4 + 2));
}

#[test]
fn degenerate_surface_maps_nothing() {
    assert_eq!(cell_at(Point::new(0.0, 0.0), Rect::new(0.0, 0.0, 0.0, 10.0), 4, 4), None);
    assert_eq!(cell_at(Point::new(0.0, 0.0), Rect::new(0.0, 0.0, 10.0, -1.0), 4, 4), None);
    assert_eq!(cell_at(Point::new(0.0, 0.0), Rect::new(0.0, 0.0, 10.0, 10.0), 0, 4), None);
}

#[test]
fn nan_point_maps_nothing() {
    assert_eq!(cell_at(Point::new(f64::NAN, 1.0), surface(), 16, 8), None);
}

#[test]
fn rect_contains_is_half_open() {
    let r = Rect::new(0.0, 0.0, 2.0, 2.0);
    assert!(r.contains(Point::new(0.0, 0.0)));
    assert!(r.contains(Point::new(1.999, 1.999)));
    assert!(!r.contains(Point::new(2.0, 1.0)));
}
