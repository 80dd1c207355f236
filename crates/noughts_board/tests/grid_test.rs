//! Tests for grid rules and wire shape.

use noughts_board::{Grid, Mark, PlaceError, Position};

fn at(x: i64, y: i64) -> Position {
    Position::from_coords(x, y).expect("in range")
}

#[test]
fn test_row_zero_completed_by_x_wins() {
    let mut grid = Grid::new();
    grid.place(at(0, 0), Mark::X).unwrap();
    grid.place(at(1, 0), Mark::X).unwrap();
    assert_eq!(grid.winning_line(), None);

    grid.place(at(2, 0), Mark::X).unwrap();
    assert_eq!(grid.winning_line(), Some(Mark::X));
    assert!(!grid.is_full());
}

#[test]
fn test_full_grid_without_line() {
    let mut grid = Grid::new();
    // X O X / X O O / O X X
    let moves = [
        (0, 0, Mark::X),
        (1, 0, Mark::O),
        (2, 0, Mark::X),
        (0, 1, Mark::X),
        (1, 1, Mark::O),
        (2, 1, Mark::O),
        (0, 2, Mark::O),
        (1, 2, Mark::X),
        (2, 2, Mark::X),
    ];
    for (x, y, mark) in moves {
        grid.place(at(x, y), mark).unwrap();
    }
    assert!(grid.is_full());
    assert_eq!(grid.winning_line(), None);
}

#[test]
fn test_reset_clears_everything() {
    let mut grid = Grid::new();
    grid.place(at(1, 1), Mark::O).unwrap();
    grid = Grid::reset();
    assert_eq!(grid, Grid::new());
    assert!(Position::ALL.iter().all(|p| grid.is_empty(*p)));
}

#[test]
fn test_occupied_cell_rejected() {
    let mut grid = Grid::new();
    grid.place(at(2, 2), Mark::X).unwrap();
    let err = grid.place(at(2, 2), Mark::O).unwrap_err();
    assert_eq!(err, PlaceError::CellOccupied(at(2, 2)));
    assert_eq!(err.to_string(), "Cell (2, 2) is already occupied");
    assert_eq!(grid.get(at(2, 2)), Some(Mark::X));
}

#[test]
fn test_grid_serializes_row_major_with_nulls() {
    let mut grid = Grid::new();
    grid.place(at(2, 0), Mark::X).unwrap();
    grid.place(at(0, 1), Mark::O).unwrap();
    let json = serde_json::to_value(grid).unwrap();
    assert_eq!(
        json,
        serde_json::json!([[null, null, "X"], ["O", null, null], [null, null, null]])
    );
}
