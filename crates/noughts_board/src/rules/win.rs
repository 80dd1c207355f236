//! Win detection.

use crate::{Grid, Mark, Position};
use tracing::instrument;

const fn p(x: u8, y: u8) -> Position {
    Position::ALL[(y * 3 + x) as usize]
}

/// The eight lines, in the order they are checked.
///
/// Rows top to bottom, then columns left to right, then the main diagonal
/// and the anti-diagonal.
pub const LINES: [[Position; 3]; 8] = [
    // Rows
    [p(0, 0), p(1, 0), p(2, 0)],
    [p(0, 1), p(1, 1), p(2, 1)],
    [p(0, 2), p(1, 2), p(2, 2)],
    // Columns
    [p(0, 0), p(0, 1), p(0, 2)],
    [p(1, 0), p(1, 1), p(1, 2)],
    [p(2, 0), p(2, 1), p(2, 2)],
    // Diagonals
    [p(0, 0), p(1, 1), p(2, 2)],
    [p(2, 0), p(1, 1), p(0, 2)],
];

/// Returns the mark of the first line whose three cells are set and equal.
#[instrument(skip(grid))]
pub fn check_winner(grid: &Grid) -> Option<Mark> {
    LINES.iter().find_map(|[a, b, c]| {
        let mark = grid.get(*a)?;
        (grid.get(*b) == Some(mark) && grid.get(*c) == Some(mark)).then_some(mark)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_with(cells: &[(i64, i64, Mark)]) -> Grid {
        let mut grid = Grid::new();
        for &(x, y, mark) in cells {
            grid.place(Position::from_coords(x, y).unwrap(), mark).unwrap();
        }
        grid
    }

    #[test]
    fn test_no_winner_empty_grid() {
        assert_eq!(check_winner(&Grid::new()), None);
    }

    #[test]
    fn test_winner_top_row() {
        let grid = grid_with(&[(0, 0, Mark::X), (1, 0, Mark::X), (2, 0, Mark::X)]);
        assert_eq!(check_winner(&grid), Some(Mark::X));
    }

    #[test]
    fn test_winner_column() {
        let grid = grid_with(&[(1, 0, Mark::O), (1, 1, Mark::O), (1, 2, Mark::O)]);
        assert_eq!(check_winner(&grid), Some(Mark::O));
    }

    #[test]
    fn test_winner_anti_diagonal() {
        let grid = grid_with(&[(2, 0, Mark::O), (1, 1, Mark::O), (0, 2, Mark::O)]);
        assert_eq!(check_winner(&grid), Some(Mark::O));
    }

    #[test]
    fn test_mixed_line_is_not_a_win() {
        let grid = grid_with(&[(0, 0, Mark::X), (1, 0, Mark::O), (2, 0, Mark::X)]);
        assert_eq!(check_winner(&grid), None);
    }

    #[test]
    fn test_lines_cover_each_cell() {
        for pos in Position::ALL {
            assert!(LINES.iter().any(|line| line.contains(&pos)));
        }
    }
}
