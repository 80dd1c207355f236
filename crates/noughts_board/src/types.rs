//! Core domain types for the grid.

use super::position::Position;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// One of the two marks a participant plays with.
///
/// `X` always opens a round and is the first slot handed out on admission.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    Serialize,
    Deserialize,
    strum::EnumIter,
)]
pub enum Mark {
    /// Mark X (moves first).
    X,
    /// Mark O (moves second).
    O,
}

impl Mark {
    /// Returns the other mark.
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

/// Errors that can occur when placing a mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum PlaceError {
    /// Cell already holds a mark.
    #[display("Cell {_0} is already occupied")]
    CellOccupied(#[error(not(source))] Position),
}

/// 3x3 grid of optional marks.
///
/// Serialized row-major, so `cells[y][x]` addresses column `x` of row `y`
/// and an empty cell is `null`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grid {
    cells: [[Option<Mark>; 3]; 3],
}

impl Grid {
    /// Creates an empty grid.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a fresh empty grid, used when a round starts over.
    pub fn reset() -> Self {
        Self::new()
    }

    /// Gets the mark at the given position.
    pub fn get(&self, pos: Position) -> Option<Mark> {
        self.cells[pos.y()][pos.x()]
    }

    /// Checks if a cell is unset.
    pub fn is_empty(&self, pos: Position) -> bool {
        self.get(pos).is_none()
    }

    /// Places `mark` at `pos`.
    ///
    /// Cells only ever go from unset to set.
    ///
    /// # Errors
    ///
    /// Returns [`PlaceError::CellOccupied`] if the cell already holds a mark.
    #[instrument(skip(self))]
    pub fn place(&mut self, pos: Position, mark: Mark) -> Result<(), PlaceError> {
        if !self.is_empty(pos) {
            return Err(PlaceError::CellOccupied(pos));
        }
        self.cells[pos.y()][pos.x()] = Some(mark);
        Ok(())
    }

    /// Returns all rows.
    pub fn cells(&self) -> &[[Option<Mark>; 3]; 3] {
        &self.cells
    }

    /// Checks if every cell is set.
    pub fn is_full(&self) -> bool {
        super::rules::is_full(self)
    }

    /// Returns the mark owning the first complete line, if any.
    pub fn winning_line(&self) -> Option<Mark> {
        super::rules::check_winner(self)
    }

    /// Formats the grid as a human-readable string.
    pub fn display(&self) -> String {
        let rows: Vec<String> = self
            .cells
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| match cell {
                        Some(mark) => mark.to_string(),
                        None => ".".to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join("|")
            })
            .collect();
        rows.join("\n-+-+-\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(x: i64, y: i64) -> Position {
        Position::from_coords(x, y).unwrap()
    }

    #[test]
    fn test_place_sets_only_target_cell() {
        let mut grid = Grid::new();
        grid.place(at(2, 1), Mark::O).unwrap();
        assert_eq!(grid.get(at(2, 1)), Some(Mark::O));
        let set = Position::ALL.iter().filter(|p| !grid.is_empty(**p)).count();
        assert_eq!(set, 1);
    }

    #[test]
    fn test_place_rejects_occupied_cell() {
        let mut grid = Grid::new();
        grid.place(at(0, 0), Mark::X).unwrap();
        let before = grid;
        assert_eq!(
            grid.place(at(0, 0), Mark::O),
            Err(PlaceError::CellOccupied(at(0, 0)))
        );
        assert_eq!(grid, before);
    }

    #[test]
    fn test_opponent() {
        assert_eq!(Mark::X.opponent(), Mark::O);
        assert_eq!(Mark::O.opponent(), Mark::X);
    }

    #[test]
    fn test_display() {
        let mut grid = Grid::new();
        grid.place(at(1, 1), Mark::X).unwrap();
        assert_eq!(grid.display(), ".|.|.\n-+-+-\n.|X|.\n-+-+-\n.|.|.");
    }
}
