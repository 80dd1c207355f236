//! Full-board and draw detection.

use super::win::check_winner;
use crate::{Grid, Position};
use tracing::instrument;

/// Checks if every cell holds a mark.
#[instrument(skip(grid))]
pub fn is_full(grid: &Grid) -> bool {
    Position::ALL.iter().all(|pos| !grid.is_empty(*pos))
}

/// A full grid with no complete line.
pub fn is_draw(grid: &Grid) -> bool {
    is_full(grid) && check_winner(grid).is_none()
}
