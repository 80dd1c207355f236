//! Cell addressing for the 3x3 grid.

use derive_more::Display;
use tracing::instrument;

/// A cell on the grid, addressed by column `x` and row `y` (both 0-2).
///
/// The only way to build one is through [`Position::from_coords`], so a
/// `Position` always points inside the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[display("({x}, {y})")]
pub struct Position {
    x: u8,
    y: u8,
}

impl Position {
    /// Creates a position from wire coordinates.
    ///
    /// Returns `None` when either coordinate lies outside 0-2, which is how
    /// sentinel and malformed moves are filtered out.
    #[instrument]
    pub fn from_coords(x: i64, y: i64) -> Option<Self> {
        let in_range = |v: i64| (0..3).contains(&v);
        if in_range(x) && in_range(y) {
            Some(Self {
                x: x as u8,
                y: y as u8,
            })
        } else {
            None
        }
    }

    /// Column (0-2).
    pub fn x(self) -> usize {
        usize::from(self.x)
    }

    /// Row (0-2).
    pub fn y(self) -> usize {
        usize::from(self.y)
    }

    /// Row-major index (0-8).
    pub fn to_index(self) -> usize {
        self.y() * 3 + self.x()
    }

    /// All 9 positions in row-major order.
    pub const ALL: [Position; 9] = [
        Position { x: 0, y: 0 },
        Position { x: 1, y: 0 },
        Position { x: 2, y: 0 },
        Position { x: 0, y: 1 },
        Position { x: 1, y: 1 },
        Position { x: 2, y: 1 },
        Position { x: 0, y: 2 },
        Position { x: 1, y: 2 },
        Position { x: 2, y: 2 },
    ];
}
