//! Noughts board - pure grid logic for a two-player 3x3 game.
//!
//! This crate holds no I/O and no concurrency. It models the grid,
//! the two marks, and the rules that decide when a round is over.
//!
//! # Example
//!
//! ```
//! use noughts_board::{Grid, Mark, Position};
//!
//! let mut grid = Grid::new();
//! for x in 0..3 {
//!     grid.place(Position::from_coords(x, 0).unwrap(), Mark::X).unwrap();
//! }
//! assert_eq!(grid.winning_line(), Some(Mark::X));
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod position;
pub mod rules;
mod types;

pub use position::Position;
pub use types::{Grid, Mark, PlaceError};
