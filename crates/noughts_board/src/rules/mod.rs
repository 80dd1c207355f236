//! Round-ending rules.
//!
//! Pure functions over a [`Grid`](crate::Grid), kept apart from cell storage.

pub mod draw;
pub mod win;

pub use draw::{is_draw, is_full};
pub use win::{LINES, check_winner};
