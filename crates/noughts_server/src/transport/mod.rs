//! WebSocket transport around the coordinator.
//!
//! Owns the wire format and the per-connection lifecycle: admit on
//! upgrade, decode moves, write snapshots, evict on the way out.

mod codec;
mod socket;

pub use codec::{MAKE_TURN, MakeTurn, decode_move, encode_snapshot};
pub use socket::{CAPACITY_CLOSE_CODE, play_handler};
