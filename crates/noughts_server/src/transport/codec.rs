//! Text message codec.
//!
//! Inbound frames look like `make_turn#{"x":1,"y":2}`. Outbound frames are
//! the JSON form of [`RoundState`].

use crate::state::RoundState;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Action tag for a move.
pub const MAKE_TURN: &str = "make_turn";

/// A decoded move request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MakeTurn {
    /// Column (0-2 when valid).
    pub x: i64,
    /// Row (0-2 when valid).
    pub y: i64,
}

impl MakeTurn {
    /// Stand-in for anything that fails to decode. Always off the grid.
    pub const SENTINEL: MakeTurn = MakeTurn { x: -1, y: -1 };
}

/// Decodes a raw text frame into a move.
///
/// Unknown tags, a missing `#` and bodies that are not `{x, y}` integers all
/// become [`MakeTurn::SENTINEL`], which the coordinator rejects like any
/// other off-grid move.
#[instrument]
pub fn decode_move(raw: &str) -> MakeTurn {
    let Some((tag, body)) = raw.split_once('#') else {
        debug!("No action separator");
        return MakeTurn::SENTINEL;
    };
    if tag != MAKE_TURN {
        debug!(tag, "Unknown action");
        return MakeTurn::SENTINEL;
    }
    serde_json::from_str(body).unwrap_or_else(|e| {
        debug!(error = %e, "Malformed move body");
        MakeTurn::SENTINEL
    })
}

/// Serializes a snapshot for the wire.
///
/// # Errors
///
/// Only fails if serde_json does, which the snapshot's plain field types
/// do not trigger in practice.
pub fn encode_snapshot(state: &RoundState) -> Result<String, serde_json::Error> {
    serde_json::to_string(state)
}
