//! The authoritative round snapshot.
//!
//! A [`RoundState`] is never edited in place. Every transition builds the
//! next value and bumps its version, and the coordinator swaps it in.

use derive_more::Display;
use noughts_board::{Grid, Mark, Position};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::instrument;

/// Mark that opens every round.
pub const STARTING_MARK: Mark = Mark::X;

/// Why a move was dropped without touching state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum IgnoreReason {
    /// Coordinates do not name a cell (includes the malformed-input sentinel).
    #[display("coordinates are off the grid")]
    OffGrid,
    /// Target cell already holds a mark.
    #[display("cell is already occupied")]
    CellOccupied,
    /// A winner is recorded and the grid is frozen until reset.
    #[display("round is already over")]
    RoundOver,
    /// The mover does not hold the turn.
    #[display("not this mark's turn")]
    NotYourTurn,
    /// The coordinator is no longer running.
    #[display("coordinator is closed")]
    CoordinatorClosed,
}

/// Full state of one game at one version, as sent to participants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundState {
    connected_players: BTreeSet<Mark>,
    field: Grid,
    player_at_turn: Mark,
    is_board_full: bool,
    winning_player: Option<Mark>,
    #[serde(skip)]
    version: u64,
}

impl RoundState {
    /// Empty grid, nobody connected, [`STARTING_MARK`] at turn.
    pub fn new() -> Self {
        Self {
            connected_players: BTreeSet::new(),
            field: Grid::new(),
            player_at_turn: STARTING_MARK,
            is_board_full: false,
            winning_player: None,
            version: 0,
        }
    }

    /// Marks currently held by a connection.
    pub fn connected_players(&self) -> &BTreeSet<Mark> {
        &self.connected_players
    }

    /// The grid.
    pub fn field(&self) -> &Grid {
        &self.field
    }

    /// Mark whose move is currently accepted.
    pub fn player_at_turn(&self) -> Mark {
        self.player_at_turn
    }

    /// Whether every cell is set.
    pub fn is_board_full(&self) -> bool {
        self.is_board_full
    }

    /// Winner of the current round, if any.
    pub fn winning_player(&self) -> Option<Mark> {
        self.winning_player
    }

    /// Commit counter; strictly increases with every replacement.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Either terminal condition holds, so the grid is frozen.
    pub fn is_round_over(&self) -> bool {
        self.winning_player.is_some() || self.is_board_full
    }

    fn successor(&self) -> Self {
        Self {
            version: self.version + 1,
            ..self.clone()
        }
    }

    /// Next state with `mark` added to the connected set.
    pub fn with_connected(&self, mark: Mark) -> Self {
        let mut next = self.successor();
        next.connected_players.insert(mark);
        next
    }

    /// Next state with `mark` removed from the connected set.
    ///
    /// Grid, turn and winner carry over so the game survives a reconnect.
    pub fn without_connected(&self, mark: Mark) -> Self {
        let mut next = self.successor();
        next.connected_players.remove(&mark);
        next
    }

    /// Validates and applies a move by `mark` at wire coordinates `(x, y)`.
    ///
    /// Checks run in a fixed order: the cell must exist, be unset and no
    /// winner may be recorded; then `mark` must hold the turn. The turn
    /// passes to the opponent even when the move ends the round.
    ///
    /// # Errors
    ///
    /// Returns the first failed check. `self` is left untouched.
    #[instrument(skip(self), fields(version = self.version))]
    pub fn play(&self, mark: Mark, x: i64, y: i64) -> Result<Self, IgnoreReason> {
        let pos = Position::from_coords(x, y).ok_or(IgnoreReason::OffGrid)?;
        if !self.field.is_empty(pos) {
            return Err(IgnoreReason::CellOccupied);
        }
        if self.winning_player.is_some() {
            return Err(IgnoreReason::RoundOver);
        }
        if mark != self.player_at_turn {
            return Err(IgnoreReason::NotYourTurn);
        }

        let mut next = self.successor();
        next.field
            .place(pos, mark)
            .map_err(|_| IgnoreReason::CellOccupied)?;
        next.is_board_full = next.field.is_full();
        next.winning_player = next.field.winning_line();
        next.player_at_turn = mark.opponent();
        Ok(next)
    }

    /// Next state for a fresh round; the connected set is preserved.
    pub fn reset_round(&self) -> Self {
        Self {
            field: Grid::reset(),
            player_at_turn: STARTING_MARK,
            is_board_full: false,
            winning_player: None,
            ..self.successor()
        }
    }
}

impl Default for RoundState {
    fn default() -> Self {
        Self::new()
    }
}
