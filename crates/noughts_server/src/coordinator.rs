//! Game coordinator: the single writer of round state.
//!
//! All admissions, evictions, moves and resets are commands processed one
//! at a time by a dedicated task. Each accepted command replaces the round
//! snapshot and publishes it before the next command is looked at, so every
//! participant sees committed versions in order.

use crate::broadcast::{AdmitError, Outbox, SessionRegistry};
use crate::state::{IgnoreReason, RoundState};
use crate::timer::{RoundTimer, Ticket};
use noughts_board::Mark;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, instrument, warn};

/// Result of submitting a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The move was placed and a new snapshot published.
    Applied,
    /// The move was dropped; nothing changed.
    Ignored(IgnoreReason),
}

enum Command {
    Admit {
        outbox: Outbox,
        reply: oneshot::Sender<Result<Mark, AdmitError>>,
    },
    Evict {
        mark: Mark,
    },
    ApplyMove {
        mark: Mark,
        x: i64,
        y: i64,
        reply: oneshot::Sender<MoveOutcome>,
    },
    ResetRound(Ticket),
    Snapshot {
        reply: oneshot::Sender<Arc<RoundState>>,
    },
    Shutdown,
}

/// Handle to one running game.
///
/// Cheap to clone; every clone talks to the same game. The game stops when
/// [`shutdown`](Self::shutdown) is called or the last handle is dropped.
#[derive(Debug, Clone)]
pub struct GameCoordinator {
    commands: mpsc::UnboundedSender<Command>,
}

impl GameCoordinator {
    /// Starts a new game whose finished rounds reset after `reset_delay`.
    ///
    /// Must be called from within a tokio runtime.
    #[instrument]
    pub fn spawn(reset_delay: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let actor = Actor {
            state: Arc::new(RoundState::new()),
            sessions: SessionRegistry::new(),
            timer: RoundTimer::new(),
            reset_delay,
            commands: tx.downgrade(),
        };
        tokio::spawn(actor.run(rx));
        info!("Game coordinator started");
        Self { commands: tx }
    }

    /// Binds a connection's outbox to a free mark.
    ///
    /// Every participant, including the new one, receives the updated
    /// snapshot.
    ///
    /// # Errors
    ///
    /// [`AdmitError::CapacityExceeded`] when both marks are held, or
    /// [`AdmitError::Closed`] when the game has stopped.
    pub async fn admit(&self, outbox: Outbox) -> Result<Mark, AdmitError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Admit { outbox, reply });
        rx.await.unwrap_or(Err(AdmitError::Closed))
    }

    /// Frees `mark`. Grid, turn and winner are kept.
    pub fn evict(&self, mark: Mark) {
        self.send(Command::Evict { mark });
    }

    /// Submits a move by `mark` at wire coordinates `(x, y)`.
    ///
    /// Invalid moves are expected races (stale turns, late clicks,
    /// malformed input) and come back as [`MoveOutcome::Ignored`].
    pub async fn apply_move(&self, mark: Mark, x: i64, y: i64) -> MoveOutcome {
        let (reply, rx) = oneshot::channel();
        self.send(Command::ApplyMove { mark, x, y, reply });
        rx.await
            .unwrap_or(MoveOutcome::Ignored(IgnoreReason::CoordinatorClosed))
    }

    /// Returns the latest committed snapshot, or `None` once stopped.
    pub async fn snapshot(&self) -> Option<Arc<RoundState>> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Snapshot { reply });
        rx.await.ok()
    }

    /// Stops the game and cancels any pending reset.
    pub fn shutdown(&self) {
        self.send(Command::Shutdown);
    }

    fn send(&self, command: Command) {
        if self.commands.send(command).is_err() {
            debug!("Coordinator already stopped, command dropped");
        }
    }
}

struct Actor {
    state: Arc<RoundState>,
    sessions: SessionRegistry,
    timer: RoundTimer,
    reset_delay: Duration,
    // Weak so a pending reset does not keep a dropped game alive.
    commands: mpsc::WeakUnboundedSender<Command>,
}

impl Actor {
    async fn run(mut self, mut rx: mpsc::UnboundedReceiver<Command>) {
        while let Some(command) = rx.recv().await {
            match command {
                Command::Admit { outbox, reply } => {
                    let _ = reply.send(self.admit(outbox));
                }
                Command::Evict { mark } => self.evict(mark),
                Command::ApplyMove { mark, x, y, reply } => {
                    let _ = reply.send(self.apply_move(mark, x, y));
                }
                Command::ResetRound(ticket) => {
                    if self.timer.claim(ticket) {
                        self.reset_round();
                    }
                }
                Command::Snapshot { reply } => {
                    let _ = reply.send(Arc::clone(&self.state));
                }
                Command::Shutdown => break,
            }
        }
        self.timer.cancel();
        info!(version = self.state.version(), "Game coordinator stopped");
    }

    fn commit(&mut self, next: RoundState) {
        self.state = Arc::new(next);
        self.sessions.publish(&self.state);
    }

    #[instrument(skip_all)]
    fn admit(&mut self, outbox: Outbox) -> Result<Mark, AdmitError> {
        let mark = self.sessions.admit(outbox)?;
        let next = self.state.with_connected(mark);
        self.commit(next);
        Ok(mark)
    }

    #[instrument(skip(self))]
    fn evict(&mut self, mark: Mark) {
        if !self.sessions.evict(mark) {
            return;
        }
        let next = self.state.without_connected(mark);
        info!(remaining = self.sessions.len(), "Participant left");
        self.commit(next);
    }

    #[instrument(skip(self))]
    fn apply_move(&mut self, mark: Mark, x: i64, y: i64) -> MoveOutcome {
        let next = match self.state.play(mark, x, y) {
            Ok(next) => next,
            Err(reason) => {
                debug!(%reason, "Move ignored");
                return MoveOutcome::Ignored(reason);
            }
        };

        if next.is_round_over() {
            info!(
                winner = ?next.winning_player(),
                board_full = next.is_board_full(),
                "Round over\n{}",
                next.field().display()
            );
            self.schedule_reset();
        }
        self.commit(next);
        MoveOutcome::Applied
    }

    fn schedule_reset(&mut self) {
        let commands = self.commands.clone();
        self.timer.schedule(self.reset_delay, move |ticket| async move {
            match commands.upgrade() {
                Some(tx) => {
                    let _ = tx.send(Command::ResetRound(ticket));
                }
                None => warn!(%ticket, "Reset fired after game stopped"),
            }
        });
    }

    #[instrument(skip(self))]
    fn reset_round(&mut self) {
        let next = self.state.reset_round();
        info!(version = next.version(), "Starting new round");
        self.commit(next);
    }
}
