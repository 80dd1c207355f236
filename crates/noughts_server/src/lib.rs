//! Noughts server - realtime two-player game coordinator.
//!
//! # Architecture
//!
//! - **Coordinator**: single-writer task owning the round state
//! - **Timer**: cancellable deferred round reset
//! - **Broadcast**: session registry with per-participant outbound queues
//! - **Transport**: WebSocket adapter (axum) and text codec
//!
//! # Example
//!
//! ```no_run
//! use noughts_server::{GameServer, ServerConfig};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ServerConfig::default();
//! let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
//! GameServer::new(&config).serve(listener).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod broadcast;
mod config;
mod coordinator;
mod server;
mod state;
mod timer;
pub mod transport;

// Crate-level exports - Coordinator
pub use coordinator::{GameCoordinator, MoveOutcome};

// Crate-level exports - Round state
pub use state::{IgnoreReason, RoundState, STARTING_MARK};

// Crate-level exports - Broadcast
pub use broadcast::{AdmitError, DeliveryError, Inbox, Outbox, SessionRegistry};

// Crate-level exports - Timer
pub use timer::{RoundTimer, Ticket};

// Crate-level exports - Server and config
pub use config::{ConfigError, ServerConfig};
pub use server::GameServer;

// Crate-level exports - Grid types
pub use noughts_board::{Grid, Mark, Position};
