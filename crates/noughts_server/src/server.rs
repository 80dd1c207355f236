//! HTTP server assembly.

use crate::config::ServerConfig;
use crate::coordinator::GameCoordinator;
use crate::state::RoundState;
use crate::transport::play_handler;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use tokio::net::TcpListener;
use tracing::{info, instrument};

/// One game served over HTTP.
#[derive(Debug, Clone)]
pub struct GameServer {
    coordinator: GameCoordinator,
    route: String,
}

impl GameServer {
    /// Starts a coordinator configured from `config`.
    ///
    /// Must be called from within a tokio runtime.
    #[instrument(skip(config))]
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            coordinator: GameCoordinator::spawn(config.reset_delay()),
            route: config.route().clone(),
        }
    }

    /// Handle to the running game.
    pub fn coordinator(&self) -> &GameCoordinator {
        &self.coordinator
    }

    /// Builds the router: the WebSocket route plus `/state` and `/health`.
    pub fn router(&self) -> Router {
        Router::new()
            .route(&self.route, get(play_handler))
            .route("/state", get(state_handler))
            .route("/health", get(|| async { "ok" }))
            .with_state(self.coordinator.clone())
    }

    /// Serves until the listener fails; stops the game on the way out.
    pub async fn serve(self, listener: TcpListener) -> std::io::Result<()> {
        let addr = listener.local_addr()?;
        info!(%addr, route = %self.route, "Game server ready");
        let result = axum::serve(listener, self.router()).await;
        self.coordinator.shutdown();
        result
    }
}

async fn state_handler(
    State(coordinator): State<GameCoordinator>,
) -> Result<Json<RoundState>, StatusCode> {
    coordinator
        .snapshot()
        .await
        .map(|state| Json(RoundState::clone(&state)))
        .ok_or(StatusCode::SERVICE_UNAVAILABLE)
}
