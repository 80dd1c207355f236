//! Noughts - game server binary.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use noughts_server::{GameServer, ServerConfig};
use tracing::{info, instrument};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            config,
            host,
            port,
            reset_delay_ms,
        } => {
            initialize_tracing();
            let config = ServerConfig::load(config.as_deref())?
                .with_overrides(host, port, reset_delay_ms);
            run_server(config).await
        }
        Command::Config { config } => {
            let config = ServerConfig::load(config.as_deref())?;
            print!("{}", toml::to_string(&config)?);
            Ok(())
        }
    }
}

/// Run the game server until interrupted.
#[instrument(skip_all, fields(addr = %config.bind_addr()))]
async fn run_server(config: ServerConfig) -> Result<()> {
    info!("Starting noughts game server");

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    let server = GameServer::new(&config);
    let coordinator = server.coordinator().clone();

    tokio::select! {
        result = server.serve(listener) => result?,
        _ = tokio::signal::ctrl_c() => {
            info!("Shutting down");
            coordinator.shutdown();
        }
    }

    Ok(())
}

fn initialize_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,noughts_server=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
