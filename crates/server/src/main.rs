//! WebSocket server for the stick race game.
//!
//! Accepts connections, hands each one to its own task and routes every
//! request through the lobby actor from the `runtime` crate.

mod config;
mod connection;

use anyhow::{Context, Result};
use runtime::Lobby;
use tokio::net::TcpListener;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::ServerConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    setup_logging();

    let config = ServerConfig::from_env();
    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    let lobby = Lobby::start(config.lobby.clone());
    let handle = lobby.handle();
    tracing::info!(
        %addr,
        bonus_on_capture = config.lobby.game_config.bonus_on_capture,
        bonus_on_entry = config.lobby.game_config.bonus_on_entry,
        "server listening"
    );

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (stream, peer) = match accepted {
                    Ok(accepted) => accepted,
                    Err(error) => {
                        tracing::warn!(%error, "accept failed");
                        continue;
                    }
                };
                let lobby = handle.clone();
                tokio::spawn(async move {
                    if let Err(error) = connection::serve(stream, peer, lobby).await {
                        tracing::warn!(target: "server::connection", %peer, error = %format!("{error:#}"), "connection ended with error");
                    }
                });
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("shutdown requested");
                break;
            }
        }
    }

    let stats = handle.stats().await?;
    tracing::info!(
        connected = stats.connected,
        rooms = stats.rooms,
        queued = stats.queued,
        "stopping lobby"
    );
    lobby.shutdown().await?;
    Ok(())
}

/// Logs to stderr; `RUST_LOG` refines the INFO default.
fn setup_logging() {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
