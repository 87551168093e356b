//! Session orchestrator.
//!
//! The lobby is one actor owning the matchmaking queue, the room registry and
//! the set of live connections. Each room whose game has started gets its
//! own room actor holding the authoritative rules engine, so rooms never
//! contend with each other once play begins.
//!
//! Connections talk to the lobby through a cloneable [`LobbyHandle`]; the
//! lobby answers by pushing [`ServerMessage`]s into each connection's
//! outbound channel.

mod room_code;

pub use room_code::RoomCode;

use game_core::GameConfig;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::api::{Result, RuntimeError};
use crate::protocol::{ClientMessage, ConnectionId, ServerMessage};
use crate::workers::{LobbyCommand, LobbyWorker};

/// Orchestrator configuration.
#[derive(Debug, Clone)]
pub struct LobbyConfig {
    /// Length of generated private room codes.
    pub room_code_len: usize,
    /// Capacity of the lobby's command channel.
    pub command_buffer_size: usize,
    /// Capacity of each room actor's command channel.
    pub room_command_buffer_size: usize,
    /// Rules used by every room.
    pub game_config: GameConfig,
    /// Seeds room codes and every room's stick RNG; random when unset.
    pub seed: Option<u64>,
}

impl LobbyConfig {
    /// Seats per room, and the matchmaking batch size.
    pub const ROOM_SIZE: usize = GameConfig::SEATS;
}

impl Default for LobbyConfig {
    fn default() -> Self {
        Self {
            room_code_len: 6,
            command_buffer_size: 256,
            room_command_buffer_size: 32,
            game_config: GameConfig::default(),
            seed: None,
        }
    }
}

/// Snapshot of the lobby's bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LobbyStats {
    pub queued: usize,
    pub rooms: usize,
    pub connected: usize,
}

/// Running orchestrator: owns the lobby task.
pub struct Lobby {
    handle: LobbyHandle,
    worker: JoinHandle<()>,
}

impl Lobby {
    pub fn start(config: LobbyConfig) -> Self {
        let (command_tx, command_rx) = mpsc::channel(config.command_buffer_size);
        let worker = LobbyWorker::new(config, command_tx.downgrade(), command_rx);
        let worker = tokio::spawn(worker.run());

        Self {
            handle: LobbyHandle { command_tx },
            worker,
        }
    }

    pub fn handle(&self) -> LobbyHandle {
        self.handle.clone()
    }

    /// Stops the lobby; room actors end once their last handle is dropped.
    pub async fn shutdown(self) -> Result<()> {
        self.handle
            .command_tx
            .send(LobbyCommand::Shutdown)
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;
        self.worker.await.map_err(RuntimeError::WorkerJoin)
    }
}

/// Client-facing handle to the lobby actor.
#[derive(Clone)]
pub struct LobbyHandle {
    command_tx: mpsc::Sender<LobbyCommand>,
}

impl LobbyHandle {
    /// Registers a connection whose messages will be pushed into `outbound`.
    pub async fn connect(
        &self,
        outbound: mpsc::UnboundedSender<ServerMessage>,
    ) -> Result<ConnectionId> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(LobbyCommand::Connect {
                outbound,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Removes a connection from the queue and from its room.
    pub async fn disconnect(&self, id: ConnectionId) -> Result<()> {
        self.command_tx
            .send(LobbyCommand::Disconnect { id })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)
    }

    /// Routes one client request. Failures are reported to the client as
    /// `error_message`, not returned here.
    pub async fn handle_message(&self, id: ConnectionId, message: ClientMessage) -> Result<()> {
        self.command_tx
            .send(LobbyCommand::Message { id, message })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)
    }

    pub async fn stats(&self) -> Result<LobbyStats> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(LobbyCommand::Stats { reply: reply_tx })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }
}
