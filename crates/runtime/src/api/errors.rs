//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination, lobby requests and the rules
//! engine so clients can bubble them up with consistent context. The
//! `Display` text of lobby errors is what a client sees in `error_message`.
use std::fmt;

use game_core::{ExecuteError, Seat};
use thiserror::Error;
use tokio::sync::oneshot;

use crate::lobby::RoomCode;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("{kind} action provider not set")]
    ProviderNotSet { kind: ProviderKind },

    #[error("action provider channel closed")]
    ActionProviderChannelClosed,

    #[error("worker command channel closed")]
    CommandChannelClosed,

    #[error("worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("Room not found")]
    RoomNotFound { code: RoomCode },

    #[error("Room is full")]
    RoomFull { code: RoomCode },

    #[error("You are not in this room")]
    NotInRoom { code: RoomCode },

    #[error("Game has not started")]
    GameNotStarted { code: RoomCode },

    #[error("Already in a room or queue")]
    AlreadySeated,

    #[error("Seat {seat} is not yours (you play {role})")]
    NotYourSeat { seat: Seat, role: Seat },

    #[error("Room is busy, try again")]
    RoomBusy { code: RoomCode },

    #[error("unknown connection {0}")]
    UnknownConnection(crate::protocol::ConnectionId),

    #[error("Action rejected: {0}")]
    Rejected(#[from] ExecuteError),

    #[error("Malformed message: {0}")]
    MalformedMessage(#[from] serde_json::Error),
}

impl RuntimeError {
    /// True for errors caused by the request itself rather than the runtime.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            RuntimeError::RoomNotFound { .. }
                | RuntimeError::RoomFull { .. }
                | RuntimeError::NotInRoom { .. }
                | RuntimeError::GameNotStarted { .. }
                | RuntimeError::AlreadySeated
                | RuntimeError::NotYourSeat { .. }
                | RuntimeError::RoomBusy { .. }
                | RuntimeError::Rejected(_)
                | RuntimeError::MalformedMessage(_)
        )
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    Human,
    Bot,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ProviderKind::Human => "human",
            ProviderKind::Bot => "bot",
        };
        write!(f, "{}", label)
    }
}
