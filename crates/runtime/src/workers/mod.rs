//! Worker tasks that back the runtime orchestration.
//!
//! The game worker executes the local runner's commands. The lobby worker
//! owns sessions and spawns one room worker per started game.

mod game;
mod lobby;
mod room;

pub use game::{GameCommand, GameWorker};
pub use lobby::{LobbyCommand, LobbyWorker};
