//! Runtime orchestration for the stick race game.
//!
//! This crate wires the deterministic rules from `game-core` into async
//! actors. Two entry points exist:
//! - [`Runtime`] drives one local game, sourcing each seat's intent from an
//!   [`ActionProvider`] (a human channel or the built-in bot)
//! - [`Lobby`] is the session orchestrator: matchmaking queue, private rooms
//!   and one authoritative room actor per started game
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the local runner and its builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides the topic-based event bus for the local runner
//! - [`lobby`] and [`protocol`] form the networked surface
//! - [`mirror`] keeps a client-side copy of a room's game in sync
//! - `workers` keeps background tasks internal to the crate
pub mod api;
pub mod events;
pub mod lobby;
pub mod mirror;
pub mod protocol;
pub mod providers;
pub mod referee;
pub mod runtime;

mod workers;

pub use api::{
    ActionProvider, ChannelActionProvider, ProviderKind, Result, RuntimeError, RuntimeHandle,
    ScriptedActionProvider,
};
pub use events::{Event, EventBus, GameStateEvent, Topic, TurnEvent};
pub use lobby::{Lobby, LobbyConfig, LobbyHandle, LobbyStats, RoomCode};
pub use mirror::ClientMirror;
pub use protocol::{ClientMessage, ConnectionId, PlayerInfo, ServerMessage};
pub use providers::{BotConfig, BotProvider};
pub use referee::Referee;
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
