//! Asynchronous abstraction for sourcing seat intent.
//!
//! Runtime users plug in [`ActionProvider`] implementations so a game can run
//! with human input, scripted fixtures, or the bot policy.
use std::collections::VecDeque;

use async_trait::async_trait;
use game_core::{Action, GameState, Seat};
use tokio::sync::{Mutex, mpsc};

use super::errors::{Result, RuntimeError};

/// Trait for providing actions based on the current game state.
///
/// Different implementations can handle:
/// - Human input (from UI/CLI)
/// - Bot decisions
/// - Scripted/replayed actions
#[async_trait]
pub trait ActionProvider: Send + Sync {
    /// Provide an action for `seat`, which is the seat to act in `state`.
    ///
    /// Rolls may be returned unresolved; the runtime draws the throw.
    async fn provide_action(&self, seat: Seat, state: &GameState) -> Result<Action>;
}

/// Forwards actions pushed by a UI through an mpsc channel.
pub struct ChannelActionProvider {
    rx: Mutex<mpsc::Receiver<Action>>,
}

impl ChannelActionProvider {
    /// Returns the provider and the sender the UI pushes intents into.
    pub fn new(buffer: usize) -> (Self, mpsc::Sender<Action>) {
        let (tx, rx) = mpsc::channel(buffer);
        (Self { rx: Mutex::new(rx) }, tx)
    }
}

#[async_trait]
impl ActionProvider for ChannelActionProvider {
    async fn provide_action(&self, _seat: Seat, _state: &GameState) -> Result<Action> {
        self.rx
            .lock()
            .await
            .recv()
            .await
            .ok_or(RuntimeError::ActionProviderChannelClosed)
    }
}

/// Replays a fixed list of actions in order.
pub struct ScriptedActionProvider {
    script: Mutex<VecDeque<Action>>,
}

impl ScriptedActionProvider {
    pub fn new(actions: impl IntoIterator<Item = Action>) -> Self {
        Self {
            script: Mutex::new(actions.into_iter().collect()),
        }
    }

    pub async fn remaining(&self) -> usize {
        self.script.lock().await.len()
    }
}

#[async_trait]
impl ActionProvider for ScriptedActionProvider {
    async fn provide_action(&self, _seat: Seat, _state: &GameState) -> Result<Action> {
        self.script
            .lock()
            .await
            .pop_front()
            .ok_or(RuntimeError::ActionProviderChannelClosed)
    }
}
