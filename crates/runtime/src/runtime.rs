//! Local game runner.
//!
//! The runtime owns the game worker, wires up command/event channels, and
//! exposes a builder-based API for driving one game on this machine: human
//! seats read intents from a provider (usually a UI channel), every other
//! seat is played by the bot.

use std::collections::BTreeSet;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use game_core::{ExecutionOutcome, GameConfig, GameState, Seat};

use crate::api::{ActionProvider, ProviderKind, Result, RuntimeError, RuntimeHandle};
use crate::events::EventBus;
use crate::providers::{BotConfig, BotProvider};
use crate::referee::Referee;
use crate::workers::GameWorker;

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub game_config: GameConfig,
    pub bot: BotConfig,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
    /// Seeds the stick RNG; random when unset.
    pub seed: Option<u64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            game_config: GameConfig::default(),
            bot: BotConfig::default(),
            event_buffer_size: 100,
            command_buffer_size: 32,
            seed: None,
        }
    }
}

/// Main runtime that orchestrates one local game.
///
/// [`RuntimeHandle`] provides a cloneable façade for clients.
pub struct Runtime {
    handle: RuntimeHandle,
    human_seats: BTreeSet<Seat>,
    human_provider: Option<Box<dyn ActionProvider>>,
    bot_provider: Box<dyn ActionProvider>,
    worker_handle: JoinHandle<()>,
}

impl Runtime {
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    pub fn provider_kind(&self, seat: Seat) -> ProviderKind {
        if self.human_seats.contains(&seat) {
            ProviderKind::Human
        } else {
            ProviderKind::Bot
        }
    }

    /// Asks the seat to act for its intent and executes it.
    pub async fn step(&mut self) -> Result<ExecutionOutcome> {
        let snapshot = self.handle.query_state().await?;
        let seat = snapshot.current_seat;

        let provider = match self.provider_kind(seat) {
            ProviderKind::Human => self
                .human_provider
                .as_deref()
                .ok_or(RuntimeError::ProviderNotSet {
                    kind: ProviderKind::Human,
                })?,
            ProviderKind::Bot => &*self.bot_provider,
        };

        let action = provider.provide_action(seat, &snapshot).await?;
        self.handle.execute_action(action).await
    }

    /// Plays until a seat wins. Rejected actions are logged and the seat is
    /// asked again.
    pub async fn run_until_game_over(&mut self) -> Result<Seat> {
        loop {
            let state = self.handle.query_state().await?;
            if let Some(winner) = state.winner() {
                info!(target: "runtime::game", winner = %winner, nonce = state.nonce, "local game finished");
                return Ok(winner);
            }

            match self.step().await {
                Ok(_) => {}
                Err(RuntimeError::Rejected(error)) => {
                    warn!(target: "runtime::game", seat = %state.current_seat, error = %error, "action rejected");
                }
                Err(error) => return Err(error),
            }
        }
    }

    /// Shutdown the runtime gracefully
    ///
    /// Handles cloned from this runtime may outlive it; their commands fail
    /// once the worker has stopped.
    pub async fn shutdown(self) -> Result<()> {
        if self.handle.shutdown().await.is_err() {
            debug!(target: "runtime::game", "game worker already stopped");
        }
        self.worker_handle.await.map_err(RuntimeError::WorkerJoin)
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    state: Option<GameState>,
    human_seats: BTreeSet<Seat>,
    human_provider: Option<Box<dyn ActionProvider>>,
    bot_provider: Option<Box<dyn ActionProvider>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            state: None,
            human_seats: BTreeSet::new(),
            human_provider: None,
            bot_provider: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Start from a given position instead of a fresh game.
    pub fn initial_state(mut self, state: GameState) -> Self {
        self.state = Some(state);
        self
    }

    /// Seats whose intents come from the human provider.
    pub fn human_seats(mut self, seats: impl IntoIterator<Item = Seat>) -> Self {
        self.human_seats = seats.into_iter().collect();
        self
    }

    pub fn human_provider(mut self, provider: impl ActionProvider + 'static) -> Self {
        self.human_provider = Some(Box::new(provider));
        self
    }

    /// Replace the built-in bot for non-human seats.
    pub fn bot_provider(mut self, provider: impl ActionProvider + 'static) -> Self {
        self.bot_provider = Some(Box::new(provider));
        self
    }

    /// Build the runtime and spawn its game worker.
    pub fn build(self) -> Result<Runtime> {
        if !self.human_seats.is_empty() && self.human_provider.is_none() {
            return Err(RuntimeError::ProviderNotSet {
                kind: ProviderKind::Human,
            });
        }

        let RuntimeConfig {
            game_config,
            bot,
            event_buffer_size,
            command_buffer_size,
            seed,
        } = self.config;

        let referee = match self.state {
            Some(state) => Referee::with_state(state, game_config, seed),
            None => Referee::new(game_config, seed),
        };

        let (command_tx, command_rx) = mpsc::channel(command_buffer_size);
        let event_bus = EventBus::with_capacity(event_buffer_size);
        let handle = RuntimeHandle::new(command_tx, event_bus.clone());

        let worker = GameWorker::new(referee, command_rx, event_bus);
        let worker_handle = tokio::spawn(worker.run());

        Ok(Runtime {
            handle,
            human_seats: self.human_seats,
            human_provider: self.human_provider,
            bot_provider: self
                .bot_provider
                .unwrap_or_else(|| Box::new(BotProvider::new(bot))),
            worker_handle,
        })
    }
}
