//! Built-in bot that fills seats without a human.
//!
//! The policy is greedy over the current legal-move set: roll whenever a roll
//! is owed and nothing can move, otherwise take the best-scoring move (see
//! [`scoring`]). Delays are cosmetic pacing only and never influence the
//! choice.

pub mod scoring;

use std::ops::RangeInclusive;
use std::time::Duration;

use async_trait::async_trait;
use game_core::{Action, GameState, Phase, Seat};
use rand::Rng;
use tracing::debug;

use crate::api::{ActionProvider, Result};

/// Pacing of bot turns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotConfig {
    /// Pause before a roll, in milliseconds.
    pub thinking_delay_ms: RangeInclusive<u64>,
    /// Pause before a move, in milliseconds.
    pub moving_delay_ms: RangeInclusive<u64>,
}

impl BotConfig {
    /// No pauses at all.
    pub fn instant() -> Self {
        Self {
            thinking_delay_ms: 0..=0,
            moving_delay_ms: 0..=0,
        }
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            thinking_delay_ms: 1500..=2500,
            moving_delay_ms: 1000..=1800,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BotProvider {
    config: BotConfig,
}

impl BotProvider {
    pub fn new(config: BotConfig) -> Self {
        Self { config }
    }

    /// Pure policy: the action the bot takes for `seat` in `state`.
    pub fn decide(seat: Seat, state: &GameState) -> Action {
        let must_roll = match state.phase {
            Phase::Rolling => true,
            Phase::ExtraMoving => state.legal_moves.is_empty(),
            Phase::NormalMoving | Phase::GameOver => false,
        };
        if must_roll {
            return Action::roll(seat);
        }

        match scoring::best_move(seat, &state.legal_moves) {
            Some(best) => Action::apply_move(seat, best.piece, best.value),
            // Unreachable through the engine; rolling lets the referee reject it.
            None => Action::roll(seat),
        }
    }

    fn delay_for(&self, action: &Action) -> Duration {
        let range = match action.kind {
            game_core::ActionKind::Roll(_) => &self.config.thinking_delay_ms,
            _ => &self.config.moving_delay_ms,
        };
        if range.is_empty() || range.start() == range.end() {
            return Duration::from_millis(*range.start());
        }
        Duration::from_millis(rand::thread_rng().gen_range(range.clone()))
    }
}

#[async_trait]
impl ActionProvider for BotProvider {
    async fn provide_action(&self, seat: Seat, state: &GameState) -> Result<Action> {
        let action = Self::decide(seat, state);
        let delay = self.delay_for(&action);
        debug!(
            target: "runtime::bot",
            seat = %seat,
            action = %action,
            delay_ms = delay.as_millis() as u64,
            "bot decided"
        );

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        Ok(action)
    }
}
