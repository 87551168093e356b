//! Event types for different topics.

use game_core::{Action, Effect, GameState, Seat, TransitionPhase};
use serde::{Deserialize, Serialize};

/// Events related to game state changes (actions, failures)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GameStateEvent {
    /// An action was executed; `action` carries the resolved throw for rolls.
    ActionExecuted {
        nonce: u64,
        action: Action,
        effects: Vec<Effect>,
        after_state: Box<GameState>,
    },

    /// An action was rejected by the rules engine.
    ActionRejected {
        nonce: u64,
        action: Action,
        phase: Option<TransitionPhase>,
        error: String,
    },
}

/// Events related to turn management (lightweight)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnEvent {
    /// The dice moved to another seat.
    TurnPassed { from: Seat, to: Seat },
    /// The same seat owes another roll.
    RollAgain { seat: Seat },
    /// Terminal: `winner` moved all four pieces to the center.
    GameOver { winner: Seat },
}

impl TurnEvent {
    /// Turn-level events implied by a transition's effects, in order.
    pub fn from_effects(effects: &[Effect]) -> Vec<TurnEvent> {
        effects
            .iter()
            .filter_map(|effect| match *effect {
                Effect::TurnPassed { from, to, .. } => Some(TurnEvent::TurnPassed { from, to }),
                Effect::RollAgain { seat } => Some(TurnEvent::RollAgain { seat }),
                Effect::GameWon { seat } => Some(TurnEvent::GameOver { winner: seat }),
                _ => None,
            })
            .collect()
    }
}
