//! Action domain.
//!
//! A game only ever sees three operations from the seat to act:
//! - `Roll`: throw the sticks (or replay an explicit throw) and grow the roll pool
//! - `Move`: spend one pending value on one piece
//! - `EndRolling`: decline an owed extra roll and commit to moving
//!
//! Each operation is a small struct implementing [`ActionTransition`]; the
//! engine drives it through `pre_validate → apply → post_validate`.
//!
//! # Module Structure
//!
//! - `legal`: legal-move enumeration against the roll pool
//! - `roll`, `movement`, `end_rolling`: the three transitions and their errors
//! - `effect`: observable outcomes returned to presentation layers

mod effect;
mod end_rolling;
mod legal;
mod movement;
mod roll;

pub use effect::{BonusReason, Effect, PassReason};
pub use end_rolling::{EndRollingAction, EndRollingError};
pub use legal::{LegalMove, LegalMoves, legal_moves};
pub use movement::{MoveAction, MoveError};
pub use roll::{RollAction, RollError};

use crate::config::GameConfig;
use crate::rng::RngOracle;
use crate::state::{GameState, Seat, StickThrow};

/// Defines how a concrete action variant mutates game state.
///
/// The acting seat is always `state.current_seat`; the engine has already
/// checked that the action was issued by that seat.
pub trait ActionTransition {
    type Error;

    /// Validates pre-conditions using the state **before** mutation.
    fn pre_validate(&self, _state: &GameState, _config: &GameConfig) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Applies the action by mutating the game state directly and reports
    /// what happened, in order. Implementations may assume `pre_validate`
    /// has already succeeded.
    fn apply(&self, state: &mut GameState, config: &GameConfig)
    -> Result<Vec<Effect>, Self::Error>;

    /// Validates post-conditions using the state **after** mutation.
    fn post_validate(&self, _state: &GameState, _config: &GameConfig) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Operation variants.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ActionKind {
    Roll(RollAction),
    Move(MoveAction),
    EndRolling(EndRollingAction),
}

/// An operation issued on behalf of a seat.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Action {
    pub seat: Seat,
    pub kind: ActionKind,
}

impl Action {
    pub fn new(seat: Seat, kind: ActionKind) -> Self {
        Self { seat, kind }
    }

    /// Roll whose throw is still to be drawn by the authoritative side.
    pub fn roll(seat: Seat) -> Self {
        Self::new(seat, ActionKind::Roll(RollAction::random()))
    }

    pub fn roll_with(seat: Seat, throw: StickThrow) -> Self {
        Self::new(seat, ActionKind::Roll(RollAction::with_throw(throw)))
    }

    pub fn apply_move(seat: Seat, piece: usize, value: u8) -> Self {
        Self::new(seat, ActionKind::Move(MoveAction::new(piece, value)))
    }

    pub fn end_rolling(seat: Seat) -> Self {
        Self::new(seat, ActionKind::EndRolling(EndRollingAction))
    }

    /// False only for a roll that has no throw yet.
    pub fn is_resolved(&self) -> bool {
        match &self.kind {
            ActionKind::Roll(roll) => roll.throw.is_some(),
            ActionKind::Move(_) | ActionKind::EndRolling(_) => true,
        }
    }

    /// Draws the throw for an unresolved roll; other actions pass through.
    pub fn resolve(self, rng: &mut dyn RngOracle) -> Self {
        match self.kind {
            ActionKind::Roll(roll) if roll.throw.is_none() => {
                Self::roll_with(self.seat, rng.throw_sticks())
            }
            kind => Self::new(self.seat, kind),
        }
    }
}

impl core::fmt::Display for Action {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match &self.kind {
            ActionKind::Roll(RollAction { throw: Some(t), .. }) => {
                write!(f, "{} roll {}", self.seat, t.value())
            }
            ActionKind::Roll(_) => write!(f, "{} roll", self.seat),
            ActionKind::Move(m) => write!(f, "{} move piece {} by {}", self.seat, m.piece, m.value),
            ActionKind::EndRolling(_) => write!(f, "{} end rolling", self.seat),
        }
    }
}
