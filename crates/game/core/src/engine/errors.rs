//! Error types for action execution pipeline.

use crate::action::{ActionTransition, EndRollingAction, MoveAction, RollAction};
use crate::error::{ErrorSeverity, GameError};
use crate::state::Seat;

/// Identifies which stage of the transition pipeline produced an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransitionPhase {
    PreValidate,
    Apply,
    PostValidate,
}

impl TransitionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionPhase::PreValidate => "pre_validate",
            TransitionPhase::Apply => "apply",
            TransitionPhase::PostValidate => "post_validate",
        }
    }
}

/// Associates a transition phase with the underlying error.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransitionPhaseError<E> {
    pub phase: TransitionPhase,
    pub error: E,
}

impl<E> TransitionPhaseError<E> {
    pub fn new(phase: TransitionPhase, error: E) -> Self {
        Self { phase, error }
    }
}

impl<E: core::fmt::Display> core::fmt::Display for TransitionPhaseError<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} failed: {}", self.phase.as_str(), self.error)
    }
}

impl<E: core::fmt::Display + core::fmt::Debug> std::error::Error for TransitionPhaseError<E> {}

/// Errors surfaced while executing an action through the game engine.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExecuteError {
    #[error("roll action failed: {0}")]
    Roll(TransitionPhaseError<<RollAction as ActionTransition>::Error>),

    #[error("move action failed: {0}")]
    Move(TransitionPhaseError<<MoveAction as ActionTransition>::Error>),

    #[error("end rolling action failed: {0}")]
    EndRolling(TransitionPhaseError<<EndRollingAction as ActionTransition>::Error>),

    #[error("invalid seat: action seat {seat} does not match current seat {current_seat}")]
    SeatNotCurrent { seat: Seat, current_seat: Seat },

    #[error("game is over")]
    GameOver,
}

impl ExecuteError {
    pub fn seat_not_current(seat: Seat, current_seat: Seat) -> Self {
        Self::SeatNotCurrent { seat, current_seat }
    }

    /// Phase the offending action was rejected in, if it got that far.
    pub fn transition_phase(&self) -> Option<TransitionPhase> {
        match self {
            ExecuteError::Roll(e) => Some(e.phase),
            ExecuteError::Move(e) => Some(e.phase),
            ExecuteError::EndRolling(e) => Some(e.phase),
            ExecuteError::SeatNotCurrent { .. } | ExecuteError::GameOver => None,
        }
    }

    /// True when the rejection came from the game being in the wrong phase.
    pub fn is_out_of_phase(&self) -> bool {
        use crate::action::{EndRollingError, MoveError, RollError};
        matches!(
            self,
            ExecuteError::GameOver
                | ExecuteError::Roll(TransitionPhaseError {
                    error: RollError::WrongPhase { .. },
                    ..
                })
                | ExecuteError::Move(TransitionPhaseError {
                    error: MoveError::WrongPhase { .. },
                    ..
                })
                | ExecuteError::EndRolling(TransitionPhaseError {
                    error: EndRollingError::WrongPhase { .. },
                    ..
                })
        )
    }
}

impl GameError for ExecuteError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            ExecuteError::Roll(e) => e.error.severity(),
            ExecuteError::Move(e) => e.error.severity(),
            ExecuteError::EndRolling(e) => e.error.severity(),
            ExecuteError::SeatNotCurrent { .. } | ExecuteError::GameOver => {
                ErrorSeverity::Recoverable
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            ExecuteError::Roll(e) => e.error.error_code(),
            ExecuteError::Move(e) => e.error.error_code(),
            ExecuteError::EndRolling(e) => e.error.error_code(),
            ExecuteError::SeatNotCurrent { .. } => "SEAT_NOT_CURRENT",
            ExecuteError::GameOver => "GAME_OVER",
        }
    }
}
