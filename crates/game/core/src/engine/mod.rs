//! Action execution pipeline.
//!
//! The [`GameEngine`] is the authoritative reducer for [`GameState`]. It
//! checks the acting seat, drives the matching transition through its phases
//! and surfaces rich error information for the runtime.
//!
//! Two pure wrappers sit on top of it:
//! - [`apply`] takes an immutable state and returns a fresh one plus effects
//! - [`apply_or_ignore`] is total: any rejected action yields the input state
//!   unchanged and no effects

mod errors;
mod transition;
pub(crate) mod turns;

pub use errors::{ExecuteError, TransitionPhase, TransitionPhaseError};

use crate::action::{Action, Effect};
use crate::config::GameConfig;
use crate::state::GameState;

/// Complete outcome of action execution.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExecutionOutcome {
    /// What happened, in order.
    pub effects: Vec<Effect>,
}

/// Result of the pure transition function.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    pub state: GameState,
    pub effects: Vec<Effect>,
}

/// Game engine that validates and executes actions against a borrowed state.
///
/// All state mutations flow through the three-phase action pipeline:
/// pre_validate → apply → post_validate
///
/// Execution is atomic: the pipeline runs on a scratch copy that replaces
/// the borrowed state only once every phase has succeeded.
pub struct GameEngine<'a> {
    state: &'a mut GameState,
    config: &'a GameConfig,
}

impl<'a> GameEngine<'a> {
    pub fn new(state: &'a mut GameState, config: &'a GameConfig) -> Self {
        Self { state, config }
    }

    /// Executes an action by routing it through the appropriate transition pipeline.
    ///
    /// Rejects every action once the game is over and any action whose seat
    /// is not `state.current_seat`. Rolls must already carry their throw
    /// (see [`Action::resolve`]).
    pub fn execute(&mut self, action: &Action) -> Result<ExecutionOutcome, ExecuteError> {
        if self.state.is_over() {
            return Err(ExecuteError::GameOver);
        }
        self.validate_seat(action)?;

        let mut scratch = self.state.clone();
        let effects = transition::execute_transition(action, &mut scratch, self.config)?;
        scratch.nonce += 1;
        *self.state = scratch;

        Ok(ExecutionOutcome { effects })
    }

    fn validate_seat(&self, action: &Action) -> Result<(), ExecuteError> {
        let current_seat = self.state.current_seat;
        if action.seat != current_seat {
            return Err(ExecuteError::seat_not_current(action.seat, current_seat));
        }
        Ok(())
    }
}

/// Pure transition: `state` is left untouched and the successor is returned.
pub fn apply(
    state: &GameState,
    config: &GameConfig,
    action: &Action,
) -> Result<Transition, ExecuteError> {
    let mut next = state.clone();
    let outcome = GameEngine::new(&mut next, config).execute(action)?;
    Ok(Transition {
        state: next,
        effects: outcome.effects,
    })
}

/// Total transition: invalid actions are ignored.
pub fn apply_or_ignore(
    state: &GameState,
    config: &GameConfig,
    action: &Action,
) -> (GameState, Vec<Effect>) {
    match apply(state, config, action) {
        Ok(Transition { state, effects }) => (state, effects),
        Err(_) => (state.clone(), Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{MoveError, RollError};
    use crate::error::{ErrorSeverity, GameError};
    use crate::state::{Phase, Seat, StickThrow};

    const EIGHT: StickThrow = StickThrow::new([true; 4]);

    #[test]
    fn execute_counts_accepted_actions() {
        let config = GameConfig::default();
        let mut state = GameState::default();
        let mut engine = GameEngine::new(&mut state, &config);

        engine.execute(&Action::roll_with(Seat::P1, EIGHT)).unwrap();
        engine.execute(&Action::apply_move(Seat::P1, 0, 8)).unwrap();

        assert_eq!(state.nonce, 2);
    }

    #[test]
    fn wrong_seat_is_rejected_before_any_phase() {
        let config = GameConfig::default();
        let mut state = GameState::default();

        let err = GameEngine::new(&mut state, &config)
            .execute(&Action::roll_with(Seat::P2, EIGHT))
            .unwrap_err();

        assert_eq!(
            err,
            ExecuteError::SeatNotCurrent {
                seat: Seat::P2,
                current_seat: Seat::P1
            }
        );
        assert_eq!(err.transition_phase(), None);
        assert_eq!(state, GameState::default());
    }

    #[test]
    fn errors_record_the_failing_phase() {
        let config = GameConfig::default();
        let state = GameState::default();

        let err = apply(&state, &config, &Action::apply_move(Seat::P1, 0, 4)).unwrap_err();

        assert_eq!(err.transition_phase(), Some(TransitionPhase::PreValidate));
        assert!(err.is_out_of_phase());
        assert_eq!(err.error_code(), "MOVE_WRONG_PHASE");
        assert!(matches!(
            err,
            ExecuteError::Move(TransitionPhaseError {
                error: MoveError::WrongPhase { .. },
                ..
            })
        ));
    }

    #[test]
    fn unresolved_rolls_are_validation_errors() {
        let config = GameConfig::default();
        let state = GameState::default();

        let err = apply(&state, &config, &Action::roll(Seat::P1)).unwrap_err();

        assert_eq!(err.severity(), ErrorSeverity::Validation);
        assert!(!err.severity().is_internal());
        assert!(matches!(
            err,
            ExecuteError::Roll(TransitionPhaseError {
                error: RollError::UnresolvedThrow,
                ..
            })
        ));
    }

    #[test]
    fn apply_does_not_alias_the_input() {
        let config = GameConfig::default();
        let before = GameState::default();

        let transition = apply(&before, &config, &Action::roll_with(Seat::P1, EIGHT)).unwrap();

        assert_eq!(before, GameState::default());
        assert_eq!(transition.state.phase, Phase::ExtraMoving);
        assert_eq!(transition.state.nonce, 1);
    }

    #[test]
    fn apply_or_ignore_is_total() {
        let config = GameConfig::default();
        let state = GameState::default();

        let (next, effects) =
            apply_or_ignore(&state, &config, &Action::apply_move(Seat::P1, 3, 2));

        assert_eq!(next, state);
        assert!(effects.is_empty());
    }

    #[test]
    fn finished_games_accept_nothing() {
        let config = GameConfig::default();
        let mut state = GameState::default();
        state.phase = Phase::GameOver;

        let err = apply(&state, &config, &Action::roll_with(Seat::P1, EIGHT)).unwrap_err();
        assert_eq!(err, ExecuteError::GameOver);
    }
}
