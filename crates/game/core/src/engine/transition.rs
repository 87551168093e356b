//! Action transition dispatch and execution logic.

use crate::action::{Action, ActionKind, ActionTransition, Effect};
use crate::config::GameConfig;
use crate::state::GameState;

use super::errors::{ExecuteError, TransitionPhase, TransitionPhaseError};

/// Executes a transition through the three-phase pipeline and returns its effects.
///
/// Phases:
/// 1. `pre_validate` - Check preconditions before mutation
/// 2. `apply` - Mutate the game state and report effects
/// 3. `post_validate` - Verify postconditions after mutation
#[inline]
fn drive_transition<T>(
    transition: &T,
    state: &mut GameState,
    config: &GameConfig,
) -> Result<Vec<Effect>, TransitionPhaseError<T::Error>>
where
    T: ActionTransition,
{
    transition
        .pre_validate(state, config)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::PreValidate, error))?;

    let effects = transition
        .apply(state, config)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::Apply, error))?;

    transition
        .post_validate(state, config)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::PostValidate, error))?;

    Ok(effects)
}

/// Routes each action kind to its transition.
pub(super) fn execute_transition(
    action: &Action,
    state: &mut GameState,
    config: &GameConfig,
) -> Result<Vec<Effect>, ExecuteError> {
    match &action.kind {
        ActionKind::Roll(transition) => {
            drive_transition(transition, state, config).map_err(ExecuteError::Roll)
        }
        ActionKind::Move(transition) => {
            drive_transition(transition, state, config).map_err(ExecuteError::Move)
        }
        ActionKind::EndRolling(transition) => {
            drive_transition(transition, state, config).map_err(ExecuteError::EndRolling)
        }
    }
}
