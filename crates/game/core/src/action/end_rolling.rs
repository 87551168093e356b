use crate::action::{ActionTransition, Effect, PassReason, legal_moves};
use crate::config::GameConfig;
use crate::engine::turns::pass_turn;
use crate::error::{ErrorSeverity, GameError};
use crate::state::{GameState, Phase};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EndRollingError {
    #[error("no extra roll is owed during {phase}")]
    WrongPhase { phase: Phase },
}

impl GameError for EndRollingError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn error_code(&self) -> &'static str {
        "END_ROLLING_WRONG_PHASE"
    }
}

/// Declines the owed extra roll and commits to spending the pool.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EndRollingAction;

impl ActionTransition for EndRollingAction {
    type Error = EndRollingError;

    fn pre_validate(&self, state: &GameState, _config: &GameConfig) -> Result<(), Self::Error> {
        if state.phase != Phase::ExtraMoving {
            return Err(EndRollingError::WrongPhase { phase: state.phase });
        }
        Ok(())
    }

    fn apply(
        &self,
        state: &mut GameState,
        config: &GameConfig,
    ) -> Result<Vec<Effect>, Self::Error> {
        state.legal_moves = legal_moves(state);
        if state.legal_moves.is_empty() {
            let effect = pass_turn(state, config, PassReason::NoLegalMoves);
            state.status = format!("No valid moves. {}'s turn.", state.current_seat.name());
            return Ok(vec![effect]);
        }

        state.phase = Phase::NormalMoving;
        state.status = format!("{} stopped rolling.", state.current_seat.name());
        Ok(Vec::new())
    }
}
