use crate::action::{ActionTransition, Effect, PassReason, legal_moves};
use crate::config::GameConfig;
use crate::engine::turns::pass_turn;
use crate::error::{ErrorSeverity, GameError};
use crate::state::{GameState, Phase, StickThrow};

/// Errors that can occur while rolling.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RollError {
    #[error("cannot roll during {phase}")]
    WrongPhase { phase: Phase },

    #[error("roll has no throw; resolve it before execution")]
    UnresolvedThrow,

    #[error("claimed value {claimed} does not match the sticks (value {actual})")]
    InvalidThrow { claimed: u8, actual: u8 },

    #[error("high roll streak reached {streak} without forfeiting")]
    StreakOverflow { streak: u8 },
}

impl GameError for RollError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            RollError::WrongPhase { .. } => ErrorSeverity::Recoverable,
            RollError::UnresolvedThrow | RollError::InvalidThrow { .. } => {
                ErrorSeverity::Validation
            }
            RollError::StreakOverflow { .. } => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            RollError::WrongPhase { .. } => "ROLL_WRONG_PHASE",
            RollError::UnresolvedThrow => "ROLL_UNRESOLVED_THROW",
            RollError::InvalidThrow { .. } => "ROLL_INVALID_THROW",
            RollError::StreakOverflow { .. } => "ROLL_STREAK_OVERFLOW",
        }
    }
}

/// Throws the sticks and adds the value to the roll pool.
///
/// The throw travels with the action so that every replica applies the same
/// value. `value` is optional and, when present, must agree with the sticks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RollAction {
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub throw: Option<StickThrow>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub value: Option<u8>,
}

impl RollAction {
    pub fn random() -> Self {
        Self::default()
    }

    pub fn with_throw(throw: StickThrow) -> Self {
        Self {
            throw: Some(throw),
            value: Some(throw.value()),
        }
    }
}

impl ActionTransition for RollAction {
    type Error = RollError;

    fn pre_validate(&self, state: &GameState, _config: &GameConfig) -> Result<(), Self::Error> {
        if !state.phase.can_roll() {
            return Err(RollError::WrongPhase { phase: state.phase });
        }
        let throw = self.throw.ok_or(RollError::UnresolvedThrow)?;
        if let Some(claimed) = self.value
            && claimed != throw.value()
        {
            return Err(RollError::InvalidThrow {
                claimed,
                actual: throw.value(),
            });
        }
        Ok(())
    }

    fn apply(
        &self,
        state: &mut GameState,
        config: &GameConfig,
    ) -> Result<Vec<Effect>, Self::Error> {
        let throw = self.throw.ok_or(RollError::UnresolvedThrow)?;
        let seat = state.current_seat;
        let value = throw.value();
        let mut effects = vec![Effect::Rolled { seat, throw, value }];

        state.last_roll = Some(throw);

        if throw.is_high() {
            state.high_roll_streak += 1;
            if state.high_roll_streak >= GameConfig::HIGH_ROLL_FORFEIT {
                effects.push(Effect::Forfeited { seat });
                effects.push(pass_turn(state, config, PassReason::Forfeit));
                state.status = format!(
                    "Three {value}s in a row! Bust! Turn forfeited. {}'s turn.",
                    state.current_seat.name()
                );
                return Ok(effects);
            }
            state.phase = Phase::ExtraMoving;
        } else {
            state.high_roll_streak = 0;
            state.phase = Phase::NormalMoving;
        }

        state.roll_pool.push_value(value);
        state.status = match value {
            8 => format!("Changa! {} rolled 8!", seat.name()),
            4 => format!("Chakkhan! {} rolled 4!", seat.name()),
            _ => format!("{} rolled {value}", seat.name()),
        };
        state.legal_moves = legal_moves(state);

        if state.legal_moves.is_empty() && state.phase == Phase::NormalMoving {
            effects.push(pass_turn(state, config, PassReason::NoLegalMoves));
            state.status.push_str(&format!(
                ". No valid moves. {}'s turn.",
                state.current_seat.name()
            ));
        }

        Ok(effects)
    }

    fn post_validate(&self, state: &GameState, _config: &GameConfig) -> Result<(), Self::Error> {
        if state.high_roll_streak >= GameConfig::HIGH_ROLL_FORFEIT {
            return Err(RollError::StreakOverflow {
                streak: state.high_roll_streak,
            });
        }
        Ok(())
    }
}
