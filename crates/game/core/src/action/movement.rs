use crate::action::{ActionTransition, BonusReason, Effect, LegalMove};
use crate::board;
use crate::config::GameConfig;
use crate::engine::turns::settle_pool;
use crate::error::{ErrorSeverity, GameError};
use crate::state::{GameState, Phase, PiecePosition, Seat};

/// Errors that can occur while moving a piece.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MoveError {
    #[error("cannot move during {phase}")]
    WrongPhase { phase: Phase },

    #[error("piece {piece} cannot move by {value}")]
    NotLegal { piece: usize, value: u8 },

    #[error("value {value} left the pool before it was spent")]
    ValueMissing { value: u8 },

    #[error("piece {piece} ended at {position}, which is off the board")]
    OffBoard { piece: usize, position: PiecePosition },
}

impl GameError for MoveError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            MoveError::WrongPhase { .. } => ErrorSeverity::Recoverable,
            MoveError::NotLegal { .. } => ErrorSeverity::Validation,
            MoveError::ValueMissing { .. } | MoveError::OffBoard { .. } => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            MoveError::WrongPhase { .. } => "MOVE_WRONG_PHASE",
            MoveError::NotLegal { .. } => "MOVE_NOT_LEGAL",
            MoveError::ValueMissing { .. } => "MOVE_VALUE_MISSING",
            MoveError::OffBoard { .. } => "MOVE_OFF_BOARD",
        }
    }
}

/// Spends one pending value on one of the acting seat's pieces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveAction {
    pub piece: usize,
    pub value: u8,
}

impl MoveAction {
    pub fn new(piece: usize, value: u8) -> Self {
        Self { piece, value }
    }

    fn legal(&self, state: &GameState) -> Result<LegalMove, MoveError> {
        state
            .find_legal(self.piece, self.value)
            .ok_or(MoveError::NotLegal {
                piece: self.piece,
                value: self.value,
            })
    }
}

impl ActionTransition for MoveAction {
    type Error = MoveError;

    fn pre_validate(&self, state: &GameState, _config: &GameConfig) -> Result<(), Self::Error> {
        if !state.phase.can_move() {
            return Err(MoveError::WrongPhase { phase: state.phase });
        }
        self.legal(state).map(|_| ())
    }

    fn apply(
        &self,
        state: &mut GameState,
        config: &GameConfig,
    ) -> Result<Vec<Effect>, Self::Error> {
        let legal = self.legal(state)?;
        let seat = state.current_seat;

        if !state.roll_pool.take_value(legal.value) {
            return Err(MoveError::ValueMissing { value: legal.value });
        }
        state.set_position(seat, legal.piece, legal.to);
        state.status = format!("{} moved.", seat.name());

        let mut effects = vec![Effect::PieceMoved {
            seat,
            piece: legal.piece,
            from: legal.from,
            to: legal.to,
        }];

        if !legal.to.is_home() {
            capture_at(state, config, seat, legal.to, &mut effects);
        }

        if state.pieces_of(seat).iter().all(|p| p.is_home()) {
            state.phase = Phase::GameOver;
            state.legal_moves.clear();
            state.status = format!("{} WINS!", seat.name());
            effects.push(Effect::GameWon { seat });
            return Ok(effects);
        }

        if legal.to.is_home() {
            effects.push(Effect::PieceHome {
                seat,
                piece: legal.piece,
            });
            if config.bonus_on_entry {
                state.roll_pool.grant_bonus();
                state.phase = Phase::ExtraMoving;
                state.status = format!("{} reached the center! Bonus roll!", seat.name());
                effects.push(Effect::BonusGranted {
                    seat,
                    reason: BonusReason::Center,
                });
            }
        }

        effects.extend(settle_pool(state, config));
        Ok(effects)
    }

    fn post_validate(&self, state: &GameState, _config: &GameConfig) -> Result<(), Self::Error> {
        for seat in Seat::ALL {
            for (piece, &position) in state.pieces_of(seat).iter().enumerate() {
                if position.get() < PiecePosition::YARD.get()
                    || position.get() > PiecePosition::CENTER.get()
                {
                    return Err(MoveError::OffBoard { piece, position });
                }
            }
        }
        Ok(())
    }
}

/// Sends every opponent piece sharing the mover's cell back to its yard,
/// unless the cell is safe.
fn capture_at(
    state: &mut GameState,
    config: &GameConfig,
    seat: Seat,
    position: PiecePosition,
    effects: &mut Vec<Effect>,
) {
    let Some(cell) = board::cell_for(seat, position) else {
        return;
    };
    if cell.is_safe() {
        return;
    }

    for victim in seat.opponents() {
        for piece in 0..GameConfig::PIECES_PER_SEAT {
            let Some(theirs) = state.position(victim, piece) else {
                continue;
            };
            if !theirs.is_in_play() || board::cell_for(victim, theirs) != Some(cell) {
                continue;
            }

            state.set_position(victim, piece, PiecePosition::YARD);
            state.captured[seat.index()] = true;
            effects.push(Effect::Captured {
                by: seat,
                victim,
                piece,
                cell,
            });

            if config.bonus_on_capture {
                state.roll_pool.grant_bonus();
                state.phase = Phase::ExtraMoving;
                state.status = format!("{} captured {}! Bonus roll!", seat.name(), victim.name());
                effects.push(Effect::BonusGranted {
                    seat,
                    reason: BonusReason::Capture,
                });
            } else {
                state.status = format!("{} captured {}!", seat.name(), victim.name());
            }
        }
    }
}
