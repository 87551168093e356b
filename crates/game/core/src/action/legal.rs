use arrayvec::ArrayVec;

use crate::board::{self, Cell};
use crate::config::GameConfig;
use crate::state::{GameState, Phase, PiecePosition, Seat, is_high_value};

/// One way to spend one pending roll value on one piece.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LegalMove {
    pub piece: usize,
    pub value: u8,
    pub from: PiecePosition,
    pub to: PiecePosition,
}

impl LegalMove {
    pub fn enters_board(&self) -> bool {
        self.from.is_in_yard()
    }

    /// Outer ring (including the home castle) to inner ring or center.
    pub fn crosses_gateway(&self) -> bool {
        self.from.get() < GameConfig::INNER_RING_START
            && self.to.get() >= GameConfig::INNER_RING_START
    }

    pub fn reaches_center(&self) -> bool {
        self.to.is_home()
    }

    pub fn destination_cell(&self, seat: Seat) -> Option<Cell> {
        board::cell_for(seat, self.to)
    }
}

pub type LegalMoves = ArrayVec<LegalMove, { GameConfig::MAX_LEGAL_MOVES }>;

/// Destination for `value` applied to a piece at `from`, if the move is legal.
pub fn destination(from: PiecePosition, value: u8, has_captured: bool) -> Option<PiecePosition> {
    if from.is_in_yard() {
        return is_high_value(value).then_some(PiecePosition::ENTRY);
    }
    if from.is_home() {
        return None;
    }

    let target = from.get().checked_add(i8::try_from(value).ok()?)?;
    if target > GameConfig::CENTER {
        return None;
    }

    let crosses_inward = from.is_outer() && target >= GameConfig::INNER_RING_START;
    if crosses_inward && !(from == PiecePosition::GATEWAY && has_captured) {
        return None;
    }

    Some(PiecePosition::new(target))
}

/// Enumerates every legal move for the seat to act.
///
/// Each distinct pending value is checked once, in the order it was rolled,
/// against each piece in index order.
pub fn legal_moves(state: &GameState) -> LegalMoves {
    let mut moves = LegalMoves::new();
    if state.phase == Phase::GameOver {
        return moves;
    }

    let seat = state.current_seat;
    let has_captured = state.has_captured(seat);
    for value in state.roll_pool.distinct_values() {
        for (piece, &from) in state.pieces_of(seat).iter().enumerate() {
            if let Some(to) = destination(from, value, has_captured) {
                moves.push(LegalMove {
                    piece,
                    value,
                    from,
                    to,
                });
            }
        }
    }
    moves
}
