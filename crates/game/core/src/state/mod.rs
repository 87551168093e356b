//! Authoritative game state representation.
//!
//! This module owns the canonical data describing a single game: where every
//! piece stands, which seats have captured, whose turn it is and what the
//! seat still has to spend from its rolls. The state is mutated only by
//! [`crate::engine::GameEngine`].
mod pool;
mod seat;
mod throw;

pub use pool::RollPool;
pub use seat::{PiecePosition, Seat};
pub use throw::{StickThrow, is_high_value};

use crate::action::{LegalMove, LegalMoves};
use crate::config::GameConfig;

/// Where the seat to act stands within its turn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    /// Must roll before any move is possible.
    #[default]
    Rolling,
    /// Must spend the pending roll values.
    NormalMoving,
    /// A further roll is owed; the seat may roll again or move first.
    ExtraMoving,
    /// Terminal.
    GameOver,
}

impl Phase {
    pub const fn can_roll(self) -> bool {
        matches!(self, Phase::Rolling | Phase::ExtraMoving)
    }

    pub const fn can_move(self) -> bool {
        matches!(self, Phase::NormalMoving | Phase::ExtraMoving)
    }
}

pub type SeatPieces = [PiecePosition; GameConfig::PIECES_PER_SEAT];

/// Complete snapshot of one game.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameState {
    /// Piece positions, indexed by `Seat::index()` then piece index.
    pub pieces: [SeatPieces; GameConfig::SEATS],
    /// Set once a seat has sent any opponent piece back to its yard.
    pub captured: [bool; GameConfig::SEATS],
    pub current_seat: Seat,
    pub roll_pool: RollPool,
    /// Consecutive 4-or-8 rolls by the current seat.
    pub high_roll_streak: u8,
    pub phase: Phase,
    pub last_roll: Option<StickThrow>,
    /// Moves available against the current roll pool.
    pub legal_moves: LegalMoves,
    /// Human-readable status line.
    pub status: String,
    /// Number of actions accepted so far.
    pub nonce: u64,
}

impl GameState {
    /// Fresh game with every piece in its yard.
    pub fn new(config: &GameConfig) -> Self {
        let first = config.turn_order.first();
        Self {
            pieces: [[PiecePosition::YARD; GameConfig::PIECES_PER_SEAT]; GameConfig::SEATS],
            captured: [false; GameConfig::SEATS],
            current_seat: first,
            roll_pool: RollPool::default(),
            high_roll_streak: 0,
            phase: Phase::Rolling,
            last_roll: None,
            legal_moves: LegalMoves::new(),
            status: format!("Game started! {}'s turn. Roll 4 or 8 to enter.", first.name()),
            nonce: 0,
        }
    }

    pub fn pieces_of(&self, seat: Seat) -> &SeatPieces {
        &self.pieces[seat.index()]
    }

    pub fn position(&self, seat: Seat, piece: usize) -> Option<PiecePosition> {
        self.pieces[seat.index()].get(piece).copied()
    }

    pub fn set_position(&mut self, seat: Seat, piece: usize, position: PiecePosition) {
        if let Some(slot) = self.pieces[seat.index()].get_mut(piece) {
            *slot = position;
        }
    }

    pub fn has_captured(&self, seat: Seat) -> bool {
        self.captured[seat.index()]
    }

    pub fn is_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    /// Seat whose four pieces all stand on the center.
    pub fn winner(&self) -> Option<Seat> {
        Seat::ALL
            .into_iter()
            .find(|&seat| self.pieces_of(seat).iter().all(|p| p.is_home()))
    }

    pub fn find_legal(&self, piece: usize, value: u8) -> Option<LegalMove> {
        self.legal_moves
            .iter()
            .find(|m| m.piece == piece && m.value == value)
            .copied()
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(&GameConfig::default())
    }
}
