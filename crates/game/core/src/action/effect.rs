use crate::board::Cell;
use crate::state::{PiecePosition, Seat, StickThrow};

/// Why a bonus roll was granted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BonusReason {
    Capture,
    Center,
}

/// Why the turn moved on to the next seat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PassReason {
    /// Every pending value was spent.
    PoolSpent,
    /// Values remain but none can be played.
    NoLegalMoves,
    /// Third consecutive high roll.
    Forfeit,
}

/// Observable outcome of a transition, in the order it happened.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum Effect {
    Rolled {
        seat: Seat,
        throw: StickThrow,
        value: u8,
    },
    Forfeited {
        seat: Seat,
    },
    PieceMoved {
        seat: Seat,
        piece: usize,
        from: PiecePosition,
        to: PiecePosition,
    },
    Captured {
        by: Seat,
        victim: Seat,
        piece: usize,
        cell: Cell,
    },
    BonusGranted {
        seat: Seat,
        reason: BonusReason,
    },
    PieceHome {
        seat: Seat,
        piece: usize,
    },
    /// Same seat rolls again.
    RollAgain {
        seat: Seat,
    },
    TurnPassed {
        from: Seat,
        to: Seat,
        reason: PassReason,
    },
    GameWon {
        seat: Seat,
    },
}
