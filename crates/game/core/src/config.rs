use crate::state::Seat;

/// Game configuration constants and tunable rule toggles.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameConfig {
    /// Grants a bonus roll whenever an opponent piece is sent back to its yard.
    pub bonus_on_capture: bool,
    /// Grants a bonus roll whenever a piece lands on the center without winning.
    pub bonus_on_entry: bool,
    /// Fixed seat rotation used to advance turns.
    pub turn_order: TurnOrder,
}

impl GameConfig {
    // ===== compile-time constants =====
    pub const SEATS: usize = 4;
    pub const PIECES_PER_SEAT: usize = 4;
    /// Path index of the seat's own entry cell.
    pub const ENTRY: i8 = 0;
    /// Last outer-ring path index; the only index allowed to cross inward.
    pub const GATEWAY: i8 = 15;
    pub const INNER_RING_START: i8 = 16;
    /// Terminal path index (shared center cell).
    pub const CENTER: i8 = 24;
    /// Distinct roll values (1, 2, 3, 4, 8) times pieces per seat.
    pub const MAX_LEGAL_MOVES: usize = 20;
    /// Consecutive high rolls that forfeit the turn.
    pub const HIGH_ROLL_FORFEIT: u8 = 3;

    pub fn new() -> Self {
        Self {
            bonus_on_capture: true,
            bonus_on_entry: true,
            turn_order: TurnOrder::default(),
        }
    }

    pub fn with_turn_order(mut self, turn_order: TurnOrder) -> Self {
        self.turn_order = turn_order;
        self
    }

    pub fn with_bonus_on_capture(mut self, enabled: bool) -> Self {
        self.bonus_on_capture = enabled;
        self
    }

    pub fn with_bonus_on_entry(mut self, enabled: bool) -> Self {
        self.bonus_on_entry = enabled;
        self
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors raised while building a [`TurnOrder`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TurnOrderError {
    #[error("seat {0} appears more than once in the turn order")]
    DuplicateSeat(Seat),
}

/// Cyclic permutation of the four seats.
///
/// The visual seating order is not sequential, so the rotation is stored as an
/// explicit table instead of `index + 1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "[Seat; 4]", into = "[Seat; 4]"))]
pub struct TurnOrder([Seat; GameConfig::SEATS]);

impl TurnOrder {
    /// Anti-clockwise around the board: Red, Green, Yellow, Blue.
    pub const ANTI_CLOCKWISE: Self = Self([Seat::P1, Seat::P4, Seat::P3, Seat::P2]);

    pub fn new(order: [Seat; GameConfig::SEATS]) -> Result<Self, TurnOrderError> {
        let mut seen = [false; GameConfig::SEATS];
        for seat in order {
            if seen[seat.index()] {
                return Err(TurnOrderError::DuplicateSeat(seat));
            }
            seen[seat.index()] = true;
        }
        Ok(Self(order))
    }

    /// Seat that opens the game.
    pub fn first(&self) -> Seat {
        self.0[0]
    }

    /// Seat that acts after `seat`.
    pub fn next(&self, seat: Seat) -> Seat {
        let position = self
            .0
            .iter()
            .position(|&s| s == seat)
            .unwrap_or_default();
        self.0[(position + 1) % GameConfig::SEATS]
    }

    pub fn seats(&self) -> [Seat; GameConfig::SEATS] {
        self.0
    }
}

impl Default for TurnOrder {
    fn default() -> Self {
        Self::ANTI_CLOCKWISE
    }
}

impl TryFrom<[Seat; GameConfig::SEATS]> for TurnOrder {
    type Error = TurnOrderError;

    fn try_from(order: [Seat; GameConfig::SEATS]) -> Result<Self, Self::Error> {
        Self::new(order)
    }
}

impl From<TurnOrder> for [Seat; GameConfig::SEATS] {
    fn from(order: TurnOrder) -> Self {
        order.0
    }
}
