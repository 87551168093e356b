use crate::config::GameConfig;

/// One of the four fixed player roles.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Seat {
    #[default]
    P1,
    P2,
    P3,
    P4,
}

impl Seat {
    pub const ALL: [Seat; GameConfig::SEATS] = [Seat::P1, Seat::P2, Seat::P3, Seat::P4];

    pub const fn index(self) -> usize {
        match self {
            Seat::P1 => 0,
            Seat::P2 => 1,
            Seat::P3 => 2,
            Seat::P4 => 3,
        }
    }

    /// Colour name shown in status lines.
    pub const fn name(self) -> &'static str {
        match self {
            Seat::P1 => "Red",
            Seat::P2 => "Blue",
            Seat::P3 => "Yellow",
            Seat::P4 => "Green",
        }
    }

    pub fn opponents(self) -> impl Iterator<Item = Seat> {
        Self::ALL.into_iter().filter(move |&seat| seat != self)
    }
}

/// Seat-relative path index of a piece: `-1` in the yard, `0..=24` on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct PiecePosition(i8);

impl PiecePosition {
    pub const YARD: Self = Self(-1);
    pub const ENTRY: Self = Self(GameConfig::ENTRY);
    pub const GATEWAY: Self = Self(GameConfig::GATEWAY);
    pub const CENTER: Self = Self(GameConfig::CENTER);

    /// Clamps into the valid `-1..=24` range.
    pub const fn new(index: i8) -> Self {
        if index < -1 {
            Self::YARD
        } else if index > GameConfig::CENTER {
            Self::CENTER
        } else {
            Self(index)
        }
    }

    pub const fn get(self) -> i8 {
        self.0
    }

    pub const fn is_in_yard(self) -> bool {
        self.0 < 0
    }

    /// On the board and still able to move (and to be captured).
    pub const fn is_in_play(self) -> bool {
        self.0 >= 0 && self.0 < GameConfig::CENTER
    }

    pub const fn is_home(self) -> bool {
        self.0 == GameConfig::CENTER
    }

    pub const fn is_outer(self) -> bool {
        self.0 >= 0 && self.0 < GameConfig::INNER_RING_START
    }
}

impl Default for PiecePosition {
    fn default() -> Self {
        Self::YARD
    }
}

impl core::fmt::Display for PiecePosition {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.is_in_yard() {
            f.write_str("yard")
        } else {
            write!(f, "{}", self.0)
        }
    }
}
