//! Path topology of the 5x5 board.
//!
//! Cells are numbered row-major:
//!
//! ```text
//!  0  1  2  3  4
//!  5  6  7  8  9
//! 10 11 12 13 14
//! 15 16 17 18 19
//! 20 21 22 23 24
//! ```
//!
//! Every seat walks 25 path indices. Index 0 is the seat's home castle,
//! 1..=15 run around the 16-cell outer ring, 16..=23 run around the 8 cells
//! that surround the center and 24 is the center cell itself. The outer ring
//! is the same cycle for every seat, only rotated, so pieces of different
//! seats meet on the same physical cells.

use crate::config::GameConfig;
use crate::state::{PiecePosition, Seat};

/// One of the 25 physical board cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Cell(pub u8);

impl Cell {
    pub const CENTER: Self = Self(12);

    /// Castles: the midpoint of each outer edge plus the center.
    pub const SAFE: [Self; 5] = [Self(2), Self(10), Self(12), Self(14), Self(22)];

    pub fn is_safe(self) -> bool {
        Self::SAFE.contains(&self)
    }
}

impl core::fmt::Display for Cell {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "cell {}", self.0)
    }
}

/// Which stretch of a seat's path a path index belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Yard,
    Home,
    OuterRing,
    InnerRing,
    Center,
}

impl PathSegment {
    pub fn of(position: PiecePosition) -> Self {
        match position.get() {
            i8::MIN..=-1 => Self::Yard,
            0 => Self::Home,
            1..=GameConfig::GATEWAY => Self::OuterRing,
            GameConfig::INNER_RING_START..=23 => Self::InnerRing,
            _ => Self::Center,
        }
    }
}

const PATH_LEN: usize = GameConfig::CENTER as usize + 1;

/// Per-seat path tables, indexed by `Seat::index()` and then path index.
const PATHS: [[u8; PATH_LEN]; GameConfig::SEATS] = [
    // p1: home 22, gateway 21, inner entry 16
    [
        22, 23, 24, 19, 14, 9, 4, 3, 2, 1, 0, 5, 10, 15, 20, 21, 16, 11, 6, 7, 8, 13, 18, 17, 12,
    ],
    // p2: home 14, gateway 19, inner entry 18
    [
        14, 9, 4, 3, 2, 1, 0, 5, 10, 15, 20, 21, 22, 23, 24, 19, 18, 17, 16, 11, 6, 7, 8, 13, 12,
    ],
    // p3: home 2, gateway 3, inner entry 8
    [
        2, 1, 0, 5, 10, 15, 20, 21, 22, 23, 24, 19, 14, 9, 4, 3, 8, 13, 18, 17, 16, 11, 6, 7, 12,
    ],
    // p4: home 10, gateway 5, inner entry 6
    [
        10, 15, 20, 21, 22, 23, 24, 19, 14, 9, 4, 3, 2, 1, 0, 5, 6, 7, 8, 13, 18, 17, 16, 11, 12,
    ],
];

/// Full 25-cell path walked by `seat`.
pub fn path(seat: Seat) -> [Cell; PATH_LEN] {
    PATHS[seat.index()].map(Cell)
}

/// Physical cell for a seat-relative position, or `None` while in the yard.
pub fn cell_for(seat: Seat, position: PiecePosition) -> Option<Cell> {
    let index = usize::try_from(position.get()).ok()?;
    PATHS[seat.index()].get(index).copied().map(Cell)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    const OUTER_RING: [u8; 16] = [20, 15, 10, 5, 0, 1, 2, 3, 4, 9, 14, 19, 24, 23, 22, 21];
    const INNER_RING: [u8; 8] = [16, 11, 6, 7, 8, 13, 18, 17];

    #[test]
    fn every_path_covers_the_whole_board_once() {
        for seat in Seat::ALL {
            let cells: BTreeSet<u8> = path(seat).iter().map(|c| c.0).collect();
            assert_eq!(cells.len(), 25, "{seat} path repeats a cell");
        }
    }

    #[test]
    fn outer_and_inner_segments_use_the_shared_rings() {
        let outer: BTreeSet<u8> = OUTER_RING.into_iter().collect();
        let inner: BTreeSet<u8> = INNER_RING.into_iter().collect();

        for seat in Seat::ALL {
            let path = path(seat);
            let seat_outer: BTreeSet<u8> = path[0..16].iter().map(|c| c.0).collect();
            let seat_inner: BTreeSet<u8> = path[16..24].iter().map(|c| c.0).collect();
            assert_eq!(seat_outer, outer);
            assert_eq!(seat_inner, inner);
            assert_eq!(path[24], Cell::CENTER);
        }
    }

    #[test]
    fn outer_ring_is_a_rotation_of_one_cycle() {
        let reference = path(Seat::P1);
        for seat in Seat::ALL {
            let path = path(seat);
            let offset = reference[..16]
                .iter()
                .position(|&c| c == path[0])
                .expect("home cell lies on the outer ring");
            for i in 0..16 {
                assert_eq!(path[i], reference[(offset + i) % 16], "{seat} index {i}");
            }
        }
    }

    #[test]
    fn seats_enter_the_inner_ring_at_different_cells() {
        let entries: BTreeSet<Cell> = Seat::ALL.iter().map(|&s| path(s)[16]).collect();
        assert_eq!(entries.len(), 4);
    }

    #[test]
    fn yard_has_no_cell() {
        assert_eq!(cell_for(Seat::P1, PiecePosition::YARD), None);
        assert_eq!(cell_for(Seat::P1, PiecePosition::ENTRY), Some(Cell(22)));
        assert_eq!(cell_for(Seat::P3, PiecePosition::CENTER), Some(Cell::CENTER));
    }

    #[test]
    fn home_castles_are_safe() {
        for seat in Seat::ALL {
            assert!(path(seat)[0].is_safe());
        }
        assert!(!Cell(21).is_safe());
    }

    #[test]
    fn segments_follow_path_indices() {
        assert_eq!(PathSegment::of(PiecePosition::YARD), PathSegment::Yard);
        assert_eq!(PathSegment::of(PiecePosition::ENTRY), PathSegment::Home);
        assert_eq!(PathSegment::of(PiecePosition::GATEWAY), PathSegment::OuterRing);
        assert_eq!(PathSegment::of(PiecePosition::new(16)), PathSegment::InnerRing);
        assert_eq!(PathSegment::of(PiecePosition::CENTER), PathSegment::Center);
    }
}
