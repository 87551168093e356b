//! Move scoring for the bot policy.
//!
//! Scores are additive and deterministic. Priorities, from strongest:
//! finishing a piece, crossing into the inner ring, landing on a castle,
//! leaving the yard, then raw distance.

use game_core::{GameConfig, LegalMove, Seat};

pub const ENTER_BOARD: i32 = 20;
pub const SAFE_LANDING: i32 = 50;
pub const CROSS_GATEWAY: i32 = 100;
pub const REACH_CENTER: i32 = 200;

/// Utility of one legal move for `seat`.
pub fn score_move(seat: Seat, candidate: &LegalMove) -> i32 {
    let mut score = i32::from(candidate.value);

    if candidate.enters_board() {
        score += ENTER_BOARD;
    }
    // The center is a castle too, but finishing is scored on its own.
    if !candidate.reaches_center()
        && candidate
            .destination_cell(seat)
            .is_some_and(|cell| cell.is_safe())
    {
        score += SAFE_LANDING;
    }
    if candidate.crosses_gateway() {
        score += CROSS_GATEWAY;
    }
    if candidate.to.get() == GameConfig::CENTER {
        score += REACH_CENTER;
    }

    score
}

/// Highest-scoring move; the earliest candidate wins ties.
pub fn best_move<'a>(
    seat: Seat,
    candidates: impl IntoIterator<Item = &'a LegalMove>,
) -> Option<&'a LegalMove> {
    let mut best: Option<(&LegalMove, i32)> = None;
    for candidate in candidates {
        let score = score_move(seat, candidate);
        if best.is_none_or(|(_, top)| score > top) {
            best = Some((candidate, score));
        }
    }
    best.map(|(candidate, _)| candidate)
}
