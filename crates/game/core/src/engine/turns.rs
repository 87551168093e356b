//! Turn hand-over rules shared by the transitions.

use crate::action::{Effect, PassReason, legal_moves};
use crate::config::GameConfig;
use crate::state::{GameState, Phase};

/// Ends the current seat's turn: discards the pool, resets the streak and
/// hands the dice to the next seat in the configured rotation.
pub(crate) fn pass_turn(state: &mut GameState, config: &GameConfig, reason: PassReason) -> Effect {
    let from = state.current_seat;
    let to = config.turn_order.next(from);

    state.roll_pool.clear();
    state.legal_moves.clear();
    state.high_roll_streak = 0;
    state.current_seat = to;
    state.phase = Phase::Rolling;

    Effect::TurnPassed { from, to, reason }
}

/// Settles the pool after a move has been spent.
///
/// - Pool fully spent: a seat that was owed a high-roll bonus rolls again
///   (streak kept), otherwise the turn passes.
/// - Only bonus rolls remain: they collapse into one further roll.
/// - Values remain but none is playable: the rest is forfeited and the turn passes.
pub(crate) fn settle_pool(state: &mut GameState, config: &GameConfig) -> Option<Effect> {
    let seat = state.current_seat;
    state.legal_moves = legal_moves(state);

    if state.roll_pool.is_empty() {
        if state.phase == Phase::ExtraMoving {
            state.phase = Phase::Rolling;
            state.legal_moves.clear();
            state.status = format!("{} rolled Chakkhan/Changa! Roll again.", seat.name());
            return Some(Effect::RollAgain { seat });
        }
        let effect = pass_turn(state, config, PassReason::PoolSpent);
        state.status = format!("{}'s turn.", state.current_seat.name());
        return Some(effect);
    }

    if state.roll_pool.has_only_bonus() {
        state.roll_pool.clear();
        state.phase = Phase::ExtraMoving;
        state.legal_moves.clear();
        return Some(Effect::RollAgain { seat });
    }

    if state.legal_moves.is_empty() {
        let effect = pass_turn(state, config, PassReason::NoLegalMoves);
        state.status = format!("No more valid moves. {}'s turn.", state.current_seat.name());
        return Some(effect);
    }

    None
}
