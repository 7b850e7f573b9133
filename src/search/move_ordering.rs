//! Move ordering for alpha-beta pruning.
//!
//! Tiers, best first: the transposition-table move, captures by MVV-LVA
//! (victim value minus attacker value), quiet promotions, quiet moves. The
//! sort is stable so equal keys keep generation order and searches stay
//! reproducible.

use std::cmp::Reverse;

use crate::moves::move_descriptions::Move;
use crate::search::board_scoring::MaterialScorer;

const TT_MOVE_SCORE: i32 = 1_000_000;
const CAPTURE_BASE: i32 = 100_000;
const PROMOTION_BASE: i32 = 50_000;

/// Ordering key; larger sorts first.
pub fn move_order_score(mv: &Move, tt_move: Option<Move>) -> i32 {
    if tt_move == Some(*mv) {
        return TT_MOVE_SCORE;
    }

    let promotion_gain = mv.promotion.map_or(0, MaterialScorer::piece_value);
    match mv.captured {
        Some(victim) => {
            CAPTURE_BASE + MaterialScorer::piece_value(victim)
                - MaterialScorer::piece_value(mv.piece)
                + promotion_gain
        }
        None if mv.promotion.is_some() => PROMOTION_BASE + promotion_gain,
        None => 0,
    }
}

/// Sort `moves` in place. A `tt_move` not present in `moves` is ignored,
/// which is what re-validates hash moves from colliding positions.
pub fn order_moves(moves: &mut [Move], tt_move: Option<Move>) {
    moves.sort_by_key(|mv| Reverse(move_order_score(mv, tt_move)));
}
