//! Pawn capture geometry. Pushes depend on occupancy and are handled by the
//! pawn generator; only the diagonal attack sets are tabulated here.

use crate::moves::attack_geometry::step_table;
use crate::position::chess_types::{Color, Square};

/// `[color][square]` diagonal attack sets.
pub const PAWN_ATTACKS: [[u64; 64]; 2] = [step_table(&[(-1, 1), (1, 1)]), step_table(&[(-1, -1), (1, -1)])];

#[inline]
pub const fn pawn_attacks(color: Color, square: Square) -> u64 {
    PAWN_ATTACKS[color.index()][square as usize]
}

/// Square a pawn of `color` reaches with a single push, if any.
#[inline]
pub const fn pawn_push_target(color: Color, square: Square) -> Option<Square> {
    match color {
        Color::White if square < 56 => Some(square + 8),
        Color::Black if square >= 8 => Some(square - 8),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn white_pawn_on_e2_hits_d3_and_f3() {
        assert_eq!(pawn_attacks(Color::White, 12), (1u64 << 19) | (1u64 << 21));
    }

    #[test]
    fn black_pawn_on_a7_hits_only_b6() {
        assert_eq!(pawn_attacks(Color::Black, 48), 1u64 << 41);
    }

    #[test]
    fn push_targets_stop_at_board_edge() {
        assert_eq!(pawn_push_target(Color::White, 12), Some(20));
        assert_eq!(pawn_push_target(Color::Black, 52), Some(44));
        assert_eq!(pawn_push_target(Color::White, 60), None);
        assert_eq!(pawn_push_target(Color::Black, 3), None);
    }
}
