//! King step table. Castling is not an attack and lives in the king
//! generator.

use crate::moves::attack_geometry::{step_table, DIAGONAL_DIRECTIONS, ORTHOGONAL_DIRECTIONS};
use crate::position::chess_types::Square;

const KING_STEPS: [(i32, i32); 8] = [
    ORTHOGONAL_DIRECTIONS[0],
    ORTHOGONAL_DIRECTIONS[1],
    ORTHOGONAL_DIRECTIONS[2],
    ORTHOGONAL_DIRECTIONS[3],
    DIAGONAL_DIRECTIONS[0],
    DIAGONAL_DIRECTIONS[1],
    DIAGONAL_DIRECTIONS[2],
    DIAGONAL_DIRECTIONS[3],
];

pub const KING_ATTACKS: [u64; 64] = step_table(&KING_STEPS);

#[inline]
pub const fn king_attacks(square: Square) -> u64 {
    KING_ATTACKS[square as usize]
}
