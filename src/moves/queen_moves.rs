use crate::moves::bishop_moves::bishop_attacks;
use crate::moves::rook_moves::rook_attacks;
use crate::position::chess_types::Square;

#[inline]
pub fn queen_attacks(square: Square, occupancy: u64) -> u64 {
    bishop_attacks(square, occupancy) | rook_attacks(square, occupancy)
}
