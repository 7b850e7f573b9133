use crate::moves::attack_geometry::{sliding_attacks, ORTHOGONAL_DIRECTIONS};
use crate::position::chess_types::Square;

#[inline]
pub fn rook_attacks(square: Square, occupancy: u64) -> u64 {
    sliding_attacks(square, occupancy, &ORTHOGONAL_DIRECTIONS)
}

#[cfg(test)]
mod tests {
    use super::rook_attacks;

    #[test]
    fn rook_on_a1_blocked_by_a4_and_c1() {
        let blockers = (1u64 << 24) | (1u64 << 2);
        let attacks = rook_attacks(0, blockers);
        // a2 a3 a4 b1 c1
        assert_eq!(attacks.count_ones(), 5);
        assert_eq!(attacks & (1u64 << 32), 0);
    }
}
