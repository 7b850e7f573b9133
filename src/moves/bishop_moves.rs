use crate::moves::attack_geometry::{sliding_attacks, DIAGONAL_DIRECTIONS};
use crate::position::chess_types::Square;

#[inline]
pub fn bishop_attacks(square: Square, occupancy: u64) -> u64 {
    sliding_attacks(square, occupancy, &DIAGONAL_DIRECTIONS)
}

#[cfg(test)]
mod tests {
    use super::bishop_attacks;

    #[test]
    fn bishop_on_d4_sees_thirteen_squares_on_empty_board() {
        assert_eq!(bishop_attacks(27, 0).count_ones(), 13);
    }

    #[test]
    fn blocker_is_included_and_ray_stops() {
        let blocker_on_e3 = 1u64 << 20;
        let attacks = bishop_attacks(2, blocker_on_e3);
        assert_ne!(attacks & blocker_on_e3, 0);
        assert_eq!(attacks & (1u64 << 29), 0);
    }
}
