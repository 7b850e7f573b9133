use crate::move_generation::legal_move_shared::{own_occupancy, push_target_moves};
use crate::moves::bishop_moves::bishop_attacks;
use crate::moves::move_descriptions::Move;
use crate::position::chess_types::*;

pub fn generate_bishop_moves(position: &Position, from: Square, out: &mut Vec<Move>) {
    let targets = bishop_attacks(from, position.occupancy_all) & !own_occupancy(position);
    push_target_moves(position, from, PieceKind::Bishop, targets, out);
}
