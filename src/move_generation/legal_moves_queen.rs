use crate::move_generation::legal_move_shared::{own_occupancy, push_target_moves};
use crate::moves::move_descriptions::Move;
use crate::moves::queen_moves::queen_attacks;
use crate::position::chess_types::*;

pub fn generate_queen_moves(position: &Position, from: Square, out: &mut Vec<Move>) {
    let targets = queen_attacks(from, position.occupancy_all) & !own_occupancy(position);
    push_target_moves(position, from, PieceKind::Queen, targets, out);
}
