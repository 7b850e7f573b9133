use crate::move_generation::legal_move_shared::{own_occupancy, push_target_moves};
use crate::moves::knight_moves::knight_attacks;
use crate::moves::move_descriptions::Move;
use crate::position::chess_types::*;

pub fn generate_knight_moves(position: &Position, from: Square, out: &mut Vec<Move>) {
    let targets = knight_attacks(from) & !own_occupancy(position);
    push_target_moves(position, from, PieceKind::Knight, targets, out);
}
