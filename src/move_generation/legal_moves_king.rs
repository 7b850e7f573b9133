use crate::move_generation::legal_move_checks::is_square_attacked;
use crate::move_generation::legal_move_shared::{own_occupancy, push_target_moves};
use crate::moves::king_moves::king_attacks;
use crate::moves::move_descriptions::Move;
use crate::position::chess_rules::castling_geometry;
use crate::position::chess_types::*;

pub fn generate_king_moves(position: &Position, from: Square, out: &mut Vec<Move>) {
    let targets = king_attacks(from) & !own_occupancy(position);
    push_target_moves(position, from, PieceKind::King, targets, out);

    for side in [CastlingSide::KingSide, CastlingSide::QueenSide] {
        if can_castle(position, from, side) {
            let geometry = castling_geometry(position.side_to_move, side);
            let mut mv = Move::quiet(geometry.king_from, geometry.king_to, PieceKind::King);
            mv.castling = Some(side);
            out.push(mv);
        }
    }
}

/// Castling needs the right, both pieces at home, an empty corridor and a
/// king path (start, transit, landing) free of enemy attacks.
fn can_castle(position: &Position, king_from: Square, side: CastlingSide) -> bool {
    let color = position.side_to_move;
    let geometry = castling_geometry(color, side);

    if !position.has_castling_right(color, side)
        || king_from != geometry.king_from
        || position.pieces_of(color, PieceKind::Rook) & (1u64 << geometry.rook_from) == 0
        || position.occupancy_all & geometry.empty_mask != 0
    {
        return false;
    }

    let enemy = color.opposite();
    geometry
        .king_path
        .iter()
        .all(|&square| !is_square_attacked(position, square, enemy))
}
