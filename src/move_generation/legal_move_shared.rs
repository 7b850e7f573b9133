use crate::moves::move_descriptions::Move;
use crate::position::chess_types::*;

/// Kind of the side-not-to-move's piece on `square`, if any.
#[inline]
pub fn enemy_piece_on(position: &Position, square: Square) -> Option<PieceKind> {
    let enemy = position.side_to_move.opposite();
    let mask = 1u64 << square;
    PieceKind::ALL
        .into_iter()
        .find(|kind| position.pieces_of(enemy, *kind) & mask != 0)
}

/// Emit one move per bit in `targets`, tagging captures. Callers must already
/// have removed squares held by their own pieces.
#[inline]
pub fn push_target_moves(
    position: &Position,
    from: Square,
    piece: PieceKind,
    mut targets: u64,
    out: &mut Vec<Move>,
) {
    let enemy_occ = position.occupancy_by_color[position.side_to_move.opposite().index()];
    while targets != 0 {
        let to = targets.trailing_zeros() as Square;
        let captured = if enemy_occ & (1u64 << to) != 0 {
            enemy_piece_on(position, to)
        } else {
            None
        };
        out.push(Move::quiet(from, to, piece).with_capture(captured));
        targets &= targets - 1;
    }
}

/// Own-piece occupancy for the side to move.
#[inline]
pub fn own_occupancy(position: &Position) -> u64 {
    position.occupancy_by_color[position.side_to_move.index()]
}
