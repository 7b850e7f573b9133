use crate::moves::bishop_moves::bishop_attacks;
use crate::moves::king_moves::king_attacks;
use crate::moves::knight_moves::knight_attacks;
use crate::moves::pawn_moves::pawn_attacks;
use crate::moves::rook_moves::rook_attacks;
use crate::position::chess_types::*;

#[inline]
pub fn is_king_in_check(position: &Position, color: Color) -> bool {
    let Some(king_sq) = position.king_square(color) else {
        return false;
    };
    is_square_attacked(position, king_sq, color.opposite())
}

/// Whether any piece of `attacker` hits `square`. Works backwards from the
/// target: a piece attacks the square iff the same piece placed on the square
/// would attack it. Castling never counts as an attack.
pub fn is_square_attacked(position: &Position, square: Square, attacker: Color) -> bool {
    attackers_to_square(position, square, attacker) != 0
}

/// Bitboard of `attacker`'s pieces that hit `square`.
pub fn attackers_to_square(position: &Position, square: Square, attacker: Color) -> u64 {
    let pieces = &position.pieces[attacker.index()];
    let diagonal = pieces[PieceKind::Bishop.index()] | pieces[PieceKind::Queen.index()];
    let orthogonal = pieces[PieceKind::Rook.index()] | pieces[PieceKind::Queen.index()];

    (pawn_attacks(attacker.opposite(), square) & pieces[PieceKind::Pawn.index()])
        | (knight_attacks(square) & pieces[PieceKind::Knight.index()])
        | (king_attacks(square) & pieces[PieceKind::King.index()])
        | (bishop_attacks(square, position.occupancy_all) & diagonal)
        | (rook_attacks(square, position.occupancy_all) & orthogonal)
}
