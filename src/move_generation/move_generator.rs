//! Pseudo-legal generation entry points.
//!
//! Per-kind generators share one signature and are reached through
//! `PIECE_MOVE_GENERATORS`, indexed by `PieceKind::index()`.

use crate::move_generation::legal_moves_bishop::generate_bishop_moves;
use crate::move_generation::legal_moves_king::generate_king_moves;
use crate::move_generation::legal_moves_knight::generate_knight_moves;
use crate::move_generation::legal_moves_pawn::generate_pawn_moves;
use crate::move_generation::legal_moves_queen::generate_queen_moves;
use crate::move_generation::legal_moves_rook::generate_rook_moves;
use crate::moves::move_descriptions::Move;
use crate::position::chess_types::*;

/// Generate the pseudo-legal moves of the side-to-move piece on a square.
pub type PieceMoveGenerator = fn(&Position, Square, &mut Vec<Move>);

pub const PIECE_MOVE_GENERATORS: [PieceMoveGenerator; 6] = [
    generate_pawn_moves,
    generate_knight_moves,
    generate_bishop_moves,
    generate_rook_moves,
    generate_queen_moves,
    generate_king_moves,
];

/// Anything that can produce the legal move list of a position. Perft and
/// the search are generic over it.
pub trait MoveGenerator: Send + Sync {
    fn generate_legal_moves(&self, position: &Position) -> Vec<Move>;
}

pub fn generate_pseudo_legal_moves(position: &Position, out: &mut Vec<Move>) {
    let side = position.side_to_move;
    for kind in PieceKind::ALL {
        let generator = PIECE_MOVE_GENERATORS[kind.index()];
        let mut pieces = position.pieces_of(side, kind);
        while pieces != 0 {
            generator(position, pieces.trailing_zeros() as Square, out);
            pieces &= pieces - 1;
        }
    }
}

/// Pseudo-legal moves of the piece on `square`; empty when the square is empty
/// or holds a piece of the side not to move.
pub fn generate_pseudo_legal_moves_from(position: &Position, square: Square, out: &mut Vec<Move>) {
    if let Some((color, kind)) = position.piece_at(square) {
        if color == position.side_to_move {
            PIECE_MOVE_GENERATORS[kind.index()](position, square, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_table_matches_piece_kind_order() {
        let start = Position::new_game();
        // b1 knight through the table entry for knights.
        let mut out = Vec::new();
        PIECE_MOVE_GENERATORS[PieceKind::Knight.index()](&start, 1, &mut out);
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|mv| mv.piece == PieceKind::Knight));
    }

    #[test]
    fn start_position_has_twenty_pseudo_legal_moves() {
        let mut out = Vec::new();
        generate_pseudo_legal_moves(&Position::new_game(), &mut out);
        assert_eq!(out.len(), 20);
    }

    #[test]
    fn enemy_square_yields_nothing() {
        let mut out = Vec::new();
        generate_pseudo_legal_moves_from(&Position::new_game(), 57, &mut out);
        assert!(out.is_empty());
    }
}
