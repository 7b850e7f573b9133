//! Canonical chess-rule constants.
//!
//! Starting position, draw thresholds and the fixed castling geometry of
//! standard chess.

use crate::position::chess_types::{CastlingSide, Color, Square};

/// Standard chess starting position in Forsyth-Edwards Notation (FEN).
pub const STARTING_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Half-move clock value at which the fifty-move rule ends the game.
pub const FIFTY_MOVE_HALFMOVES: u16 = 100;

/// Number of occurrences of the same position that draws by repetition.
pub const REPETITION_DRAW_COUNT: usize = 3;

/// Squares involved in one castling move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastlingGeometry {
    pub king_from: Square,
    pub king_to: Square,
    pub rook_from: Square,
    pub rook_to: Square,
    /// Squares that must be empty (between king and rook).
    pub empty_mask: u64,
    /// Squares the king stands on, crosses or lands on; none may be attacked.
    pub king_path: [Square; 3],
}

pub const fn castling_geometry(color: Color, side: CastlingSide) -> CastlingGeometry {
    match (color, side) {
        (Color::White, CastlingSide::KingSide) => CastlingGeometry {
            king_from: 4,
            king_to: 6,
            rook_from: 7,
            rook_to: 5,
            empty_mask: (1 << 5) | (1 << 6),
            king_path: [4, 5, 6],
        },
        (Color::White, CastlingSide::QueenSide) => CastlingGeometry {
            king_from: 4,
            king_to: 2,
            rook_from: 0,
            rook_to: 3,
            empty_mask: (1 << 1) | (1 << 2) | (1 << 3),
            king_path: [4, 3, 2],
        },
        (Color::Black, CastlingSide::KingSide) => CastlingGeometry {
            king_from: 60,
            king_to: 62,
            rook_from: 63,
            rook_to: 61,
            empty_mask: (1 << 61) | (1 << 62),
            king_path: [60, 61, 62],
        },
        (Color::Black, CastlingSide::QueenSide) => CastlingGeometry {
            king_from: 60,
            king_to: 58,
            rook_from: 56,
            rook_to: 59,
            empty_mask: (1 << 57) | (1 << 58) | (1 << 59),
            king_path: [60, 59, 58],
        },
    }
}
