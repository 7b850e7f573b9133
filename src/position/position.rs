//! Board-state snapshot used by every layer of the engine.
//!
//! `Position` stores piece bitboards, occupancy caches, side/castling/en-passant
//! state, the move clocks and an incrementally maintained Zobrist key. It is
//! cheap to clone; the search and the legality filter only ever work on
//! clones, never on the canonical position owned by a game session.

use std::fmt;

use crate::errors::ChessResult;
use crate::position::chess_types::*;
use crate::search::zobrist::{compute_zobrist_key, piece_square_key};
use crate::utils::fen_generator::generate_fen;
use crate::utils::fen_parser::parse_fen;
use crate::utils::render_game_state::render_position;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    // [color][piece_kind]
    pub pieces: [[u64; 6]; 2],

    pub occupancy_by_color: [u64; 2],
    pub occupancy_all: u64,

    pub side_to_move: Color,
    pub castling_rights: CastlingRights,
    pub en_passant_square: Option<Square>,

    /// Plies since the last capture or pawn move.
    pub halfmove_clock: u16,
    pub fullmove_number: u16,

    pub zobrist_key: u64,
}

/// Exact identity of a position for threefold-repetition purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RepetitionKey {
    pieces: [[u64; 6]; 2],
    side_to_move: Color,
    castling_rights: CastlingRights,
    en_passant_square: Option<Square>,
}

impl Default for Position {
    fn default() -> Self {
        Self {
            pieces: [[0; 6]; 2],
            occupancy_by_color: [0; 2],
            occupancy_all: 0,
            side_to_move: Color::White,
            castling_rights: 0,
            en_passant_square: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            zobrist_key: 0,
        }
    }
}

impl Position {
    /// Empty board, white to move. Used by the FEN parser as a blank canvas.
    #[inline]
    pub fn new_empty() -> Self {
        Self::default()
    }

    /// Standard initial arrangement.
    pub fn new_game() -> Self {
        const BACK_RANK: [PieceKind; 8] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];

        let mut position = Self::new_empty();
        for (file, kind) in BACK_RANK.iter().enumerate() {
            let file = file as u8;
            position.pieces[Color::White.index()][kind.index()] |= 1u64 << square_at(file, 0);
            position.pieces[Color::Black.index()][kind.index()] |= 1u64 << square_at(file, 7);
            position.pieces[Color::White.index()][PieceKind::Pawn.index()] |=
                1u64 << square_at(file, 1);
            position.pieces[Color::Black.index()][PieceKind::Pawn.index()] |=
                1u64 << square_at(file, 6);
        }
        position.castling_rights = CASTLE_ALL;
        position.finalize();
        position
    }

    #[inline]
    pub fn from_fen(fen: &str) -> ChessResult<Self> {
        parse_fen(fen)
    }

    #[inline]
    pub fn to_fen(&self) -> String {
        generate_fen(self)
    }

    /// Rebuild occupancy caches and the Zobrist key from the piece bitboards.
    pub fn finalize(&mut self) {
        self.recalc_occupancy();
        self.zobrist_key = compute_zobrist_key(self);
    }

    pub fn recalc_occupancy(&mut self) {
        for color in [Color::White, Color::Black] {
            self.occupancy_by_color[color.index()] = self.pieces[color.index()]
                .iter()
                .fold(0u64, |acc, bb| acc | bb);
        }
        self.occupancy_all = self.occupancy_by_color[Color::White.index()]
            | self.occupancy_by_color[Color::Black.index()];
    }

    #[inline]
    pub fn pieces_of(&self, color: Color, kind: PieceKind) -> u64 {
        self.pieces[color.index()][kind.index()]
    }

    pub fn piece_at(&self, square: Square) -> Option<(Color, PieceKind)> {
        let mask = 1u64 << square;
        if self.occupancy_all & mask == 0 {
            return None;
        }
        let color = if self.occupancy_by_color[Color::White.index()] & mask != 0 {
            Color::White
        } else {
            Color::Black
        };
        PieceKind::ALL
            .into_iter()
            .find(|kind| self.pieces[color.index()][kind.index()] & mask != 0)
            .map(|kind| (color, kind))
    }

    #[inline]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        let kings = self.pieces_of(color, PieceKind::King);
        if kings == 0 {
            None
        } else {
            Some(kings.trailing_zeros() as Square)
        }
    }

    /// Place a piece, keeping occupancy and hash in sync.
    #[inline]
    pub fn put_piece(&mut self, color: Color, kind: PieceKind, square: Square) {
        let mask = 1u64 << square;
        self.pieces[color.index()][kind.index()] |= mask;
        self.occupancy_by_color[color.index()] |= mask;
        self.occupancy_all |= mask;
        self.zobrist_key ^= piece_square_key(color, kind, square);
    }

    /// Remove a piece, keeping occupancy and hash in sync.
    #[inline]
    pub fn remove_piece(&mut self, color: Color, kind: PieceKind, square: Square) {
        let mask = 1u64 << square;
        self.pieces[color.index()][kind.index()] &= !mask;
        self.occupancy_by_color[color.index()] &= !mask;
        self.occupancy_all &= !mask;
        self.zobrist_key ^= piece_square_key(color, kind, square);
    }

    #[inline]
    pub fn has_castling_right(&self, color: Color, side: CastlingSide) -> bool {
        self.castling_rights & castling_flag(color, side) != 0
    }

    pub fn repetition_key(&self) -> RepetitionKey {
        RepetitionKey {
            pieces: self.pieces,
            side_to_move: self.side_to_move,
            castling_rights: self.castling_rights,
            en_passant_square: self.en_passant_square,
        }
    }

    #[inline]
    pub fn count(&self, color: Color, kind: PieceKind) -> u32 {
        self.pieces_of(color, kind).count_ones()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_position(self))
    }
}

#[cfg(test)]
mod tests {
    use super::Position;
    use crate::position::chess_rules::STARTING_POSITION_FEN;
    use crate::position::chess_types::{Color, PieceKind};

    #[test]
    fn new_game_matches_starting_fen() {
        let built = Position::new_game();
        let parsed = Position::from_fen(STARTING_POSITION_FEN).expect("start FEN should parse");
        assert_eq!(built, parsed);
        assert_eq!(built.to_fen(), STARTING_POSITION_FEN);
    }

    #[test]
    fn piece_at_reports_color_and_kind() {
        let game = Position::new_game();
        assert_eq!(game.piece_at(4), Some((Color::White, PieceKind::King)));
        assert_eq!(game.piece_at(59), Some((Color::Black, PieceKind::Queen)));
        assert_eq!(game.piece_at(28), None);
        assert_eq!(game.king_square(Color::Black), Some(60));
    }

    #[test]
    fn put_and_remove_keep_hash_consistent() {
        let mut game = Position::new_game();
        let original = game.clone();
        game.remove_piece(Color::White, PieceKind::Pawn, 12);
        game.put_piece(Color::White, PieceKind::Pawn, 28);
        assert_ne!(game.zobrist_key, original.zobrist_key);
        game.remove_piece(Color::White, PieceKind::Pawn, 28);
        game.put_piece(Color::White, PieceKind::Pawn, 12);
        assert_eq!(game, original);
    }
}
