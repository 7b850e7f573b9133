use crate::moves::move_descriptions::Move;
use crate::position::chess_types::*;

/// Single undo record for `make_move_in_place` / `unmake_move_in_place`.
///
/// Holds everything a move destroys so the pair restores a bit-identical
/// position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UndoState {
    pub mv: Move,
    pub captured_piece: Option<PieceKind>,

    pub prev_castling_rights: CastlingRights,
    pub prev_en_passant_square: Option<Square>,
    pub prev_halfmove_clock: u16,
    pub prev_fullmove_number: u16,

    pub prev_zobrist_key: u64,
}
