//! Post-application record of a move, as handed to persistence.

use chrono::{DateTime, Utc};

use crate::moves::move_descriptions::{Move, FLAG_CHECK, FLAG_CHECKMATE};
use crate::position::chess_types::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRecord {
    /// 1-based half-move index within the game.
    pub ply: u32,
    pub color: Color,
    pub mv: Move,
    /// `FLAG_*` bits of the move plus check/checkmate of the result.
    pub flags: u8,
    pub san: String,
    pub fen_after: String,
    pub played_at: DateTime<Utc>,
}

impl MoveRecord {
    pub(crate) fn new(
        ply: u32,
        color: Color,
        mv: Move,
        san: String,
        fen_after: String,
        gives_check: bool,
        gives_mate: bool,
    ) -> Self {
        let mut flags = mv.flags();
        if gives_check {
            flags |= FLAG_CHECK;
        }
        if gives_mate {
            flags |= FLAG_CHECKMATE;
        }
        Self {
            ply,
            color,
            mv,
            flags,
            san,
            fen_after,
            played_at: Utc::now(),
        }
    }

    #[inline]
    pub fn from_square(&self) -> Square {
        self.mv.from
    }

    #[inline]
    pub fn to_square(&self) -> Square {
        self.mv.to
    }

    #[inline]
    pub fn piece(&self) -> PieceKind {
        self.mv.piece
    }

    #[inline]
    pub fn captured(&self) -> Option<PieceKind> {
        self.mv.captured
    }

    /// Long algebraic form of the move.
    pub fn lan(&self) -> String {
        self.mv.to_string()
    }
}
