//! The `Move` value shared by generation, search and the game session.
//!
//! A move carries everything needed to apply and undo it without consulting
//! the board again: the moving piece, what it captures, and the special-move
//! flags. The `FLAG_*` bits double as the persistence byte of a move record.

use std::fmt;

use crate::position::chess_types::{CastlingSide, PieceKind, Square};
use crate::utils::algebraic::square_to_algebraic;

pub const FLAG_CAPTURE: u8 = 1 << 0;
pub const FLAG_DOUBLE_PAWN_PUSH: u8 = 1 << 1;
pub const FLAG_EN_PASSANT: u8 = 1 << 2;
pub const FLAG_CASTLING: u8 = 1 << 3;
pub const FLAG_PROMOTION: u8 = 1 << 4;
/// Set on records only, once the resulting position is known.
pub const FLAG_CHECK: u8 = 1 << 5;
pub const FLAG_CHECKMATE: u8 = 1 << 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub piece: PieceKind,
    pub captured: Option<PieceKind>,
    pub promotion: Option<PieceKind>,
    pub castling: Option<CastlingSide>,
    pub en_passant: bool,
    pub double_push: bool,
}

impl Move {
    /// Plain move with no capture or special flags.
    #[inline]
    pub const fn quiet(from: Square, to: Square, piece: PieceKind) -> Self {
        Self {
            from,
            to,
            piece,
            captured: None,
            promotion: None,
            castling: None,
            en_passant: false,
            double_push: false,
        }
    }

    #[inline]
    pub const fn with_capture(mut self, captured: Option<PieceKind>) -> Self {
        self.captured = captured;
        self
    }

    #[inline]
    pub const fn with_promotion(mut self, promotion: PieceKind) -> Self {
        self.promotion = Some(promotion);
        self
    }

    #[inline]
    pub const fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    #[inline]
    pub const fn is_quiet(&self) -> bool {
        self.captured.is_none() && self.promotion.is_none()
    }

    /// Same user-facing move: source, destination and promotion choice.
    #[inline]
    pub fn matches(&self, from: Square, to: Square, promotion: Option<PieceKind>) -> bool {
        self.from == from && self.to == to && self.promotion == promotion
    }

    pub fn flags(&self) -> u8 {
        let mut flags = 0;
        if self.captured.is_some() {
            flags |= FLAG_CAPTURE;
        }
        if self.double_push {
            flags |= FLAG_DOUBLE_PAWN_PUSH;
        }
        if self.en_passant {
            flags |= FLAG_EN_PASSANT;
        }
        if self.castling.is_some() {
            flags |= FLAG_CASTLING;
        }
        if self.promotion.is_some() {
            flags |= FLAG_PROMOTION;
        }
        flags
    }
}

/// Long algebraic form, e.g. `e2e4` or `e7e8q`.
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            square_to_algebraic(self.from),
            square_to_algebraic(self.to)
        )?;
        if let Some(promotion) = self.promotion {
            write!(f, "{}", promotion.fen_char())?;
        }
        Ok(())
    }
}
