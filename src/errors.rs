//! Error types shared by the rules core, the game session and the engines.
//!
//! Every fallible operation in the crate returns `ChessResult<T>`. Terminal
//! game states (checkmate, stalemate, draws) are not errors; they are reported
//! through `GameSession::game_status`.

use std::fmt;

use thiserror::Error;

/// Why a move request was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IllegalMoveReason {
    /// The source square is empty.
    NoPieceOnSquare,
    /// The piece on the source square belongs to the side not to move.
    WrongSideToMove,
    /// The move breaks piece movement rules or leaves the own king attacked.
    NotInLegalSet,
    /// A pawn reached the back rank without a promotion choice.
    MissingPromotion,
    /// The game has already ended.
    GameOver,
}

impl fmt::Display for IllegalMoveReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            IllegalMoveReason::NoPieceOnSquare => "no piece on source square",
            IllegalMoveReason::WrongSideToMove => "piece does not belong to side to move",
            IllegalMoveReason::NotInLegalSet => "not a legal move in this position",
            IllegalMoveReason::MissingPromotion => "promotion piece required",
            IllegalMoveReason::GameOver => "game is already over",
        };
        f.write_str(text)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChessError {
    /// Malformed serialized position, square, move text or book data.
    #[error("parse error: {0}")]
    Parse(String),

    /// The requested move is not a member of the current legal set.
    #[error("illegal move {mv}: {reason}")]
    IllegalMove {
        mv: String,
        reason: IllegalMoveReason,
    },

    /// A move was requested from a position where the game is over.
    #[error("no legal move available: {0}")]
    NoLegalMove(String),
}

impl ChessError {
    #[inline]
    pub fn parse(msg: impl Into<String>) -> Self {
        ChessError::Parse(msg.into())
    }

    #[inline]
    pub fn illegal(mv: impl Into<String>, reason: IllegalMoveReason) -> Self {
        ChessError::IllegalMove {
            mv: mv.into(),
            reason,
        }
    }
}

pub type ChessResult<T> = Result<T, ChessError>;

#[cfg(test)]
mod tests {
    use super::{ChessError, IllegalMoveReason};

    #[test]
    fn illegal_move_message_names_move_and_reason() {
        let err = ChessError::illegal("e2e5", IllegalMoveReason::NotInLegalSet);
        assert_eq!(
            err.to_string(),
            "illegal move e2e5: not a legal move in this position"
        );
    }
}
