//! Terminal and check status of a position within a game.

use std::fmt;

use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_move_generator::has_legal_move;
use crate::position::chess_rules::{FIFTY_MOVE_HALFMOVES, REPETITION_DRAW_COUNT};
use crate::position::chess_types::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameStatus {
    Ongoing,
    Check,
    Checkmate,
    Stalemate,
    DrawFiftyMove,
    DrawRepetition,
    DrawInsufficientMaterial,
}

impl GameStatus {
    #[inline]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, GameStatus::Ongoing | GameStatus::Check)
    }

    #[inline]
    pub const fn is_draw(self) -> bool {
        matches!(
            self,
            GameStatus::Stalemate
                | GameStatus::DrawFiftyMove
                | GameStatus::DrawRepetition
                | GameStatus::DrawInsufficientMaterial
        )
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            GameStatus::Ongoing => "ongoing",
            GameStatus::Check => "check",
            GameStatus::Checkmate => "checkmate",
            GameStatus::Stalemate => "stalemate",
            GameStatus::DrawFiftyMove => "draw:fifty-move",
            GameStatus::DrawRepetition => "draw:repetition",
            GameStatus::DrawInsufficientMaterial => "draw:insufficient-material",
        }
    }

    /// PGN result token. `side_to_move` is the side that would move next,
    /// i.e. the mated side on checkmate.
    pub const fn result_token(self, side_to_move: Color) -> &'static str {
        match self {
            GameStatus::Checkmate => match side_to_move {
                Color::White => "0-1",
                Color::Black => "1-0",
            },
            GameStatus::Ongoing | GameStatus::Check => "*",
            _ => "1/2-1/2",
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusReport {
    pub in_check: bool,
    pub status: GameStatus,
}

/// Status of `position` given how many times its repetition key has occurred
/// in the game so far, this occurrence included.
///
/// Checkmate and stalemate are decided first, so a mating move that also hits
/// the fifty-move limit still ends the game as checkmate.
pub fn evaluate_status(position: &Position, repetition_count: usize) -> StatusReport {
    let in_check = is_king_in_check(position, position.side_to_move);
    let status = if !has_legal_move(position) {
        if in_check {
            GameStatus::Checkmate
        } else {
            GameStatus::Stalemate
        }
    } else if position.halfmove_clock >= FIFTY_MOVE_HALFMOVES {
        GameStatus::DrawFiftyMove
    } else if repetition_count >= REPETITION_DRAW_COUNT {
        GameStatus::DrawRepetition
    } else if has_insufficient_material(position) {
        GameStatus::DrawInsufficientMaterial
    } else if in_check {
        GameStatus::Check
    } else {
        GameStatus::Ongoing
    };
    StatusReport { in_check, status }
}

const LIGHT_SQUARES: u64 = 0x55AA_55AA_55AA_55AA;

/// K v K, K+minor v K, and K+B v K+B with both bishops on one square color.
pub fn has_insufficient_material(position: &Position) -> bool {
    let heavy_or_pawn = [PieceKind::Pawn, PieceKind::Rook, PieceKind::Queen];
    if [Color::White, Color::Black]
        .into_iter()
        .any(|color| heavy_or_pawn.into_iter().any(|kind| position.pieces_of(color, kind) != 0))
    {
        return false;
    }

    let knights = position.count(Color::White, PieceKind::Knight)
        + position.count(Color::Black, PieceKind::Knight);
    let white_bishops = position.pieces_of(Color::White, PieceKind::Bishop);
    let black_bishops = position.pieces_of(Color::Black, PieceKind::Bishop);
    let minors = knights + white_bishops.count_ones() + black_bishops.count_ones();

    match minors {
        0 | 1 => true,
        2 if knights == 0 && white_bishops.count_ones() == 1 => {
            let both = white_bishops | black_bishops;
            both & LIGHT_SQUARES == both || both & LIGHT_SQUARES == 0
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(fen: &str) -> StatusReport {
        let position = Position::from_fen(fen).expect("FEN should parse");
        evaluate_status(&position, 1)
    }

    #[test]
    fn start_position_is_ongoing() {
        let report = evaluate_status(&Position::new_game(), 1);
        assert_eq!(report.status, GameStatus::Ongoing);
        assert!(!report.in_check);
    }

    #[test]
    fn known_stalemate_is_not_check() {
        let report = status_of("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
        assert_eq!(report.status, GameStatus::Stalemate);
        assert!(!report.in_check);
    }

    #[test]
    fn checkmate_beats_fifty_move_rule() {
        let report = status_of("R6k/8/6K1/8/8/8/8/8 b - - 100 80");
        assert_eq!(report.status, GameStatus::Checkmate);
        assert!(report.in_check);
    }

    #[test]
    fn fifty_move_and_repetition_draws() {
        assert_eq!(
            status_of("4k3/8/8/8/8/8/8/R3K3 b - - 100 80").status,
            GameStatus::DrawFiftyMove
        );
        let position = Position::new_game();
        assert_eq!(evaluate_status(&position, 3).status, GameStatus::DrawRepetition);
        assert_eq!(evaluate_status(&position, 2).status, GameStatus::Ongoing);
    }

    #[test]
    fn insufficient_material_cases() {
        let cases = [
            ("4k3/8/8/8/8/8/8/4K3 w - - 0 1", true),
            ("4k3/8/8/8/8/8/8/4KB2 w - - 0 1", true),
            ("4k3/8/8/8/8/8/8/4KN2 w - - 0 1", true),
            ("2b1k3/8/8/8/8/8/8/2B1K3 w - - 0 1", false),
            ("4kb2/8/8/8/8/8/8/2B1K3 w - - 0 1", true),
            ("4k3/8/8/8/8/8/8/3NKN2 w - - 0 1", false),
            ("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1", false),
            ("4k3/8/8/8/8/8/8/R3K3 w - - 0 1", false),
        ];
        for (fen, expected) in cases {
            let position = Position::from_fen(fen).expect("FEN should parse");
            assert_eq!(has_insufficient_material(&position), expected, "{fen}");
        }
    }

    #[test]
    fn check_is_reported_when_moves_remain() {
        let report = status_of("4k3/8/8/8/8/8/8/4K2r w - - 0 1");
        assert_eq!(report.status, GameStatus::Check);
        assert_eq!(report.status.result_token(Color::White), "*");
    }

    #[test]
    fn result_tokens() {
        assert_eq!(GameStatus::Checkmate.result_token(Color::White), "0-1");
        assert_eq!(GameStatus::Checkmate.result_token(Color::Black), "1-0");
        assert_eq!(GameStatus::DrawRepetition.result_token(Color::White), "1/2-1/2");
        assert_eq!(GameStatus::DrawInsufficientMaterial.to_string(), "draw:insufficient-material");
    }
}
