//! Long algebraic move text (`e2e4`, `e7e8q`), the form used by the opening
//! book and the demo binary.

use crate::errors::{ChessError, ChessResult};
use crate::move_generation::legal_move_generator::find_legal_move;
use crate::moves::move_descriptions::Move;
use crate::position::chess_types::*;
use crate::utils::algebraic::algebraic_to_square;

/// Split move text into squares and an optional promotion piece without
/// consulting any position.
pub fn parse_long_algebraic(text: &str) -> ChessResult<(Square, Square, Option<PieceKind>)> {
    if !text.is_ascii() || (text.len() != 4 && text.len() != 5) {
        return Err(ChessError::parse(format!("invalid long algebraic move: {text:?}")));
    }

    let from = algebraic_to_square(&text[0..2])?;
    let to = algebraic_to_square(&text[2..4])?;
    let promotion = match text[4..].chars().next() {
        None => None,
        Some(ch) => match PieceKind::from_fen_char(ch) {
            Some(kind) if PieceKind::PROMOTIONS.contains(&kind) => Some(kind),
            _ => {
                return Err(ChessError::parse(format!(
                    "invalid promotion piece '{ch}' in {text:?}"
                )))
            }
        },
    };

    Ok((from, to, promotion))
}

/// Resolve move text against `position`'s legal moves.
pub fn long_algebraic_to_move(text: &str, position: &Position) -> ChessResult<Move> {
    let (from, to, promotion) = parse_long_algebraic(text)?;
    find_legal_move(position, from, to, promotion)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::IllegalMoveReason;

    #[test]
    fn resolves_special_moves_with_their_flags() {
        let double = long_algebraic_to_move("e2e4", &Position::new_game()).expect("move should parse");
        assert!(double.double_push);

        let castle_position =
            Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").expect("FEN should parse");
        let castle = long_algebraic_to_move("e1c1", &castle_position).expect("castle should parse");
        assert_eq!(castle.castling, Some(CastlingSide::QueenSide));

        let ep_position =
            Position::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").expect("FEN should parse");
        let ep = long_algebraic_to_move("e5d6", &ep_position).expect("en passant should parse");
        assert!(ep.en_passant);
        assert_eq!(ep.captured, Some(PieceKind::Pawn));

        let promo_position =
            Position::from_fen("8/P7/8/8/8/8/8/k6K w - - 0 1").expect("FEN should parse");
        let promo = long_algebraic_to_move("a7a8q", &promo_position).expect("promotion should parse");
        assert_eq!(promo.promotion, Some(PieceKind::Queen));
        assert_eq!(promo.to_string(), "a7a8q");
    }

    #[test]
    fn rejects_bad_text_and_illegal_moves() {
        assert!(matches!(parse_long_algebraic("e2"), Err(ChessError::Parse(_))));
        assert!(matches!(parse_long_algebraic("e7e8k"), Err(ChessError::Parse(_))));
        assert!(matches!(
            long_algebraic_to_move("e2e5", &Position::new_game()),
            Err(ChessError::IllegalMove { reason: IllegalMoveReason::NotInLegalSet, .. })
        ));
    }
}
