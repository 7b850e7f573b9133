//! Move application.
//!
//! `make_move_in_place` / `unmake_move_in_place` mutate a position and restore
//! it bit for bit, keeping occupancy and the Zobrist key incrementally in sync.
//! `apply_move` is the copy-making wrapper used when the caller wants a new
//! position and keeps the old one.

use crate::errors::{ChessError, ChessResult, IllegalMoveReason};
use crate::move_generation::legal_moves_pawn::en_passant_capture_square;
use crate::moves::move_descriptions::Move;
use crate::position::chess_rules::castling_geometry;
use crate::position::chess_types::*;
use crate::search::zobrist::{castling_key, en_passant_key, side_to_move_key};

pub fn apply_move(position: &Position, mv: Move) -> ChessResult<Position> {
    let mut next = position.clone();
    make_move_in_place(&mut next, mv)?;
    Ok(next)
}

/// Castling rights that disappear once anything moves from or to `square`.
const fn rights_lost_at(square: Square) -> CastlingRights {
    match square {
        0 => CASTLE_WHITE_QUEENSIDE,
        4 => CASTLE_WHITE_KINGSIDE | CASTLE_WHITE_QUEENSIDE,
        7 => CASTLE_WHITE_KINGSIDE,
        56 => CASTLE_BLACK_QUEENSIDE,
        60 => CASTLE_BLACK_KINGSIDE | CASTLE_BLACK_QUEENSIDE,
        63 => CASTLE_BLACK_KINGSIDE,
        _ => 0,
    }
}

/// Apply `mv` for the side to move. The move is trusted to be pseudo-legal
/// apart from the checks below; the position is untouched on error.
pub fn make_move_in_place(position: &mut Position, mv: Move) -> ChessResult<UndoState> {
    let side = position.side_to_move;
    let enemy = side.opposite();

    match position.piece_at(mv.from) {
        None => {
            return Err(ChessError::illegal(
                mv.to_string(),
                IllegalMoveReason::NoPieceOnSquare,
            ))
        }
        Some((color, _)) if color != side => {
            return Err(ChessError::illegal(
                mv.to_string(),
                IllegalMoveReason::WrongSideToMove,
            ))
        }
        Some((_, kind)) if kind != mv.piece => {
            return Err(ChessError::illegal(
                mv.to_string(),
                IllegalMoveReason::NotInLegalSet,
            ))
        }
        Some(_) => {}
    }

    let capture_square = if mv.en_passant {
        en_passant_capture_square(side, mv.to)
    } else {
        mv.to
    };
    let captured_piece = match position.piece_at(capture_square) {
        Some((color, _)) if color == side => {
            return Err(ChessError::illegal(
                mv.to_string(),
                IllegalMoveReason::NotInLegalSet,
            ))
        }
        Some((_, PieceKind::King)) => {
            return Err(ChessError::illegal(
                mv.to_string(),
                IllegalMoveReason::NotInLegalSet,
            ))
        }
        Some((_, kind)) => Some(kind),
        None if mv.en_passant => {
            return Err(ChessError::illegal(
                mv.to_string(),
                IllegalMoveReason::NotInLegalSet,
            ))
        }
        None => None,
    };

    let undo = UndoState {
        mv,
        captured_piece,
        prev_castling_rights: position.castling_rights,
        prev_en_passant_square: position.en_passant_square,
        prev_halfmove_clock: position.halfmove_clock,
        prev_fullmove_number: position.fullmove_number,
        prev_zobrist_key: position.zobrist_key,
    };

    position.zobrist_key ^=
        castling_key(position.castling_rights) ^ en_passant_key(position.en_passant_square);

    if let Some(kind) = captured_piece {
        position.remove_piece(enemy, kind, capture_square);
    }
    position.remove_piece(side, mv.piece, mv.from);
    position.put_piece(side, mv.promotion.unwrap_or(mv.piece), mv.to);

    if let Some(castle_side) = mv.castling {
        let geometry = castling_geometry(side, castle_side);
        position.remove_piece(side, PieceKind::Rook, geometry.rook_from);
        position.put_piece(side, PieceKind::Rook, geometry.rook_to);
    }

    position.castling_rights &= !(rights_lost_at(mv.from) | rights_lost_at(mv.to));
    if mv.piece == PieceKind::King {
        position.castling_rights &= !(castling_flag(side, CastlingSide::KingSide)
            | castling_flag(side, CastlingSide::QueenSide));
    }

    position.en_passant_square = if mv.double_push {
        Some((mv.from + mv.to) / 2)
    } else {
        None
    };

    if mv.piece == PieceKind::Pawn || captured_piece.is_some() {
        position.halfmove_clock = 0;
    } else {
        position.halfmove_clock = position.halfmove_clock.saturating_add(1);
    }
    if side == Color::Black {
        position.fullmove_number = position.fullmove_number.saturating_add(1);
    }
    position.side_to_move = enemy;

    position.zobrist_key ^= castling_key(position.castling_rights)
        ^ en_passant_key(position.en_passant_square)
        ^ side_to_move_key();

    Ok(undo)
}

/// Exact inverse of `make_move_in_place` for the undo record it returned.
pub fn unmake_move_in_place(position: &mut Position, undo: UndoState) {
    let mv = undo.mv;
    let side = position.side_to_move.opposite();
    position.side_to_move = side;

    if let Some(castle_side) = mv.castling {
        let geometry = castling_geometry(side, castle_side);
        position.remove_piece(side, PieceKind::Rook, geometry.rook_to);
        position.put_piece(side, PieceKind::Rook, geometry.rook_from);
    }

    position.remove_piece(side, mv.promotion.unwrap_or(mv.piece), mv.to);
    position.put_piece(side, mv.piece, mv.from);

    if let Some(kind) = undo.captured_piece {
        let square = if mv.en_passant {
            en_passant_capture_square(side, mv.to)
        } else {
            mv.to
        };
        position.put_piece(side.opposite(), kind, square);
    }

    position.castling_rights = undo.prev_castling_rights;
    position.en_passant_square = undo.prev_en_passant_square;
    position.halfmove_clock = undo.prev_halfmove_clock;
    position.fullmove_number = undo.prev_fullmove_number;
    position.zobrist_key = undo.prev_zobrist_key;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::move_generation::legal_move_generator::generate_legal_moves;
    use crate::search::zobrist::compute_zobrist_key;

    const TRICKY_FENS: [&str; 5] = [
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
        "rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3",
    ];

    #[test]
    fn make_then_unmake_restores_every_legal_move() {
        for fen in TRICKY_FENS {
            let original = Position::from_fen(fen).expect("FEN should parse");
            for mv in generate_legal_moves(&original) {
                let mut scratch = original.clone();
                let undo = make_move_in_place(&mut scratch, mv).expect("legal move should apply");
                assert_eq!(scratch.zobrist_key, compute_zobrist_key(&scratch), "{fen} {mv}");
                assert_ne!(scratch.side_to_move, original.side_to_move);
                for color in [Color::White, Color::Black] {
                    assert_eq!(scratch.count(color, PieceKind::King), 1, "{fen} {mv}");
                }
                unmake_move_in_place(&mut scratch, undo);
                assert_eq!(scratch, original, "{fen} {mv}");
            }
        }
    }

    #[test]
    fn castling_moves_rook_and_clears_rights() {
        let position =
            Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 3 10").expect("FEN should parse");
        let mut castle = Move::quiet(4, 6, PieceKind::King);
        castle.castling = Some(CastlingSide::KingSide);

        let next = apply_move(&position, castle).expect("castle should apply");
        assert_eq!(next.piece_at(6), Some((Color::White, PieceKind::King)));
        assert_eq!(next.piece_at(5), Some((Color::White, PieceKind::Rook)));
        assert_eq!(next.piece_at(7), None);
        assert_eq!(next.castling_rights, CASTLE_BLACK_KINGSIDE | CASTLE_BLACK_QUEENSIDE);
        assert_eq!(next.halfmove_clock, 4);
    }

    #[test]
    fn capturing_a_rook_on_its_corner_removes_the_right() {
        let position =
            Position::from_fen("r3k2r/8/8/8/8/8/1B6/R3K2R w KQkq - 0 1").expect("FEN should parse");
        let capture = Move::quiet(9, 63, PieceKind::Bishop).with_capture(Some(PieceKind::Rook));
        let next = apply_move(&position, capture).expect("capture should apply");
        assert_eq!(next.castling_rights & CASTLE_BLACK_KINGSIDE, 0);
        assert_ne!(next.castling_rights & CASTLE_BLACK_QUEENSIDE, 0);
        assert_eq!(next.halfmove_clock, 0);
    }

    #[test]
    fn en_passant_target_lives_one_ply() {
        let start = Position::new_game();
        let mut push = Move::quiet(12, 28, PieceKind::Pawn);
        push.double_push = true;
        let after_push = apply_move(&start, push).expect("push should apply");
        assert_eq!(after_push.en_passant_square, Some(20));

        let reply = Move::quiet(57, 42, PieceKind::Knight);
        let after_reply = apply_move(&after_push, reply).expect("reply should apply");
        assert_eq!(after_reply.en_passant_square, None);
        assert_eq!(after_reply.fullmove_number, 2);
    }

    #[test]
    fn wrong_side_and_empty_square_are_rejected() {
        let start = Position::new_game();
        let black_pawn = Move::quiet(52, 44, PieceKind::Pawn);
        assert!(matches!(
            apply_move(&start, black_pawn),
            Err(ChessError::IllegalMove {
                reason: IllegalMoveReason::WrongSideToMove,
                ..
            })
        ));
        let ghost = Move::quiet(28, 36, PieceKind::Pawn);
        assert!(matches!(
            apply_move(&start, ghost),
            Err(ChessError::IllegalMove {
                reason: IllegalMoveReason::NoPieceOnSquare,
                ..
            })
        ));
    }
}
