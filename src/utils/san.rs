//! Standard Algebraic Notation (`Nf3`, `exd6`, `O-O`, `e8=Q+`, `Qh4#`).

use crate::errors::{ChessError, ChessResult};
use crate::move_generation::legal_move_apply::apply_move;
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_move_generator::{generate_legal_moves, has_legal_move};
use crate::moves::move_descriptions::Move;
use crate::position::chess_types::*;
use crate::utils::algebraic::{file_char, rank_char, square_to_algebraic};

/// SAN of `mv` played from `position`, including the check/mate suffix.
pub fn move_to_san(position: &Position, mv: Move) -> ChessResult<String> {
    let legal = generate_legal_moves(position);
    let mut san = san_body(mv, &legal);

    let next = apply_move(position, mv)?;
    if is_king_in_check(&next, next.side_to_move) {
        san.push(if has_legal_move(&next) { '+' } else { '#' });
    }
    Ok(san)
}

/// Find the legal move whose SAN matches `text`. Check, mate and annotation
/// suffixes are ignored, as is a missing `=` before the promotion letter.
pub fn san_to_move(text: &str, position: &Position) -> ChessResult<Move> {
    let wanted = normalize_san(text);
    let legal = generate_legal_moves(position);
    legal
        .iter()
        .copied()
        .find(|mv| normalize_san(&san_body(*mv, &legal)) == wanted)
        .ok_or_else(|| ChessError::parse(format!("no legal move matches SAN {text:?}")))
}

fn normalize_san(text: &str) -> String {
    text.trim_end_matches(['+', '#', '!', '?'])
        .replace('=', "")
        .replace('0', "O")
}

fn san_body(mv: Move, legal: &[Move]) -> String {
    match mv.castling {
        Some(CastlingSide::KingSide) => return "O-O".to_owned(),
        Some(CastlingSide::QueenSide) => return "O-O-O".to_owned(),
        None => {}
    }

    let mut san = String::with_capacity(8);
    if mv.piece == PieceKind::Pawn {
        if mv.is_capture() {
            san.push(file_char(mv.from));
            san.push('x');
        }
        san.push_str(&square_to_algebraic(mv.to));
        if let Some(kind) = mv.promotion {
            san.push('=');
            san.push(kind.fen_char().to_ascii_uppercase());
        }
        return san;
    }

    san.push(mv.piece.fen_char().to_ascii_uppercase());
    san.push_str(&disambiguation(mv, legal));
    if mv.is_capture() {
        san.push('x');
    }
    san.push_str(&square_to_algebraic(mv.to));
    san
}

/// File, rank or full square of the origin when another piece of the same
/// kind could also reach the destination.
fn disambiguation(mv: Move, legal: &[Move]) -> String {
    let rivals: Vec<Square> = legal
        .iter()
        .filter(|other| other.piece == mv.piece && other.to == mv.to && other.from != mv.from)
        .map(|other| other.from)
        .collect();

    if rivals.is_empty() {
        String::new()
    } else if rivals.iter().all(|sq| file_of(*sq) != file_of(mv.from)) {
        file_char(mv.from).to_string()
    } else if rivals.iter().all(|sq| rank_of(*sq) != rank_of(mv.from)) {
        rank_char(mv.from).to_string()
    } else {
        square_to_algebraic(mv.from)
    }
}
