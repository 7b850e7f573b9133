//! Legality filter.
//!
//! Every pseudo-legal candidate is made and unmade on a scratch clone; the
//! candidate survives when the mover's king is not attacked afterwards. The
//! caller's position is never touched.

use crate::errors::{ChessError, ChessResult, IllegalMoveReason};
use crate::move_generation::legal_move_apply::{make_move_in_place, unmake_move_in_place};
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::move_generator::{
    generate_pseudo_legal_moves, generate_pseudo_legal_moves_from, MoveGenerator,
};
use crate::moves::move_descriptions::Move;
use crate::position::chess_types::*;
use crate::utils::algebraic::square_to_algebraic;

#[derive(Debug, Clone, Copy, Default)]
pub struct LegalMoveGenerator;

impl MoveGenerator for LegalMoveGenerator {
    fn generate_legal_moves(&self, position: &Position) -> Vec<Move> {
        generate_legal_moves(position)
    }
}

pub fn generate_legal_moves(position: &Position) -> Vec<Move> {
    let mut pseudo = Vec::with_capacity(64);
    generate_pseudo_legal_moves(position, &mut pseudo);
    retain_legal(position, pseudo)
}

/// Legal moves of the piece on `square` (empty for empty or enemy squares).
pub fn legal_moves_from_square(position: &Position, square: Square) -> Vec<Move> {
    let mut pseudo = Vec::with_capacity(32);
    generate_pseudo_legal_moves_from(position, square, &mut pseudo);
    retain_legal(position, pseudo)
}

/// Cheaper than `generate_legal_moves(..).is_empty()` when only existence matters.
pub fn has_legal_move(position: &Position) -> bool {
    let mut pseudo = Vec::with_capacity(64);
    generate_pseudo_legal_moves(position, &mut pseudo);
    let mut scratch = position.clone();
    pseudo.into_iter().any(|mv| leaves_king_safe(&mut scratch, mv))
}

/// Resolve a user-level move request (squares plus optional promotion) to
/// the unique matching legal move, explaining why when there is none.
pub fn find_legal_move(
    position: &Position,
    from: Square,
    to: Square,
    promotion: Option<PieceKind>,
) -> ChessResult<Move> {
    let request = describe_request(from, to, promotion);

    match position.piece_at(from) {
        None => return Err(ChessError::illegal(request, IllegalMoveReason::NoPieceOnSquare)),
        Some((color, _)) if color != position.side_to_move => {
            return Err(ChessError::illegal(request, IllegalMoveReason::WrongSideToMove))
        }
        Some(_) => {}
    }

    let candidates: Vec<Move> = legal_moves_from_square(position, from)
        .into_iter()
        .filter(|mv| mv.to == to)
        .collect();

    if let Some(mv) = candidates.iter().find(|mv| mv.promotion == promotion) {
        return Ok(*mv);
    }
    if promotion.is_none() && candidates.iter().any(|mv| mv.promotion.is_some()) {
        return Err(ChessError::illegal(request, IllegalMoveReason::MissingPromotion));
    }
    Err(ChessError::illegal(request, IllegalMoveReason::NotInLegalSet))
}

fn retain_legal(position: &Position, pseudo: Vec<Move>) -> Vec<Move> {
    let mut scratch = position.clone();
    pseudo
        .into_iter()
        .filter(|mv| leaves_king_safe(&mut scratch, *mv))
        .collect()
}

fn leaves_king_safe(scratch: &mut Position, mv: Move) -> bool {
    let mover = scratch.side_to_move;
    match make_move_in_place(scratch, mv) {
        Ok(undo) => {
            let safe = !is_king_in_check(scratch, mover);
            unmake_move_in_place(scratch, undo);
            safe
        }
        Err(_) => false,
    }
}

fn describe_request(from: Square, to: Square, promotion: Option<PieceKind>) -> String {
    let mut out = square_to_algebraic(from);
    out.push_str(&square_to_algebraic(to));
    if let Some(kind) = promotion {
        out.push(kind.fen_char());
    }
    out
}
