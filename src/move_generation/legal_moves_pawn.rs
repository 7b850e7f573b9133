use crate::move_generation::legal_move_shared::enemy_piece_on;
use crate::moves::move_descriptions::Move;
use crate::moves::pawn_moves::{pawn_attacks, pawn_push_target};
use crate::position::chess_types::*;

pub fn generate_pawn_moves(position: &Position, from: Square, out: &mut Vec<Move>) {
    let side = position.side_to_move;
    let enemy_occ = position.occupancy_by_color[side.opposite().index()];

    if let Some(one_step) = pawn_push_target(side, from) {
        if position.occupancy_all & (1u64 << one_step) == 0 {
            push_pawn_move(side, Move::quiet(from, one_step, PieceKind::Pawn), out);

            if rank_of(from) == side.pawn_start_rank() {
                if let Some(two_step) = pawn_push_target(side, one_step) {
                    if position.occupancy_all & (1u64 << two_step) == 0 {
                        let mut mv = Move::quiet(from, two_step, PieceKind::Pawn);
                        mv.double_push = true;
                        out.push(mv);
                    }
                }
            }
        }
    }

    let attacks = pawn_attacks(side, from);
    let mut captures = attacks & enemy_occ;
    while captures != 0 {
        let to = captures.trailing_zeros() as Square;
        let mv = Move::quiet(from, to, PieceKind::Pawn).with_capture(enemy_piece_on(position, to));
        push_pawn_move(side, mv, out);
        captures &= captures - 1;
    }

    if let Some(ep) = position.en_passant_square {
        if attacks & (1u64 << ep) != 0 && en_passant_victim_present(position, ep) {
            let mut mv = Move::quiet(from, ep, PieceKind::Pawn).with_capture(Some(PieceKind::Pawn));
            mv.en_passant = true;
            out.push(mv);
        }
    }
}

/// Square of the pawn removed by an en-passant capture landing on `target`.
#[inline]
pub const fn en_passant_capture_square(mover: Color, target: Square) -> Square {
    match mover {
        Color::White => target - 8,
        Color::Black => target + 8,
    }
}

fn en_passant_victim_present(position: &Position, target: Square) -> bool {
    let side = position.side_to_move;
    let victim = en_passant_capture_square(side, target);
    position.pieces_of(side.opposite(), PieceKind::Pawn) & (1u64 << victim) != 0
}

/// Push `mv`, expanding it into the four promotion choices on the last rank.
fn push_pawn_move(side: Color, mv: Move, out: &mut Vec<Move>) {
    if rank_of(mv.to) == side.promotion_rank() {
        out.extend(PieceKind::PROMOTIONS.map(|kind| mv.with_promotion(kind)));
    } else {
        out.push(mv);
    }
}
