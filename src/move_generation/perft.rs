//! Perft: exhaustive legal-move tree counting used to validate move generation.

use crate::move_generation::legal_move_apply::{make_move_in_place, unmake_move_in_place};
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_move_generator::has_legal_move;
use crate::move_generation::move_generator::MoveGenerator;
use crate::position::chess_types::Position;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerftCounts {
    pub nodes: u64,
    pub captures: u64,
    pub en_passant: u64,
    pub castles: u64,
    pub promotions: u64,
    pub checks: u64,
    pub checkmates: u64,
}

/// Count leaf nodes `depth` plies below `position`, with per-leaf move
/// statistics in the usual perft-table categories.
pub fn perft<G: MoveGenerator>(generator: &G, position: &Position, depth: u8) -> PerftCounts {
    let mut counts = PerftCounts::default();
    if depth == 0 {
        counts.nodes = 1;
        return counts;
    }
    let mut scratch = position.clone();
    perft_recurse(generator, &mut scratch, depth, &mut counts);
    counts
}

/// Leaf count only; skips the per-leaf check and mate detection.
pub fn perft_nodes<G: MoveGenerator>(generator: &G, position: &Position, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }
    let mut scratch = position.clone();
    count_nodes(generator, &mut scratch, depth)
}

fn count_nodes<G: MoveGenerator>(generator: &G, position: &mut Position, depth: u8) -> u64 {
    let moves = generator.generate_legal_moves(position);
    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0;
    for mv in moves {
        let Ok(undo) = make_move_in_place(position, mv) else {
            continue;
        };
        nodes += count_nodes(generator, position, depth - 1);
        unmake_move_in_place(position, undo);
    }
    nodes
}

fn perft_recurse<G: MoveGenerator>(
    generator: &G,
    position: &mut Position,
    depth: u8,
    counts: &mut PerftCounts,
) {
    for mv in generator.generate_legal_moves(position) {
        let Ok(undo) = make_move_in_place(position, mv) else {
            continue;
        };

        if depth == 1 {
            counts.nodes += 1;
            counts.captures += u64::from(mv.is_capture());
            counts.en_passant += u64::from(mv.en_passant);
            counts.castles += u64::from(mv.castling.is_some());
            counts.promotions += u64::from(mv.promotion.is_some());
            if is_king_in_check(position, position.side_to_move) {
                counts.checks += 1;
                counts.checkmates += u64::from(!has_legal_move(position));
            }
        } else {
            perft_recurse(generator, position, depth - 1, counts);
        }

        unmake_move_in_place(position, undo);
    }
}
