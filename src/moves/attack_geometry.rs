//! Board geometry shared by the per-piece attack tables.
//!
//! Leapers (pawn captures, knight, king) get a `[u64; 64]` table built at
//! compile time from a list of `(file, rank)` steps. Sliders walk rays at run
//! time against the current occupancy.

use crate::position::chess_types::Square;

pub type Step = (i32, i32);

pub const ORTHOGONAL_DIRECTIONS: [Step; 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
pub const DIAGONAL_DIRECTIONS: [Step; 4] = [(1, 1), (-1, 1), (1, -1), (-1, -1)];

/// Bit for `(file, rank)` or 0 when off the board.
#[inline]
pub const fn bit_if_on_board(file: i32, rank: i32) -> u64 {
    if file < 0 || file > 7 || rank < 0 || rank > 7 {
        0
    } else {
        1u64 << (rank * 8 + file)
    }
}

/// Precompute the squares reachable with one of `steps` from every square.
pub const fn step_table(steps: &[Step]) -> [u64; 64] {
    let mut table = [0u64; 64];
    let mut sq = 0;
    while sq < 64 {
        let file = (sq % 8) as i32;
        let rank = (sq / 8) as i32;
        let mut i = 0;
        while i < steps.len() {
            table[sq] |= bit_if_on_board(file + steps[i].0, rank + steps[i].1);
            i += 1;
        }
        sq += 1;
    }
    table
}

/// Squares hit along `directions`, each ray stopping on (and including) the
/// first occupied square.
#[inline]
pub fn sliding_attacks(square: Square, occupancy: u64, directions: &[Step]) -> u64 {
    let mut attacks = 0u64;
    for &(df, dr) in directions {
        let mut file = (square % 8) as i32 + df;
        let mut rank = (square / 8) as i32 + dr;
        while (0..8).contains(&file) && (0..8).contains(&rank) {
            let bit = 1u64 << (rank * 8 + file);
            attacks |= bit;
            if occupancy & bit != 0 {
                break;
            }
            file += df;
            rank += dr;
        }
    }
    attacks
}
