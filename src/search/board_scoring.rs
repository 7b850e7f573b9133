//! Static evaluation.
//!
//! Search is generic over `BoardScorer`, so alternative heuristics slot in
//! without touching search code. Scores are centipawns from the side to
//! move's point of view. Terminal positions are scored by the search, never
//! here.

use crate::move_generation::move_generator::generate_pseudo_legal_moves;
use crate::position::chess_types::*;

pub const MATE_SCORE: i32 = 30_000;

pub trait BoardScorer: Send + Sync {
    /// Score from the perspective of the side to move.
    fn score(&self, position: &Position) -> i32;
}

#[inline]
fn from_side_to_move(position: &Position, white_minus_black: i32) -> i32 {
    match position.side_to_move {
        Color::White => white_minus_black,
        Color::Black => -white_minus_black,
    }
}

/// Material count only.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaterialScorer;

impl MaterialScorer {
    /// Kings are never traded, so they carry no material value.
    #[inline]
    pub const fn piece_value(piece: PieceKind) -> i32 {
        match piece {
            PieceKind::Pawn => 100,
            PieceKind::Knight => 320,
            PieceKind::Bishop => 330,
            PieceKind::Rook => 500,
            PieceKind::Queen => 900,
            PieceKind::King => 0,
        }
    }

    pub fn material_white_minus_black(position: &Position) -> i32 {
        PieceKind::ALL
            .into_iter()
            .map(|kind| {
                let diff = position.count(Color::White, kind) as i32
                    - position.count(Color::Black, kind) as i32;
                diff * Self::piece_value(kind)
            })
            .sum()
    }
}

impl BoardScorer for MaterialScorer {
    fn score(&self, position: &Position) -> i32 {
        from_side_to_move(position, Self::material_white_minus_black(position))
    }
}

/// Material, piece-square tables, mobility and king safety.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardScorer;

impl StandardScorer {
    const MOBILITY_WEIGHT: i32 = 2;
    const SHIELD_PAWN_BONUS: i32 = 12;
    const SEMI_OPEN_FILE_PENALTY: i32 = 15;
    const OPEN_FILE_PENALTY: i32 = 25;

    /// Sum of the individual terms, white minus black.
    pub fn breakdown(position: &Position) -> ScoreBreakdown {
        let phase = game_phase(position);
        let mut breakdown = ScoreBreakdown {
            material: MaterialScorer::material_white_minus_black(position),
            ..ScoreBreakdown::default()
        };
        for (color, sign) in [(Color::White, 1), (Color::Black, -1)] {
            breakdown.piece_squares += sign * piece_square_total(position, color, phase);
            breakdown.mobility += sign * mobility(position, color) * Self::MOBILITY_WEIGHT;
            breakdown.king_safety += sign * king_safety(position, color);
        }
        breakdown
    }
}

impl BoardScorer for StandardScorer {
    fn score(&self, position: &Position) -> i32 {
        from_side_to_move(position, Self::breakdown(position).total())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreBreakdown {
    pub material: i32,
    pub piece_squares: i32,
    pub mobility: i32,
    pub king_safety: i32,
}

impl ScoreBreakdown {
    #[inline]
    pub fn total(&self) -> i32 {
        self.material + self.piece_squares + self.mobility + self.king_safety
    }
}

/// Non-pawn material phase: 24 with all pieces on, 0 with only kings and pawns.
pub const MAX_PHASE: i32 = 24;

fn phase_weight(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::Knight | PieceKind::Bishop => 1,
        PieceKind::Rook => 2,
        PieceKind::Queen => 4,
        PieceKind::Pawn | PieceKind::King => 0,
    }
}

fn side_phase(position: &Position, color: Color) -> i32 {
    PieceKind::ALL
        .into_iter()
        .map(|kind| position.count(color, kind) as i32 * phase_weight(kind))
        .sum()
}

pub fn game_phase(position: &Position) -> i32 {
    (side_phase(position, Color::White) + side_phase(position, Color::Black)).min(MAX_PHASE)
}

// Tables are laid out as printed boards (rank 8 first) from white's side.
#[rustfmt::skip]
const PAWN_TABLE: [i32; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
    50, 50, 50, 50, 50, 50, 50, 50,
    10, 10, 20, 30, 30, 20, 10, 10,
     5,  5, 10, 25, 25, 10,  5,  5,
     0,  0,  0, 20, 20,  0,  0,  0,
     5, -5,-10,  0,  0,-10, -5,  5,
     5, 10, 10,-20,-20, 10, 10,  5,
     0,  0,  0,  0,  0,  0,  0,  0,
];

#[rustfmt::skip]
const KNIGHT_TABLE: [i32; 64] = [
   -50,-40,-30,-30,-30,-30,-40,-50,
   -40,-20,  0,  0,  0,  0,-20,-40,
   -30,  0, 10, 15, 15, 10,  0,-30,
   -30,  5, 15, 20, 20, 15,  5,-30,
   -30,  0, 15, 20, 20, 15,  0,-30,
   -30,  5, 10, 15, 15, 10,  5,-30,
   -40,-20,  0,  5,  5,  0,-20,-40,
   -50,-40,-30,-30,-30,-30,-40,-50,
];

#[rustfmt::skip]
const BISHOP_TABLE: [i32; 64] = [
   -20,-10,-10,-10,-10,-10,-10,-20,
   -10,  0,  0,  0,  0,  0,  0,-10,
   -10,  0,  5, 10, 10,  5,  0,-10,
   -10,  5,  5, 10, 10,  5,  5,-10,
   -10,  0, 10, 10, 10, 10,  0,-10,
   -10, 10, 10, 10, 10, 10, 10,-10,
   -10,  5,  0,  0,  0,  0,  5,-10,
   -20,-10,-10,-10,-10,-10,-10,-20,
];

#[rustfmt::skip]
const ROOK_TABLE: [i32; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
     5, 10, 10, 10, 10, 10, 10,  5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
     0,  0,  0,  5,  5,  0,  0,  0,
];

#[rustfmt::skip]
const QUEEN_TABLE: [i32; 64] = [
   -20,-10,-10, -5, -5,-10,-10,-20,
   -10,  0,  0,  0,  0,  0,  0,-10,
   -10,  0,  5,  5,  5,  5,  0,-10,
    -5,  0,  5,  5,  5,  5,  0, -5,
     0,  0,  5,  5,  5,  5,  0, -5,
   -10,  5,  5,  5,  5,  5,  0,-10,
   -10,  0,  5,  0,  0,  0,  0,-10,
   -20,-10,-10, -5, -5,-10,-10,-20,
];

#[rustfmt::skip]
const KING_MIDDLEGAME_TABLE: [i32; 64] = [
   -30,-40,-40,-50,-50,-40,-40,-30,
   -30,-40,-40,-50,-50,-40,-40,-30,
   -30,-40,-40,-50,-50,-40,-40,-30,
   -30,-40,-40,-50,-50,-40,-40,-30,
   -20,-30,-30,-40,-40,-30,-30,-20,
   -10,-20,-20,-20,-20,-20,-20,-10,
    20, 20,  0,  0,  0,  0, 20, 20,
    20, 30, 10,  0,  0, 10, 30, 20,
];

#[rustfmt::skip]
const KING_ENDGAME_TABLE: [i32; 64] = [
   -50,-40,-30,-20,-20,-30,-40,-50,
   -30,-20,-10,  0,  0,-10,-20,-30,
   -30,-10, 20, 30, 30, 20,-10,-30,
   -30,-10, 30, 40, 40, 30,-10,-30,
   -30,-10, 30, 40, 40, 30,-10,-30,
   -30,-10, 20, 30, 30, 20,-10,-30,
   -30,-30,  0,  0,  0,  0,-30,-30,
   -50,-30,-30,-30,-30,-30,-30,-50,
];

/// Index into a printed-board table for `color`'s piece on `square`.
/// Black reads the table upside down.
#[inline]
const fn table_index(color: Color, square: Square) -> usize {
    match color {
        Color::White => (square ^ 56) as usize,
        Color::Black => square as usize,
    }
}

pub fn piece_square_bonus(kind: PieceKind, color: Color, square: Square, phase: i32) -> i32 {
    let index = table_index(color, square);
    match kind {
        PieceKind::Pawn => PAWN_TABLE[index],
        PieceKind::Knight => KNIGHT_TABLE[index],
        PieceKind::Bishop => BISHOP_TABLE[index],
        PieceKind::Rook => ROOK_TABLE[index],
        PieceKind::Queen => QUEEN_TABLE[index],
        PieceKind::King => {
            (KING_MIDDLEGAME_TABLE[index] * phase + KING_ENDGAME_TABLE[index] * (MAX_PHASE - phase))
                / MAX_PHASE
        }
    }
}

fn piece_square_total(position: &Position, color: Color, phase: i32) -> i32 {
    let mut total = 0;
    for kind in PieceKind::ALL {
        let mut pieces = position.pieces_of(color, kind);
        while pieces != 0 {
            let square = pieces.trailing_zeros() as Square;
            total += piece_square_bonus(kind, color, square, phase);
            pieces &= pieces - 1;
        }
    }
    total
}

/// Pseudo-legal move count of `color` as if it were to move. The
/// en-passant target only belongs to the side actually to move.
fn mobility(position: &Position, color: Color) -> i32 {
    let mut view = position.clone();
    if view.side_to_move != color {
        view.side_to_move = color;
        view.en_passant_square = None;
    }
    let mut moves = Vec::with_capacity(64);
    generate_pseudo_legal_moves(&view, &mut moves);
    moves.len() as i32
}

const FILE_MASK: u64 = 0x0101_0101_0101_0101;

/// Pawn shield in front of the king and open files next to it, weighted by
/// how much attacking material the opponent still has.
fn king_safety(position: &Position, color: Color) -> i32 {
    let Some(king) = position.king_square(color) else {
        return 0;
    };

    let own_pawns = position.pieces_of(color, PieceKind::Pawn);
    let enemy_pawns = position.pieces_of(color.opposite(), PieceKind::Pawn);
    let king_file = file_of(king) as i32;
    let king_rank = rank_of(king) as i32;
    let forward = match color {
        Color::White => 1,
        Color::Black => -1,
    };

    let mut raw = 0;
    for file in (king_file - 1).max(0)..=(king_file + 1).min(7) {
        for step in 1..=2 {
            let rank = king_rank + forward * step;
            if (0..8).contains(&rank) && own_pawns & (1u64 << (rank * 8 + file)) != 0 {
                raw += StandardScorer::SHIELD_PAWN_BONUS;
            }
        }

        let file_mask = FILE_MASK << file;
        if own_pawns & file_mask == 0 {
            raw -= if enemy_pawns & file_mask == 0 {
                StandardScorer::OPEN_FILE_PENALTY
            } else {
                StandardScorer::SEMI_OPEN_FILE_PENALTY
            };
        }
    }

    let enemy_phase = side_phase(position, color.opposite()).min(MAX_PHASE / 2);
    raw * enemy_phase / (MAX_PHASE / 2)
}
