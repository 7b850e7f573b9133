//! Opening book with TSV import compatible with public opening datasets.
//!
//! Rows are long-algebraic move sequences from the standard start. Every
//! position along each sequence is indexed by Zobrist key with the weighted
//! moves played from it.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use rand::Rng;

use crate::errors::{ChessError, ChessResult};
use crate::move_generation::legal_move_apply::apply_move;
use crate::move_generation::legal_move_generator::generate_legal_moves;
use crate::moves::move_descriptions::Move;
use crate::position::chess_types::Position;
use crate::utils::long_algebraic::long_algebraic_to_move;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookMove {
    pub mv: Move,
    pub weight: u32,
}

#[derive(Debug, Clone, Default)]
pub struct OpeningBook {
    by_hash: HashMap<u64, Vec<BookMove>>,
}

impl OpeningBook {
    /// The small book compiled into the crate.
    pub fn embedded() -> ChessResult<Self> {
        Self::from_tsv_str(include_str!("data/opening_book_minimal.tsv"))
    }

    pub fn from_tsv_path(path: impl AsRef<Path>) -> ChessResult<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .map_err(|e| ChessError::parse(format!("failed reading {}: {e}", path.display())))?;
        Self::from_tsv_str(&data)
    }

    /// Parse a TSV with a header row. The move column is `uci` or `moves`;
    /// an optional `weight`, `count` or `plays` column weights each row.
    pub fn from_tsv_str(tsv: &str) -> ChessResult<Self> {
        let mut lines = tsv.lines().filter(|line| !line.trim().is_empty());
        let header = lines
            .next()
            .ok_or_else(|| ChessError::parse("opening TSV is empty"))?;

        let mut uci_idx = None;
        let mut moves_idx = None;
        let mut weight_idx = None;
        for (i, name) in header.split('\t').enumerate() {
            match name.trim().to_ascii_lowercase().as_str() {
                "uci" => uci_idx = Some(i),
                "moves" => moves_idx = Some(i),
                "weight" | "count" | "plays" => weight_idx = Some(i),
                _ => {}
            }
        }
        let sequence_idx = uci_idx.or(moves_idx).ok_or_else(|| {
            ChessError::parse("opening TSV must contain a 'uci' or 'moves' column")
        })?;

        let mut weights: HashMap<u64, HashMap<Move, u32>> = HashMap::new();

        for line in lines {
            let fields: Vec<&str> = line.split('\t').collect();
            let sequence = fields
                .get(sequence_idx)
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .ok_or_else(|| ChessError::parse(format!("missing move sequence in row {line:?}")))?;

            let row_weight = weight_idx
                .and_then(|idx| fields.get(idx))
                .and_then(|w| w.trim().parse::<u32>().ok())
                .unwrap_or(1)
                .max(1);

            let mut position = Position::new_game();
            for token in sequence.split_whitespace() {
                let mv = long_algebraic_to_move(token, &position)
                    .map_err(|e| {
                        ChessError::parse(format!("bad move {token:?} in opening row {line:?}: {e}"))
                    })?;
                let entry = weights
                    .entry(position.zobrist_key)
                    .or_default()
                    .entry(mv)
                    .or_insert(0);
                *entry = entry.saturating_add(row_weight);
                position = apply_move(&position, mv)?;
            }
        }

        let by_hash = weights
            .into_iter()
            .map(|(hash, moves)| {
                let mut row: Vec<BookMove> = moves
                    .into_iter()
                    .map(|(mv, weight)| BookMove { mv, weight })
                    .collect();
                // Fixed order so seeded choices are reproducible.
                row.sort_by_key(|b| (b.mv.from, b.mv.to, b.mv.promotion.map(|p| p.index())));
                (hash, row)
            })
            .collect();

        Ok(Self { by_hash })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.by_hash.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.by_hash.is_empty()
    }

    pub fn moves_for(&self, position: &Position) -> Option<&[BookMove]> {
        self.by_hash
            .get(&position.zobrist_key)
            .map(|v| v.as_slice())
    }

    /// Weighted pick among the book moves that are legal in `position`.
    /// Hash collisions can index moves from an unrelated position, so each
    /// candidate is checked against the legal set.
    pub fn choose_weighted_move<R: Rng + ?Sized>(
        &self,
        position: &Position,
        rng: &mut R,
    ) -> Option<Move> {
        let legal = generate_legal_moves(position);
        let candidates: Vec<BookMove> = self
            .moves_for(position)?
            .iter()
            .copied()
            .filter(|b| legal.contains(&b.mv))
            .collect();

        let total_weight: u64 = candidates.iter().map(|b| u64::from(b.weight)).sum();
        if total_weight == 0 {
            return None;
        }

        let mut pick = rng.random_range(0..total_weight);
        for b in &candidates {
            let w = u64::from(b.weight);
            if pick < w {
                return Some(b.mv);
            }
            pick -= w;
        }
        candidates.first().map(|b| b.mv)
    }
}
