//! Fixed-size transposition table keyed by Zobrist hash.
//!
//! Direct-indexed, one slot per index. Replacement prefers deeper entries and
//! evicts entries not touched for several generations (one generation per
//! iterative-deepening iteration). The table is a cache: clearing it never
//! changes what the search returns, only how fast.

use crate::moves::move_descriptions::Move;
use crate::search::board_scoring::MATE_SCORE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Exact,
    /// Fail-high: the true score is at least `score`.
    Lower,
    /// Fail-low: the true score is at most `score`.
    Upper,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TTEntry {
    pub key: u64,
    pub depth: u8,
    /// Mate scores are stored relative to this node, see `score_to_tt`.
    pub score: i32,
    pub bound: Bound,
    pub best_move: Option<Move>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TTStats {
    pub probes: u64,
    pub hits: u64,
    pub stores: u64,
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    entry: TTEntry,
    generation: u8,
}

#[derive(Debug, Clone)]
pub struct TranspositionTable {
    slots: Vec<Option<Slot>>,
    current_generation: u8,
    stats: TTStats,
}

/// Scores beyond this are mate scores.
const MATE_THRESHOLD: i32 = MATE_SCORE - 1_000;

/// Convert a root-relative mate score to a node-relative one before storing.
#[inline]
pub fn score_to_tt(score: i32, ply: u32) -> i32 {
    let ply = ply as i32;
    if score >= MATE_THRESHOLD {
        score + ply
    } else if score <= -MATE_THRESHOLD {
        score - ply
    } else {
        score
    }
}

/// Inverse of `score_to_tt` for the probing node's ply.
#[inline]
pub fn score_from_tt(score: i32, ply: u32) -> i32 {
    let ply = ply as i32;
    if score >= MATE_THRESHOLD {
        score - ply
    } else if score <= -MATE_THRESHOLD {
        score + ply
    } else {
        score
    }
}

impl TranspositionTable {
    const AGE_REPLACE_THRESHOLD: u8 = 4;
    const DEPTH_REPLACE_MARGIN: u8 = 2;

    /// Table sized to roughly `size_mb` megabytes (at least one slot).
    pub fn new_with_mb(size_mb: usize) -> Self {
        let bytes = size_mb.max(1) * 1024 * 1024;
        let count = (bytes / std::mem::size_of::<Option<Slot>>()).max(1);
        Self::with_slots(count)
    }

    pub fn with_slots(count: usize) -> Self {
        Self {
            slots: vec![None; count.max(1)],
            current_generation: 0,
            stats: TTStats::default(),
        }
    }

    #[inline]
    pub fn new_generation(&mut self) {
        self.current_generation = self.current_generation.wrapping_add(1);
    }

    pub fn clear(&mut self) {
        self.slots.fill(None);
        self.current_generation = 0;
        self.stats = TTStats::default();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[inline]
    pub fn stats(&self) -> TTStats {
        self.stats
    }

    #[inline]
    pub fn reset_stats(&mut self) {
        self.stats = TTStats::default();
    }

    #[inline]
    fn index(&self, key: u64) -> usize {
        (key % self.slots.len() as u64) as usize
    }

    pub fn probe(&mut self, key: u64) -> Option<TTEntry> {
        self.stats.probes += 1;
        let index = self.index(key);
        let generation = self.current_generation;
        let slot = self.slots[index].as_mut().filter(|slot| slot.entry.key == key)?;
        slot.generation = generation;
        self.stats.hits += 1;
        Some(slot.entry)
    }

    /// Best move stored for `key`, without touching statistics or age.
    pub fn peek_move(&self, key: u64) -> Option<Move> {
        self.slots[self.index(key)]
            .filter(|slot| slot.entry.key == key)
            .and_then(|slot| slot.entry.best_move)
    }

    pub fn store(&mut self, entry: TTEntry) {
        self.stats.stores += 1;
        let index = self.index(entry.key);
        let generation = self.current_generation;

        let replace = match self.slots[index] {
            None => true,
            Some(existing) if existing.entry.key == entry.key => {
                entry.depth >= existing.entry.depth || entry.bound == Bound::Exact
            }
            Some(existing) => {
                generation.wrapping_sub(existing.generation) >= Self::AGE_REPLACE_THRESHOLD
                    || entry.depth.saturating_add(Self::DEPTH_REPLACE_MARGIN) >= existing.entry.depth
            }
        };

        if replace {
            // Keep a known best move when the new entry has none.
            let best_move = entry.best_move.or_else(|| {
                self.slots[index]
                    .filter(|slot| slot.entry.key == entry.key)
                    .and_then(|slot| slot.entry.best_move)
            });
            self.slots[index] = Some(Slot {
                entry: TTEntry { best_move, ..entry },
                generation,
            });
        }
    }
}
