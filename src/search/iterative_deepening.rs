//! Iterative deepening search with negamax alpha-beta pruning.
//!
//! Each iteration searches the full tree to a fixed depth with a full window,
//! so the root score of a completed iteration equals the plain minimax value
//! at that depth. The transposition table only cuts off on entries stored at
//! exactly the remaining depth; entries of other depths still contribute
//! their best move to ordering.
//!
//! Time is checked at every node. An iteration interrupted by the deadline is
//! discarded and the previous iteration's answer stands.

use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::move_generation::legal_move_apply::{make_move_in_place, unmake_move_in_place};
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::move_generator::MoveGenerator;
use crate::moves::move_descriptions::Move;
use crate::position::chess_rules::{FIFTY_MOVE_HALFMOVES, REPETITION_DRAW_COUNT};
use crate::position::chess_types::Position;
use crate::search::board_scoring::{BoardScorer, MATE_SCORE};
use crate::search::move_ordering::order_moves;
use crate::search::transposition_table::{
    score_from_tt, score_to_tt, Bound, TTEntry, TTStats, TranspositionTable,
};

/// Wider than any reachable score.
const INFINITY: i32 = MATE_SCORE + 1;

#[derive(Debug, Clone, Default)]
pub struct SearchConfig {
    pub max_depth: u8,
    /// `None` searches every depth to completion.
    pub time_budget: Option<Duration>,
    /// Zobrist keys of the game positions before the root, oldest first.
    /// Used to score repetitions inside the tree as draws.
    pub history: Vec<u64>,
}

#[derive(Debug, Clone, Default)]
pub struct SearchResult {
    pub best_move: Option<Move>,
    pub best_score: i32,
    pub reached_depth: u8,
    pub nodes: u64,
    pub elapsed: Duration,
    pub timed_out: bool,
    pub tt_stats: TTStats,
    pub principal_variation: Vec<Move>,
}

/// Search without a transposition table.
pub fn iterative_deepening_search<G: MoveGenerator, S: BoardScorer>(
    position: &Position,
    generator: &G,
    scorer: &S,
    config: &SearchConfig,
) -> SearchResult {
    run_search(position, generator, scorer, config, None)
}

/// Search sharing `tt` with earlier searches. Its statistics are reset first
/// so the result reports this search only.
pub fn iterative_deepening_search_with_tt<G: MoveGenerator, S: BoardScorer>(
    position: &Position,
    generator: &G,
    scorer: &S,
    config: &SearchConfig,
    tt: &mut TranspositionTable,
) -> SearchResult {
    tt.reset_stats();
    run_search(position, generator, scorer, config, Some(tt))
}

fn run_search<G: MoveGenerator, S: BoardScorer>(
    position: &Position,
    generator: &G,
    scorer: &S,
    config: &SearchConfig,
    tt: Option<&mut TranspositionTable>,
) -> SearchResult {
    let started = Instant::now();
    let mut search = Search {
        generator,
        scorer,
        tt,
        deadline: config.time_budget.map(|budget| started + budget),
        nodes: 0,
        aborted: false,
        key_path: config.history.clone(),
    };
    search.key_path.push(position.zobrist_key);

    let mut result = SearchResult::default();
    let mut root_moves = generator.generate_legal_moves(position);

    if root_moves.is_empty() {
        result.best_score = terminal_score(position, 0);
        result.nodes = 1;
        result.elapsed = started.elapsed();
        return result;
    }

    let root_tt_move = search.tt.as_deref().and_then(|tt| tt.peek_move(position.zobrist_key));
    order_moves(&mut root_moves, root_tt_move);

    if config.max_depth == 0 {
        result.best_move = Some(root_moves[0]);
        result.best_score = scorer.score(position);
        result.principal_variation = vec![root_moves[0]];
        result.nodes = 1;
        result.elapsed = started.elapsed();
        return result;
    }

    let mut scratch = position.clone();
    for depth in 1..=config.max_depth {
        if let Some(tt) = search.tt.as_deref_mut() {
            tt.new_generation();
        }

        let Some((best_move, best_score)) = search.root(&mut scratch, &root_moves, depth)
        else {
            result.timed_out = true;
            break;
        };

        result.best_move = Some(best_move);
        result.best_score = best_score;
        result.reached_depth = depth;
        result.principal_variation = search.principal_variation(position, best_move, depth);

        debug!(
            depth,
            score = best_score,
            nodes = search.nodes,
            elapsed_ms = started.elapsed().as_millis() as u64,
            pv = %format_moves(&result.principal_variation),
            "iteration complete"
        );

        // Previous best first in the next iteration.
        if let Some(index) = root_moves.iter().position(|&mv| mv == best_move) {
            root_moves[..=index].rotate_right(1);
        }
    }

    if result.best_move.is_none() {
        let fallback = root_moves[0];
        warn!(%fallback, "time budget expired before depth 1 completed");
        result.best_move = Some(fallback);
        result.best_score = scorer.score(position);
        result.principal_variation = vec![fallback];
    }

    result.nodes = search.nodes;
    result.elapsed = started.elapsed();
    result.tt_stats = search.tt.as_deref().map(TranspositionTable::stats).unwrap_or_default();
    result
}

struct Search<'a, G, S> {
    generator: &'a G,
    scorer: &'a S,
    tt: Option<&'a mut TranspositionTable>,
    deadline: Option<Instant>,
    nodes: u64,
    aborted: bool,
    /// Game history followed by the root and the current search path.
    key_path: Vec<u64>,
}

impl<G: MoveGenerator, S: BoardScorer> Search<'_, G, S> {
    #[inline]
    fn out_of_time(&mut self) -> bool {
        if !self.aborted && self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            self.aborted = true;
        }
        self.aborted
    }

    /// One full-window iteration. `None` when the deadline interrupted it.
    fn root(&mut self, position: &mut Position, moves: &[Move], depth: u8) -> Option<(Move, i32)> {
        let mut alpha = -INFINITY;
        let mut best: Option<(Move, i32)> = None;

        for &mv in moves.iter() {
            if self.out_of_time() {
                return None;
            }
            let Ok(undo) = make_move_in_place(position, mv) else {
                continue;
            };
            self.key_path.push(position.zobrist_key);
            let score = -self.negamax(position, depth - 1, -INFINITY, -alpha, 1);
            self.key_path.pop();
            unmake_move_in_place(position, undo);

            if self.aborted {
                return None;
            }
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((mv, score));
            }
            alpha = alpha.max(score);
        }

        if let (Some((mv, score)), Some(tt)) = (best, self.tt.as_deref_mut()) {
            tt.store(TTEntry {
                key: position.zobrist_key,
                depth,
                score: score_to_tt(score, 0),
                bound: Bound::Exact,
                best_move: Some(mv),
            });
        }
        best
    }

    fn negamax(&mut self, position: &mut Position, depth: u8, mut alpha: i32, beta: i32, ply: u32) -> i32 {
        self.nodes += 1;
        if self.out_of_time() {
            return 0;
        }

        let mut moves = self.generator.generate_legal_moves(position);
        if moves.is_empty() {
            return terminal_score(position, ply);
        }
        if is_search_draw(position, &self.key_path) {
            return 0;
        }
        if depth == 0 {
            return self.scorer.score(position);
        }

        let key = position.zobrist_key;
        let mut tt_move = None;
        if let Some(entry) = self.tt.as_deref_mut().and_then(|tt| tt.probe(key)) {
            tt_move = entry.best_move;
            if entry.depth == depth {
                let score = score_from_tt(entry.score, ply);
                match entry.bound {
                    Bound::Exact => return score,
                    Bound::Lower if score >= beta => return score,
                    Bound::Upper if score <= alpha => return score,
                    _ => {}
                }
            }
        }

        order_moves(&mut moves, tt_move);
        let original_alpha = alpha;
        let mut best_score = -INFINITY;
        let mut best_move = None;

        for mv in moves {
            let Ok(undo) = make_move_in_place(position, mv) else {
                continue;
            };
            self.key_path.push(position.zobrist_key);
            let score = -self.negamax(position, depth - 1, -beta, -alpha, ply + 1);
            self.key_path.pop();
            unmake_move_in_place(position, undo);

            if self.aborted {
                return 0;
            }
            if score > best_score {
                best_score = score;
                best_move = Some(mv);
            }
            alpha = alpha.max(score);
            if alpha >= beta {
                break;
            }
        }

        if let Some(tt) = self.tt.as_deref_mut() {
            let bound = if best_score <= original_alpha {
                Bound::Upper
            } else if best_score >= beta {
                Bound::Lower
            } else {
                Bound::Exact
            };
            tt.store(TTEntry {
                key,
                depth,
                score: score_to_tt(best_score, ply),
                bound,
                best_move,
            });
        }

        best_score
    }

    /// Best line from the root: the searched move followed by table moves,
    /// each checked against the legal move list before it is trusted.
    fn principal_variation(&self, root: &Position, first: Move, depth: u8) -> Vec<Move> {
        let mut line = vec![first];
        let Some(tt) = self.tt.as_deref() else {
            return line;
        };
        let mut position = root.clone();
        if make_move_in_place(&mut position, first).is_err() {
            return line;
        }
        let mut seen = vec![root.zobrist_key, position.zobrist_key];

        while line.len() < depth as usize {
            let Some(mv) = tt.peek_move(position.zobrist_key) else {
                break;
            };
            if !self.generator.generate_legal_moves(&position).contains(&mv) {
                break;
            }
            if make_move_in_place(&mut position, mv).is_err() || seen.contains(&position.zobrist_key) {
                break;
            }
            seen.push(position.zobrist_key);
            line.push(mv);
        }
        line
    }
}

/// Score of a node with no legal moves: mated (preferring later mates) or
/// stalemate.
#[inline]
fn terminal_score(position: &Position, ply: u32) -> i32 {
    if is_king_in_check(position, position.side_to_move) {
        -MATE_SCORE + ply as i32
    } else {
        0
    }
}

/// Fifty-move rule or a threefold repetition along history plus the search
/// path. The current position is the last entry of `key_path`.
fn is_search_draw(position: &Position, key_path: &[u64]) -> bool {
    if position.halfmove_clock >= FIFTY_MOVE_HALFMOVES {
        return true;
    }
    let Some((&current, earlier)) = key_path.split_last() else {
        return false;
    };
    // Only positions since the last capture or pawn move can repeat.
    let window = earlier.len().min(position.halfmove_clock as usize);
    let previous = earlier[earlier.len() - window..]
        .iter()
        .filter(|&&key| key == current)
        .count();
    previous + 1 >= REPETITION_DRAW_COUNT
}

fn format_moves(moves: &[Move]) -> String {
    moves.iter().map(Move::to_string).collect::<Vec<_>>().join(" ")
}

/// Plain fixed-depth minimax with the same leaf, terminal and draw rules as
/// the alpha-beta search. Exponential; meant for verifying the search on
/// small trees.
pub fn minimax_score<G: MoveGenerator, S: BoardScorer>(
    position: &Position,
    generator: &G,
    scorer: &S,
    depth: u8,
) -> i32 {
    let mut scratch = position.clone();
    let mut key_path = vec![position.zobrist_key];
    minimax_node(&mut scratch, generator, scorer, depth, 0, &mut key_path)
}

fn minimax_node<G: MoveGenerator, S: BoardScorer>(
    position: &mut Position,
    generator: &G,
    scorer: &S,
    depth: u8,
    ply: u32,
    key_path: &mut Vec<u64>,
) -> i32 {
    let moves = generator.generate_legal_moves(position);
    if moves.is_empty() {
        return terminal_score(position, ply);
    }
    if ply > 0 && is_search_draw(position, key_path) {
        return 0;
    }
    if depth == 0 {
        return scorer.score(position);
    }

    let mut best = -INFINITY;
    for mv in moves {
        let Ok(undo) = make_move_in_place(position, mv) else {
            continue;
        };
        key_path.push(position.zobrist_key);
        let score = -minimax_node(position, generator, scorer, depth - 1, ply + 1, key_path);
        key_path.pop();
        unmake_move_in_place(position, undo);
        best = best.max(score);
    }
    best
}
