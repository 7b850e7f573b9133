//! Difficulty-driven iterative-deepening engine.
//!
//! Consults the opening book until its first miss, then runs the alpha-beta
//! search with the difficulty's depth and time budget. On `Easy` the searched
//! move is replaced by a random legal move with a fixed probability.

use rand::prelude::IndexedRandom;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};

use crate::engines::engine_trait::{parse_bool_option, Engine, EngineOutput, MoveSource};
use crate::errors::{ChessError, ChessResult, IllegalMoveReason};
use crate::move_generation::legal_move_generator::LegalMoveGenerator;
use crate::move_generation::move_generator::MoveGenerator;
use crate::moves::move_descriptions::Move;
use crate::position::chess_types::{Color, Position};
use crate::search::board_scoring::StandardScorer;
use crate::search::difficulty::Difficulty;
use crate::search::iterative_deepening::{
    iterative_deepening_search, iterative_deepening_search_with_tt, SearchConfig,
};
use crate::search::transposition_table::TranspositionTable;
use crate::tables::opening_book::OpeningBook;

const DEFAULT_HASH_MB: usize = 16;

pub struct IterativeEngine {
    difficulty: Difficulty,
    move_generator: LegalMoveGenerator,
    scorer: StandardScorer,
    rng: StdRng,
    opening_book: OpeningBook,
    use_own_book: bool,
    /// Set after the first book miss, cleared by `new_game`.
    out_of_book: bool,
    /// `None` when `Hash` is 0.
    tt: Option<TranspositionTable>,
}

impl IterativeEngine {
    pub fn new(difficulty: Difficulty, seed: u64) -> Self {
        let opening_book = OpeningBook::embedded().unwrap_or_else(|e| {
            warn!(error = %e, "embedded opening book failed to load");
            OpeningBook::default()
        });
        Self {
            difficulty,
            move_generator: LegalMoveGenerator,
            scorer: StandardScorer,
            rng: StdRng::seed_from_u64(seed),
            opening_book,
            use_own_book: true,
            out_of_book: false,
            tt: Some(TranspositionTable::new_with_mb(DEFAULT_HASH_MB)),
        }
    }

    pub fn with_opening_book(mut self, opening_book: OpeningBook) -> Self {
        self.opening_book = opening_book;
        self
    }

    #[inline]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
    }

    fn book_move(&mut self, position: &Position) -> Option<Move> {
        if !self.use_own_book || self.out_of_book {
            return None;
        }
        let choice = self.opening_book.choose_weighted_move(position, &mut self.rng);
        match choice {
            Some(mv) => info!(%mv, "opening book move"),
            None => self.out_of_book = true,
        }
        choice
    }
}

impl Engine for IterativeEngine {
    fn name(&self) -> &str {
        "Arbiter Iterative"
    }

    fn new_game(&mut self) {
        self.out_of_book = false;
        if let Some(tt) = self.tt.as_mut() {
            tt.clear();
        }
    }

    fn set_option(&mut self, name: &str, value: &str) -> ChessResult<()> {
        if name.eq_ignore_ascii_case("Difficulty") {
            self.set_difficulty(value.parse()?);
        } else if name.eq_ignore_ascii_case("OwnBook") {
            self.use_own_book = parse_bool_option(name, value)?;
        } else if name.eq_ignore_ascii_case("Hash") {
            let mb = value
                .trim()
                .parse::<usize>()
                .map_err(|_| ChessError::parse(format!("invalid Hash value {value:?}")))?;
            self.tt = (mb > 0).then(|| TranspositionTable::new_with_mb(mb));
        } else if name.eq_ignore_ascii_case("Seed") {
            let seed = value
                .trim()
                .parse::<u64>()
                .map_err(|_| ChessError::parse(format!("invalid Seed value {value:?}")))?;
            self.rng = StdRng::seed_from_u64(seed);
        }
        Ok(())
    }

    fn choose_move(&mut self, position: &Position, history: &[u64]) -> ChessResult<EngineOutput> {
        let legal_moves = self.move_generator.generate_legal_moves(position);
        if legal_moves.is_empty() {
            return Ok(EngineOutput::default());
        }

        if let Some(mv) = self.book_move(position) {
            return Ok(EngineOutput {
                best_move: Some(mv),
                source: MoveSource::Book,
                search: None,
            });
        }

        let profile = self.difficulty.profile();
        let config = SearchConfig {
            history: history.to_vec(),
            ..profile.search_config()
        };
        let result = match self.tt.as_mut() {
            Some(tt) => iterative_deepening_search_with_tt(
                position,
                &self.move_generator,
                &self.scorer,
                &config,
                tt,
            ),
            None => iterative_deepening_search(position, &self.move_generator, &self.scorer, &config),
        };

        let (best_move, source) =
            apply_imperfection(result.best_move, &legal_moves, profile.imperfection, &mut self.rng);
        Ok(EngineOutput {
            best_move,
            source,
            search: Some(result),
        })
    }
}

/// With probability `imperfection`, swap `best` for a uniformly random legal
/// move. The RNG is not touched when `imperfection` is zero.
fn apply_imperfection<R: Rng + ?Sized>(
    best: Option<Move>,
    legal_moves: &[Move],
    imperfection: f64,
    rng: &mut R,
) -> (Option<Move>, MoveSource) {
    if imperfection > 0.0 && rng.random_bool(imperfection.min(1.0)) {
        if let Some(&mv) = legal_moves.choose(rng) {
            return (Some(mv), MoveSource::Random);
        }
    }
    (best, MoveSource::Search)
}

/// Stateless one-shot move choice: no opening book, no transposition table.
///
/// Returns `Ok(None)` when `color` has no legal move.
pub fn choose_move<R: Rng + ?Sized>(
    position: &Position,
    color: Color,
    difficulty: Difficulty,
    rng: &mut R,
) -> ChessResult<Option<Move>> {
    if position.side_to_move != color {
        return Err(ChessError::illegal(
            format!("move for {color}"),
            IllegalMoveReason::WrongSideToMove,
        ));
    }

    let legal_moves = LegalMoveGenerator.generate_legal_moves(position);
    if legal_moves.is_empty() {
        return Ok(None);
    }

    let profile = difficulty.profile();
    let result = iterative_deepening_search(
        position,
        &LegalMoveGenerator,
        &StandardScorer,
        &profile.search_config(),
    );
    let (best_move, _) = apply_imperfection(result.best_move, &legal_moves, profile.imperfection, rng);
    Ok(best_move)
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::move_generation::legal_move_generator::generate_legal_moves;

    fn position(fen: &str) -> Position {
        Position::from_fen(fen).expect("FEN should parse")
    }

    #[test]
    fn engine_plays_book_move_from_start() {
        let mut engine = IterativeEngine::new(Difficulty::Hard, 5);
        let start = Position::new_game();
        let out = engine.choose_move(&start, &[]).expect("engine should answer");
        assert_eq!(out.source, MoveSource::Book);
        assert!(generate_legal_moves(&start).contains(&out.best_move.expect("book move")));
    }

    #[test]
    fn book_stays_off_after_a_miss_until_new_game() {
        let mut engine = IterativeEngine::new(Difficulty::Easy, 5);
        engine.set_option("Difficulty", "medium").expect("valid option");
        let odd = position("4k3/8/8/8/8/8/8/R3K3 w Q - 0 1");
        let out = engine.choose_move(&odd, &[]).expect("engine should answer");
        assert_eq!(out.source, MoveSource::Search);

        let start = Position::new_game();
        let out = engine.choose_move(&start, &[]).expect("engine should answer");
        assert_eq!(out.source, MoveSource::Search);

        engine.new_game();
        let out = engine.choose_move(&start, &[]).expect("engine should answer");
        assert_eq!(out.source, MoveSource::Book);
    }

    #[test]
    fn engine_finds_mate_in_one_without_book_or_table() {
        let mut engine = IterativeEngine::new(Difficulty::Medium, 1);
        engine.set_option("OwnBook", "false").expect("valid option");
        engine.set_option("Hash", "0").expect("valid option");
        let game = position("6k1/5Q2/6K1/8/8/8/8/8 w - - 0 1");
        let out = engine.choose_move(&game, &[]).expect("engine should answer");
        let result = out.search.expect("search ran");
        assert_eq!(result.best_score, crate::search::board_scoring::MATE_SCORE - 1);
        assert_eq!(result.tt_stats.probes, 0);
    }

    #[test]
    fn invalid_options_are_rejected() {
        let mut engine = IterativeEngine::new(Difficulty::Medium, 1);
        assert!(engine.set_option("Difficulty", "impossible").is_err());
        assert!(engine.set_option("OwnBook", "maybe").is_err());
        assert!(engine.set_option("Hash", "-1").is_err());
        assert!(engine.set_option("UnknownOption", "x").is_ok());
        assert_eq!(engine.difficulty(), Difficulty::Medium);

        engine.set_option("difficulty", " HARD ").expect("valid option");
        assert_eq!(engine.difficulty(), Difficulty::Hard);
    }

    #[test]
    fn choose_move_rejects_wrong_color() {
        let start = Position::new_game();
        let mut rng = StdRng::seed_from_u64(0);
        let err = choose_move(&start, Color::Black, Difficulty::Easy, &mut rng)
            .expect_err("black is not to move");
        assert!(matches!(
            err,
            ChessError::IllegalMove {
                reason: IllegalMoveReason::WrongSideToMove,
                ..
            }
        ));
    }

    #[test]
    fn choose_move_returns_none_without_legal_moves() {
        let stalemate = position("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
        let mut rng = StdRng::seed_from_u64(0);
        let mv = choose_move(&stalemate, Color::Black, Difficulty::Hard, &mut rng)
            .expect("no error for a terminal position");
        assert_eq!(mv, None);
    }

    #[test]
    fn choose_move_takes_a_hanging_queen() {
        let game = position("4k3/8/8/8/8/8/4q3/K4Q2 w - - 0 1");
        let mut rng = StdRng::seed_from_u64(0);
        let mv = choose_move(&game, Color::White, Difficulty::Medium, &mut rng)
            .expect("search should run")
            .expect("a move exists");
        assert_eq!(mv.to_string(), "f1e2");
    }

    #[test]
    fn easy_choices_are_reproducible_for_a_seed() {
        let game = position("r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3");
        let run = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..3)
                .map(|_| choose_move(&game, Color::White, Difficulty::Easy, &mut rng))
                .collect::<Vec<_>>()
        };
        assert_eq!(run(9), run(9));
    }

    #[test]
    fn imperfection_sometimes_replaces_the_best_move() {
        let legal = generate_legal_moves(&Position::new_game());
        let best = legal[0];
        let mut rng = StdRng::seed_from_u64(17);
        let sources: Vec<MoveSource> = (0..200)
            .map(|_| apply_imperfection(Some(best), &legal, 0.3, &mut rng).1)
            .collect();
        let random = sources.iter().filter(|&&s| s == MoveSource::Random).count();
        assert!(random > 20 && random < 120, "random picks: {random}");

        let mut rng = StdRng::seed_from_u64(17);
        assert_eq!(
            apply_imperfection(Some(best), &legal, 0.0, &mut rng),
            (Some(best), MoveSource::Search)
        );
    }
}
