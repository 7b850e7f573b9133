//! Random-move engine.
//!
//! Selects uniformly from legal moves. Used as a baseline opponent in
//! self-play and in tests.

use rand::prelude::IndexedRandom;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::engines::engine_trait::{Engine, EngineOutput, MoveSource};
use crate::errors::{ChessError, ChessResult};
use crate::move_generation::legal_move_generator::LegalMoveGenerator;
use crate::move_generation::move_generator::MoveGenerator;
use crate::position::chess_types::Position;

pub struct RandomEngine {
    move_generator: LegalMoveGenerator,
    rng: StdRng,
}

impl RandomEngine {
    pub fn new(seed: u64) -> Self {
        Self {
            move_generator: LegalMoveGenerator,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Engine for RandomEngine {
    fn name(&self) -> &str {
        "Arbiter Random"
    }

    fn set_option(&mut self, name: &str, value: &str) -> ChessResult<()> {
        if name.eq_ignore_ascii_case("Seed") {
            let seed = value
                .trim()
                .parse::<u64>()
                .map_err(|_| ChessError::parse(format!("invalid Seed value {value:?}")))?;
            self.rng = StdRng::seed_from_u64(seed);
        }
        Ok(())
    }

    fn choose_move(&mut self, position: &Position, _history: &[u64]) -> ChessResult<EngineOutput> {
        let legal_moves = self.move_generator.generate_legal_moves(position);
        Ok(EngineOutput {
            best_move: legal_moves.choose(&mut self.rng).copied(),
            source: MoveSource::Random,
            search: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::RandomEngine;
    use crate::engines::engine_trait::Engine;
    use crate::move_generation::legal_move_generator::generate_legal_moves;
    use crate::position::chess_types::Position;

    #[test]
    fn random_engine_returns_legal_move() {
        let game = Position::new_game();
        let mut engine = RandomEngine::new(3);
        let out = engine.choose_move(&game, &[]).expect("engine should answer");
        let mv = out.best_move.expect("start position has moves");
        assert!(generate_legal_moves(&game).contains(&mv));
    }

    #[test]
    fn same_seed_replays_the_same_choices() {
        let game = Position::new_game();
        let picks = |seed| {
            let mut engine = RandomEngine::new(seed);
            (0..10)
                .map(|_| engine.choose_move(&game, &[]).map(|out| out.best_move))
                .collect::<Vec<_>>()
        };
        assert_eq!(picks(42), picks(42));
    }

    #[test]
    fn random_engine_has_nothing_to_say_when_mated() {
        let mated = Position::from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3")
            .expect("FEN should parse");
        let mut engine = RandomEngine::new(0);
        let out = engine.choose_move(&mated, &[]).expect("engine should answer");
        assert_eq!(out.best_move, None);
    }
}
