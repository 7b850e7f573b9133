//! Engine abstraction shared by the game session and the self-play binary.
//!
//! Engines are explicit values owned by their caller; nothing is global. An
//! engine only ever reads the position it is given and answers with a move.

use crate::errors::{ChessError, ChessResult};
use crate::moves::move_descriptions::Move;
use crate::position::chess_types::Position;
use crate::search::iterative_deepening::SearchResult;

/// Where an engine's answer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MoveSource {
    #[default]
    Search,
    Book,
    /// Uniform pick among legal moves.
    Random,
}

#[derive(Debug, Clone, Default)]
pub struct EngineOutput {
    /// `None` only when the position has no legal move.
    pub best_move: Option<Move>,
    pub source: MoveSource,
    /// Statistics of the search that ran, if one did.
    pub search: Option<SearchResult>,
}

pub trait Engine: Send {
    fn name(&self) -> &str;

    fn new_game(&mut self) {}

    /// String-keyed configuration. Unknown names are ignored.
    fn set_option(&mut self, _name: &str, _value: &str) -> ChessResult<()> {
        Ok(())
    }

    /// Pick a move for the side to move. `history` holds the Zobrist keys of
    /// the game positions before `position`, oldest first.
    fn choose_move(&mut self, position: &Position, history: &[u64]) -> ChessResult<EngineOutput>;
}

/// Parse an on/off option value.
pub fn parse_bool_option(name: &str, value: &str) -> ChessResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ChessError::parse(format!("invalid {name} value {value:?}"))),
    }
}
