//! Game state machine: the canonical position, its history and status.
//!
//! A session is the only owner that mutates its position, and only through
//! `apply_move` after the request has been matched against the legal move
//! set. Rejected requests leave the session untouched.

use chrono::Utc;
use tracing::{debug, info};

use crate::engines::engine_trait::Engine;
use crate::errors::{ChessError, ChessResult, IllegalMoveReason};
use crate::game::game_status::{evaluate_status, GameStatus, StatusReport};
use crate::game::move_record::MoveRecord;
use crate::move_generation::legal_move_apply::apply_move;
use crate::move_generation::legal_move_generator::{
    find_legal_move, generate_legal_moves, legal_moves_from_square,
};
use crate::moves::move_descriptions::Move;
use crate::position::chess_types::*;
use crate::position::position::RepetitionKey;
use crate::utils::algebraic::square_to_algebraic;
use crate::utils::long_algebraic::parse_long_algebraic;
use crate::utils::pgn::{default_headers, write_pgn, PgnHeaders};
use crate::utils::san::{move_to_san, san_to_move};

#[derive(Debug, Clone)]
pub struct GameSession {
    initial: Position,
    position: Position,
    history: Vec<MoveRecord>,
    /// One key per position reached, the initial one included.
    repetition_keys: Vec<RepetitionKey>,
    /// Zobrist keys parallel to `repetition_keys`, handed to engines.
    zobrist_keys: Vec<u64>,
    status: StatusReport,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession {
    /// New game from the standard initial arrangement.
    pub fn new() -> Self {
        Self::from_position(Position::new_game())
    }

    /// New game from a custom position. The status is computed immediately,
    /// so the session may start already finished.
    pub fn from_fen(fen: &str) -> ChessResult<Self> {
        Ok(Self::from_position(Position::from_fen(fen)?))
    }

    pub fn from_position(position: Position) -> Self {
        let status = evaluate_status(&position, 1);
        Self {
            initial: position.clone(),
            repetition_keys: vec![position.repetition_key()],
            zobrist_keys: vec![position.zobrist_key],
            position,
            history: Vec::new(),
            status,
        }
    }

    /// Back to the standard initial arrangement.
    pub fn reset(&mut self) {
        *self = Self::new();
        debug!("game reset");
    }

    #[inline]
    pub fn position(&self) -> &Position {
        &self.position
    }

    #[inline]
    pub fn initial_position(&self) -> &Position {
        &self.initial
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.position.side_to_move
    }

    #[inline]
    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    #[inline]
    pub fn game_status(&self) -> StatusReport {
        self.status
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        self.status.status.is_terminal()
    }

    pub fn fen(&self) -> String {
        self.position.to_fen()
    }

    /// How often the current position has occurred, this time included.
    pub fn repetition_count(&self) -> usize {
        let current = self.position.repetition_key();
        self.repetition_keys.iter().filter(|&&key| key == current).count()
    }

    /// Legal moves of the piece on `square`; empty for an empty square, an
    /// enemy piece or a finished game.
    pub fn legal_moves(&self, square: Square) -> Vec<Move> {
        if self.is_over() {
            return Vec::new();
        }
        legal_moves_from_square(&self.position, square)
    }

    pub fn all_legal_moves(&self) -> Vec<Move> {
        if self.is_over() {
            return Vec::new();
        }
        generate_legal_moves(&self.position)
    }

    /// Apply a move given by squares and an optional promotion choice.
    pub fn apply_move(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    ) -> ChessResult<MoveRecord> {
        if self.is_over() {
            let request = format!("{}{}", square_to_algebraic(from), square_to_algebraic(to));
            return Err(ChessError::illegal(request, IllegalMoveReason::GameOver));
        }
        let mv = find_legal_move(&self.position, from, to, promotion)?;
        self.commit(mv)
    }

    /// Apply a move written in long algebraic (`e2e4`, `e7e8q`) or SAN
    /// (`e4`, `Nf3`, `O-O`).
    pub fn apply_notation(&mut self, text: &str) -> ChessResult<MoveRecord> {
        if let Ok((from, to, promotion)) = parse_long_algebraic(text) {
            return self.apply_move(from, to, promotion);
        }
        if self.is_over() {
            return Err(ChessError::illegal(text, IllegalMoveReason::GameOver));
        }
        let mv = san_to_move(text, &self.position)?;
        self.commit(mv)
    }

    /// Ask `engine` for a move on the current position and apply it like a
    /// human move.
    pub fn play_engine_move(&mut self, engine: &mut dyn Engine) -> ChessResult<MoveRecord> {
        if self.is_over() {
            return Err(ChessError::NoLegalMove(format!(
                "game is over ({})",
                self.status.status
            )));
        }
        let snapshot = self.position.clone();
        let before = &self.zobrist_keys[..self.zobrist_keys.len() - 1];
        let output = engine.choose_move(&snapshot, before)?;
        let mv = output.best_move.ok_or_else(|| {
            ChessError::NoLegalMove(format!("{} returned no move", engine.name()))
        })?;
        self.apply_move(mv.from, mv.to, mv.promotion)
    }

    /// PGN of the game so far. Missing roster tags get defaults; the `Date`
    /// tag is today's UTC date and `Result` follows the current status.
    pub fn to_pgn(&self, headers: &PgnHeaders) -> ChessResult<String> {
        let mut headers = headers.clone();
        let result = self.status.status.result_token(self.position.side_to_move);
        for (key, value) in default_headers(result) {
            headers.entry(key).or_insert(value);
        }
        if headers.get("Date").map_or(true, |date| date.starts_with('?')) {
            headers.insert("Date".to_owned(), Utc::now().format("%Y.%m.%d").to_string());
        }
        headers.insert("Result".to_owned(), result.to_owned());

        let moves: Vec<Move> = self.history.iter().map(|record| record.mv).collect();
        write_pgn(&self.initial, &moves, &headers)
    }

    fn commit(&mut self, mv: Move) -> ChessResult<MoveRecord> {
        let san = move_to_san(&self.position, mv)?;
        let next = apply_move(&self.position, mv)?;
        let color = self.position.side_to_move;

        self.repetition_keys.push(next.repetition_key());
        self.zobrist_keys.push(next.zobrist_key);
        self.position = next;
        let status = evaluate_status(&self.position, self.repetition_count());
        self.status = status;

        let record = MoveRecord::new(
            self.history.len() as u32 + 1,
            color,
            mv,
            san,
            self.position.to_fen(),
            status.in_check,
            status.status == GameStatus::Checkmate,
        );
        debug!(ply = record.ply, san = %record.san, fen = %record.fen_after, "move applied");
        if status.status.is_terminal() {
            info!(status = %status.status, plies = record.ply, "game over");
        }

        self.history.push(record.clone());
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use rand::prelude::IndexedRandom;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::engines::engine_random::RandomEngine;
    use crate::moves::move_descriptions::{
        FLAG_CAPTURE, FLAG_CASTLING, FLAG_CHECK, FLAG_CHECKMATE, FLAG_DOUBLE_PAWN_PUSH,
        FLAG_EN_PASSANT, FLAG_PROMOTION,
    };
    use crate::utils::pgn::read_pgn;

    fn play(session: &mut GameSession, moves: &[&str]) {
        for text in moves {
            session.apply_notation(text).expect("move should be legal");
        }
    }

    #[test]
    fn fools_mate_ends_the_game() {
        let mut session = GameSession::new();
        play(&mut session, &["f2f3", "e7e5", "g2g4", "d8h4"]);

        let report = session.game_status();
        assert_eq!(report.status, GameStatus::Checkmate);
        assert!(report.in_check);
        assert!((0..64).all(|sq| session.legal_moves(sq).is_empty()));

        let last = session.history().last().expect("four records");
        assert_eq!(last.san, "Qh4#");
        assert_eq!(last.flags & FLAG_CHECKMATE, FLAG_CHECKMATE);
        assert_eq!(last.flags & FLAG_CHECK, FLAG_CHECK);

        let err = session.apply_notation("a2a3").expect_err("game is over");
        assert!(matches!(
            err,
            ChessError::IllegalMove {
                reason: IllegalMoveReason::GameOver,
                ..
            }
        ));
        let mut engine = RandomEngine::new(1);
        assert!(matches!(
            session.play_engine_move(&mut engine),
            Err(ChessError::NoLegalMove(_))
        ));
    }

    #[test]
    fn stalemating_move_draws() {
        let mut session = GameSession::from_fen("7k/8/4Q1K1/8/8/8/8/8 w - - 0 1").expect("FEN");
        session.apply_notation("Qf7").expect("legal");
        let report = session.game_status();
        assert_eq!(report.status, GameStatus::Stalemate);
        assert!(!report.in_check);
        assert!(session.all_legal_moves().is_empty());
    }

    #[test]
    fn knight_shuffle_draws_by_repetition() {
        let mut session = GameSession::new();
        let shuffle = ["g1f3", "g8f6", "f3g1", "f6g8"];
        play(&mut session, &shuffle);
        assert_eq!(session.repetition_count(), 2);
        assert_eq!(session.game_status().status, GameStatus::Ongoing);

        play(&mut session, &shuffle);
        assert_eq!(session.repetition_count(), 3);
        assert_eq!(session.game_status().status, GameStatus::DrawRepetition);
    }

    #[test]
    fn hundredth_quiet_half_move_draws() {
        let mut session =
            GameSession::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 99 80").expect("FEN");
        session.apply_notation("a1a2").expect("legal");
        assert_eq!(session.position().halfmove_clock, 100);
        assert_eq!(session.game_status().status, GameStatus::DrawFiftyMove);
    }

    #[test]
    fn mate_on_the_hundredth_half_move_is_checkmate() {
        let mut session =
            GameSession::from_fen("7k/R7/6K1/8/8/8/8/8 w - - 99 80").expect("FEN");
        session.apply_notation("Ra8").expect("legal");
        assert_eq!(session.game_status().status, GameStatus::Checkmate);
    }

    #[test]
    fn capturing_the_last_heavy_piece_draws_on_material() {
        let mut session = GameSession::from_fen("4k3/8/8/8/8/8/3q4/4K3 w - - 0 1").expect("FEN");
        assert_eq!(session.game_status().status, GameStatus::Check);
        let record = session.apply_notation("Kxd2").expect("legal");
        assert_eq!(record.flags & FLAG_CAPTURE, FLAG_CAPTURE);
        assert_eq!(record.captured(), Some(PieceKind::Queen));
        assert_eq!(session.game_status().status, GameStatus::DrawInsufficientMaterial);
    }

    #[test]
    fn session_can_start_finished() {
        let session = GameSession::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1").expect("FEN");
        assert!(session.is_over());
        assert!(session.legal_moves(4).is_empty());
    }

    #[test]
    fn illegal_requests_leave_state_unchanged() {
        let mut session = GameSession::new();
        let fen_before = session.fen();

        let cases = [
            ((12, 36, None), IllegalMoveReason::NotInLegalSet),
            ((28, 36, None), IllegalMoveReason::NoPieceOnSquare),
            ((52, 44, None), IllegalMoveReason::WrongSideToMove),
        ];
        for ((from, to, promotion), expected) in cases {
            match session.apply_move(from, to, promotion) {
                Err(ChessError::IllegalMove { reason, .. }) => assert_eq!(reason, expected),
                other => panic!("expected illegal move, got {other:?}"),
            }
        }
        assert_eq!(session.fen(), fen_before);
        assert!(session.history().is_empty());
        assert_eq!(session.game_status().status, GameStatus::Ongoing);
    }

    #[test]
    fn promotion_requires_a_choice() {
        let mut session = GameSession::from_fen("k7/4P3/8/8/8/8/8/4K3 w - - 0 1").expect("FEN");
        let err = session.apply_move(52, 60, None).expect_err("promotion missing");
        assert!(matches!(
            err,
            ChessError::IllegalMove {
                reason: IllegalMoveReason::MissingPromotion,
                ..
            }
        ));
        let record = session
            .apply_move(52, 60, Some(PieceKind::Knight))
            .expect("underpromotion is legal");
        assert_eq!(record.san, "e8=N");
        assert_eq!(record.flags & FLAG_PROMOTION, FLAG_PROMOTION);
    }

    #[test]
    fn records_carry_flags_and_resulting_fen() {
        let mut session = GameSession::new();
        let record = session.apply_notation("e2e4").expect("legal");
        assert_eq!(record.ply, 1);
        assert_eq!(record.color, Color::White);
        assert_eq!(record.san, "e4");
        assert_eq!(record.flags, FLAG_DOUBLE_PAWN_PUSH);
        assert_eq!(
            record.fen_after,
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
        );
        assert_eq!(record.fen_after, session.fen());
        assert_eq!(session.side_to_move(), Color::Black);

        play(&mut session, &["a7a6", "e4e5", "d7d5"]);
        let ep = session.apply_notation("exd6").expect("en passant is legal");
        assert_eq!(ep.flags, FLAG_CAPTURE | FLAG_EN_PASSANT);

        let mut castle = GameSession::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").expect("FEN");
        let record = castle.apply_notation("O-O").expect("castling is legal");
        assert_eq!(record.flags, FLAG_CASTLING);
        assert_eq!(record.to_square(), 6);
    }

    #[test]
    fn en_passant_window_lasts_one_ply() {
        let mut session = GameSession::new();
        play(&mut session, &["e2e4", "a7a6", "e4e5", "d7d5", "h2h3", "a6a5"]);
        assert!(session.apply_notation("e5d6").is_err());
    }

    #[test]
    fn reset_returns_to_the_start() {
        let mut session = GameSession::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1").expect("FEN");
        session.apply_notation("Ra7").expect("legal");
        session.reset();
        assert_eq!(session.fen(), Position::new_game().to_fen());
        assert!(session.history().is_empty());
        assert_eq!(session.repetition_count(), 1);
    }

    #[test]
    fn engine_moves_go_through_the_same_path() {
        let mut session = GameSession::new();
        let mut engine = RandomEngine::new(11);
        for _ in 0..6 {
            session.play_engine_move(&mut engine).expect("engine should move");
        }
        assert_eq!(session.history().len(), 6);
        assert_eq!(session.side_to_move(), Color::White);
    }

    #[test]
    fn random_playouts_keep_one_king_per_side() {
        for seed in 0..8u64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut session = GameSession::new();
            while !session.is_over() && session.history().len() < 300 {
                let moves = session.all_legal_moves();
                let mv = *moves.choose(&mut rng).expect("ongoing game has a move");
                session
                    .apply_move(mv.from, mv.to, mv.promotion)
                    .expect("generated move should apply");
                for color in [Color::White, Color::Black] {
                    assert_eq!(
                        session.position().count(color, PieceKind::King),
                        1,
                        "seed {seed} after {mv}"
                    );
                }
            }
        }
    }

    #[test]
    fn pgn_export_reads_back() {
        let mut session = GameSession::new();
        play(&mut session, &["f2f3", "e7e5", "g2g4", "d8h4"]);
        let pgn = session.to_pgn(&PgnHeaders::new()).expect("PGN should render");
        assert!(pgn.contains("1. f3 e5 2. g4 Qh4# 0-1"));
        assert!(pgn.contains("[Result \"0-1\"]"));
        assert!(!pgn.contains("????"));

        let game = read_pgn(&pgn).expect("PGN should parse");
        assert_eq!(game.moves.len(), 4);
        assert_eq!(game.final_position, *session.position());
    }
}
