//! Self-play demo: two engines play one game and the result is printed as
//! PGN.
//!
//! Run with:
//! `cargo run --release -- --white hard --black easy --seed 7`
//! `RUST_LOG=arbiter_chess=debug cargo run -- --white random --black medium`

use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use arbiter_chess::engines::engine_iterative::IterativeEngine;
use arbiter_chess::engines::engine_random::RandomEngine;
use arbiter_chess::engines::engine_trait::Engine;
use arbiter_chess::errors::{ChessError, ChessResult};
use arbiter_chess::game::game_session::GameSession;
use arbiter_chess::position::chess_types::Color;
use arbiter_chess::search::difficulty::Difficulty;
use arbiter_chess::tables::opening_book::OpeningBook;
use arbiter_chess::utils::pgn::PgnHeaders;

#[derive(Debug, Parser)]
#[command(name = "arbiter_chess", about = "Engine self-play between difficulty levels")]
struct Args {
    /// White player: easy, medium, hard or random.
    #[arg(long, default_value = "medium")]
    white: String,

    /// Black player: easy, medium, hard or random.
    #[arg(long, default_value = "easy")]
    black: String,

    /// Seed for every random choice in the game.
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Stop after this many half-moves even if the game is not over.
    #[arg(long, default_value_t = 200)]
    max_plies: u32,

    /// Start from this position instead of the standard one.
    #[arg(long)]
    fen: Option<String>,

    /// Opening book TSV replacing the embedded one.
    #[arg(long)]
    book: Option<PathBuf>,

    /// Print the board after every move.
    #[arg(long)]
    show_board: bool,
}

fn build_player(player: &str, seed: u64, book: Option<&OpeningBook>) -> ChessResult<Box<dyn Engine>> {
    if player.eq_ignore_ascii_case("random") {
        return Ok(Box::new(RandomEngine::new(seed)));
    }
    let difficulty: Difficulty = player.parse()?;
    let engine = IterativeEngine::new(difficulty, seed);
    Ok(match book {
        Some(book) => Box::new(engine.with_opening_book(book.clone())),
        None => Box::new(engine),
    })
}

fn main() -> Result<(), ChessError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let book = args.book.as_ref().map(OpeningBook::from_tsv_path).transpose()?;
    let mut white = build_player(&args.white, args.seed, book.as_ref())?;
    let mut black = build_player(&args.black, args.seed.wrapping_add(1), book.as_ref())?;

    let mut session = match &args.fen {
        Some(fen) => GameSession::from_fen(fen)?,
        None => GameSession::new(),
    };
    white.new_game();
    black.new_game();

    info!(white = %args.white, black = %args.black, seed = args.seed, "starting self-play");
    let started = Instant::now();

    while !session.is_over() && (session.history().len() as u32) < args.max_plies {
        let engine = match session.side_to_move() {
            Color::White => white.as_mut(),
            Color::Black => black.as_mut(),
        };
        let record = session.play_engine_move(engine)?;
        if args.show_board {
            println!("{}. {} {}\n{}", record.ply, record.color, record.san, session.position());
        }
    }

    let report = session.game_status();
    info!(
        status = %report.status,
        plies = session.history().len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "self-play finished"
    );

    let mut headers = PgnHeaders::new();
    headers.insert("Event".to_owned(), "Arbiter self-play".to_owned());
    headers.insert("White".to_owned(), args.white.clone());
    headers.insert("Black".to_owned(), args.black.clone());
    println!("{}", session.to_pgn(&headers)?);
    Ok(())
}
