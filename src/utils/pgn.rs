//! PGN export and import.
//!
//! Movetext is written in SAN. Reading accepts SAN or long algebraic tokens
//! and skips comments, variations, move numbers and NAGs.

use std::collections::BTreeMap;

use crate::errors::{ChessError, ChessResult};
use crate::move_generation::legal_move_apply::apply_move;
use crate::moves::move_descriptions::Move;
use crate::position::chess_rules::STARTING_POSITION_FEN;
use crate::position::chess_types::*;
use crate::utils::long_algebraic::long_algebraic_to_move;
use crate::utils::san::{move_to_san, san_to_move};

pub type PgnHeaders = BTreeMap<String, String>;

/// Seven-tag roster, written first and in this order.
const ROSTER: [&str; 7] = ["Event", "Site", "Date", "Round", "White", "Black", "Result"];

#[derive(Debug, Clone)]
pub struct PgnGame {
    pub headers: PgnHeaders,
    pub initial_position: Position,
    pub moves: Vec<Move>,
    pub final_position: Position,
    pub result: String,
}

/// Roster defaults; `Date` stays unknown until the caller fills it in.
pub fn default_headers(result: &str) -> PgnHeaders {
    let mut headers = PgnHeaders::new();
    for (key, value) in [
        ("Event", "Casual Game"),
        ("Site", "Local"),
        ("Date", "????.??.??"),
        ("Round", "-"),
        ("White", "White"),
        ("Black", "Black"),
    ] {
        headers.insert(key.to_owned(), value.to_owned());
    }
    headers.insert("Result".to_owned(), normalize_result(result).to_owned());
    headers
}

pub fn write_pgn(initial: &Position, moves: &[Move], headers: &PgnHeaders) -> ChessResult<String> {
    let mut headers = headers.clone();
    let initial_fen = initial.to_fen();
    if initial_fen != STARTING_POSITION_FEN {
        headers.insert("SetUp".to_owned(), "1".to_owned());
        headers.insert("FEN".to_owned(), initial_fen);
    }

    let mut out = String::new();
    for key in ROSTER {
        if let Some(value) = headers.get(key) {
            out.push_str(&format!("[{key} \"{}\"]\n", escape_pgn_value(value)));
        }
    }
    for (key, value) in headers.iter().filter(|(key, _)| !ROSTER.contains(&key.as_str())) {
        out.push_str(&format!("[{key} \"{}\"]\n", escape_pgn_value(value)));
    }
    out.push('\n');

    let mut position = initial.clone();
    let mut tokens = Vec::with_capacity(moves.len() + moves.len() / 2 + 2);
    for (index, mv) in moves.iter().enumerate() {
        let san = move_to_san(&position, *mv)?;
        if position.side_to_move == Color::White {
            tokens.push(format!("{}.", position.fullmove_number));
        } else if index == 0 {
            tokens.push(format!("{}...", position.fullmove_number));
        }
        tokens.push(san);
        position = apply_move(&position, *mv)?;
    }
    let result = headers.get("Result").map_or("*", |value| normalize_result(value));
    tokens.push(result.to_owned());

    out.push_str(&wrap_movetext(&tokens));
    out.push('\n');
    Ok(out)
}

pub fn read_pgn(pgn: &str) -> ChessResult<PgnGame> {
    let mut headers = PgnHeaders::new();
    let mut movetext = String::new();

    for line in pgn.lines().map(str::trim).filter(|line| !line.is_empty()) {
        if line.starts_with('[') {
            let (key, value) = parse_header_line(line)?;
            headers.insert(key, value);
        } else {
            movetext.push_str(line);
            movetext.push(' ');
        }
    }

    let initial_position = match headers.get("FEN") {
        Some(fen) => Position::from_fen(fen)?,
        None => Position::new_game(),
    };

    let mut position = initial_position.clone();
    let mut moves = Vec::new();
    let mut result = "*".to_owned();

    for token in strip_comments_and_variations(&movetext).split_whitespace() {
        if is_move_number_token(token) || token.starts_with('$') {
            continue;
        }
        if is_result_token(token) {
            result = token.to_owned();
            break;
        }

        let mv = san_to_move(token, &position).or_else(|_| long_algebraic_to_move(token, &position))?;
        position = apply_move(&position, mv)?;
        moves.push(mv);
    }

    if let Some(header_result) = headers.get("Result") {
        result = normalize_result(header_result).to_owned();
    }

    Ok(PgnGame {
        headers,
        initial_position,
        moves,
        final_position: position,
        result,
    })
}

fn wrap_movetext(tokens: &[String]) -> String {
    const LINE_WIDTH: usize = 80;
    let mut out = String::new();
    let mut line_len = 0;
    for token in tokens {
        if line_len > 0 && line_len + 1 + token.len() > LINE_WIDTH {
            out.push('\n');
            line_len = 0;
        } else if line_len > 0 {
            out.push(' ');
            line_len += 1;
        }
        out.push_str(token);
        line_len += token.len();
    }
    out
}

fn parse_header_line(line: &str) -> ChessResult<(String, String)> {
    let inner = line
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or_else(|| ChessError::parse(format!("invalid PGN header line: {line}")))?;
    let (key, raw_value) = inner
        .split_once(' ')
        .ok_or_else(|| ChessError::parse(format!("PGN header without value: {line}")))?;
    let value = raw_value
        .trim()
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .ok_or_else(|| ChessError::parse(format!("unquoted PGN header value: {line}")))?;
    Ok((key.trim().to_owned(), value.replace("\\\"", "\"")))
}

fn strip_comments_and_variations(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut brace_depth = 0usize;
    let mut paren_depth = 0usize;

    for ch in text.chars() {
        match ch {
            '{' => brace_depth += 1,
            '}' => brace_depth = brace_depth.saturating_sub(1),
            '(' => paren_depth += 1,
            ')' => paren_depth = paren_depth.saturating_sub(1),
            _ if brace_depth == 0 && paren_depth == 0 => out.push(ch),
            _ => out.push(' '),
        }
    }

    out
}

fn is_move_number_token(token: &str) -> bool {
    let digits = token.trim_end_matches('.');
    digits.len() < token.len() && !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

fn is_result_token(token: &str) -> bool {
    matches!(token, "1-0" | "0-1" | "1/2-1/2" | "*")
}

fn normalize_result(result: &str) -> &str {
    if is_result_token(result) {
        result
    } else {
        "*"
    }
}

fn escape_pgn_value(value: &str) -> String {
    value.replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(position: &Position, lans: &[&str]) -> (Vec<Move>, Position) {
        let mut current = position.clone();
        let mut moves = Vec::new();
        for lan in lans {
            let mv = long_algebraic_to_move(lan, &current).expect("LAN should resolve");
            current = apply_move(&current, mv).expect("move should apply");
            moves.push(mv);
        }
        (moves, current)
    }

    #[test]
    fn writes_san_movetext_with_roster_first() {
        let start = Position::new_game();
        let (moves, _) = play(&start, &["f2f3", "e7e5", "g2g4", "d8h4"]);
        let pgn = write_pgn(&start, &moves, &default_headers("0-1")).expect("PGN should write");

        assert!(pgn.starts_with("[Event \"Casual Game\"]\n[Site \"Local\"]"));
        assert!(pgn.contains("1. f3 e5 2. g4 Qh4# 0-1"));
        assert!(!pgn.contains("SetUp"));
    }

    #[test]
    fn round_trip_from_custom_position() {
        let initial = Position::from_fen("4k3/8/8/8/8/8/4P3/4K3 b - - 0 7").expect("FEN should parse");
        let (moves, last) = play(&initial, &["e8d7", "e2e4", "d7e6"]);
        let pgn = write_pgn(&initial, &moves, &default_headers("*")).expect("PGN should write");
        assert!(pgn.contains("[SetUp \"1\"]"));
        assert!(pgn.contains("7... Kd7 8. e4 Ke6 *"));

        let parsed = read_pgn(&pgn).expect("PGN should parse");
        assert_eq!(parsed.initial_position, initial);
        assert_eq!(parsed.moves, moves);
        assert_eq!(parsed.final_position, last);
        assert_eq!(parsed.result, "*");
    }

    #[test]
    fn reader_skips_comments_variations_and_nags() {
        let pgn = "[Result \"1-0\"]\n\n1. e4 {best by test} e5 (1... c5 2. Nf3) 2. Nf3 $1 Nc6 1-0\n";
        let parsed = read_pgn(pgn).expect("PGN should parse");
        let names: Vec<String> = parsed.moves.iter().map(|mv| mv.to_string()).collect();
        assert_eq!(names, vec!["e2e4", "e7e5", "g1f3", "b8c6"]);
        assert_eq!(parsed.result, "1-0");
    }
}
