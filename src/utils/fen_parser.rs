//! FEN-to-Position parser.
//!
//! Builds a fully populated `Position` (bitboards, rights, clocks, occupancy
//! caches and Zobrist key) from Forsyth-Edwards Notation. The clock fields may
//! be omitted, in which case they default to `0 1`.
//!
//! Apart from the optional clocks, only canonical text is accepted: empty
//! squares are counted in a single digit and castling rights appear in
//! `KQkq` order without repeats. Any accepted six-field string is generated
//! back unchanged.

use crate::errors::{ChessError, ChessResult};
use crate::position::chess_types::*;
use crate::utils::algebraic::algebraic_to_square;

pub fn parse_fen(fen: &str) -> ChessResult<Position> {
    let fields: Vec<&str> = fen.split_whitespace().collect();
    if fields.len() != 4 && fields.len() != 6 {
        return Err(ChessError::parse(format!(
            "FEN must have 4 or 6 fields, got {}: {fen:?}",
            fields.len()
        )));
    }

    let mut position = Position::new_empty();

    parse_board(fields[0], &mut position)?;
    position.side_to_move = parse_side_to_move(fields[1])?;
    position.castling_rights = parse_castling_rights(fields[2])?;
    position.en_passant_square = parse_en_passant_square(fields[3], position.side_to_move)?;

    if fields.len() == 6 {
        position.halfmove_clock = fields[4]
            .parse::<u16>()
            .map_err(|_| ChessError::parse(format!("invalid halfmove clock: {}", fields[4])))?;
        position.fullmove_number = fields[5]
            .parse::<u16>()
            .map_err(|_| ChessError::parse(format!("invalid fullmove number: {}", fields[5])))?;
        if position.fullmove_number == 0 {
            return Err(ChessError::parse("fullmove number must start at 1"));
        }
    }

    for color in [Color::White, Color::Black] {
        let kings = position.count(color, PieceKind::King);
        if kings != 1 {
            return Err(ChessError::parse(format!(
                "{color} must have exactly one king, found {kings}"
            )));
        }
    }

    position.finalize();
    Ok(position)
}

fn parse_board(board_field: &str, position: &mut Position) -> ChessResult<()> {
    let ranks: Vec<&str> = board_field.split('/').collect();
    if ranks.len() != 8 {
        return Err(ChessError::parse(format!(
            "board layout must contain 8 ranks, got {}",
            ranks.len()
        )));
    }

    for (row, rank_text) in ranks.iter().enumerate() {
        let rank = 7 - row as u8;
        let mut file = 0u8;
        let mut previous_was_run = false;

        for ch in rank_text.chars() {
            if let Some(run) = ch.to_digit(10) {
                if !(1..=8).contains(&run) {
                    return Err(ChessError::parse(format!("invalid empty-square count '{ch}'")));
                }
                if previous_was_run {
                    return Err(ChessError::parse(format!(
                        "empty squares split across digits in rank {}: {rank_text:?}",
                        rank + 1
                    )));
                }
                previous_was_run = true;
                file += run as u8;
            } else {
                previous_was_run = false;
                let kind = PieceKind::from_fen_char(ch).ok_or_else(|| {
                    ChessError::parse(format!("invalid piece character '{ch}' in board layout"))
                })?;
                let color = if ch.is_ascii_uppercase() {
                    Color::White
                } else {
                    Color::Black
                };
                if file >= 8 {
                    return Err(ChessError::parse(format!(
                        "rank {} has more than 8 files: {rank_text:?}",
                        rank + 1
                    )));
                }
                position.pieces[color.index()][kind.index()] |= 1u64 << square_at(file, rank);
                file += 1;
            }

            if file > 8 {
                return Err(ChessError::parse(format!(
                    "rank {} has more than 8 files: {rank_text:?}",
                    rank + 1
                )));
            }
        }

        if file != 8 {
            return Err(ChessError::parse(format!(
                "rank {} does not describe exactly 8 files: {rank_text:?}",
                rank + 1
            )));
        }
    }

    Ok(())
}

fn parse_side_to_move(field: &str) -> ChessResult<Color> {
    match field {
        "w" => Ok(Color::White),
        "b" => Ok(Color::Black),
        _ => Err(ChessError::parse(format!("invalid side-to-move field: {field}"))),
    }
}

fn parse_castling_rights(field: &str) -> ChessResult<CastlingRights> {
    if field == "-" {
        return Ok(0);
    }

    const ORDER: [(char, CastlingRights); 4] = [
        ('K', CASTLE_WHITE_KINGSIDE),
        ('Q', CASTLE_WHITE_QUEENSIDE),
        ('k', CASTLE_BLACK_KINGSIDE),
        ('q', CASTLE_BLACK_QUEENSIDE),
    ];

    let mut rights: CastlingRights = 0;
    let mut next = 0;
    for ch in field.chars() {
        let offset = ORDER[next..]
            .iter()
            .position(|&(flag, _)| flag == ch)
            .ok_or_else(|| {
                ChessError::parse(format!(
                    "castling rights must be a subset of KQkq in that order: {field}"
                ))
            })?;
        rights |= ORDER[next + offset].1;
        next += offset + 1;
    }

    Ok(rights)
}

fn parse_en_passant_square(field: &str, side_to_move: Color) -> ChessResult<Option<Square>> {
    if field == "-" {
        return Ok(None);
    }

    let square = algebraic_to_square(field)?;
    // The target sits behind the pawn that just double-pushed.
    let expected_rank = match side_to_move {
        Color::White => 5,
        Color::Black => 2,
    };
    if rank_of(square) != expected_rank {
        return Err(ChessError::parse(format!(
            "en-passant square {field} is impossible with {side_to_move} to move"
        )));
    }

    Ok(Some(square))
}
