//! Square-name conversions (`e4` <-> 28).

use crate::errors::{ChessError, ChessResult};
use crate::position::chess_types::{file_of, rank_of, Square};

pub fn algebraic_to_square(square: &str) -> ChessResult<Square> {
    let &[file, rank] = square.as_bytes() else {
        return Err(ChessError::parse(format!("invalid square name: {square:?}")));
    };

    if !(b'a'..=b'h').contains(&file) {
        return Err(ChessError::parse(format!(
            "invalid file '{}' in square {square:?}",
            file as char
        )));
    }
    if !(b'1'..=b'8').contains(&rank) {
        return Err(ChessError::parse(format!(
            "invalid rank '{}' in square {square:?}",
            rank as char
        )));
    }

    Ok((rank - b'1') * 8 + (file - b'a'))
}

/// Name of a square index. Indices outside `0..64` are a caller bug.
pub fn square_to_algebraic(square: Square) -> String {
    debug_assert!(square < 64, "square index out of range: {square}");
    let mut out = String::with_capacity(2);
    out.push(file_char(square));
    out.push(char::from(b'1' + rank_of(square)));
    out
}

#[inline]
pub fn file_char(square: Square) -> char {
    char::from(b'a' + file_of(square))
}

#[inline]
pub fn rank_char(square: Square) -> char {
    char::from(b'1' + rank_of(square))
}

#[cfg(test)]
mod tests {
    use super::{algebraic_to_square, square_to_algebraic};

    #[test]
    fn corner_and_centre_squares_convert_both_ways() {
        for (name, index) in [("a1", 0u8), ("h1", 7), ("e4", 28), ("h8", 63)] {
            assert_eq!(algebraic_to_square(name).expect("square should parse"), index);
            assert_eq!(square_to_algebraic(index), name);
        }
    }

    #[test]
    fn malformed_squares_are_rejected() {
        for bad in ["", "e", "i4", "e9", "e44", "E4"] {
            assert!(algebraic_to_square(bad).is_err(), "{bad:?} should not parse");
        }
    }
}
