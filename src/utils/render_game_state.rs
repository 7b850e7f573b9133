//! Terminal-oriented Unicode board renderer used for `Display` and debugging.

use crate::position::chess_types::*;

/// Render the board with white at the bottom.
pub fn render_position(position: &Position) -> String {
    let mut out = String::new();

    out.push_str("  a b c d e f g h\n");

    for rank in (0..8u8).rev() {
        let rank_label = char::from(b'1' + rank);
        out.push(rank_label);
        out.push(' ');

        for file in 0..8u8 {
            let glyph = position
                .piece_at(square_at(file, rank))
                .map_or('·', |(color, kind)| piece_glyph(color, kind));
            out.push(glyph);
            if file < 7 {
                out.push(' ');
            }
        }

        out.push(' ');
        out.push(rank_label);
        out.push('\n');
    }

    out.push_str("  a b c d e f g h");

    out
}

fn piece_glyph(color: Color, kind: PieceKind) -> char {
    const WHITE: [char; 6] = ['♙', '♘', '♗', '♖', '♕', '♔'];
    const BLACK: [char; 6] = ['♟', '♞', '♝', '♜', '♛', '♚'];
    match color {
        Color::White => WHITE[kind.index()],
        Color::Black => BLACK[kind.index()],
    }
}
