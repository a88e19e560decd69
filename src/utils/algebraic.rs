//! Square and bitboard conversions for algebraic coordinates.
//!
//! Converts between human-readable coordinates (e.g., `e4`) and `Square`
//! values or one-hot masks, reused by the FEN, SAN and PGN components.

use crate::game_state::chess_errors::{ChessError, ChessResult};
use crate::game_state::chess_types::{squares_in, Square};

/// Convert algebraic notation (for example: "e4") to a square.
#[inline]
pub fn algebraic_to_square(square: &str) -> ChessResult<Square> {
    square.parse()
}

/// Convert algebraic notation (for example: "e4") to a one-hot bitboard.
#[inline]
pub fn algebraic_to_bitboard(square: &str) -> ChessResult<u64> {
    Ok(algebraic_to_square(square)?.bit())
}

#[inline]
pub fn square_to_algebraic(square: Square) -> String {
    square.to_string()
}

/// Convert a one-hot bitboard to algebraic notation (for example: "e4").
pub fn bitboard_to_algebraic(bitboard: u64) -> ChessResult<String> {
    if bitboard.count_ones() != 1 {
        return Err(ChessError::MalformedMove(format!(
            "bitboard must contain exactly one set bit, got {}",
            bitboard.count_ones()
        )));
    }
    Ok(squares_in(bitboard)
        .map(square_to_algebraic)
        .collect::<String>())
}

#[cfg(test)]
mod tests {
    use super::{
        algebraic_to_bitboard, algebraic_to_square, bitboard_to_algebraic, square_to_algebraic,
    };
    use crate::game_state::chess_types::Square;

    #[test]
    fn round_trip_square_conversions() {
        assert_eq!(algebraic_to_square("a1").expect("a1 should parse"), Square::A1);
        assert_eq!(algebraic_to_square("h8").expect("h8 should parse"), Square::H8);
        assert_eq!(square_to_algebraic(Square::A1), "a1");
        assert_eq!(square_to_algebraic(Square::H8), "h8");
        assert!(algebraic_to_square("z9").is_err());
    }

    #[test]
    fn round_trip_bitboard_conversion() {
        let e4 = algebraic_to_bitboard("e4").expect("e4 should parse");
        assert_eq!(e4, 1u64 << 28);
        assert_eq!(
            bitboard_to_algebraic(e4).expect("one-hot bitboard should convert"),
            "e4"
        );
        assert!(bitboard_to_algebraic(0).is_err());
        assert!(bitboard_to_algebraic(0b11).is_err());
    }
}
