//! Canonical chess-rule constants.
//!
//! Standard starting position plus the fixed king/rook squares that castling
//! rights refer to.

use crate::game_state::chess_types::*;

/// Standard chess starting position in Forsyth-Edwards Notation (FEN).
pub const STARTING_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Half-move clock value from which a fifty-move draw may be claimed.
pub const FIFTY_MOVE_RULE_PLIES: u16 = 100;

/// One castling option: the right that enables it and the squares involved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastleSide {
    pub right: CastlingRights,
    pub color: Color,
    pub king_from: Square,
    pub king_to: Square,
    pub rook_from: Square,
    pub rook_to: Square,
    /// Squares that must be empty between king and rook.
    pub must_be_empty: &'static [Square],
    /// Squares the king crosses, including its destination.
    pub king_path: &'static [Square],
}

pub const WHITE_KINGSIDE: CastleSide = CastleSide {
    right: CASTLE_WHITE_KINGSIDE,
    color: Color::White,
    king_from: Square::E1,
    king_to: Square::G1,
    rook_from: Square::H1,
    rook_to: Square::F1,
    must_be_empty: &[Square::F1, Square::G1],
    king_path: &[Square::F1, Square::G1],
};

pub const WHITE_QUEENSIDE: CastleSide = CastleSide {
    right: CASTLE_WHITE_QUEENSIDE,
    color: Color::White,
    king_from: Square::E1,
    king_to: Square::C1,
    rook_from: Square::A1,
    rook_to: Square::D1,
    must_be_empty: &[Square::D1, Square::C1, Square::B1],
    king_path: &[Square::D1, Square::C1],
};

pub const BLACK_KINGSIDE: CastleSide = CastleSide {
    right: CASTLE_BLACK_KINGSIDE,
    color: Color::Black,
    king_from: Square::E8,
    king_to: Square::G8,
    rook_from: Square::H8,
    rook_to: Square::F8,
    must_be_empty: &[Square::F8, Square::G8],
    king_path: &[Square::F8, Square::G8],
};

pub const BLACK_QUEENSIDE: CastleSide = CastleSide {
    right: CASTLE_BLACK_QUEENSIDE,
    color: Color::Black,
    king_from: Square::E8,
    king_to: Square::C8,
    rook_from: Square::A8,
    rook_to: Square::D8,
    must_be_empty: &[Square::D8, Square::C8, Square::B8],
    king_path: &[Square::D8, Square::C8],
};

pub const CASTLE_SIDES: [CastleSide; 4] =
    [WHITE_KINGSIDE, WHITE_QUEENSIDE, BLACK_KINGSIDE, BLACK_QUEENSIDE];

/// Castling options available to `color`, kingside first.
#[inline]
pub fn castle_sides_for(color: Color) -> [CastleSide; 2] {
    match color {
        Color::White => [WHITE_KINGSIDE, WHITE_QUEENSIDE],
        Color::Black => [BLACK_KINGSIDE, BLACK_QUEENSIDE],
    }
}

/// The castling option whose king move is `from -> to`, if any.
pub fn castle_side_for_king_move(from: Square, to: Square) -> Option<CastleSide> {
    CASTLE_SIDES
        .into_iter()
        .find(|side| side.king_from == from && side.king_to == to)
}

/// Castling right lost when a piece leaves or lands on `square`.
#[inline]
pub fn castling_right_for_rook_square(square: Square) -> CastlingRights {
    match square {
        Square::A1 => CASTLE_WHITE_QUEENSIDE,
        Square::H1 => CASTLE_WHITE_KINGSIDE,
        Square::A8 => CASTLE_BLACK_QUEENSIDE,
        Square::H8 => CASTLE_BLACK_KINGSIDE,
        _ => 0,
    }
}
