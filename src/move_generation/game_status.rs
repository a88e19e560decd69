//! Terminal-state classification derived from a position.
//!
//! Nothing here is stored on `GameState`; every answer is recomputed from the
//! board so it can never drift from the pieces actually on it.

use crate::game_state::chess_rules::FIFTY_MOVE_RULE_PLIES;
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_generator::{has_legal_moves, in_check};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Ongoing,
    Checkmate,
    Stalemate,
    InsufficientMaterial,
}

impl GameStatus {
    #[inline]
    pub fn is_over(self) -> bool {
        self != GameStatus::Ongoing
    }
}

pub fn game_status(game_state: &GameState) -> GameStatus {
    if !has_legal_moves(game_state) {
        if in_check(game_state) {
            return GameStatus::Checkmate;
        }
        return GameStatus::Stalemate;
    }
    if is_insufficient_material(game_state) {
        return GameStatus::InsufficientMaterial;
    }
    GameStatus::Ongoing
}

/// The side that delivered mate, `None` unless the position is checkmate.
pub fn winner(game_state: &GameState) -> Option<Color> {
    match game_status(game_state) {
        GameStatus::Checkmate => Some(game_state.side_to_move.opposite()),
        _ => None,
    }
}

/// Neither side can mate: bare kings, a single minor piece, or bishops that
/// all stand on squares of one colour.
pub fn is_insufficient_material(game_state: &GameState) -> bool {
    let mut minors = Vec::<(PieceKind, Square)>::new();

    for square in Square::all() {
        match game_state.piece_at(square) {
            None => {}
            Some(piece) => match piece.kind {
                PieceKind::King => {}
                PieceKind::Knight | PieceKind::Bishop => minors.push((piece.kind, square)),
                PieceKind::Pawn | PieceKind::Rook | PieceKind::Queen => return false,
            },
        }
    }

    match minors.as_slice() {
        [] | [_] => true,
        many => {
            let light = |sq: &Square| (sq.file() + sq.rank()) % 2 == 1;
            many.iter().all(|(kind, _)| *kind == PieceKind::Bishop)
                && (many.iter().all(|(_, sq)| light(sq)) || many.iter().all(|(_, sq)| !light(sq)))
        }
    }
}

/// A draw may be claimed; the engine never enforces it.
#[inline]
pub fn fifty_move_rule_claimable(game_state: &GameState) -> bool {
    game_state.halfmove_clock >= FIFTY_MOVE_RULE_PLIES
}
