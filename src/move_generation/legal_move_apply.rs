//! Move application.
//!
//! `apply_move` is the only validated way to mutate a `GameState`: it checks
//! the move against the legal move list first and touches nothing on failure.
//! `apply_move_unchecked` performs the mutation alone and is used by the
//! legality filter and the search on scratch copies.

use tracing::debug;

use crate::game_state::chess_errors::{ChessError, ChessResult};
use crate::game_state::chess_rules::{castle_side_for_king_move, castling_right_for_rook_square};
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_generator::generate_legal_moves;
use crate::move_generation::legal_move_shared::en_passant_victim;

/// Validate `mv` against the legal moves of `game_state`, then play it.
pub fn apply_move(game_state: &mut GameState, mv: Move) -> ChessResult<()> {
    if !generate_legal_moves(game_state).contains(&mv) {
        debug!(%mv, fen = %game_state.get_fen(), "rejected illegal move");
        return Err(ChessError::IllegalMove(mv.to_string()));
    }
    apply_move_unchecked(game_state, mv);
    Ok(())
}

/// True when `mv` is a king move of two files from its home square.
pub fn is_castling_move(game_state: &GameState, mv: Move) -> bool {
    matches!(game_state.piece_at(mv.from), Some(piece) if piece.kind == PieceKind::King)
        && castle_side_for_king_move(mv.from, mv.to).is_some()
}

/// True when `mv` is a pawn moving diagonally onto the en-passant target
/// with an enemy pawn behind it.
pub fn is_en_passant_capture(game_state: &GameState, mv: Move) -> bool {
    en_passant_victim_of(game_state, mv).is_some()
}

fn en_passant_victim_of(game_state: &GameState, mv: Move) -> Option<Square> {
    match game_state.piece_at(mv.from) {
        Some(piece) if piece.kind == PieceKind::Pawn && mv.from.file() != mv.to.file() => {
            en_passant_victim(game_state, piece.color, mv.to)
        }
        _ => None,
    }
}

/// Kind of the piece `mv` removes from the board, if any.
pub fn captured_piece(game_state: &GameState, mv: Move) -> Option<PieceKind> {
    if is_en_passant_capture(game_state, mv) {
        return Some(PieceKind::Pawn);
    }
    match game_state.piece_at(mv.to) {
        Some(piece) if Some(piece.color) != game_state.piece_at(mv.from).map(|p| p.color) => {
            Some(piece.kind)
        }
        _ => None,
    }
}

#[inline]
pub fn is_capture(game_state: &GameState, mv: Move) -> bool {
    captured_piece(game_state, mv).is_some()
}

/// Play `mv` without checking legality.
///
/// The move must at least be pseudo-legal for the side to move; an empty
/// origin square leaves the board unchanged.
pub fn apply_move_unchecked(game_state: &mut GameState, mv: Move) {
    let Some(moving) = game_state.piece_at(mv.from) else {
        return;
    };
    let moving_color = moving.color;

    let ep_victim = en_passant_victim_of(game_state, mv);
    let castle = if moving.kind == PieceKind::King {
        castle_side_for_king_move(mv.from, mv.to)
    } else {
        None
    };

    game_state.take(mv.from);
    let mut captured = game_state.take(mv.to);

    if let Some(victim_sq) = ep_victim {
        captured = game_state.take(victim_sq);
    }

    let placed = match mv.promotion {
        Some(kind) if moving.kind == PieceKind::Pawn => Piece::new(moving_color, kind),
        _ => moving,
    };
    game_state.put(mv.to, placed);

    if let Some(castle) = castle {
        if let Some(rook) = game_state.take(castle.rook_from) {
            game_state.put(castle.rook_to, rook);
        }
    }

    update_castling_rights(game_state, moving, mv);

    game_state.en_passant_square = if moving.kind == PieceKind::Pawn
        && mv.from.rank().abs_diff(mv.to.rank()) == 2
    {
        mv.from.offset(0, moving_color.pawn_direction())
    } else {
        None
    };

    if moving.kind == PieceKind::Pawn || captured.is_some() {
        game_state.halfmove_clock = 0;
    } else {
        game_state.halfmove_clock = game_state.halfmove_clock.saturating_add(1);
    }
    if moving_color == Color::Black {
        game_state.fullmove_number = game_state.fullmove_number.saturating_add(1);
    }

    game_state.side_to_move = moving_color.opposite();
}

fn update_castling_rights(game_state: &mut GameState, moving: Piece, mv: Move) {
    if moving.kind == PieceKind::King {
        game_state.castling_rights &= !match moving.color {
            Color::White => CASTLE_WHITE_KINGSIDE | CASTLE_WHITE_QUEENSIDE,
            Color::Black => CASTLE_BLACK_KINGSIDE | CASTLE_BLACK_QUEENSIDE,
        };
    }

    // A rook leaving its corner, or anything landing there, kills that right.
    game_state.castling_rights &= !castling_right_for_rook_square(mv.from);
    game_state.castling_rights &= !castling_right_for_rook_square(mv.to);
}
