//! Full legal move generation pipeline.
//!
//! Orchestrates piece-wise pseudo-legal generation, applies each candidate to
//! a scratch copy, and drops the ones that leave the mover's king attacked.

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_apply::apply_move_unchecked;
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_moves_king::generate_king_moves;
use crate::move_generation::legal_moves_knight::generate_knight_moves;
use crate::move_generation::legal_moves_pawn::generate_pawn_moves;
use crate::move_generation::legal_moves_sliders::generate_slider_moves;

/// Moves for the side to move, ignoring whether they leave its king in check.
pub fn generate_pseudo_legal_moves(game_state: &GameState) -> Vec<Move> {
    let mut pseudo = Vec::<Move>::with_capacity(64);

    generate_pawn_moves(game_state, &mut pseudo);
    generate_knight_moves(game_state, &mut pseudo);
    generate_slider_moves(game_state, &mut pseudo);
    generate_king_moves(game_state, &mut pseudo);

    pseudo
}

/// Every legal move for the side to move.
pub fn generate_legal_moves(game_state: &GameState) -> Vec<Move> {
    let side = game_state.side_to_move;
    generate_pseudo_legal_moves(game_state)
        .into_iter()
        .filter(|&mv| {
            let mut next = game_state.clone();
            apply_move_unchecked(&mut next, mv);
            !is_king_in_check(&next, side)
        })
        .collect()
}

/// True when at least one legal move exists, stopping at the first.
pub fn has_legal_moves(game_state: &GameState) -> bool {
    let side = game_state.side_to_move;
    generate_pseudo_legal_moves(game_state).into_iter().any(|mv| {
        let mut next = game_state.clone();
        apply_move_unchecked(&mut next, mv);
        !is_king_in_check(&next, side)
    })
}

#[inline]
pub fn in_check(game_state: &GameState) -> bool {
    is_king_in_check(game_state, game_state.side_to_move)
}

pub fn is_checkmate(game_state: &GameState) -> bool {
    in_check(game_state) && !has_legal_moves(game_state)
}

pub fn is_stalemate(game_state: &GameState) -> bool {
    !in_check(game_state) && !has_legal_moves(game_state)
}
