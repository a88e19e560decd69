use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_shared::push_targets;
use crate::moves::sliding_moves::slider_attacks;

/// Bishop, rook and queen moves. Rays stop at the first occupied square,
/// which is a capture when it holds an enemy piece.
pub fn generate_slider_moves(game_state: &GameState, out: &mut Vec<Move>) {
    let side = game_state.side_to_move;
    let occupancy = game_state.occupancy();
    for (from, kind) in game_state.occupied_by(side) {
        if kind.is_slider() {
            push_targets(game_state, from, slider_attacks(kind, from, occupancy), out);
        }
    }
}
