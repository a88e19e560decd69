use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_shared::push_targets;
use crate::moves::knight_moves::knight_attacks;

pub fn generate_knight_moves(game_state: &GameState, out: &mut Vec<Move>) {
    let side = game_state.side_to_move;
    for (from, kind) in game_state.occupied_by(side) {
        if kind == PieceKind::Knight {
            push_targets(game_state, from, knight_attacks(from), out);
        }
    }
}
