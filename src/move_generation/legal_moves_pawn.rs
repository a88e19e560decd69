use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_shared::{en_passant_victim, enemy_piece_on, push_pawn_move};
use crate::moves::pawn_moves::pawn_attacks;

pub fn generate_pawn_moves(game_state: &GameState, out: &mut Vec<Move>) {
    let side = game_state.side_to_move;
    let step = side.pawn_direction();

    for (from, kind) in game_state.occupied_by(side) {
        if kind != PieceKind::Pawn {
            continue;
        }

        if let Some(one_step) = from.offset(0, step) {
            if game_state.is_empty(one_step) {
                push_pawn_move(side, from, one_step, out);

                if from.rank() == side.pawn_start_rank() {
                    if let Some(two_step) = one_step.offset(0, step) {
                        if game_state.is_empty(two_step) {
                            out.push(Move::new(from, two_step));
                        }
                    }
                }
            }
        }

        for to in squares_in(pawn_attacks(side, from)) {
            if enemy_piece_on(game_state, to).is_some() {
                push_pawn_move(side, from, to, out);
            } else if en_passant_victim(game_state, side, to).is_some() {
                out.push(Move::new(from, to));
            }
        }
    }
}
