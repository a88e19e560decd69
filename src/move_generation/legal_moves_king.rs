use crate::game_state::chess_rules::castle_sides_for;
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_checks::is_square_attacked;
use crate::move_generation::legal_move_shared::push_targets;
use crate::moves::king_moves::king_attacks;

pub fn generate_king_moves(game_state: &GameState, out: &mut Vec<Move>) {
    let side = game_state.side_to_move;
    let Some(from) = game_state.king_square(side) else {
        return;
    };

    push_targets(game_state, from, king_attacks(from), out);
    generate_castling_moves(game_state, out, from);
}

/// Castling requires the right, king and rook on their home squares, empty
/// squares between them, and no attacked square on the king's path
/// (its start square included).
fn generate_castling_moves(game_state: &GameState, out: &mut Vec<Move>, king_from: Square) {
    let side = game_state.side_to_move;
    let enemy = side.opposite();
    let own_rook = Some(Piece::new(side, PieceKind::Rook));

    for castle in castle_sides_for(side) {
        if king_from != castle.king_from
            || !game_state.has_castling_right(castle.right)
            || game_state.piece_at(castle.rook_from) != own_rook
            || !castle.must_be_empty.iter().all(|&sq| game_state.is_empty(sq))
        {
            continue;
        }

        // Cannot castle out of check.
        if is_square_attacked(game_state, king_from, enemy) {
            return;
        }

        if castle
            .king_path
            .iter()
            .any(|&sq| is_square_attacked(game_state, sq, enemy))
        {
            continue;
        }

        out.push(Move::new(castle.king_from, castle.king_to));
    }
}
