use crate::game_state::{chess_types::*, game_state::GameState};

/// Push one plain move per square in `targets`, skipping squares held by the
/// side to move.
#[inline]
pub fn push_targets(game_state: &GameState, from: Square, targets: u64, out: &mut Vec<Move>) {
    let own_occ = game_state.occupancy_of(game_state.side_to_move);
    out.extend(squares_in(targets & !own_occ).map(|to| Move::new(from, to)));
}

/// Enemy piece kind on `square` from the side to move's point of view.
#[inline]
pub fn enemy_piece_on(game_state: &GameState, square: Square) -> Option<PieceKind> {
    match game_state.piece_at(square) {
        Some(piece) if piece.color != game_state.side_to_move => Some(piece.kind),
        _ => None,
    }
}

/// Square of the pawn an en-passant capture onto `to` by `mover` would take.
///
/// `None` unless `to` is the board's en-passant target and an enemy pawn
/// stands directly behind it.
pub fn en_passant_victim(game_state: &GameState, mover: Color, to: Square) -> Option<Square> {
    if game_state.en_passant_square != Some(to) || !game_state.is_empty(to) {
        return None;
    }
    let victim_sq = to.offset(0, -mover.pawn_direction())?;
    match game_state.piece_at(victim_sq) {
        Some(piece) if piece.color != mover && piece.kind == PieceKind::Pawn => Some(victim_sq),
        _ => None,
    }
}

/// Push `from -> to`, expanded into the four promotion choices when the
/// pawn reaches its last rank.
#[inline]
pub fn push_pawn_move(side: Color, from: Square, to: Square, out: &mut Vec<Move>) {
    if to.rank() == side.promotion_rank() {
        out.extend(
            PROMOTION_KINDS
                .iter()
                .map(|&kind| Move::with_promotion(from, to, kind)),
        );
    } else {
        out.push(Move::new(from, to));
    }
}
