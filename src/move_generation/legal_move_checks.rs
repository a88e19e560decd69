//! Attack and check detection against the mailbox board.
//!
//! Attacks are found in reverse: from the target square, cast each piece's
//! attack pattern and look for a matching enemy piece at the far end.

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::moves::king_moves::king_attacks;
use crate::moves::knight_moves::knight_attacks;
use crate::moves::pawn_moves::pawn_attacks;
use crate::moves::sliding_moves::{bishop_attacks, rook_attacks};

#[inline]
pub fn is_king_in_check(game_state: &GameState, color: Color) -> bool {
    let Some(king_sq) = game_state.king_square(color) else {
        return false;
    };
    is_square_attacked(game_state, king_sq, color.opposite())
}

pub fn is_square_attacked(game_state: &GameState, square: Square, attacker_color: Color) -> bool {
    let occupancy = game_state.occupancy();
    let holds = |sq: Square, kinds: &[PieceKind]| {
        matches!(
            game_state.piece_at(sq),
            Some(piece) if piece.color == attacker_color && kinds.contains(&piece.kind)
        )
    };

    // A pawn of the attacker's color attacks `square` from exactly the squares
    // a pawn of the other color on `square` would attack.
    if squares_in(pawn_attacks(attacker_color.opposite(), square))
        .any(|sq| holds(sq, &[PieceKind::Pawn]))
    {
        return true;
    }

    if squares_in(knight_attacks(square)).any(|sq| holds(sq, &[PieceKind::Knight])) {
        return true;
    }

    if squares_in(king_attacks(square)).any(|sq| holds(sq, &[PieceKind::King])) {
        return true;
    }

    if squares_in(bishop_attacks(square, occupancy))
        .any(|sq| holds(sq, &[PieceKind::Bishop, PieceKind::Queen]))
    {
        return true;
    }

    squares_in(rook_attacks(square, occupancy))
        .any(|sq| holds(sq, &[PieceKind::Rook, PieceKind::Queen]))
}

/// Count of squares `color` attacks, used as a mobility proxy.
pub fn attacked_square_count(game_state: &GameState, color: Color) -> u32 {
    let occupancy = game_state.occupancy();
    let mut covered = 0u64;
    for (from, kind) in game_state.occupied_by(color) {
        covered |= match kind {
            PieceKind::Pawn => pawn_attacks(color, from),
            PieceKind::Knight => knight_attacks(from),
            PieceKind::Bishop => bishop_attacks(from, occupancy),
            PieceKind::Rook => rook_attacks(from, occupancy),
            PieceKind::Queen => bishop_attacks(from, occupancy) | rook_attacks(from, occupancy),
            PieceKind::King => king_attacks(from),
        };
    }
    covered.count_ones()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(text: &str) -> Square {
        text.parse().expect("test square should parse")
    }

    #[test]
    fn start_position_has_no_checks() {
        let game = GameState::new_game();
        assert!(!is_king_in_check(&game, Color::White));
        assert!(!is_king_in_check(&game, Color::Black));
        assert!(is_square_attacked(&game, sq("f3"), Color::White));
        assert!(!is_square_attacked(&game, sq("e4"), Color::White));
        assert!(is_square_attacked(&game, sq("f6"), Color::Black));
    }

    #[test]
    fn sliding_check_is_blocked_by_interposed_piece() {
        let open = GameState::from_fen("4k3/8/8/8/8/8/8/4K2r w - - 0 1")
            .expect("FEN should parse");
        assert!(is_king_in_check(&open, Color::White));

        let blocked = GameState::from_fen("4k3/8/8/8/8/8/8/4KB1r w - - 0 1")
            .expect("FEN should parse");
        assert!(!is_king_in_check(&blocked, Color::White));
    }

    #[test]
    fn pawn_attacks_point_forward_only() {
        let game = GameState::from_fen("4k3/8/8/3p4/8/8/8/4K3 w - - 0 1")
            .expect("FEN should parse");
        assert!(is_square_attacked(&game, sq("c4"), Color::Black));
        assert!(is_square_attacked(&game, sq("e4"), Color::Black));
        assert!(!is_square_attacked(&game, sq("d4"), Color::Black));
        assert!(!is_square_attacked(&game, sq("c6"), Color::Black));
    }

    #[test]
    fn attacked_squares_count_each_square_once() {
        let game = GameState::from_fen("4k3/8/8/8/8/8/8/N3K3 w - - 0 1")
            .expect("FEN should parse");
        // Knight a1 covers b3 and c2. King e1 covers d1 d2 e2 f2 f1.
        assert_eq!(attacked_square_count(&game, Color::White), 7);
        assert_eq!(attacked_square_count(&GameState::new_game(), Color::White), 22);
    }
}
