//! Ray-cast attack masks for bishops, rooks and queens.
//!
//! Each ray walks outward until it leaves the board or hits an occupied
//! square; the blocker itself is included so callers can decide between
//! capture (enemy) and stop (friendly).

use crate::game_state::chess_types::{PieceKind, Square};

pub const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (-1, 1), (1, -1), (-1, -1)];
pub const ROOK_DIRECTIONS: [(i8, i8); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

#[inline]
pub fn bishop_attacks(square: Square, occupancy: u64) -> u64 {
    BISHOP_DIRECTIONS
        .iter()
        .fold(0u64, |acc, &(df, dr)| acc | trace_ray(square, df, dr, occupancy))
}

#[inline]
pub fn rook_attacks(square: Square, occupancy: u64) -> u64 {
    ROOK_DIRECTIONS
        .iter()
        .fold(0u64, |acc, &(df, dr)| acc | trace_ray(square, df, dr, occupancy))
}

#[inline]
pub fn queen_attacks(square: Square, occupancy: u64) -> u64 {
    bishop_attacks(square, occupancy) | rook_attacks(square, occupancy)
}

/// Attack mask for any slider kind; zero for non-sliders.
pub fn slider_attacks(kind: PieceKind, square: Square, occupancy: u64) -> u64 {
    match kind {
        PieceKind::Bishop => bishop_attacks(square, occupancy),
        PieceKind::Rook => rook_attacks(square, occupancy),
        PieceKind::Queen => queen_attacks(square, occupancy),
        _ => 0,
    }
}

fn trace_ray(square: Square, file_step: i8, rank_step: i8, occupancy: u64) -> u64 {
    let mut attacks = 0u64;
    let mut current = square.offset(file_step, rank_step);

    while let Some(target) = current {
        attacks |= target.bit();
        if occupancy & target.bit() != 0 {
            break;
        }
        current = target.offset(file_step, rank_step);
    }

    attacks
}

#[cfg(test)]
mod tests {
    use super::{bishop_attacks, queen_attacks, rook_attacks};
    use crate::game_state::chess_types::Square;

    fn sq(name: &str) -> Square {
        name.parse().expect("square should parse")
    }

    #[test]
    fn open_board_ray_lengths_from_d4() {
        assert_eq!(rook_attacks(sq("d4"), 0).count_ones(), 14);
        assert_eq!(bishop_attacks(sq("d4"), 0).count_ones(), 13);
        assert_eq!(queen_attacks(sq("d4"), 0).count_ones(), 27);
    }

    #[test]
    fn rook_blocker_stops_ray() {
        let blocker_on_a4 = sq("a4").bit();
        let attacks = rook_attacks(Square::A1, blocker_on_a4);

        assert_ne!(attacks & sq("a4").bit(), 0);
        assert_eq!(attacks & sq("a5").bit(), 0);
        assert_ne!(attacks & Square::H1.bit(), 0);
    }
}
