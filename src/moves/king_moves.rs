//! King target masks.
//!
//! One-step neighbourhood of every square, precomputed at compile time.
//! Castling is a rules concern and lives in move generation.

use crate::game_state::chess_types::Square;

pub const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

pub const KING_ATTACKS: [u64; 64] = generate_king_attacks();

#[inline]
pub const fn king_attacks(square: Square) -> u64 {
    KING_ATTACKS[square.index()]
}

const fn generate_king_attacks() -> [u64; 64] {
    let mut table = [0u64; 64];
    let mut sq = 0usize;

    while sq < 64 {
        let file = (sq % 8) as i8;
        let rank = (sq / 8) as i8;
        let mut attacks = 0u64;
        let mut i = 0usize;

        while i < KING_OFFSETS.len() {
            let (df, dr) = KING_OFFSETS[i];
            let f = file + df;
            let r = rank + dr;
            if f >= 0 && f <= 7 && r >= 0 && r <= 7 {
                attacks |= 1u64 << ((r as usize) * 8 + (f as usize));
            }
            i += 1;
        }

        table[sq] = attacks;
        sq += 1;
    }

    table
}

#[cfg(test)]
mod tests {
    use super::king_attacks;
    use crate::game_state::chess_types::Square;

    #[test]
    fn king_neighbourhood_sizes() {
        assert_eq!(king_attacks(Square::A1).count_ones(), 3);
        assert_eq!(king_attacks(Square::E1).count_ones(), 5);
        let e4: Square = "e4".parse().expect("e4 should parse");
        assert_eq!(king_attacks(e4).count_ones(), 8);
    }
}
