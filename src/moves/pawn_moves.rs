use crate::game_state::chess_types::{Color, Square};

pub const WHITE_PAWN_ATTACKS: [u64; 64] = generate_pawn_attacks(1);
pub const BLACK_PAWN_ATTACKS: [u64; 64] = generate_pawn_attacks(-1);

/// Squares a pawn of `color` standing on `square` attacks diagonally.
#[inline]
pub const fn pawn_attacks(color: Color, square: Square) -> u64 {
    match color {
        Color::White => WHITE_PAWN_ATTACKS[square.index()],
        Color::Black => BLACK_PAWN_ATTACKS[square.index()],
    }
}

const fn generate_pawn_attacks(direction: i8) -> [u64; 64] {
    let mut table = [0u64; 64];
    let mut sq = 0usize;

    while sq < 64 {
        let file = (sq % 8) as i8;
        let rank = (sq / 8) as i8 + direction;
        let mut attacks = 0u64;

        if rank >= 0 && rank <= 7 {
            if file > 0 {
                attacks |= 1u64 << ((rank as usize) * 8 + (file as usize) - 1);
            }
            if file < 7 {
                attacks |= 1u64 << ((rank as usize) * 8 + (file as usize) + 1);
            }
        }

        table[sq] = attacks;
        sq += 1;
    }

    table
}

#[cfg(test)]
mod tests {
    use super::pawn_attacks;
    use crate::game_state::chess_types::{Color, Square};

    fn sq(name: &str) -> Square {
        name.parse().expect("square should parse")
    }

    #[test]
    fn pawn_attacks_point_forward() {
        let white = pawn_attacks(Color::White, sq("e4"));
        assert_eq!(white, sq("d5").bit() | sq("f5").bit());

        let black = pawn_attacks(Color::Black, sq("e4"));
        assert_eq!(black, sq("d3").bit() | sq("f3").bit());
    }

    #[test]
    fn edge_pawns_attack_one_square() {
        assert_eq!(pawn_attacks(Color::White, sq("a2")), sq("b3").bit());
        assert_eq!(pawn_attacks(Color::Black, sq("h7")), sq("g6").bit());
        assert_eq!(pawn_attacks(Color::White, sq("c8")), 0);
    }
}
