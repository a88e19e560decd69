//! Pluggable board evaluation interfaces and the tiered scorer behind the
//! move selector's difficulty levels.
//!
//! Search remains modular by delegating static position scoring to the
//! `BoardScorer` trait. Scores are centipawns from the side to move's view.

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::game_status::is_insufficient_material;
use crate::move_generation::legal_move_checks::{attacked_square_count, is_square_attacked};

pub const MATE_SCORE: i32 = 30000;

pub trait BoardScorer: Send + Sync {
    /// Score from the perspective of the side to move.
    fn score(&self, game_state: &GameState) -> i32;
}

/// Evaluation terms switched on cumulatively: each tier adds to the one
/// before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EvalTier {
    Material,
    Positional,
    KingSafety,
}

/// Tunable weights, all in centipawns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvalWeights {
    /// Indexed by `PieceKind::index()`. Kings carry no material value.
    pub piece_values: [i32; 6],
    pub mobility_per_square: i32,
    pub missing_shield_pawn: i32,
    pub open_file_near_king: i32,
    pub attacked_king_zone_square: i32,
}

impl Default for EvalWeights {
    fn default() -> Self {
        Self {
            piece_values: [100, 300, 325, 500, 900, 0],
            mobility_per_square: 5,
            missing_shield_pawn: 30,
            open_file_near_king: 25,
            attacked_king_zone_square: 10,
        }
    }
}

impl EvalWeights {
    #[inline]
    pub fn piece_value(&self, kind: PieceKind) -> i32 {
        self.piece_values[kind.index()]
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MaterialScorer;

impl MaterialScorer {
    /// Material value used for move ordering and capture heuristics.
    #[inline]
    pub const fn piece_value(piece: PieceKind) -> i32 {
        match piece {
            PieceKind::Pawn => 100,
            PieceKind::Knight => 300,
            PieceKind::Bishop => 325,
            PieceKind::Rook => 500,
            PieceKind::Queen => 900,
            PieceKind::King => 0,
        }
    }
}

impl BoardScorer for MaterialScorer {
    fn score(&self, game_state: &GameState) -> i32 {
        let white_minus_black = material_balance(game_state, &EvalWeights::default());
        from_side_to_move(game_state, white_minus_black)
    }
}

/// Material plus whichever positional terms `tier` enables.
#[derive(Debug, Clone, Copy)]
pub struct TieredScorer {
    pub tier: EvalTier,
    pub weights: EvalWeights,
}

impl TieredScorer {
    pub fn new(tier: EvalTier) -> Self {
        Self {
            tier,
            weights: EvalWeights::default(),
        }
    }

    /// White-minus-Black score before the side-to-move flip.
    pub fn white_minus_black(&self, game_state: &GameState) -> i32 {
        if is_insufficient_material(game_state) {
            return 0;
        }

        let mut score = material_balance(game_state, &self.weights);

        if self.tier >= EvalTier::Positional {
            score += piece_square_balance(game_state);
            let mobility = attacked_square_count(game_state, Color::White) as i32
                - attacked_square_count(game_state, Color::Black) as i32;
            score += mobility * self.weights.mobility_per_square;
        }

        if self.tier >= EvalTier::KingSafety {
            score += king_safety(game_state, Color::White, &self.weights)
                - king_safety(game_state, Color::Black, &self.weights);
        }

        score
    }
}

impl BoardScorer for TieredScorer {
    fn score(&self, game_state: &GameState) -> i32 {
        from_side_to_move(game_state, self.white_minus_black(game_state))
    }
}

#[inline]
fn from_side_to_move(game_state: &GameState, white_minus_black: i32) -> i32 {
    match game_state.side_to_move {
        Color::White => white_minus_black,
        Color::Black => -white_minus_black,
    }
}

fn material_balance(game_state: &GameState, weights: &EvalWeights) -> i32 {
    Square::all()
        .filter_map(|sq| game_state.piece_at(sq))
        .map(|piece| match piece.color {
            Color::White => weights.piece_value(piece.kind),
            Color::Black => -weights.piece_value(piece.kind),
        })
        .sum()
}

// Piece-square tables from White's point of view, a1 first. Black pieces
// read them through `Square::flipped`.

#[rustfmt::skip]
const PAWN_TABLE: [i32; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
     0,  0,  0,  0,  0,  0,  0,  0,
    10, 10, 20, 30, 30, 20, 10, 10,
    15, 15, 20, 35, 35, 20, 15, 15,
    20, 20, 30, 40, 40, 30, 20, 20,
    30, 30, 40, 50, 50, 40, 30, 30,
    50, 50, 60, 70, 70, 60, 50, 50,
     0,  0,  0,  0,  0,  0,  0,  0,
];

#[rustfmt::skip]
const KNIGHT_TABLE: [i32; 64] = [
    -50, -40, -30, -30, -30, -30, -40, -50,
    -40, -20,   0,   0,   0,   0, -20, -40,
    -30,   0,  10,  15,  15,  10,   0, -30,
    -30,   5,  15,  20,  20,  15,   5, -30,
    -30,   0,  15,  20,  20,  15,   0, -30,
    -30,   5,  10,  15,  15,  10,   5, -30,
    -40, -20,   0,   5,   5,   0, -20, -40,
    -50, -40, -30, -30, -30, -30, -40, -50,
];

#[rustfmt::skip]
const BISHOP_TABLE: [i32; 64] = [
    -20, -10, -10, -10, -10, -10, -10, -20,
    -10,   0,   0,   0,   0,   0,   0, -10,
    -10,   0,   5,  10,  10,   5,   0, -10,
    -10,   5,   5,  10,  10,   5,   5, -10,
    -10,   0,  10,  10,  10,  10,   0, -10,
    -10,  10,  10,  10,  10,  10,  10, -10,
    -10,   5,   0,   0,   0,   0,   5, -10,
    -20, -10, -10, -10, -10, -10, -10, -20,
];

#[rustfmt::skip]
const ROOK_TABLE: [i32; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
     5, 10, 10, 10, 10, 10, 10,  5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    25, 25, 25, 25, 25, 25, 25, 25,
     0,  0,  0,  0,  0,  0,  0,  0,
];

#[rustfmt::skip]
const KING_ENDGAME_TABLE: [i32; 64] = [
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -20,   0,   0, -20, -40, -30,
    -30, -30,   0,  20,  20,   0, -30, -30,
    -30, -30,   0,  20,  20,   0, -30, -30,
    -30, -40, -20,   0,   0, -20, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
];

#[inline]
fn piece_square_bonus(piece: Piece, square: Square) -> i32 {
    let index = match piece.color {
        Color::White => square.index(),
        Color::Black => square.flipped().index(),
    };
    match piece.kind {
        PieceKind::Pawn => PAWN_TABLE[index],
        PieceKind::Knight => KNIGHT_TABLE[index],
        PieceKind::Bishop => BISHOP_TABLE[index],
        PieceKind::Rook => ROOK_TABLE[index],
        PieceKind::Queen => 0,
        PieceKind::King => KING_ENDGAME_TABLE[index],
    }
}

fn piece_square_balance(game_state: &GameState) -> i32 {
    Square::all()
        .filter_map(|sq| game_state.piece_at(sq).map(|piece| (sq, piece)))
        .map(|(sq, piece)| match piece.color {
            Color::White => piece_square_bonus(piece, sq),
            Color::Black => -piece_square_bonus(piece, sq),
        })
        .sum()
}

/// Penalty (as a non-positive score) for `color`'s king: missing shield
/// pawns, pawnless files beside it, and enemy-attacked squares around it.
fn king_safety(game_state: &GameState, color: Color, weights: &EvalWeights) -> i32 {
    let Some(king_sq) = game_state.king_square(color) else {
        return 0;
    };
    let own_pawn = Some(Piece::new(color, PieceKind::Pawn));
    let mut penalty = 0;

    for file_delta in -1..=1i8 {
        let Some(file_sq) = king_sq.offset(file_delta, 0) else {
            continue;
        };

        let shielded = king_sq
            .offset(file_delta, color.pawn_direction())
            .is_some_and(|sq| game_state.piece_at(sq) == own_pawn);
        if !shielded {
            penalty += weights.missing_shield_pawn;
        }

        let file_has_pawn = (0..8i8)
            .filter_map(|rank| Square::new(file_sq.file() as i8, rank))
            .any(|sq| matches!(game_state.piece_at(sq), Some(p) if p.kind == PieceKind::Pawn));
        if !file_has_pawn {
            penalty += weights.open_file_near_king;
        }
    }

    let enemy = color.opposite();
    for rank_delta in -1..=1i8 {
        for file_delta in -1..=1i8 {
            if let Some(sq) = king_sq.offset(file_delta, rank_delta) {
                if is_square_attacked(game_state, sq, enemy) {
                    penalty += weights.attacked_king_zone_square;
                }
            }
        }
    }

    -penalty
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(fen: &str) -> GameState {
        GameState::from_fen(fen).expect("FEN should parse")
    }

    #[test]
    fn start_position_is_balanced_at_every_tier() {
        let start = GameState::new_game();
        assert_eq!(MaterialScorer.score(&start), 0);
        for tier in [EvalTier::Material, EvalTier::Positional, EvalTier::KingSafety] {
            assert_eq!(TieredScorer::new(tier).score(&start), 0, "{tier:?}");
        }
    }

    #[test]
    fn extra_queen_scores_for_its_owner() {
        let white_to_move = game("3qk3/8/8/8/8/8/8/3QK2Q w - - 0 1");
        let black_to_move = game("3qk3/8/8/8/8/8/8/3QK2Q b - - 0 1");
        assert_eq!(MaterialScorer.score(&white_to_move), 900);
        assert_eq!(MaterialScorer.score(&black_to_move), -900);

        let scorer = TieredScorer::new(EvalTier::KingSafety);
        assert!(scorer.score(&white_to_move) > 500);
        assert_eq!(scorer.score(&white_to_move), -scorer.score(&black_to_move));
    }

    #[test]
    fn central_knight_beats_rim_knight() {
        let scorer = TieredScorer::new(EvalTier::Positional);
        let central = game("4k3/8/8/8/3N4/8/8/4K3 w - - 0 1");
        let rim = game("4k3/8/8/8/N7/8/8/4K3 w - - 0 1");
        assert!(scorer.score(&central) > scorer.score(&rim));
        assert_eq!(MaterialScorer.score(&central), MaterialScorer.score(&rim));
    }

    #[test]
    fn king_shield_matters_only_at_king_safety_tier() {
        let sheltered = game("6k1/8/8/8/8/8/5PPP/6K1 w - - 0 1");
        let exposed = game("6k1/8/8/8/8/5PPP/8/6K1 w - - 0 1");

        let hard = TieredScorer::new(EvalTier::KingSafety);
        let white_sheltered = king_safety(&sheltered, Color::White, &hard.weights);
        let white_exposed = king_safety(&exposed, Color::White, &hard.weights);
        assert_eq!(white_sheltered, 0);
        assert_eq!(white_exposed, -3 * hard.weights.missing_shield_pawn);
    }

    #[test]
    fn bare_kings_score_zero() {
        let bare = game("4k3/8/8/8/8/8/8/K7 w - - 0 1");
        assert_eq!(TieredScorer::new(EvalTier::KingSafety).score(&bare), 0);
    }
}
