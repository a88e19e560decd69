//! Coordinate move text (`e2e4`, `a7a8q`) resolved against a position.
//!
//! `Move` already implements `Display`/`FromStr` for the bare text; this
//! module adds the board-aware direction: text must name a legal move.

use crate::game_state::chess_errors::{ChessError, ChessResult};
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_generator::generate_legal_moves;

/// Resolve coordinate text to a legal move of `game_state`.
///
/// A promotion move written without its piece letter is ambiguous rather
/// than silently promoted to a queen.
pub fn parse_coordinate_move(game_state: &GameState, text: &str) -> ChessResult<Move> {
    let requested: Move = text.trim().parse()?;
    let legal = generate_legal_moves(game_state);

    if legal.contains(&requested) {
        return Ok(requested);
    }

    let promotions = legal
        .iter()
        .filter(|mv| mv.from == requested.from && mv.to == requested.to)
        .count();
    if requested.promotion.is_none() && promotions > 1 {
        return Err(ChessError::AmbiguousMove(text.to_owned()));
    }

    Err(ChessError::NoSuchMove(text.to_owned()))
}

/// Coordinate text for `mv`, which must be legal in `game_state`.
pub fn move_to_coordinate(game_state: &GameState, mv: Move) -> ChessResult<String> {
    if !generate_legal_moves(game_state).contains(&mv) {
        return Err(ChessError::IllegalMove(mv.to_string()));
    }
    Ok(mv.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_legal_coordinate_text() {
        let game = GameState::new_game();
        let mv = parse_coordinate_move(&game, "g1f3").expect("Nf3 should resolve");
        assert_eq!(mv.to_string(), "g1f3");
        assert_eq!(
            move_to_coordinate(&game, mv).expect("legal move should format"),
            "g1f3"
        );
    }

    #[test]
    fn rejects_bad_and_illegal_text() {
        let game = GameState::new_game();
        assert!(matches!(
            parse_coordinate_move(&game, "e2e9"),
            Err(ChessError::MalformedMove(_))
        ));
        assert_eq!(
            parse_coordinate_move(&game, "e2e5"),
            Err(ChessError::NoSuchMove("e2e5".to_owned()))
        );
        assert!(matches!(
            move_to_coordinate(&game, "e7e5".parse().expect("move should parse")),
            Err(ChessError::IllegalMove(_))
        ));
    }

    #[test]
    fn promotion_needs_a_piece_letter() {
        let game = GameState::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1")
            .expect("FEN should parse");
        assert_eq!(
            parse_coordinate_move(&game, "a7a8"),
            Err(ChessError::AmbiguousMove("a7a8".to_owned()))
        );
        let mv = parse_coordinate_move(&game, "a7a8r").expect("rook promotion should resolve");
        assert_eq!(mv.promotion, Some(PieceKind::Rook));
    }
}
