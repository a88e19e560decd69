//! Core board state representation.
//!
//! `GameState` is the central model for the engine: a 64-entry mailbox of
//! pieces plus side to move, castling rights, en-passant target and clocks.
//! It is mutated in place only through `apply_move`; trial moves work
//! on a `clone()`, which is a full independent copy.

use crate::game_state::chess_errors::ChessResult;
use crate::game_state::chess_rules::STARTING_POSITION_FEN;
use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_apply::apply_move;
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_move_generator::generate_legal_moves;
use crate::utils::fen_generator::generate_fen;
use crate::utils::fen_parser::parse_fen;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    /// Indexed by `Square::index()`, `a1 == 0`.
    pub squares: [Option<Piece>; 64],

    pub side_to_move: Color,
    pub castling_rights: CastlingRights,
    pub en_passant_square: Option<Square>,

    /// Plies since the last capture or pawn move.
    pub halfmove_clock: u16,
    /// Starts at 1, incremented after each Black move.
    pub fullmove_number: u16,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            squares: [None; 64],
            side_to_move: Color::White,
            castling_rights: 0,
            en_passant_square: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }
}

impl GameState {
    /// An empty board with White to move and no rights.
    #[inline]
    pub fn new_empty() -> Self {
        Self::default()
    }

    /// The standard starting position.
    pub fn new_game() -> Self {
        let mut game_state = Self::new_empty();
        let back_rank = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];

        for (file, kind) in back_rank.into_iter().enumerate() {
            let file = file as i8;
            game_state.put(square(file, 0), Piece::new(Color::White, kind));
            game_state.put(square(file, 1), Piece::new(Color::White, PieceKind::Pawn));
            game_state.put(square(file, 6), Piece::new(Color::Black, PieceKind::Pawn));
            game_state.put(square(file, 7), Piece::new(Color::Black, kind));
        }
        game_state.castling_rights = CASTLE_ALL;

        debug_assert_eq!(generate_fen(&game_state), STARTING_POSITION_FEN);
        game_state
    }

    #[inline]
    pub fn from_fen(fen: &str) -> ChessResult<Self> {
        parse_fen(fen)
    }

    #[inline]
    pub fn get_fen(&self) -> String {
        generate_fen(self)
    }

    #[inline]
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.squares[square.index()]
    }

    #[inline]
    pub fn is_empty(&self, square: Square) -> bool {
        self.squares[square.index()].is_none()
    }

    /// Place a piece, replacing whatever stood on `square`.
    #[inline]
    pub fn put(&mut self, square: Square, piece: Piece) {
        self.squares[square.index()] = Some(piece);
    }

    /// Clear `square`, returning its previous content.
    #[inline]
    pub fn take(&mut self, square: Square) -> Option<Piece> {
        self.squares[square.index()].take()
    }

    /// Bitmask of every occupied square.
    pub fn occupancy(&self) -> u64 {
        self.squares
            .iter()
            .enumerate()
            .filter(|(_, piece)| piece.is_some())
            .fold(0u64, |acc, (idx, _)| acc | (1u64 << idx))
    }

    /// Bitmask of squares occupied by `color`.
    pub fn occupancy_of(&self, color: Color) -> u64 {
        self.squares
            .iter()
            .enumerate()
            .filter(|(_, piece)| matches!(piece, Some(p) if p.color == color))
            .fold(0u64, |acc, (idx, _)| acc | (1u64 << idx))
    }

    #[inline]
    pub fn has_castling_right(&self, right: CastlingRights) -> bool {
        self.castling_rights & right != 0
    }

    /// Square of `color`'s king, `None` on boards without one.
    pub fn king_square(&self, color: Color) -> Option<Square> {
        let king = Some(Piece::new(color, PieceKind::King));
        Square::all().find(|sq| self.squares[sq.index()] == king)
    }

    /// Squares holding pieces of `color`, a1 first.
    pub fn occupied_by(&self, color: Color) -> impl Iterator<Item = (Square, PieceKind)> + '_ {
        Square::all().filter_map(move |sq| match self.squares[sq.index()] {
            Some(piece) if piece.color == color => Some((sq, piece.kind)),
            _ => None,
        })
    }

    pub fn legal_moves(&self) -> Vec<Move> {
        generate_legal_moves(self)
    }

    /// True when the side to move has its king attacked.
    #[inline]
    pub fn in_check(&self) -> bool {
        is_king_in_check(self, self.side_to_move)
    }

    /// Validate and play `mv` in place. The board is untouched on error.
    #[inline]
    pub fn apply_move(&mut self, mv: Move) -> ChessResult<()> {
        apply_move(self, mv)
    }

    /// Copy of the board with `mv` played, leaving `self` unchanged.
    pub fn after_move(&self, mv: Move) -> ChessResult<GameState> {
        let mut next = self.clone();
        apply_move(&mut next, mv)?;
        Ok(next)
    }
}

#[inline]
fn square(file: i8, rank: i8) -> Square {
    match Square::new(file, rank) {
        Some(sq) => sq,
        None => unreachable!("start layout only uses on-board squares"),
    }
}

#[cfg(test)]
mod tests {
    use super::GameState;
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;
    use crate::game_state::chess_types::*;

    #[test]
    fn new_game_matches_starting_fen() {
        let game = GameState::new_game();
        let parsed = GameState::from_fen(STARTING_POSITION_FEN).expect("start FEN should parse");
        assert_eq!(game, parsed);
        assert_eq!(game.get_fen(), STARTING_POSITION_FEN);
    }

    #[test]
    fn piece_queries_on_start_position() {
        let game = GameState::new_game();
        assert_eq!(
            game.piece_at(Square::E1),
            Some(Piece::new(Color::White, PieceKind::King))
        );
        assert_eq!(
            game.piece_at(Square::D8),
            Some(Piece::new(Color::Black, PieceKind::Queen))
        );
        assert!(game.is_empty("e4".parse().expect("square should parse")));
        assert_eq!(game.king_square(Color::Black), Some(Square::E8));
        assert_eq!(game.occupied_by(Color::White).count(), 16);
    }

    #[test]
    fn after_move_leaves_source_untouched() {
        let game = GameState::new_game();
        let mv = "e2e4".parse().expect("move should parse");
        let next = game.after_move(mv).expect("e2e4 is legal");

        assert_eq!(game, GameState::new_game());
        assert_ne!(next, game);
        assert_eq!(next.side_to_move, Color::Black);
    }

    #[test]
    fn failed_apply_does_not_mutate() {
        let mut game = GameState::new_game();
        let before = game.clone();
        let err = game
            .apply_move("e2e5".parse().expect("move should parse"))
            .expect_err("triple pawn push is illegal");

        assert!(matches!(
            err,
            crate::game_state::chess_errors::ChessError::IllegalMove(_)
        ));
        assert_eq!(game, before);
    }
}
