//! Crate root module declarations for the terminal chess engine core.
//!
//! Exposes the position model, the rules engine, notation conversion (FEN,
//! SAN, coordinate text, PGN) and the difficulty-tiered move selector so the
//! terminal front end, binaries and benchmarks can import stable module paths.

pub mod game_state {
    pub mod chess_errors;
    pub mod chess_rules;
    pub mod chess_types;
    pub mod game_state;
}

pub mod moves {
    pub mod king_moves;
    pub mod knight_moves;
    pub mod pawn_moves;
    pub mod sliding_moves;
}

pub mod move_generation {
    pub mod game_status;
    pub mod legal_move_apply;
    pub mod legal_move_checks;
    pub mod legal_move_generator;
    pub mod legal_move_shared;
    pub mod legal_moves_king;
    pub mod legal_moves_knight;
    pub mod legal_moves_pawn;
    pub mod legal_moves_sliders;
    pub mod perft;
}

pub mod search {
    pub mod board_scoring;
    pub mod iterative_deepening;
    pub mod transposition_table;
    pub mod zobrist;
}

pub mod engines {
    pub mod engine_config;
    pub mod engine_minimax;
    pub mod engine_random;
    pub mod engine_trait;
    pub mod move_selector;
    pub mod selector_worker;
}

pub mod utils {
    pub mod algebraic;
    pub mod fen_generator;
    pub mod fen_parser;
    pub mod long_algebraic;
    pub mod pgn;
    pub mod san;
}

pub use engines::engine_trait::{Difficulty, Engine};
pub use engines::move_selector::MoveSelector;
pub use engines::selector_worker::{SelectionEvent, SelectorWorker};
pub use game_state::chess_errors::{ChessError, ChessResult};
pub use game_state::chess_types::{Color, Move, Piece, PieceKind, Square};
pub use game_state::game_state::GameState;
