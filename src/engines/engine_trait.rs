//! Engine abstraction layer used by the move selector.
//!
//! Each difficulty is served by a strategy behind the `Engine` trait so the
//! selector can swap or inject strategies without caring how they pick.

use std::fmt;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use crate::game_state::chess_errors::{ChessError, ChessResult};
use crate::game_state::{chess_types::Move, game_state::GameState};
use crate::search::board_scoring::EvalTier;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Difficulty::Easy => 0,
            Difficulty::Medium => 1,
            Difficulty::Hard => 2,
        }
    }

    /// Search depth in plies when no explicit depth is configured.
    /// Easy does not search.
    pub const fn default_depth(self) -> u8 {
        match self {
            Difficulty::Easy => 0,
            Difficulty::Medium => 3,
            Difficulty::Hard => 4,
        }
    }

    pub const fn eval_tier(self) -> EvalTier {
        match self {
            Difficulty::Easy => EvalTier::Material,
            Difficulty::Medium => EvalTier::Positional,
            Difficulty::Hard => EvalTier::KingSafety,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        };
        f.write_str(name)
    }
}

pub trait Engine: Send {
    fn name(&self) -> &str;

    /// String-keyed tuning. Unknown keys are rejected.
    fn set_option(&mut self, name: &str, _value: &str) -> ChessResult<()> {
        Err(ChessError::InvalidOption(format!(
            "{} does not support option {name:?}",
            self.name()
        )))
    }

    /// Pick a legal move for the side to move.
    ///
    /// Fails with `NoLegalMoves` in terminal positions and with
    /// `EngineClosed` once `release` has run.
    fn select_move(&mut self, game_state: &GameState) -> ChessResult<Move>;

    /// Share a flag that, once raised, asks a running selection to finish
    /// early. Strategies that answer instantly ignore it.
    fn attach_stop_signal(&mut self, _stop: Arc<AtomicBool>) {}

    /// Free the session resource. Safe to call more than once.
    fn release(&mut self);

    fn is_released(&self) -> bool;
}
