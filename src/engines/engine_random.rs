//! Easy strategy: weighted random move selection.
//!
//! Prefers captures, then checks, then falls back to any legal move. The RNG
//! is seeded so a given seed replays the same choices.

use rand::prelude::IndexedRandom;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::trace;

use crate::engines::engine_config::parse_option_value;
use crate::engines::engine_trait::Engine;
use crate::game_state::chess_errors::{ChessError, ChessResult};
use crate::game_state::{chess_types::Move, game_state::GameState};
use crate::move_generation::legal_move_apply::{apply_move_unchecked, is_capture};
use crate::move_generation::legal_move_generator::{generate_legal_moves, in_check};

const CAPTURE_PREFERENCE: f64 = 0.7;
const CHECK_PREFERENCE: f64 = 0.5;

pub struct RandomEngine {
    seed: u64,
    rng: Option<StdRng>,
}

impl RandomEngine {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Some(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Engine for RandomEngine {
    fn name(&self) -> &str {
        "Easy Bot"
    }

    fn set_option(&mut self, name: &str, value: &str) -> ChessResult<()> {
        if name.eq_ignore_ascii_case("Seed") {
            let seed = parse_option_value::<u64>(name, value)?;
            self.seed = seed;
            if self.rng.is_some() {
                self.rng = Some(StdRng::seed_from_u64(seed));
            }
            return Ok(());
        }
        Err(ChessError::InvalidOption(format!(
            "{} does not support option {name:?}",
            self.name()
        )))
    }

    fn select_move(&mut self, game_state: &GameState) -> ChessResult<Move> {
        let rng = self.rng.as_mut().ok_or(ChessError::EngineClosed)?;

        let legal_moves = generate_legal_moves(game_state);
        if legal_moves.is_empty() {
            return Err(ChessError::NoLegalMoves);
        }

        let captures: Vec<Move> = legal_moves
            .iter()
            .copied()
            .filter(|&mv| is_capture(game_state, mv))
            .collect();
        let checks: Vec<Move> = legal_moves
            .iter()
            .copied()
            .filter(|&mv| gives_check(game_state, mv))
            .collect();
        trace!(
            legal = legal_moves.len(),
            captures = captures.len(),
            checks = checks.len(),
            "random candidates"
        );

        let pool = if rng.random::<f64>() < CAPTURE_PREFERENCE && !captures.is_empty() {
            &captures
        } else if rng.random::<f64>() < CHECK_PREFERENCE && !checks.is_empty() {
            &checks
        } else {
            &legal_moves
        };

        pool.as_slice()
            .choose(rng)
            .copied()
            .ok_or(ChessError::NoLegalMoves)
    }

    fn release(&mut self) {
        self.rng = None;
    }

    fn is_released(&self) -> bool {
        self.rng.is_none()
    }
}

fn gives_check(game_state: &GameState, mv: Move) -> bool {
    let mut next = game_state.clone();
    apply_move_unchecked(&mut next, mv);
    in_check(&next)
}
