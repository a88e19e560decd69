//! Difficulty-tiered move selection.
//!
//! `MoveSelector` routes each request to the strategy for its difficulty.
//! Strategies are built on first use from the selector's `EngineConfig`
//! unless one was injected with `with_strategy`. Every move handed back is
//! checked against the legal move list before it leaves the selector.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use tracing::{debug, info};

use crate::engines::engine_config::EngineConfig;
use crate::engines::engine_minimax::MinimaxEngine;
use crate::engines::engine_random::RandomEngine;
use crate::engines::engine_trait::{Difficulty, Engine};
use crate::game_state::chess_errors::{ChessError, ChessResult};
use crate::game_state::{chess_types::Move, game_state::GameState};
use crate::move_generation::legal_move_generator::generate_legal_moves;

pub struct MoveSelector {
    config: EngineConfig,
    strategies: [Option<Box<dyn Engine>>; 3],
    stop: Option<Arc<AtomicBool>>,
    released: bool,
}

impl MoveSelector {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            strategies: [None, None, None],
            stop: None,
            released: false,
        }
    }

    /// Serve `difficulty` with `engine` instead of the built-in strategy.
    pub fn with_strategy(mut self, difficulty: Difficulty, mut engine: Box<dyn Engine>) -> Self {
        if let Some(stop) = &self.stop {
            engine.attach_stop_signal(Arc::clone(stop));
        }
        self.strategies[difficulty.index()] = Some(engine);
        self
    }

    /// Share `stop` with every strategy, present and future. Raising it
    /// makes an in-flight search return early.
    pub fn with_stop_signal(mut self, stop: Arc<AtomicBool>) -> Self {
        for engine in self.strategies.iter_mut().flatten() {
            engine.attach_stop_signal(Arc::clone(&stop));
        }
        self.stop = Some(stop);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Forward a tuning option to the strategy serving `difficulty`.
    pub fn set_option(
        &mut self,
        difficulty: Difficulty,
        name: &str,
        value: &str,
    ) -> ChessResult<()> {
        self.strategy(difficulty)?.set_option(name, value)
    }

    /// Choose a legal move for the side to move at `difficulty`.
    pub fn select_move(
        &mut self,
        game_state: &GameState,
        difficulty: Difficulty,
    ) -> ChessResult<Move> {
        if self.released {
            return Err(ChessError::EngineClosed);
        }

        let legal_moves = generate_legal_moves(game_state);
        if legal_moves.is_empty() {
            return Err(ChessError::NoLegalMoves);
        }

        let engine = self.strategy(difficulty)?;
        let picked = engine.select_move(game_state)?;
        if !legal_moves.contains(&picked) {
            debug!(engine = engine.name(), %picked, "strategy returned an illegal move");
            return Err(ChessError::IllegalMove(picked.to_string()));
        }
        Ok(picked)
    }

    /// Release every strategy. Later requests fail with `EngineClosed`.
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        for engine in self.strategies.iter_mut().flatten() {
            engine.release();
        }
        self.released = true;
        info!("move selector released");
    }

    fn strategy(&mut self, difficulty: Difficulty) -> ChessResult<&mut Box<dyn Engine>> {
        if self.released {
            return Err(ChessError::EngineClosed);
        }
        let config = self.config;
        let stop = self.stop.clone();
        let slot = &mut self.strategies[difficulty.index()];
        Ok(slot.get_or_insert_with(|| {
            let mut engine = build_strategy(difficulty, &config);
            if let Some(stop) = stop {
                engine.attach_stop_signal(stop);
            }
            engine
        }))
    }
}

impl Default for MoveSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for MoveSelector {
    fn drop(&mut self) {
        self.release();
    }
}

fn build_strategy(difficulty: Difficulty, config: &EngineConfig) -> Box<dyn Engine> {
    match difficulty {
        Difficulty::Easy => Box::new(RandomEngine::new(config.seed)),
        Difficulty::Medium | Difficulty::Hard => {
            Box::new(MinimaxEngine::for_difficulty(difficulty, config))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use super::*;

    fn quick_selector() -> MoveSelector {
        MoveSelector::with_config(
            EngineConfig::default()
                .with_search_depth(2)
                .expect("depth 2 should be accepted"),
        )
    }

    struct FirstMoveEngine {
        released: Arc<AtomicBool>,
    }

    impl Engine for FirstMoveEngine {
        fn name(&self) -> &str {
            "First Move"
        }

        fn select_move(&mut self, game_state: &GameState) -> ChessResult<Move> {
            generate_legal_moves(game_state)
                .first()
                .copied()
                .ok_or(ChessError::NoLegalMoves)
        }

        fn release(&mut self) {
            self.released.store(true, Ordering::SeqCst);
        }

        fn is_released(&self) -> bool {
            self.released.load(Ordering::SeqCst)
        }
    }

    struct CheatingEngine;

    impl Engine for CheatingEngine {
        fn name(&self) -> &str {
            "Cheater"
        }

        fn select_move(&mut self, _game_state: &GameState) -> ChessResult<Move> {
            "e1e8".parse()
        }

        fn release(&mut self) {}

        fn is_released(&self) -> bool {
            false
        }
    }

    #[test]
    fn every_difficulty_returns_a_legal_move() {
        let game = GameState::from_fen(
            "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3",
        )
        .expect("FEN should parse");
        let legal = generate_legal_moves(&game);
        let mut selector = quick_selector();
        for difficulty in Difficulty::ALL {
            let picked = selector
                .select_move(&game, difficulty)
                .expect("position has moves");
            assert!(legal.contains(&picked), "{difficulty} picked {picked}");
        }
    }

    #[test]
    fn selection_is_deterministic_for_fixed_seed() {
        let game = GameState::new_game();
        let mut a = quick_selector();
        let mut b = quick_selector();
        for difficulty in Difficulty::ALL {
            assert_eq!(
                a.select_move(&game, difficulty),
                b.select_move(&game, difficulty)
            );
        }
    }

    #[test]
    fn terminal_positions_report_no_legal_moves() {
        let mated = GameState::from_fen("7k/6Q1/6K1/8/8/8/8/8 b - - 0 1")
            .expect("FEN should parse");
        let mut selector = quick_selector();
        for difficulty in Difficulty::ALL {
            assert_eq!(
                selector.select_move(&mated, difficulty),
                Err(ChessError::NoLegalMoves)
            );
        }
    }

    #[test]
    fn release_closes_selector_and_is_idempotent() {
        let game = GameState::new_game();
        let released = Arc::new(AtomicBool::new(false));
        let mut selector = quick_selector().with_strategy(
            Difficulty::Easy,
            Box::new(FirstMoveEngine {
                released: Arc::clone(&released),
            }),
        );
        selector
            .select_move(&game, Difficulty::Easy)
            .expect("start position has moves");

        selector.release();
        selector.release();
        assert!(selector.is_released());
        assert!(released.load(Ordering::SeqCst));
        for difficulty in Difficulty::ALL {
            assert_eq!(
                selector.select_move(&game, difficulty),
                Err(ChessError::EngineClosed)
            );
        }
        assert_eq!(
            selector.set_option(Difficulty::Medium, "Depth", "2"),
            Err(ChessError::EngineClosed)
        );
    }

    #[test]
    fn dropping_selector_releases_injected_strategy() {
        let released = Arc::new(AtomicBool::new(false));
        let selector = MoveSelector::new().with_strategy(
            Difficulty::Hard,
            Box::new(FirstMoveEngine {
                released: Arc::clone(&released),
            }),
        );
        drop(selector);
        assert!(released.load(Ordering::SeqCst));
    }

    #[test]
    fn injected_strategy_is_used() {
        let game = GameState::new_game();
        let mut selector = MoveSelector::new().with_strategy(
            Difficulty::Hard,
            Box::new(FirstMoveEngine {
                released: Arc::new(AtomicBool::new(false)),
            }),
        );
        assert_eq!(
            selector.select_move(&game, Difficulty::Hard),
            Ok(generate_legal_moves(&game)[0])
        );
    }

    #[test]
    fn illegal_strategy_output_is_rejected() {
        let game = GameState::new_game();
        let mut selector =
            MoveSelector::new().with_strategy(Difficulty::Easy, Box::new(CheatingEngine));
        assert_eq!(
            selector.select_move(&game, Difficulty::Easy),
            Err(ChessError::IllegalMove("e1e8".to_owned()))
        );
    }

    #[test]
    fn options_reach_the_strategy() {
        let mut selector = quick_selector();
        selector
            .set_option(Difficulty::Easy, "Seed", "11")
            .expect("Easy accepts Seed");
        selector
            .set_option(Difficulty::Hard, "Depth", "1")
            .expect("Hard accepts Depth");
        assert!(matches!(
            selector.set_option(Difficulty::Medium, "Seed", "11"),
            Err(ChessError::InvalidOption(_))
        ));
    }
}
