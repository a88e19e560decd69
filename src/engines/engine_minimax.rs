//! Medium and Hard strategies: iterative deepening alpha-beta search.
//!
//! The transposition table is the session resource. It is cleared before
//! every selection so the chosen move depends only on the position and the
//! configuration, never on earlier requests.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::engines::engine_config::{
    parse_option_value, validate_depth, validate_time_limit, validate_tt_size, EngineConfig,
};
use crate::engines::engine_trait::{Difficulty, Engine};
use crate::game_state::chess_errors::{ChessError, ChessResult};
use crate::game_state::{chess_types::Move, game_state::GameState};
use crate::move_generation::legal_move_generator::has_legal_moves;
use crate::search::board_scoring::{EvalTier, TieredScorer};
use crate::search::iterative_deepening::{iterative_deepening_search_with_stop, SearchConfig};
use crate::search::transposition_table::TranspositionTable;

pub struct MinimaxEngine {
    name: &'static str,
    scorer: TieredScorer,
    search: SearchConfig,
    tt_size_mb: usize,
    tt: Option<TranspositionTable>,
    stop: Option<Arc<AtomicBool>>,
}

impl MinimaxEngine {
    pub fn new(tier: EvalTier, search: SearchConfig, tt_size_mb: usize) -> Self {
        let name = match tier {
            EvalTier::Material => "Material Bot",
            EvalTier::Positional => "Medium Bot",
            EvalTier::KingSafety => "Hard Bot",
        };
        let tt_size_mb = tt_size_mb.max(1);
        Self {
            name,
            scorer: TieredScorer::new(tier),
            search,
            tt_size_mb,
            tt: Some(TranspositionTable::new_with_mb(tt_size_mb)),
            stop: None,
        }
    }

    /// Strategy for `difficulty` with depth and time taken from `config`.
    pub fn for_difficulty(difficulty: Difficulty, config: &EngineConfig) -> Self {
        let search = SearchConfig {
            max_depth: config
                .search_depth
                .unwrap_or_else(|| difficulty.default_depth())
                .max(1),
            time_limit: config.time_limit,
        };
        Self::new(difficulty.eval_tier(), search, config.tt_size_mb)
    }

    pub fn search_config(&self) -> SearchConfig {
        self.search
    }

    pub fn tier(&self) -> EvalTier {
        self.scorer.tier
    }
}

impl Engine for MinimaxEngine {
    fn name(&self) -> &str {
        self.name
    }

    fn set_option(&mut self, name: &str, value: &str) -> ChessResult<()> {
        if name.eq_ignore_ascii_case("Depth") {
            self.search.max_depth = validate_depth(parse_option_value(name, value)?)?;
            return Ok(());
        }
        if name.eq_ignore_ascii_case("MoveTime") {
            let millis = parse_option_value::<u64>(name, value)?;
            self.search.time_limit = Some(validate_time_limit(Duration::from_millis(millis))?);
            return Ok(());
        }
        if name.eq_ignore_ascii_case("Hash") {
            self.tt_size_mb = validate_tt_size(parse_option_value(name, value)?)?;
            if self.tt.is_some() {
                self.tt = Some(TranspositionTable::new_with_mb(self.tt_size_mb));
            }
            return Ok(());
        }
        Err(ChessError::InvalidOption(format!(
            "{} does not support option {name:?}",
            self.name
        )))
    }

    fn select_move(&mut self, game_state: &GameState) -> ChessResult<Move> {
        let tt = self.tt.as_mut().ok_or(ChessError::EngineClosed)?;
        if !has_legal_moves(game_state) {
            return Err(ChessError::NoLegalMoves);
        }

        tt.clear();
        let result = iterative_deepening_search_with_stop(
            game_state,
            &self.scorer,
            tt,
            self.search,
            self.stop.as_deref(),
        );
        debug!(
            engine = self.name,
            depth = result.reached_depth,
            score = result.best_score,
            nodes = result.nodes,
            best = ?result.best_move.map(|mv| mv.to_string()),
            "search finished"
        );

        result.best_move.ok_or(ChessError::NoLegalMoves)
    }

    fn attach_stop_signal(&mut self, stop: Arc<AtomicBool>) {
        self.stop = Some(stop);
    }

    fn release(&mut self) {
        self.tt = None;
    }

    fn is_released(&self) -> bool {
        self.tt.is_none()
    }
}
