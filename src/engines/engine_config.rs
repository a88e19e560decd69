//! Selector configuration with validated builders.
//!
//! The same validation backs both the builder methods and the string-keyed
//! `Engine::set_option` path, so a value accepted by one is accepted by the
//! other.

use std::time::Duration;

use crate::game_state::chess_errors::{ChessError, ChessResult};

pub const MAX_SEARCH_DEPTH: u8 = 20;
pub const DEFAULT_SEED: u64 = 0x7E12_C4E5_5EED_0001;
pub const DEFAULT_TT_SIZE_MB: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Overrides the per-difficulty default depth for searching strategies.
    pub search_depth: Option<u8>,
    pub time_limit: Option<Duration>,
    pub seed: u64,
    pub tt_size_mb: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            search_depth: None,
            time_limit: None,
            seed: DEFAULT_SEED,
            tt_size_mb: DEFAULT_TT_SIZE_MB,
        }
    }
}

impl EngineConfig {
    pub fn with_search_depth(mut self, depth: u8) -> ChessResult<Self> {
        self.search_depth = Some(validate_depth(depth)?);
        Ok(self)
    }

    pub fn with_time_limit(mut self, limit: Duration) -> ChessResult<Self> {
        self.time_limit = Some(validate_time_limit(limit)?);
        Ok(self)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_tt_size_mb(mut self, size_mb: usize) -> ChessResult<Self> {
        self.tt_size_mb = validate_tt_size(size_mb)?;
        Ok(self)
    }
}

pub(crate) fn validate_depth(depth: u8) -> ChessResult<u8> {
    if (1..=MAX_SEARCH_DEPTH).contains(&depth) {
        Ok(depth)
    } else {
        Err(ChessError::InvalidOption(format!(
            "search depth must be 1-{MAX_SEARCH_DEPTH}, got {depth}"
        )))
    }
}

pub(crate) fn validate_time_limit(limit: Duration) -> ChessResult<Duration> {
    if limit.is_zero() {
        Err(ChessError::InvalidOption("time limit must be positive".to_owned()))
    } else {
        Ok(limit)
    }
}

pub(crate) fn validate_tt_size(size_mb: usize) -> ChessResult<usize> {
    if size_mb == 0 {
        Err(ChessError::InvalidOption("hash size must be at least 1 MB".to_owned()))
    } else {
        Ok(size_mb)
    }
}

/// Parse a numeric option value, naming the option in the error.
pub(crate) fn parse_option_value<T: std::str::FromStr>(name: &str, value: &str) -> ChessResult<T> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| ChessError::InvalidOption(format!("invalid {name} value {value:?}")))
}
