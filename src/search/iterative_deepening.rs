//! Iterative deepening search with negamax alpha-beta pruning.
//!
//! Each iteration reuses the transposition table filled by the previous one,
//! so the last best move is searched first. An optional deadline stops the
//! search between nodes; the result of the last completed depth is kept.

use std::cmp::Reverse;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_apply::{apply_move_unchecked, captured_piece};
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_move_generator::generate_legal_moves;
use crate::search::board_scoring::{BoardScorer, MaterialScorer, MATE_SCORE};
use crate::search::transposition_table::{Bound, TTEntry, TranspositionTable};
use crate::search::zobrist::compute_zobrist_key;

/// Scores beyond this are mate scores and carry a ply distance.
const MATE_THRESHOLD: i32 = MATE_SCORE - 1000;
const MAX_QUIESCENCE_PLIES: u8 = 4;
const DEADLINE_CHECK_INTERVAL: u64 = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    pub max_depth: u8,
    pub time_limit: Option<Duration>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: 4,
            time_limit: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SearchResult {
    pub best_move: Option<Move>,
    pub best_score: i32,
    pub reached_depth: u8,
    pub nodes: u64,
}

pub fn iterative_deepening_search<S: BoardScorer>(
    game_state: &GameState,
    scorer: &S,
    tt: &mut TranspositionTable,
    config: SearchConfig,
) -> SearchResult {
    iterative_deepening_search_with_stop(game_state, scorer, tt, config, None)
}

/// As `iterative_deepening_search`, but also aborts once `stop` is raised.
/// The depth-1 result is still returned so the caller gets a legal move.
pub fn iterative_deepening_search_with_stop<S: BoardScorer>(
    game_state: &GameState,
    scorer: &S,
    tt: &mut TranspositionTable,
    config: SearchConfig,
    stop: Option<&AtomicBool>,
) -> SearchResult {
    if config.max_depth == 0 {
        return SearchResult {
            best_move: None,
            best_score: scorer.score(game_state),
            reached_depth: 0,
            nodes: 1,
        };
    }

    let mut searcher = Searcher {
        scorer,
        tt,
        deadline: config.time_limit.map(|limit| Instant::now() + limit),
        stop,
        nodes: 0,
        next_deadline_check: DEADLINE_CHECK_INTERVAL,
        aborted: false,
    };
    let mut result = SearchResult::default();

    for depth in 1..=config.max_depth {
        searcher.tt.new_generation();
        let (best_move, best_score) = searcher.negamax_root(game_state, depth);

        // Depth 1 always completes; deeper partial iterations are discarded.
        if searcher.aborted && depth > 1 {
            debug!(depth, nodes = searcher.nodes, "search deadline hit");
            break;
        }

        result.best_move = best_move;
        result.best_score = best_score;
        result.reached_depth = depth;
        result.nodes = searcher.nodes;

        debug!(
            depth,
            score = best_score,
            nodes = searcher.nodes,
            best = ?best_move.map(|mv| mv.to_string()),
            "search depth complete"
        );

        if best_score.abs() >= MATE_THRESHOLD {
            break;
        }
    }

    result
}

/// Order `moves` for search: hash move, promotions, captures by
/// most-valuable-victim / least-valuable-attacker, then quiet moves.
pub fn order_moves(game_state: &GameState, moves: &mut [Move], hash_move: Option<Move>) {
    moves.sort_by_key(|&mv| Reverse(move_order_score(game_state, mv, hash_move)));
}

fn move_order_score(game_state: &GameState, mv: Move, hash_move: Option<Move>) -> i32 {
    if Some(mv) == hash_move {
        return 1_000_000;
    }
    let mut score = 0;
    if let Some(kind) = mv.promotion {
        score += 500_000 + MaterialScorer::piece_value(kind);
    }
    if let Some(victim) = captured_piece(game_state, mv) {
        let attacker = game_state
            .piece_at(mv.from)
            .map_or(0, |piece| MaterialScorer::piece_value(piece.kind));
        score += 100_000 + MaterialScorer::piece_value(victim) * 10 - attacker;
    }
    score
}

struct Searcher<'a, S: BoardScorer> {
    scorer: &'a S,
    tt: &'a mut TranspositionTable,
    deadline: Option<Instant>,
    stop: Option<&'a AtomicBool>,
    nodes: u64,
    next_deadline_check: u64,
    aborted: bool,
}

impl<S: BoardScorer> Searcher<'_, S> {
    fn negamax_root(&mut self, game_state: &GameState, depth: u8) -> (Option<Move>, i32) {
        let mut moves = generate_legal_moves(game_state);
        if moves.is_empty() {
            self.nodes += 1;
            return (None, terminal_score(game_state, 0));
        }

        let key = compute_zobrist_key(game_state);
        let hash_move = self.tt.probe(key).and_then(|entry| entry.best_move);
        order_moves(game_state, &mut moves, hash_move);

        let mut alpha = -MATE_SCORE;
        let beta = MATE_SCORE;
        let mut best_move = None;
        let mut best_score = -MATE_SCORE;

        for mv in moves {
            let mut next = game_state.clone();
            apply_move_unchecked(&mut next, mv);
            let score = -self.negamax(&next, depth - 1, -beta, -alpha, 1);

            if self.aborted && depth > 1 {
                break;
            }
            if score > best_score || best_move.is_none() {
                best_score = score;
                best_move = Some(mv);
            }
            if score > alpha {
                alpha = score;
            }
        }

        if !self.aborted {
            self.tt.store(TTEntry {
                key,
                depth,
                score: best_score,
                bound: Bound::Exact,
                best_move,
            });
        }

        (best_move, best_score)
    }

    fn negamax(
        &mut self,
        game_state: &GameState,
        depth: u8,
        mut alpha: i32,
        mut beta: i32,
        ply: u8,
    ) -> i32 {
        self.nodes += 1;
        if self.out_of_time() {
            return 0;
        }

        let key = compute_zobrist_key(game_state);
        let alpha_orig = alpha;
        let mut hash_move = None;

        if let Some(entry) = self.tt.probe(key) {
            hash_move = entry.best_move;
            if entry.depth >= depth {
                let score = score_from_tt(entry.score, ply);
                match entry.bound {
                    Bound::Exact => return score,
                    Bound::Lower => alpha = alpha.max(score),
                    Bound::Upper => beta = beta.min(score),
                }
                if alpha >= beta {
                    return score;
                }
            }
        }

        let mut moves = generate_legal_moves(game_state);
        if moves.is_empty() {
            return terminal_score(game_state, ply);
        }

        if depth == 0 {
            return self.quiescence(game_state, alpha, beta, MAX_QUIESCENCE_PLIES);
        }

        order_moves(game_state, &mut moves, hash_move);

        let mut best = -MATE_SCORE;
        let mut best_move = None;

        for mv in moves {
            let mut next = game_state.clone();
            apply_move_unchecked(&mut next, mv);
            let score = -self.negamax(&next, depth - 1, -beta, -alpha, ply.saturating_add(1));
            if self.aborted {
                return 0;
            }

            if score > best {
                best = score;
                best_move = Some(mv);
            }
            if score > alpha {
                alpha = score;
            }
            if alpha >= beta {
                break;
            }
        }

        let bound = if best <= alpha_orig {
            Bound::Upper
        } else if best >= beta {
            Bound::Lower
        } else {
            Bound::Exact
        };
        self.tt.store(TTEntry {
            key,
            depth,
            score: score_to_tt(best, ply),
            bound,
            best_move,
        });

        best
    }

    /// Captures-only extension past the horizon, with a stand-pat cutoff.
    fn quiescence(
        &mut self,
        game_state: &GameState,
        mut alpha: i32,
        beta: i32,
        plies_left: u8,
    ) -> i32 {
        let stand_pat = self.scorer.score(game_state);
        if stand_pat >= beta || plies_left == 0 {
            return stand_pat;
        }
        alpha = alpha.max(stand_pat);

        let mut captures: Vec<Move> = generate_legal_moves(game_state)
            .into_iter()
            .filter(|&mv| captured_piece(game_state, mv).is_some())
            .collect();
        order_moves(game_state, &mut captures, None);

        for mv in captures {
            self.nodes += 1;
            let mut next = game_state.clone();
            apply_move_unchecked(&mut next, mv);
            let score = -self.quiescence(&next, -beta, -alpha, plies_left - 1);
            if score >= beta {
                return score;
            }
            alpha = alpha.max(score);
        }

        alpha
    }

    fn out_of_time(&mut self) -> bool {
        if self.aborted {
            return true;
        }
        if self.stop.is_some_and(|stop| stop.load(Ordering::Relaxed)) {
            self.aborted = true;
            return true;
        }
        if self.nodes >= self.next_deadline_check {
            self.next_deadline_check = self.nodes + DEADLINE_CHECK_INTERVAL;
            if let Some(deadline) = self.deadline {
                self.aborted = Instant::now() >= deadline;
            }
        }
        self.aborted
    }
}

fn terminal_score(game_state: &GameState, ply: u8) -> i32 {
    if is_king_in_check(game_state, game_state.side_to_move) {
        -MATE_SCORE + i32::from(ply)
    } else {
        0
    }
}

// Mate scores are stored relative to the node, not the root.

#[inline]
fn score_to_tt(score: i32, ply: u8) -> i32 {
    if score >= MATE_THRESHOLD {
        score + i32::from(ply)
    } else if score <= -MATE_THRESHOLD {
        score - i32::from(ply)
    } else {
        score
    }
}

#[inline]
fn score_from_tt(score: i32, ply: u8) -> i32 {
    if score >= MATE_THRESHOLD {
        score - i32::from(ply)
    } else if score <= -MATE_THRESHOLD {
        score + i32::from(ply)
    } else {
        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::board_scoring::{EvalTier, TieredScorer};

    fn game(fen: &str) -> GameState {
        GameState::from_fen(fen).expect("FEN should parse")
    }

    fn search(game_state: &GameState, max_depth: u8) -> SearchResult {
        let mut tt = TranspositionTable::new_with_mb(1);
        iterative_deepening_search(
            game_state,
            &MaterialScorer,
            &mut tt,
            SearchConfig {
                max_depth,
                time_limit: None,
            },
        )
    }

    #[test]
    fn search_depth_zero_returns_eval_only() {
        let result = search(&GameState::new_game(), 0);
        assert_eq!(result.best_move, None);
        assert_eq!(result.best_score, 0);
        assert_eq!(result.reached_depth, 0);
    }

    #[test]
    fn search_takes_hanging_rook() {
        let position = game("3k4/8/8/3r4/8/8/8/3QK3 w - - 0 1");
        let result = search(&position, 2);
        assert_eq!(
            result.best_move.map(|mv| mv.to_string()).as_deref(),
            Some("d1d5")
        );
        assert!(result.best_score >= 400);
    }

    #[test]
    fn search_finds_mate_in_one() {
        let position = game("6k1/5Q2/6K1/8/8/8/8/8 w - - 0 1");
        let result = search(&position, 2);

        let best_move = result.best_move.expect("best move should exist");
        let next = position.after_move(best_move).expect("best move should apply");
        assert!(next.legal_moves().is_empty(), "best move should deliver checkmate");
        assert!(
            result.best_score > MATE_THRESHOLD,
            "mate score should dominate material, got {}",
            result.best_score
        );
        assert_eq!(result.reached_depth, 1, "search stops once mate is found");
    }

    #[test]
    fn search_avoids_defended_capture() {
        // Qxd5 loses the queen to exd5; the quiet moves keep material level.
        let position = game("3k4/8/4p3/3r4/8/8/8/3QK3 w - - 0 1");
        let result = search(&position, 2);
        assert_ne!(
            result.best_move.map(|mv| mv.to_string()).as_deref(),
            Some("d1d5")
        );
    }

    #[test]
    fn terminal_root_has_no_move() {
        let stalemate = game("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
        let result = search(&stalemate, 3);
        assert_eq!(result.best_move, None);
        assert_eq!(result.best_score, 0);
    }

    #[test]
    fn deadline_still_returns_a_legal_move() {
        let position = GameState::new_game();
        let mut tt = TranspositionTable::new_with_mb(1);
        let result = iterative_deepening_search(
            &position,
            &TieredScorer::new(EvalTier::KingSafety),
            &mut tt,
            SearchConfig {
                max_depth: 20,
                time_limit: Some(Duration::from_millis(1)),
            },
        );
        let best = result.best_move.expect("depth one always completes");
        assert!(position.legal_moves().contains(&best));
        assert!(result.reached_depth >= 1 && result.reached_depth < 20);
    }

    #[test]
    fn raised_stop_flag_ends_search_after_depth_one() {
        let position = GameState::new_game();
        let mut tt = TranspositionTable::new_with_mb(1);
        let stop = AtomicBool::new(true);
        let result = iterative_deepening_search_with_stop(
            &position,
            &TieredScorer::new(EvalTier::KingSafety),
            &mut tt,
            SearchConfig {
                max_depth: 20,
                time_limit: None,
            },
            Some(&stop),
        );
        assert_eq!(result.reached_depth, 1);
        let best = result.best_move.expect("depth one always completes");
        assert!(position.legal_moves().contains(&best));
    }

    #[test]
    fn captures_are_ordered_before_quiet_moves() {
        let position = game("3k4/8/8/3r4/8/8/8/3QK3 w - - 0 1");
        let mut moves = position.legal_moves();
        order_moves(&position, &mut moves, None);
        assert_eq!(moves[0].to_string(), "d1d5");

        let quiet = moves[moves.len() - 1];
        order_moves(&position, &mut moves, Some(quiet));
        assert_eq!(moves[0], quiet);
    }

    #[test]
    fn mate_scores_survive_tt_round_trip() {
        let stored = score_to_tt(MATE_SCORE - 5, 3);
        assert_eq!(score_from_tt(stored, 3), MATE_SCORE - 5);
        assert_eq!(score_to_tt(120, 7), 120);
    }
}
