use std::thread;

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_apply::{
    apply_move_unchecked, is_capture, is_castling_move, is_en_passant_capture,
};
use crate::move_generation::legal_move_generator::{generate_legal_moves, has_legal_moves, in_check};

/// Leaf statistics for a perft walk. Counters other than `nodes` describe the
/// move that reached each leaf.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerftCounts {
    pub nodes: u64,
    pub captures: u64,
    pub en_passant: u64,
    pub castles: u64,
    pub promotions: u64,
    pub checks: u64,
    pub checkmates: u64,
}

impl PerftCounts {
    fn merge(&mut self, rhs: PerftCounts) {
        self.nodes += rhs.nodes;
        self.captures += rhs.captures;
        self.en_passant += rhs.en_passant;
        self.castles += rhs.castles;
        self.promotions += rhs.promotions;
        self.checks += rhs.checks;
        self.checkmates += rhs.checkmates;
    }
}

pub fn perft(game_state: &GameState, depth: u8) -> PerftCounts {
    let mut total = PerftCounts::default();
    if depth == 0 {
        total.nodes = 1;
        return total;
    }
    perft_recurse(game_state, depth, &mut total);
    total
}

/// Node count only, skipping the per-leaf classification.
pub fn perft_nodes(game_state: &GameState, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = generate_legal_moves(game_state);
    if depth == 1 {
        return moves.len() as u64;
    }
    moves
        .into_iter()
        .map(|mv| {
            let mut next = game_state.clone();
            apply_move_unchecked(&mut next, mv);
            perft_nodes(&next, depth - 1)
        })
        .sum()
}

/// Per-root-move node counts, the usual tool for bisecting a generator bug.
pub fn perft_divide(game_state: &GameState, depth: u8) -> Vec<(Move, u64)> {
    generate_legal_moves(game_state)
        .into_iter()
        .map(|mv| {
            let mut next = game_state.clone();
            apply_move_unchecked(&mut next, mv);
            (mv, perft_nodes(&next, depth.saturating_sub(1)))
        })
        .collect()
}

/// `perft` with one scoped thread per root move.
pub fn perft_multi_threaded(game_state: &GameState, depth: u8) -> PerftCounts {
    if depth == 0 {
        return perft(game_state, 0);
    }

    let root_moves = generate_legal_moves(game_state);
    thread::scope(|scope| {
        let handles: Vec<_> = root_moves
            .into_iter()
            .map(|mv| {
                scope.spawn(move || {
                    let mut local = PerftCounts::default();
                    visit_move(game_state, mv, depth, &mut local);
                    local
                })
            })
            .collect();

        let mut total = PerftCounts::default();
        for handle in handles {
            match handle.join() {
                Ok(local) => total.merge(local),
                Err(payload) => std::panic::resume_unwind(payload),
            }
        }
        total
    })
}

fn perft_recurse(game_state: &GameState, depth: u8, counts: &mut PerftCounts) {
    for mv in generate_legal_moves(game_state) {
        visit_move(game_state, mv, depth, counts);
    }
}

fn visit_move(game_state: &GameState, mv: Move, depth: u8, counts: &mut PerftCounts) {
    let mut next = game_state.clone();
    apply_move_unchecked(&mut next, mv);

    if depth > 1 {
        perft_recurse(&next, depth - 1, counts);
        return;
    }

    counts.nodes += 1;
    if is_capture(game_state, mv) {
        counts.captures += 1;
    }
    if is_en_passant_capture(game_state, mv) {
        counts.en_passant += 1;
    }
    if is_castling_move(game_state, mv) {
        counts.castles += 1;
    }
    if mv.promotion.is_some() {
        counts.promotions += 1;
    }
    if in_check(&next) {
        counts.checks += 1;
        if !has_legal_moves(&next) {
            counts.checkmates += 1;
        }
    }
}
