//! Perft and move-selection runner for checking the rules engine by hand.
//!
//! Usage:
//! `cargo run --release --bin perft_runner`
//! `cargo run --release --bin perft_runner -- --depth 4 --fen "<fen>" --divide`
//! `RUST_LOG=debug cargo run --release --bin perft_runner -- --select hard`

use std::time::Instant;

use tracing::info;
use tracing_subscriber::EnvFilter;

use termchess_engine::engines::engine_trait::Difficulty;
use termchess_engine::engines::move_selector::MoveSelector;
use termchess_engine::game_state::chess_errors::ChessResult;
use termchess_engine::game_state::chess_rules::STARTING_POSITION_FEN;
use termchess_engine::game_state::game_state::GameState;
use termchess_engine::move_generation::perft::{perft_divide, perft_multi_threaded};
use termchess_engine::utils::san::move_to_san;

fn arg_value(flag: &str) -> Option<String> {
    let args: Vec<String> = std::env::args().collect();
    args.iter()
        .position(|arg| arg == flag)
        .and_then(|i| args.get(i + 1).cloned())
}

fn parse_arg_u8(flag: &str, default: u8) -> u8 {
    arg_value(flag)
        .and_then(|v| v.parse::<u8>().ok())
        .map(|v| v.max(1))
        .unwrap_or(default)
}

fn has_flag(flag: &str) -> bool {
    std::env::args().any(|arg| arg == flag)
}

fn parse_difficulty(text: &str) -> Option<Difficulty> {
    Difficulty::ALL
        .into_iter()
        .find(|d| d.to_string().eq_ignore_ascii_case(text))
}

fn main() -> ChessResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let depth = parse_arg_u8("--depth", 3);
    let fen = arg_value("--fen").unwrap_or_else(|| STARTING_POSITION_FEN.to_owned());
    let game = GameState::from_fen(&fen)?;
    info!(%fen, depth, "perft run");

    if has_flag("--divide") {
        let mut total = 0u64;
        for (mv, nodes) in perft_divide(&game, depth) {
            println!("{mv}: {nodes}");
            total += nodes;
        }
        println!("total: {total}");
    } else {
        let started = Instant::now();
        let counts = perft_multi_threaded(&game, depth);
        let elapsed_ms = started.elapsed().as_millis().max(1);
        println!(
            "depth={depth} nodes={} captures={} ep={} castles={} promotions={} checks={} mates={} elapsed_ms={elapsed_ms} nps={}",
            counts.nodes,
            counts.captures,
            counts.en_passant,
            counts.castles,
            counts.promotions,
            counts.checks,
            counts.checkmates,
            counts.nodes as u128 * 1000 / elapsed_ms
        );
    }

    if let Some(difficulty) = arg_value("--select").as_deref().and_then(parse_difficulty) {
        let mut selector = MoveSelector::new();
        let started = Instant::now();
        let picked = selector.select_move(&game, difficulty)?;
        println!(
            "{difficulty} selects {} ({picked}) in {} ms",
            move_to_san(&game, picked)?,
            started.elapsed().as_millis()
        );
        selector.release();
    }

    Ok(())
}
