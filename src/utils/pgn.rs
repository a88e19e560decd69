//! PGN read/write utilities for game history interchange.
//!
//! Serializes move history and headers to PGN text and parses PGN back into
//! engine state sequences suitable for replay and analysis workflows.

use std::collections::BTreeMap;

use chrono::Local;

use crate::game_state::chess_errors::{ChessError, ChessResult};
use crate::game_state::chess_rules::STARTING_POSITION_FEN;
use crate::game_state::{chess_types::{Color, Move}, game_state::GameState};
use crate::utils::san::{move_to_san, parse_san};

#[derive(Debug, Clone)]
pub struct PgnGame {
    pub headers: BTreeMap<String, String>,
    pub initial_state: GameState,
    pub move_history: Vec<Move>,
    pub final_state: GameState,
    pub result: String,
}

/// PGN for a game played from `initial_state`, dated today.
pub fn write_pgn(
    initial_state: &GameState,
    move_history: &[Move],
    result: &str,
) -> ChessResult<String> {
    let mut headers = BTreeMap::<String, String>::new();
    headers.insert("Event".to_owned(), "Casual Game".to_owned());
    headers.insert("Site".to_owned(), "Terminal".to_owned());
    headers.insert("Date".to_owned(), Local::now().format("%Y.%m.%d").to_string());
    headers.insert("Round".to_owned(), "-".to_owned());
    headers.insert("White".to_owned(), "White".to_owned());
    headers.insert("Black".to_owned(), "Black".to_owned());
    headers.insert("Result".to_owned(), normalize_result(result).to_owned());

    let initial_fen = initial_state.get_fen();
    if initial_fen != STARTING_POSITION_FEN {
        headers.insert("SetUp".to_owned(), "1".to_owned());
        headers.insert("FEN".to_owned(), initial_fen);
    }

    write_pgn_with_headers(initial_state, move_history, &headers)
}

pub fn write_pgn_with_headers(
    initial_state: &GameState,
    move_history: &[Move],
    headers: &BTreeMap<String, String>,
) -> ChessResult<String> {
    let mut out = String::new();

    for (key, value) in headers {
        out.push_str(&format!("[{} \"{}\"]\n", key, escape_pgn_value(value)));
    }
    out.push('\n');

    let mut state = initial_state.clone();
    let mut movetext_parts = Vec::<String>::with_capacity(move_history.len() + 1);
    for (ply, mv) in move_history.iter().enumerate() {
        let san = move_to_san(&state, *mv)?;
        let number = state.fullmove_number;
        if ply == 0 && state.side_to_move == Color::Black {
            movetext_parts.push(format!("{number}... {san}"));
        } else if state.side_to_move == Color::White {
            movetext_parts.push(format!("{number}. {san}"));
        } else {
            movetext_parts.push(san);
        }
        state.apply_move(*mv)?;
    }

    let result = headers
        .get("Result")
        .map(|x| normalize_result(x))
        .unwrap_or("*");
    movetext_parts.push(result.to_owned());
    out.push_str(&movetext_parts.join(" "));
    out.push('\n');

    Ok(out)
}

/// Replay PGN movetext from its start position (or `FEN` header).
pub fn read_pgn(pgn: &str) -> ChessResult<PgnGame> {
    let mut headers = BTreeMap::<String, String>::new();
    let mut movetext_lines = Vec::<String>::new();

    for line in pgn.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.starts_with('[') {
            let (k, v) = parse_header_line(trimmed)?;
            headers.insert(k, v);
        } else {
            movetext_lines.push(trimmed.to_owned());
        }
    }

    let initial_state = match headers.get("FEN") {
        Some(fen) if headers.get("SetUp").map(String::as_str) != Some("0") => {
            GameState::from_fen(fen)?
        }
        _ => GameState::new_game(),
    };

    let mut state = initial_state.clone();
    let mut move_history = Vec::<Move>::new();
    let mut result = "*".to_owned();

    let movetext = strip_pgn_comments_and_variations(&movetext_lines.join(" "));
    for token in movetext.split_whitespace() {
        if is_move_number_token(token) || token.starts_with('$') {
            continue;
        }

        if is_result_token(token) {
            result = token.to_owned();
            break;
        }

        // "12.e4" style tokens carry the move glued to its number.
        let san = token.rsplit_once('.').map_or(token, |(_, tail)| tail);
        let mv = parse_san(&state, san)?;
        state.apply_move(mv)?;
        move_history.push(mv);
    }

    if let Some(header_result) = headers.get("Result") {
        if is_result_token(header_result) {
            result = header_result.clone();
        }
    }

    Ok(PgnGame {
        headers,
        initial_state,
        move_history,
        final_state: state,
        result,
    })
}

fn parse_header_line(line: &str) -> ChessResult<(String, String)> {
    let malformed = || ChessError::MalformedPosition(format!("invalid PGN header line: {line}"));
    if !line.starts_with('[') || !line.ends_with(']') {
        return Err(malformed());
    }
    let inner = &line[1..line.len() - 1];
    let mut parts = inner.splitn(2, ' ');
    let key = parts
        .next()
        .ok_or_else(malformed)?
        .trim();
    let value_raw = parts
        .next()
        .ok_or_else(malformed)?
        .trim();

    if !value_raw.starts_with('"') || !value_raw.ends_with('"') || value_raw.len() < 2 {
        return Err(malformed());
    }
    let value = value_raw[1..value_raw.len() - 1].replace("\\\"", "\"");
    Ok((key.to_owned(), value))
}

fn strip_pgn_comments_and_variations(text: &str) -> String {
    let mut out = String::new();
    let mut brace_depth = 0usize;
    let mut paren_depth = 0usize;

    for ch in text.chars() {
        match ch {
            '{' => brace_depth = brace_depth.saturating_add(1),
            '}' => brace_depth = brace_depth.saturating_sub(1),
            '(' => paren_depth = paren_depth.saturating_add(1),
            ')' => paren_depth = paren_depth.saturating_sub(1),
            _ if brace_depth == 0 && paren_depth == 0 => out.push(ch),
            _ => {}
        }
    }

    out
}

/// `12.` or `12...` on its own.
fn is_move_number_token(token: &str) -> bool {
    token.ends_with('.')
        && token
            .trim_end_matches('.')
            .chars()
            .all(|c| c.is_ascii_digit())
}

fn is_result_token(token: &str) -> bool {
    matches!(token, "1-0" | "0-1" | "1/2-1/2" | "*")
}

fn normalize_result(result: &str) -> &str {
    if is_result_token(result) {
        result
    } else {
        "*"
    }
}

fn escape_pgn_value(value: &str) -> String {
    value.replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::{read_pgn, write_pgn, write_pgn_with_headers};
    use std::collections::BTreeMap;

    use crate::game_state::chess_types::Move;
    use crate::game_state::game_state::GameState;
    use crate::utils::san::parse_san;

    fn play(game: &mut GameState, history: &mut Vec<Move>, moves: &[&str]) {
        for san in moves {
            let mv = parse_san(game, san).expect("SAN should parse");
            game.apply_move(mv).expect("move should apply");
            history.push(mv);
        }
    }

    #[test]
    fn pgn_round_trip_start_position_history() {
        let mut game = GameState::new_game();
        let mut history = Vec::<Move>::new();
        play(&mut game, &mut history, &["e4", "e5", "Nf3", "Nc6", "Bb5", "a6"]);

        let pgn = write_pgn(&GameState::new_game(), &history, "*").expect("PGN should write");
        assert!(pgn.contains("1. e4 e5 2. Nf3 Nc6 3. Bb5 a6 *"));
        assert!(!pgn.contains("[FEN "));

        let date_line = pgn
            .lines()
            .find(|line| line.starts_with("[Date "))
            .expect("Date header should be present");
        assert_eq!(date_line.len(), "[Date \"2024.01.31\"]".len());

        let parsed = read_pgn(&pgn).expect("PGN should parse");
        assert_eq!(parsed.move_history, history);
        assert_eq!(parsed.final_state, game);
        assert_eq!(parsed.result, "*");
    }

    #[test]
    fn pgn_round_trip_custom_fen_setup() {
        let initial =
            GameState::from_fen("4k3/8/8/8/8/8/4P3/4K3 b - - 0 1").expect("FEN should parse");
        let mut game = initial.clone();
        let mut history = Vec::<Move>::new();
        play(&mut game, &mut history, &["Kd7", "e4"]);

        let mut headers = BTreeMap::<String, String>::new();
        headers.insert("Event".to_owned(), "Custom".to_owned());
        headers.insert("Result".to_owned(), "1-0".to_owned());
        headers.insert("SetUp".to_owned(), "1".to_owned());
        headers.insert("FEN".to_owned(), initial.get_fen());

        let pgn = write_pgn_with_headers(&initial, &history, &headers).expect("PGN should write");
        assert!(pgn.contains("1... Kd7 2. e4 1-0"));

        let parsed = read_pgn(&pgn).expect("PGN should parse");
        assert_eq!(parsed.initial_state, initial);
        assert_eq!(parsed.move_history, history);
        assert_eq!(parsed.result, "1-0");
    }

    #[test]
    fn read_pgn_skips_comments_variations_and_nags() {
        let pgn = "[Event \"Annotated\"]\n\n1. e4 {best by test} e5 (1... c5 2. Nf3) 2. Nf3 $1 Nc6 3.Bb5 *\n";
        let parsed = read_pgn(pgn).expect("annotated PGN should parse");
        assert_eq!(parsed.move_history.len(), 5);
        assert_eq!(parsed.headers.get("Event").map(String::as_str), Some("Annotated"));
    }

    #[test]
    fn read_pgn_rejects_illegal_movetext() {
        assert!(read_pgn("1. e4 e4 *").is_err());
        assert!(read_pgn("[Event Unquoted]\n1. e4 *").is_err());
    }
}
