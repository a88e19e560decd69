//! FEN-to-GameState parser.
//!
//! Builds a fully-populated board from a Forsyth-Edwards Notation string:
//! placement, side to move, castling rights, en-passant target and clocks.
//! Every rejection is a `ChessError::MalformedPosition` naming the bad field.

use tracing::debug;

use crate::game_state::chess_errors::{ChessError, ChessResult};
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::utils::algebraic::algebraic_to_square;

pub fn parse_fen(fen: &str) -> ChessResult<GameState> {
    parse_fields(fen).inspect_err(|err| debug!(fen, %err, "rejected FEN"))
}

fn parse_fields(fen: &str) -> ChessResult<GameState> {
    let parts: Vec<&str> = fen.split_whitespace().collect();
    let [board_part, side_part, castling_part, en_passant_part, halfmove_part, fullmove_part] =
        parts[..]
    else {
        return Err(malformed(format!(
            "FEN must have 6 fields, got {}",
            parts.len()
        )));
    };

    let mut game_state = GameState::new_empty();

    parse_board(board_part, &mut game_state)?;
    game_state.side_to_move = parse_side_to_move(side_part)?;
    game_state.castling_rights = parse_castling_rights(castling_part)?;
    game_state.en_passant_square =
        parse_en_passant_square(en_passant_part, game_state.side_to_move)?;
    game_state.halfmove_clock = halfmove_part
        .parse::<u16>()
        .map_err(|_| malformed(format!("invalid halfmove clock: {halfmove_part}")))?;
    game_state.fullmove_number = match fullmove_part.parse::<u16>() {
        Ok(n) if n >= 1 => n,
        _ => return Err(malformed(format!("invalid fullmove number: {fullmove_part}"))),
    };

    Ok(game_state)
}

#[inline]
fn malformed(message: String) -> ChessError {
    ChessError::MalformedPosition(message)
}

fn parse_board(board_part: &str, game_state: &mut GameState) -> ChessResult<()> {
    let ranks: Vec<&str> = board_part.split('/').collect();
    if ranks.len() != 8 {
        return Err(malformed(format!(
            "board layout must contain 8 ranks, got {}",
            ranks.len()
        )));
    }

    for (fen_rank_idx, rank_str) in ranks.iter().enumerate() {
        let board_rank = 7 - fen_rank_idx as i8;
        let mut file = 0i8;

        for ch in rank_str.chars() {
            if let Some(empty_count) = ch.to_digit(10) {
                if !(1..=8).contains(&empty_count) {
                    return Err(malformed(format!("invalid empty-square count '{ch}'")));
                }
                file += empty_count as i8;
                if file > 8 {
                    return Err(malformed(format!("rank {rank_str:?} exceeds 8 files")));
                }
                continue;
            }

            let piece = Piece::from_fen_char(ch)
                .ok_or_else(|| malformed(format!("invalid piece character '{ch}'")))?;
            let square = Square::new(file, board_rank)
                .ok_or_else(|| malformed(format!("rank {rank_str:?} exceeds 8 files")))?;

            game_state.put(square, piece);
            file += 1;
        }

        if file != 8 {
            return Err(malformed(format!("rank {rank_str:?} does not sum to 8 files")));
        }
    }

    Ok(())
}

fn parse_side_to_move(side_part: &str) -> ChessResult<Color> {
    match side_part {
        "w" => Ok(Color::White),
        "b" => Ok(Color::Black),
        _ => Err(malformed(format!("invalid side-to-move field: {side_part}"))),
    }
}

fn parse_castling_rights(castling_part: &str) -> ChessResult<CastlingRights> {
    if castling_part == "-" {
        return Ok(0);
    }

    let mut rights: CastlingRights = 0;

    for ch in castling_part.chars() {
        match ch {
            'K' => rights |= CASTLE_WHITE_KINGSIDE,
            'Q' => rights |= CASTLE_WHITE_QUEENSIDE,
            'k' => rights |= CASTLE_BLACK_KINGSIDE,
            'q' => rights |= CASTLE_BLACK_QUEENSIDE,
            _ => return Err(malformed(format!("invalid castling rights character: {ch}"))),
        }
    }

    Ok(rights)
}

/// The target lies behind a pawn that just double-pushed, so it sits on
/// rank 6 when White is to move and rank 3 when Black is.
fn parse_en_passant_square(
    en_passant_part: &str,
    side_to_move: Color,
) -> ChessResult<Option<Square>> {
    if en_passant_part == "-" {
        return Ok(None);
    }

    let square = algebraic_to_square(en_passant_part)
        .map_err(|_| malformed(format!("invalid en-passant square: {en_passant_part}")))?;
    let expected_rank = match side_to_move {
        Color::White => 5,
        Color::Black => 2,
    };
    if square.rank() != expected_rank {
        return Err(malformed(format!(
            "en-passant square {en_passant_part} does not match side to move"
        )));
    }

    Ok(Some(square))
}
