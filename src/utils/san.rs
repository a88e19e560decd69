//! Standard algebraic notation (SAN) in both directions.
//!
//! Parsing never builds a move directly: the text is reduced to a pattern
//! (piece kind, destination, optional origin file/rank, optional promotion)
//! and matched against the legal move list, so a move for the wrong side or
//! an impossible move cannot come out of it.

use tracing::debug;

use crate::game_state::chess_errors::{ChessError, ChessResult};
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_apply::{apply_move_unchecked, is_capture, is_castling_move};
use crate::move_generation::legal_move_generator::{generate_legal_moves, has_legal_moves, in_check};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SanPattern {
    Castle { kingside: bool },
    Normal {
        kind: PieceKind,
        from_file: Option<u8>,
        from_rank: Option<u8>,
        to: Square,
        promotion: Option<PieceKind>,
    },
}

/// Resolve SAN text (`e4`, `exd6`, `Nbd2`, `R1a3`, `e8=Q`, `O-O`) to the
/// unique legal move it names.
pub fn parse_san(game_state: &GameState, text: &str) -> ChessResult<Move> {
    let Some(pattern) = parse_pattern(text) else {
        debug!(text, "unparseable SAN");
        return Err(ChessError::NoSuchMove(text.to_owned()));
    };

    let candidates: Vec<Move> = generate_legal_moves(game_state)
        .into_iter()
        .filter(|&mv| matches_pattern(game_state, mv, pattern))
        .collect();

    match candidates.as_slice() {
        [single] => Ok(*single),
        [] => Err(ChessError::NoSuchMove(text.to_owned())),
        _ => Err(ChessError::AmbiguousMove(text.to_owned())),
    }
}

/// SAN text for `mv`, including `+`/`#` suffixes.
pub fn move_to_san(game_state: &GameState, mv: Move) -> ChessResult<String> {
    let legal = generate_legal_moves(game_state);
    if !legal.contains(&mv) {
        return Err(ChessError::IllegalMove(mv.to_string()));
    }

    let mut out = String::new();

    if is_castling_move(game_state, mv) {
        out.push_str(if mv.to.file() > mv.from.file() {
            "O-O"
        } else {
            "O-O-O"
        });
    } else {
        let kind = game_state
            .piece_at(mv.from)
            .map(|piece| piece.kind)
            .ok_or_else(|| ChessError::IllegalMove(mv.to_string()))?;
        let capture = is_capture(game_state, mv);

        if kind == PieceKind::Pawn {
            if capture {
                out.push(mv.from.file_char());
            }
        } else {
            out.push(kind.letter());
            out.push_str(&disambiguation(game_state, &legal, mv, kind));
        }

        if capture {
            out.push('x');
        }
        out.push_str(&mv.to.to_string());

        if let Some(promotion) = mv.promotion {
            out.push('=');
            out.push(promotion.letter());
        }
    }

    let mut next = game_state.clone();
    apply_move_unchecked(&mut next, mv);
    if in_check(&next) {
        out.push(if has_legal_moves(&next) { '+' } else { '#' });
    }

    Ok(out)
}

/// Minimal origin token separating `mv` from same-kind moves to the same
/// square: file if that suffices, else rank, else both.
fn disambiguation(game_state: &GameState, legal: &[Move], mv: Move, kind: PieceKind) -> String {
    let rivals: Vec<Square> = legal
        .iter()
        .filter(|other| {
            other.to == mv.to
                && other.from != mv.from
                && game_state.piece_at(other.from).map(|p| p.kind) == Some(kind)
        })
        .map(|other| other.from)
        .collect();

    if rivals.is_empty() {
        String::new()
    } else if rivals.iter().all(|sq| sq.file() != mv.from.file()) {
        mv.from.file_char().to_string()
    } else if rivals.iter().all(|sq| sq.rank() != mv.from.rank()) {
        mv.from.rank_char().to_string()
    } else {
        mv.from.to_string()
    }
}

fn matches_pattern(game_state: &GameState, mv: Move, pattern: SanPattern) -> bool {
    match pattern {
        SanPattern::Castle { kingside } => {
            is_castling_move(game_state, mv) && (mv.to.file() > mv.from.file()) == kingside
        }
        SanPattern::Normal {
            kind,
            from_file,
            from_rank,
            to,
            promotion,
        } => {
            let Some(piece) = game_state.piece_at(mv.from) else {
                return false;
            };
            if piece.kind != kind || mv.to != to || is_castling_move(game_state, mv) {
                return false;
            }
            // A pawn changes file only when capturing, which SAN always
            // spells with the origin file.
            let file_ok = match from_file {
                Some(file) => mv.from.file() == file,
                None => kind != PieceKind::Pawn || mv.from.file() == to.file(),
            };
            let rank_ok = from_rank.is_none_or(|rank| mv.from.rank() == rank);
            let promotion_ok = promotion.is_none() || mv.promotion == promotion;
            file_ok && rank_ok && promotion_ok
        }
    }
}

fn parse_pattern(text: &str) -> Option<SanPattern> {
    let body = text
        .trim()
        .trim_end_matches(|c: char| matches!(c, '+' | '#' | '!' | '?'));
    if !body.is_ascii() || body.is_empty() {
        return None;
    }

    match body {
        "O-O" | "0-0" => return Some(SanPattern::Castle { kingside: true }),
        "O-O-O" | "0-0-0" => return Some(SanPattern::Castle { kingside: false }),
        _ => {}
    }

    let (kind, rest) = match body.chars().next() {
        Some(ch @ ('N' | 'B' | 'R' | 'Q' | 'K')) => (PieceKind::from_letter(ch)?, &body[1..]),
        _ => (PieceKind::Pawn, body),
    };

    let (rest, promotion) = split_promotion(rest, kind)?;

    let (before, destination) = rest.split_at(rest.len().checked_sub(2)?);
    let to: Square = destination.parse().ok()?;

    // One capture marker at most, directly before the destination. A pawn
    // capture must name its origin file.
    let origin = match before.strip_suffix('x') {
        Some("") if kind == PieceKind::Pawn => return None,
        Some(origin) => origin,
        None => before,
    };
    if origin.len() > 2 {
        return None;
    }

    let mut from_file = None;
    let mut from_rank = None;
    for byte in origin.bytes() {
        match byte {
            b'a'..=b'h' if from_file.is_none() && from_rank.is_none() => {
                from_file = Some(byte - b'a')
            }
            b'1'..=b'8' if from_rank.is_none() => from_rank = Some(byte - b'1'),
            _ => return None,
        }
    }

    Some(SanPattern::Normal {
        kind,
        from_file,
        from_rank,
        to,
        promotion,
    })
}

/// Split off `=Q` or a bare trailing `Q` from pawn move text.
fn split_promotion(text: &str, kind: PieceKind) -> Option<(&str, Option<PieceKind>)> {
    let promotion_kind = |ch: char| match ch {
        'Q' | 'R' | 'B' | 'N' => PieceKind::from_letter(ch),
        _ => None,
    };

    if let Some((head, tail)) = text.split_once('=') {
        let mut letters = tail.chars();
        let promotion = letters
            .next()
            .map(|ch| ch.to_ascii_uppercase())
            .and_then(promotion_kind)?;
        if letters.next().is_some() || kind != PieceKind::Pawn {
            return None;
        }
        return Some((head, Some(promotion)));
    }

    match text.chars().last() {
        Some(ch) if ch.is_ascii_uppercase() => {
            if kind != PieceKind::Pawn {
                return None;
            }
            Some((&text[..text.len() - 1], Some(promotion_kind(ch)?)))
        }
        _ => Some((text, None)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(fen: &str) -> GameState {
        GameState::from_fen(fen).expect("fixture FEN should parse")
    }

    fn play(game: &mut GameState, moves: &[&str]) {
        for text in moves {
            let mv = parse_san(game, text).expect("fixture SAN should resolve");
            game.apply_move(mv).expect("resolved move should be legal");
        }
    }

    #[test]
    fn parses_pawn_and_piece_moves_from_start() {
        let start = GameState::new_game();
        assert_eq!(
            parse_san(&start, "e4").expect("e4 should resolve").to_string(),
            "e2e4"
        );
        assert_eq!(
            parse_san(&start, "Nf3").expect("Nf3 should resolve").to_string(),
            "g1f3"
        );
        assert_eq!(
            parse_san(&start, "e3+").expect("suffixes should be stripped").to_string(),
            "e2e3"
        );
    }

    #[test]
    fn en_passant_capture_resolves_and_removes_victim() {
        let mut position = game("rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 2");
        let mv = parse_san(&position, "exd6").expect("exd6 should resolve");
        assert_eq!(mv.to_string(), "e5d6");
        assert_eq!(move_to_san(&position, mv).expect("SAN should format"), "exd6");

        position.apply_move(mv).expect("en passant should apply");
        assert_eq!(position.piece_at("d5".parse().expect("d5 should parse")), None);
    }

    #[test]
    fn promotion_forms() {
        let position = game("3k4/4P3/8/8/8/8/8/4K3 w - - 0 1");
        let queen = parse_san(&position, "e8=Q").expect("e8=Q should resolve");
        assert_eq!(queen.to_string(), "e7e8q");
        assert_eq!(
            parse_san(&position, "e8=q").expect("lowercase letter should resolve"),
            queen
        );
        assert_eq!(
            parse_san(&position, "e8N").expect("bare suffix should resolve").promotion,
            Some(PieceKind::Knight)
        );
        assert_eq!(
            parse_san(&position, "e8"),
            Err(ChessError::AmbiguousMove("e8".to_owned()))
        );
        assert_eq!(move_to_san(&position, queen).expect("SAN should format"), "e8=Q+");

        let mut after = position.clone();
        after.apply_move(queen).expect("promotion should apply");
        assert_eq!(
            after.piece_at(Square::E8),
            Some(Piece::new(Color::White, PieceKind::Queen))
        );
    }

    #[test]
    fn capture_promotion_for_black() {
        let position = game("4k3/8/8/8/8/8/p7/1N2K3 b - - 0 1");
        let mv = parse_san(&position, "axb1=Q").expect("axb1=Q should resolve");
        assert_eq!(mv.to_string(), "a2b1q");
        assert_eq!(move_to_san(&position, mv).expect("SAN should format"), "axb1=Q+");
    }

    #[test]
    fn disambiguation_by_file_rank_and_square() {
        let knights = game("4k3/8/8/8/8/8/8/1N2KN2 w - - 0 1");
        assert_eq!(
            parse_san(&knights, "Nd2"),
            Err(ChessError::AmbiguousMove("Nd2".to_owned()))
        );
        let nbd2 = parse_san(&knights, "Nbd2").expect("Nbd2 should resolve");
        assert_eq!(move_to_san(&knights, nbd2).expect("SAN should format"), "Nbd2");

        let rooks = game("4k3/8/8/R7/8/8/8/R3K3 w - - 0 1");
        let r1a3 = parse_san(&rooks, "R1a3").expect("R1a3 should resolve");
        assert_eq!(r1a3.from, Square::A1);
        assert_eq!(move_to_san(&rooks, r1a3).expect("SAN should format"), "R1a3");

        let queens = game("4k3/8/8/8/8/Q7/8/Q1Q1K3 w - - 0 1");
        let mv = parse_san(&queens, "Qa1b2").expect("full-square disambiguation should resolve");
        assert_eq!(mv.from, Square::A1);
        assert_eq!(move_to_san(&queens, mv).expect("SAN should format"), "Qa1b2");
    }

    #[test]
    fn castling_spellings() {
        let position = game("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        let short = parse_san(&position, "O-O").expect("O-O should resolve");
        assert_eq!(short, Move::new(Square::E1, Square::G1));
        assert_eq!(parse_san(&position, "0-0-0").expect("0-0-0 should resolve").to, Square::C1);
        assert_eq!(move_to_san(&position, short).expect("SAN should format"), "O-O");
    }

    #[test]
    fn check_and_mate_suffixes() {
        let mut position = GameState::new_game();
        play(&mut position, &["e4", "f6"]);
        let qh5 = parse_san(&position, "Qh5").expect("Qh5 should resolve");
        assert_eq!(move_to_san(&position, qh5).expect("SAN should format"), "Qh5+");

        let mut scholar = GameState::new_game();
        play(&mut scholar, &["e4", "e5", "Bc4", "Nc6", "Qh5", "Nf6"]);
        let mate = parse_san(&scholar, "Qxf7").expect("Qxf7 should resolve");
        assert_eq!(move_to_san(&scholar, mate).expect("SAN should format"), "Qxf7#");
    }

    #[test]
    fn capture_marker_must_sit_before_destination() {
        let start = GameState::new_game();
        for text in ["Nxxf3", "xe4", "Nfx3", "xNf3", "Nx", "exxd5"] {
            assert!(
                matches!(parse_san(&start, text), Err(ChessError::NoSuchMove(_))),
                "{text:?} should not resolve"
            );
        }

        let mut position = GameState::new_game();
        play(&mut position, &["e4", "d5"]);
        let capture = parse_san(&position, "exd5").expect("exd5 should resolve");
        assert_eq!(capture.to_string(), "e4d5");
        assert!(matches!(
            parse_san(&position, "xd5"),
            Err(ChessError::NoSuchMove(_))
        ));
    }

    #[test]
    fn rejects_unknown_and_impossible_text() {
        let start = GameState::new_game();
        for text in ["", "Qh5", "e5", "xyz", "Ke2", "Nf3=Q", "O-O", "Zf3"] {
            assert!(
                matches!(parse_san(&start, text), Err(ChessError::NoSuchMove(_))),
                "{text:?} should not resolve"
            );
        }
        assert!(matches!(
            move_to_san(&start, "e2e5".parse().expect("move should parse")),
            Err(ChessError::IllegalMove(_))
        ));
    }

    #[test]
    fn san_round_trips_every_legal_move() {
        let fens = [
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
            "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
            "rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 2",
            "4k3/8/8/8/8/Q7/8/Q1Q1K3 w - - 0 1",
        ];
        for fen in fens {
            let position = game(fen);
            for mv in position.legal_moves() {
                let san = move_to_san(&position, mv).expect("legal move should format");
                let back = parse_san(&position, &san).expect("formatted SAN should resolve");
                assert_eq!(back, mv, "{san} in {fen}");
            }
        }
    }
}
