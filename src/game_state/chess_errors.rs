//! Errors used throughout the chess engine.
//!
//! `ChessError` is the single error type returned by rules, notation and
//! move-selection code. Every variant is a local, recoverable condition: the
//! engine never retries on its own and never leaves a board half-mutated, so
//! callers may re-prompt for input or simply drop the request.

use thiserror::Error;

/// Unified error type for the chess engine.
///
/// When matching on `ChessError`:
/// - `MalformedPosition`, `MalformedMove`, `NoSuchMove` and `AmbiguousMove`
///   describe bad user or file input and are suitable to show to end users.
/// - `IllegalMove` means a structurally valid move was rejected by the rules
///   for the position it was applied to.
/// - `NoLegalMoves` and `EngineClosed` come from the move selector and mean the
///   request should not have been made (terminal position, released session).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChessError {
    /// Position interchange (FEN) text could not be parsed.
    #[error("malformed position: {0}")]
    MalformedPosition(String),

    /// Coordinate move text (`e2e4`, `a7a8q`) or a square name was malformed.
    #[error("malformed move text: {0}")]
    MalformedMove(String),

    /// The move is not a member of the legal moves for the given board.
    #[error("illegal move: {0}")]
    IllegalMove(String),

    /// Move text resolved to zero legal moves.
    #[error("no legal move matches {0:?}")]
    NoSuchMove(String),

    /// Move text resolved to more than one legal move.
    #[error("ambiguous move {0:?}")]
    AmbiguousMove(String),

    /// The move selector was asked to move in a terminal position.
    #[error("no legal moves available")]
    NoLegalMoves,

    /// The move selector was used after `release`.
    #[error("engine is closed")]
    EngineClosed,

    /// A selector configuration value was out of range or unknown.
    #[error("invalid engine option: {0}")]
    InvalidOption(String),
}

pub type ChessResult<T> = Result<T, ChessError>;

#[cfg(test)]
mod tests {
    use super::ChessError;

    #[test]
    fn display_messages_carry_context() {
        let err = ChessError::MalformedPosition("FEN must have 6 fields, got 3".to_owned());
        assert_eq!(
            err.to_string(),
            "malformed position: FEN must have 6 fields, got 3"
        );
        assert_eq!(ChessError::EngineClosed.to_string(), "engine is closed");
        assert_eq!(
            ChessError::NoSuchMove("Qh5".to_owned()).to_string(),
            "no legal move matches \"Qh5\""
        );
    }
}
