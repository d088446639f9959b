use crate::r#move::Move;
use thiserror::Error;

/// Reasons a FEN string cannot be loaded
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    #[error("missing FEN field: {0}")]
    MissingField(&'static str),

    #[error("invalid piece character '{0}'")]
    InvalidPiece(char),

    #[error("invalid piece placement: {0}")]
    InvalidPlacement(String),

    #[error("invalid side to move '{0}' (expected 'w' or 'b')")]
    InvalidSide(String),

    #[error("invalid castling rights '{0}'")]
    InvalidCastling(String),

    #[error("invalid en passant square '{0}'")]
    InvalidEnPassant(String),

    #[error("invalid move counter '{0}'")]
    InvalidCounter(String),

    #[error("expected exactly one {color} king, found {found}")]
    KingCount { color: &'static str, found: u32 },
}

/// A move submitted to a board that is not in its legal set
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    #[error("illegal move: {0}")]
    Illegal(Move),
}

/// Errors turning algebraic text into a move
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SanError {
    #[error("could not read '{0}' as a move")]
    Malformed(String),

    #[error("no legal move matches '{0}'")]
    NoMatch(String),

    #[error("'{0}' is ambiguous, add a file or rank")]
    Ambiguous(String),
}

pub type FenResult<T> = Result<T, FenError>;
