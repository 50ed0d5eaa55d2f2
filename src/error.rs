//! DucaPowr - Error types

use thiserror::Error;

/// Malformed long algebraic move text from the opponent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoveParseError {
    #[error("move text must be 4 or 5 characters, got {0:?}")]
    BadLength(String),
    #[error("invalid square {0:?}")]
    BadSquare(String),
    #[error("invalid promotion letter {0:?}")]
    BadPromotion(char),
    #[error("no piece on {0}")]
    EmptySource(String),
}

/// Malformed FEN text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    #[error("FEN needs at least 2 fields, got {0}")]
    MissingFields(usize),
    #[error("invalid piece placement: {0}")]
    Placement(String),
    #[error("invalid side to move {0:?}")]
    SideToMove(String),
    #[error("invalid castling field {0:?}")]
    Castling(String),
    #[error("invalid en passant field {0:?}")]
    EnPassant(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// More moves generated than a move list can hold.
    #[error("move list overflow: capacity {capacity}")]
    MoveListOverflow { capacity: usize },

    /// Undo requested with no applied move on record.
    #[error("undo with empty move history")]
    EmptyHistory,

    /// Undo token is not the most recent application.
    #[error("undo out of order: history depth {actual}, token for depth {expected}")]
    UndoOutOfOrder { expected: usize, actual: usize },

    #[error("engine is closed")]
    NotRunning,

    /// Well-formed move text that is not legal in the current position.
    #[error("illegal move {0}")]
    IllegalMove(String),

    #[error(transparent)]
    Parse(#[from] MoveParseError),

    #[error(transparent)]
    Fen(#[from] FenError),
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
