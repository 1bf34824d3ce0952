// Error types for the move selector
//
// Deadline expiry and "no legal move" are ordinary search outcomes and are
// reported through `search::StopReason`, not through this enum.

use thiserror::Error;

use crate::types::{Color, Coord};

/// Errors raised by board validation and by broken search invariants
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    #[error("board size must be at least {min}, got {size}")]
    InvalidSize { size: usize, min: usize },

    #[error("the opening position needs an even size of at least 4, got {size}")]
    InvalidOpeningSize { size: usize },

    #[error("board has {actual} rows, expected {expected}")]
    RowCountMismatch { expected: usize, actual: usize },

    #[error("row {row} has {actual} cells, expected {expected}")]
    RowLengthMismatch {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("invalid cell value {value} at ({row}, {col})")]
    InvalidCell { row: usize, col: usize, value: i8 },

    #[error("coordinate ({}, {}) is outside a {}x{} board", .coord.row, .coord.col, .size, .size)]
    OutOfBounds { coord: Coord, size: usize },

    #[error("illegal move for {}: ({}, {})", .color.as_str(), .coord.row, .coord.col)]
    IllegalMove { color: Color, coord: Coord },

    #[error("search invariant violated: {0}")]
    InvariantViolation(String),

    #[error("search worker failed: {0}")]
    Worker(String),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, EngineError>;
