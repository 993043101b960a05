//! Error types for building boards and reading directions.

use thiserror::Error;

/// Everything that can go wrong before a search is started.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PuzzleError {
    /// the number of tiles does not form a square board of at least 2x2
    #[error("{0} tiles do not form a square board of at least 2x2")]
    NotSquare(usize),
    /// the board is wider than a tile value can address
    #[error("a {0}x{0} board is too large, at most 16x16 is supported")]
    TooLarge(usize),
    /// a token that is neither a tile number nor the blank marker
    #[error("unrecognized token '{0}'")]
    InvalidToken(String),
    #[error("tile {value} is out of range for a {size}x{size} board")]
    TileOutOfRange { value: u8, size: usize },
    #[error("tile {0} appears more than once")]
    DuplicateTile(u8),
    #[error("board has no blank tile")]
    MissingBlank,
    /// board and goal (or rows of a board) disagree on the size
    #[error("expected a {expected}x{expected} board, found {found}x{found}")]
    SizeMismatch { expected: usize, found: usize },
    #[error("'{0}' is not a direction, expected UP, DOWN, LEFT or RIGHT")]
    InvalidDirection(String),
}
