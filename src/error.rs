//! Crate error type

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A map token is not an integer (line and column are 1-based)
    #[error("malformed map at line {line}, column {column}: {token:?} is not an integer")]
    MalformedMap {
        line: usize,
        column: usize,
        token: String,
    },

    /// A map row has a different width than the first row
    #[error("ragged map row at line {line}: expected {expected} tiles, found {found}")]
    RaggedRow {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("map contains no rows")]
    EmptyMap,

    /// Move vector is neither cardinal nor zero
    #[error("invalid direction ({dx}, {dy}): expected a cardinal unit vector or (0, 0)")]
    InvalidDirection { dx: i32, dy: i32 },

    /// Internal bookkeeping went wrong (programming error, not user input)
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// Slide walked further than the grid has tiles
    #[error("slide did not terminate after {steps} steps; level is not enclosed")]
    UnboundedSlide { steps: usize },

    #[error("start position ({x}, {y}) is not an open tile on the grid")]
    InvalidStart { x: i32, y: i32 },

    /// Session already ended (goal reached or caught by the avalanche)
    #[error("session is over; reset to play again")]
    SessionOver,

    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings parse error: {0}")]
    Json(#[from] serde_json::Error),
}
