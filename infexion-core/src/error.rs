//! Error types

/// Rejected board contents
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("cell ({r}, {q}) is outside the board")]
    OutOfBounds { r: i32, q: i32 },

    #[error("cell ({r}, {q}) has power {power}, expected 1..={max}")]
    InvalidPower { r: i8, q: i8, power: i32, max: u8 },

    #[error("cell ({r}, {q}) is listed more than once")]
    DuplicateCell { r: i8, q: i8 },
}

/// Failure to load or parse a puzzle
#[derive(Debug, thiserror::Error)]
pub enum PuzzleError {
    #[error("failed to read puzzle: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid puzzle JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error(transparent)]
    Board(#[from] BoardError),
}

/// Search ended without a winning sequence
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SolveError {
    #[error("no sequence of spreads clears the enemy ({expanded} boards expanded)")]
    NoSolution { expanded: usize },

    #[error("expansion limit of {limit} boards reached before a solution was found")]
    ExpansionLimit { limit: usize },
}
