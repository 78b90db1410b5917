//! INFEXION Core - spread puzzle solver
//!
//! This crate provides the single-player solver for Infexion boards:
//! - Board geometry (toroidal hex grid with axial coordinates)
//! - Line tables for the three board axes
//! - Board state and the spread move
//! - Admissible line-cover heuristic with memoization
//! - A* search for the shortest winning spread sequence
//! - Puzzle file loading and random puzzle generation

pub mod board;
pub mod lines;
pub mod game;
pub mod eval;
pub mod search;
pub mod puzzle;
pub mod error;

// Re-exports for convenient access
pub use board::{Hex, DIRECTIONS, DIM, MAX_POWER};
pub use lines::{Line, LineIndex, LineKind};
pub use game::{Board, EnemyConfig, Move, Piece, Player};
pub use eval::{min_line_cover, HeuristicCache};
pub use search::{solve, SearchStats, Solution, Solver, SolverConfig};
pub use puzzle::Puzzle;
pub use error::{BoardError, PuzzleError, SolveError};
