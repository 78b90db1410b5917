//! Solve command - find the shortest spread sequence for one puzzle
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: load_puzzle(), solve_puzzle(), report_solution()
//! - Level 4: formatting utilities

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use infexion_core::{Player, Puzzle, Solution, Solver, SolverConfig};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

/// Colour selectable on the command line
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColourArg {
    Red,
    Blue,
}

impl From<ColourArg> for Player {
    fn from(colour: ColourArg) -> Self {
        match colour {
            ColourArg::Red => Player::Red,
            ColourArg::Blue => Player::Blue,
        }
    }
}

#[derive(Args)]
pub struct SolveArgs {
    /// Puzzle file (JSON, or one `r,q,colour,power` cell per line)
    #[arg(value_name = "FILE")]
    pub puzzle: PathBuf,

    /// Side that spreads; the other colour must be cleared
    #[arg(long, value_enum, default_value = "red")]
    pub mover: ColourArg,

    /// Give up after expanding this many boards
    #[arg(long)]
    pub max_expansions: Option<usize>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run solve command
///
/// 1. Load the puzzle
/// 2. Search for a shortest winning sequence
/// 3. Report the moves
pub fn run(args: SolveArgs) -> Result<()> {
    let puzzle = load_puzzle(&args)?;
    let mover = Player::from(args.mover);

    tracing::info!(
        "Solving {}: {} {} vs {} {}",
        puzzle.name,
        puzzle.board.count(mover),
        mover,
        puzzle.board.count(mover.opponent()),
        mover.opponent()
    );

    let solution = solve_puzzle(&puzzle, &args)?;

    report_solution(&puzzle, &solution, &args);

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn load_puzzle(args: &SolveArgs) -> Result<Puzzle> {
    Puzzle::load(&args.puzzle)
        .with_context(|| format!("Failed to load puzzle: {}", args.puzzle.display()))
}

fn solve_puzzle(puzzle: &Puzzle, args: &SolveArgs) -> Result<Solution> {
    let mut config = SolverConfig::default().with_mover(args.mover.into());
    if let Some(limit) = args.max_expansions {
        config = config.with_max_expansions(limit);
    }

    let solution = Solver::new(config)
        .solve(&puzzle.board)
        .with_context(|| format!("Failed to solve {}", puzzle.name))?;

    tracing::info!(
        "Solved in {} moves ({} boards expanded, {:.1}ms)",
        solution.len(),
        solution.stats.expanded,
        solution.stats.elapsed.as_secs_f64() * 1000.0
    );

    Ok(solution)
}

fn report_solution(puzzle: &Puzzle, solution: &Solution, args: &SolveArgs) {
    if args.json {
        print_json_solution(puzzle, solution);
    } else {
        print_text_solution(solution);
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// One `SPREAD r q dr dq` line per move
fn format_moves(solution: &Solution) -> String {
    solution
        .moves
        .iter()
        .map(|mv| format!("{}\n", mv))
        .collect()
}

fn print_text_solution(solution: &Solution) {
    print!("{}", format_moves(solution));
}

fn print_json_solution(puzzle: &Puzzle, solution: &Solution) {
    #[derive(serde::Serialize)]
    struct JsonStats {
        expanded: usize,
        generated: usize,
        duplicates: usize,
        max_frontier: usize,
        heuristic_hits: usize,
        heuristic_misses: usize,
        elapsed_ms: f64,
    }

    #[derive(serde::Serialize)]
    struct JsonOutput {
        puzzle: String,
        moves: Vec<(i8, i8, i8, i8)>,
        stats: JsonStats,
    }

    let stats = &solution.stats;
    let output = JsonOutput {
        puzzle: puzzle.name.clone(),
        moves: solution.tuples(),
        stats: JsonStats {
            expanded: stats.expanded,
            generated: stats.generated,
            duplicates: stats.duplicates,
            max_frontier: stats.max_frontier,
            heuristic_hits: stats.heuristic_hits,
            heuristic_misses: stats.heuristic_misses,
            elapsed_ms: stats.elapsed.as_secs_f64() * 1000.0,
        },
    };

    if let Ok(json) = serde_json::to_string_pretty(&output) {
        println!("{}", json);
    }
}

// ============================================================================
// TESTS
// ============================================================================
