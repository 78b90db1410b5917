//! Benchmark command - time the solver on random puzzles
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: generate_puzzles(), benchmark_solver(), report_results()
//! - Level 3: solve_sequential(), solve_parallel(), solve_one()
//! - Level 4: timing utilities, formatting

use std::time::{Duration, Instant};

use anyhow::{ensure, Result};
use clap::Args;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use infexion_core::{Puzzle, SolveError, Solver, SolverConfig};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct BenchmarkArgs {
    /// Number of random puzzles to solve
    #[arg(long, default_value = "20")]
    pub puzzles: usize,

    /// Red pieces per puzzle
    #[arg(long, default_value = "2")]
    pub movers: usize,

    /// Blue pieces per puzzle
    #[arg(long, default_value = "3")]
    pub enemies: usize,

    /// Expansion limit per puzzle (random puzzles may be unsolvable)
    #[arg(long, default_value = "50000")]
    pub max_expansions: usize,

    /// Random seed for reproducible puzzles
    #[arg(long)]
    pub seed: Option<u64>,

    /// Solve puzzles on all cores
    #[arg(long)]
    pub parallel: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Outcome of solving one puzzle
#[derive(Clone, Debug)]
enum Outcome {
    Solved { moves: usize, expanded: usize },
    LimitReached,
    Unsolvable,
}

/// Aggregated benchmark results
#[derive(Clone, Debug, Default)]
struct BenchmarkResults {
    puzzles: usize,
    solved: usize,
    limit_reached: usize,
    unsolvable: usize,
    total_moves: usize,
    total_expanded: usize,
    total_time: Duration,
    system_info: String,
}

impl BenchmarkResults {
    fn record(&mut self, outcome: &Outcome) {
        self.puzzles += 1;
        match *outcome {
            Outcome::Solved { moves, expanded } => {
                self.solved += 1;
                self.total_moves += moves;
                self.total_expanded += expanded;
            }
            Outcome::LimitReached => self.limit_reached += 1,
            Outcome::Unsolvable => self.unsolvable += 1,
        }
    }

    fn avg_moves(&self) -> f64 {
        ratio(self.total_moves, self.solved)
    }

    fn avg_expanded(&self) -> f64 {
        ratio(self.total_expanded, self.solved)
    }

    fn puzzles_per_second(&self) -> f64 {
        let secs = self.total_time.as_secs_f64();
        if secs > 0.0 {
            self.puzzles as f64 / secs
        } else {
            0.0
        }
    }
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run benchmark command
///
/// 1. Generate seeded random puzzles
/// 2. Solve each under the expansion limit
/// 3. Report timing and outcome counts
pub fn run(args: BenchmarkArgs) -> Result<()> {
    ensure!(args.puzzles > 0, "--puzzles must be at least 1");
    ensure!(args.movers > 0, "--movers must be at least 1");

    tracing::info!(
        "Starting benchmark: {} puzzles, {} red vs {} blue, limit {}",
        args.puzzles,
        args.movers,
        args.enemies,
        args.max_expansions
    );

    let puzzles = generate_puzzles(&args);
    let results = benchmark_solver(&puzzles, args.max_expansions, args.parallel);

    report_results(&results, &args);

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn generate_puzzles(args: &BenchmarkArgs) -> Vec<Puzzle> {
    let mut rng = create_rng(args.seed);
    (0..args.puzzles)
        .map(|_| Puzzle::random(&mut rng, args.movers, args.enemies))
        .collect()
}

fn benchmark_solver(puzzles: &[Puzzle], max_expansions: usize, parallel: bool) -> BenchmarkResults {
    let solver = Solver::new(SolverConfig::default().with_max_expansions(max_expansions));
    let mut results = BenchmarkResults {
        system_info: get_system_info(),
        ..Default::default()
    };

    let start = Instant::now();
    let outcomes = if parallel {
        solve_parallel(&solver, puzzles)
    } else {
        solve_sequential(&solver, puzzles)
    };
    results.total_time = start.elapsed();

    for (i, outcome) in outcomes.iter().enumerate() {
        tracing::debug!("Puzzle {}: {:?}", i + 1, outcome);
        results.record(outcome);
    }

    results
}

fn report_results(results: &BenchmarkResults, args: &BenchmarkArgs) {
    if args.json {
        print_json_results(results);
    } else {
        print_text_results(results);
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

fn solve_sequential(solver: &Solver, puzzles: &[Puzzle]) -> Vec<Outcome> {
    puzzles.iter().map(|p| solve_one(solver, p)).collect()
}

/// Solve puzzles in parallel using rayon
fn solve_parallel(solver: &Solver, puzzles: &[Puzzle]) -> Vec<Outcome> {
    puzzles.par_iter().map(|p| solve_one(solver, p)).collect()
}

fn solve_one(solver: &Solver, puzzle: &Puzzle) -> Outcome {
    match solver.solve(&puzzle.board) {
        Ok(solution) => Outcome::Solved {
            moves: solution.len(),
            expanded: solution.stats.expanded,
        },
        Err(SolveError::ExpansionLimit { .. }) => Outcome::LimitReached,
        Err(SolveError::NoSolution { .. }) => Outcome::Unsolvable,
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Create RNG from seed or random
fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

fn ratio(total: usize, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        total as f64 / count as f64
    }
}

/// Get system information string
fn get_system_info() -> String {
    format!(
        "infexion {}, {} CPUs",
        env!("CARGO_PKG_VERSION"),
        std::thread::available_parallelism()
            .map(|p| p.get())
            .unwrap_or(1)
    )
}

/// Format duration for display
fn format_duration(d: Duration) -> String {
    if d.as_secs() >= 60 {
        format!("{}m {:.1}s", d.as_secs() / 60, (d.as_secs() % 60) as f64 + d.subsec_millis() as f64 / 1000.0)
    } else if d.as_secs() >= 1 {
        format!("{:.2}s", d.as_secs_f64())
    } else if d.as_millis() >= 1 {
        format!("{:.1}ms", d.as_secs_f64() * 1000.0)
    } else {
        format!("{:.1}us", d.as_secs_f64() * 1_000_000.0)
    }
}

fn print_json_results(results: &BenchmarkResults) {
    #[derive(serde::Serialize)]
    struct JsonOutput {
        system_info: String,
        puzzles: usize,
        solved: usize,
        limit_reached: usize,
        unsolvable: usize,
        avg_moves: f64,
        avg_expanded: f64,
        total_time_ms: u64,
        puzzles_per_second: f64,
    }

    let output = JsonOutput {
        system_info: results.system_info.clone(),
        puzzles: results.puzzles,
        solved: results.solved,
        limit_reached: results.limit_reached,
        unsolvable: results.unsolvable,
        avg_moves: results.avg_moves(),
        avg_expanded: results.avg_expanded(),
        total_time_ms: results.total_time.as_millis() as u64,
        puzzles_per_second: results.puzzles_per_second(),
    };

    if let Ok(json) = serde_json::to_string_pretty(&output) {
        println!("{}", json);
    }
}

fn print_text_results(results: &BenchmarkResults) {
    println!("\n=== INFEXION Solver Benchmark ===");
    println!("System: {}\n", results.system_info);

    println!("Puzzles:        {}", results.puzzles);
    println!("Solved:         {}", results.solved);
    println!("Limit reached:  {}", results.limit_reached);
    println!("Unsolvable:     {}", results.unsolvable);
    println!("Avg moves:      {:.2}", results.avg_moves());
    println!("Avg expanded:   {:.1}", results.avg_expanded());
    println!("Total time:     {}", format_duration(results.total_time));
    println!("Puzzles/s:      {:.2}", results.puzzles_per_second());
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert!(format_duration(Duration::from_millis(500)).contains("ms"));
        assert!(format_duration(Duration::from_secs(5)).contains("s"));
        assert!(format_duration(Duration::from_secs(90)).contains("m"));
    }

    #[test]
    fn test_generate_puzzles_is_seeded() {
        let args = BenchmarkArgs {
            puzzles: 3,
            movers: 2,
            enemies: 2,
            max_expansions: 100,
            seed: Some(9),
            parallel: false,
            json: false,
        };
        let a = generate_puzzles(&args);
        let b = generate_puzzles(&args);
        assert_eq!(a.len(), 3);
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.board, y.board);
        }
    }

    #[test]
    fn test_results_account_for_every_puzzle() {
        let args = BenchmarkArgs {
            puzzles: 4,
            movers: 2,
            enemies: 1,
            max_expansions: 200,
            seed: Some(1),
            parallel: false,
            json: false,
        };
        let puzzles = generate_puzzles(&args);
        for parallel in [false, true] {
            let results = benchmark_solver(&puzzles, args.max_expansions, parallel);
            assert_eq!(results.puzzles, 4);
            assert_eq!(results.solved + results.limit_reached + results.unsolvable, 4);
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let mut rng = create_rng(Some(5));
        let puzzles: Vec<Puzzle> = (0..6).map(|_| Puzzle::random(&mut rng, 2, 2)).collect();
        let solver = Solver::new(SolverConfig::default().with_max_expansions(300));

        let summary = |outcomes: Vec<Outcome>| -> Vec<Option<usize>> {
            outcomes
                .into_iter()
                .map(|o| match o {
                    Outcome::Solved { moves, .. } => Some(moves),
                    Outcome::LimitReached | Outcome::Unsolvable => None,
                })
                .collect()
        };
        let seq = summary(solve_sequential(&solver, &puzzles));
        let par = summary(solve_parallel(&solver, &puzzles));
        assert_eq!(seq.len(), 6);
        assert_eq!(seq, par);
    }

    #[test]
    fn test_get_system_info() {
        let info = get_system_info();
        assert!(info.contains("infexion"));
        assert!(info.contains("CPUs"));
    }
}
