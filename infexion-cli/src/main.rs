//! INFEXION CLI - Command-line interface
//!
//! Commands:
//! - solve: Find the shortest winning spread sequence for a puzzle file
//! - benchmark: Time the solver on seeded random puzzles

mod benchmark;
mod solve_cmd;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use benchmark::BenchmarkArgs;
use solve_cmd::SolveArgs;

#[derive(Parser)]
#[command(name = "infexion")]
#[command(about = "Shortest-sequence solver for single-player Infexion boards")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a puzzle file
    Solve(SolveArgs),
    /// Benchmark the solver on random puzzles
    Benchmark(BenchmarkArgs),
}

fn main() -> anyhow::Result<()> {
    // Initialize logging (RUST_LOG overrides), keeping stdout for results
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Solve(args) => solve_cmd::run(args),
        Commands::Benchmark(args) => benchmark::run(args),
    }
}
