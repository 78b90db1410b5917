//! A* search for the shortest winning spread sequence
//!
//! ## Architecture
//! - Level 1: `Solver::solve` - search loop
//! - Level 2: frontier ordering, node arena, path reconstruction
//! - Level 3: configuration and statistics

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};

use rustc_hash::FxHashSet;
use tracing::{debug, trace};

use crate::error::SolveError;
use crate::eval::HeuristicCache;
use crate::game::{Board, Move, Player};
use crate::lines::LineIndex;

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Solver configuration
#[derive(Clone, Debug)]
pub struct SolverConfig {
    /// Side that spreads; its opponent must be cleared
    pub mover: Player,
    /// Stop with [`SolveError::ExpansionLimit`] after this many expansions
    pub max_expansions: Option<usize>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            mover: Player::Red,
            max_expansions: None,
        }
    }
}

impl SolverConfig {
    pub fn with_mover(mut self, mover: Player) -> Self {
        self.mover = mover;
        self
    }

    pub fn with_max_expansions(mut self, limit: usize) -> Self {
        self.max_expansions = Some(limit);
        self
    }
}

/// Counters collected during one solve
#[derive(Clone, Debug, Default)]
pub struct SearchStats {
    /// Boards popped and expanded
    pub expanded: usize,
    /// Successor boards produced by spreads
    pub generated: usize,
    /// Successors or popped entries dropped as already visited
    pub duplicates: usize,
    /// Largest frontier size observed
    pub max_frontier: usize,
    pub heuristic_hits: usize,
    pub heuristic_misses: usize,
    pub elapsed: Duration,
}

/// A winning spread sequence
#[derive(Clone, Debug)]
pub struct Solution {
    pub moves: Vec<Move>,
    pub stats: SearchStats,
}

impl Solution {
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Moves as `(r, q, dr, dq)`
    pub fn tuples(&self) -> Vec<(i8, i8, i8, i8)> {
        self.moves.iter().map(Move::as_tuple).collect()
    }
}

// ============================================================================
// FRONTIER
// ============================================================================

/// Node identifier (index into arena)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct NodeId(usize);

/// A reached board and how it was reached
#[derive(Clone, Debug)]
struct SearchNode {
    board: Board,
    parent: Option<NodeId>,
    incoming_move: Option<Move>,
}

/// Frontier entry ordered by ascending `f`, then descending `g`, then
/// ascending insertion index
///
/// Preferring deeper entries among equal `f` is a policy choice; A*
/// optimality only needs the `f` ordering.
#[derive(Clone, Copy, Debug)]
struct FrontierEntry {
    f: u32,
    g: u32,
    index: u64,
    node: NodeId,
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed on f and index: BinaryHeap pops the greatest
        other
            .f
            .cmp(&self.f)
            .then_with(|| self.g.cmp(&other.g))
            .then_with(|| other.index.cmp(&self.index))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierEntry {}

// ============================================================================
// SOLVER
// ============================================================================

/// A* solver; owns the line tables shared by every search it runs
#[derive(Clone, Debug, Default)]
pub struct Solver {
    config: SolverConfig,
    lines: LineIndex,
}

impl Solver {
    pub fn new(config: SolverConfig) -> Self {
        Self {
            config,
            lines: LineIndex::new(),
        }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn lines(&self) -> &LineIndex {
        &self.lines
    }

    /// Find a shortest spread sequence that removes every enemy piece
    ///
    /// Frontier, visited set and heuristic cache live only for this call.
    pub fn solve(&self, initial: &Board) -> Result<Solution, SolveError> {
        let started = Instant::now();
        let mover = self.config.mover;
        let enemy = mover.opponent();
        let mut stats = SearchStats::default();

        if initial.is_cleared(enemy) {
            debug!("initial board already cleared");
            stats.elapsed = started.elapsed();
            return Ok(Solution { moves: Vec::new(), stats });
        }

        let mut cache = HeuristicCache::new(&self.lines);
        let mut nodes = vec![SearchNode {
            board: *initial,
            parent: None,
            incoming_move: None,
        }];
        let mut frontier = BinaryHeap::new();
        frontier.push(FrontierEntry { f: 0, g: 0, index: 0, node: NodeId(0) });
        let mut next_index = 1u64;
        let mut visited: FxHashSet<Board> = FxHashSet::default();

        while let Some(entry) = frontier.pop() {
            let board = nodes[entry.node.0].board;
            if !visited.insert(board) {
                stats.duplicates += 1;
                continue;
            }

            if let Some(limit) = self.config.max_expansions {
                if stats.expanded >= limit {
                    debug!(limit, generated = stats.generated, "expansion limit reached");
                    return Err(SolveError::ExpansionLimit { limit });
                }
            }
            stats.expanded += 1;
            trace!(f = entry.f, g = entry.g, frontier = frontier.len(), "expanding board");

            for (mv, next) in board.successors(mover) {
                stats.generated += 1;

                if visited.contains(&next) {
                    stats.duplicates += 1;
                    continue;
                }

                if next.is_cleared(enemy) {
                    let mut moves = path_to(&nodes, entry.node);
                    moves.push(mv);

                    stats.heuristic_hits = cache.hits();
                    stats.heuristic_misses = cache.misses();
                    stats.elapsed = started.elapsed();
                    debug!(
                        moves = moves.len(),
                        expanded = stats.expanded,
                        generated = stats.generated,
                        configs = cache.len(),
                        "solution found"
                    );
                    return Ok(Solution { moves, stats });
                }

                let g = entry.g + 1;
                let h = cache.estimate(&next, mover);
                nodes.push(SearchNode {
                    board: next,
                    parent: Some(entry.node),
                    incoming_move: Some(mv),
                });
                frontier.push(FrontierEntry {
                    f: g + h,
                    g,
                    index: next_index,
                    node: NodeId(nodes.len() - 1),
                });
                next_index += 1;
            }

            stats.max_frontier = stats.max_frontier.max(frontier.len());
        }

        debug!(expanded = stats.expanded, "frontier exhausted");
        Err(SolveError::NoSolution { expanded: stats.expanded })
    }
}

/// Solve with the default configuration (red spreads, no limit)
pub fn solve(board: &Board) -> Result<Vec<Move>, SolveError> {
    Solver::default().solve(board).map(|solution| solution.moves)
}

/// Moves from the root to `id`, in play order
fn path_to(nodes: &[SearchNode], id: NodeId) -> Vec<Move> {
    let mut moves = Vec::new();
    let mut current = Some(id);
    while let Some(id) = current {
        let node = &nodes[id.0];
        if let Some(mv) = node.incoming_move {
            moves.push(mv);
        }
        current = node.parent;
    }
    moves.reverse();
    moves
}

// ============================================================================
// TESTS
// ============================================================================
