//! Line-cover heuristic
//!
//! A single spread only touches cells on one line, so the fewest lines
//! needed to cover every enemy cell never exceeds the number of spreads
//! still required. That makes it safe to use as an A* estimate.

use std::collections::VecDeque;

use rustc_hash::FxHashMap;

use crate::game::{Board, EnemyConfig, Player};
use crate::lines::LineIndex;

/// Fewest lines covering every cell in `config`
///
/// Breadth-first over `(remaining cells, lines used)`. Each step branches
/// on the lowest remaining cell: any cover must include one of its three
/// lines, so trying all three per level yields the exact minimum.
pub fn min_line_cover(config: EnemyConfig, lines: &LineIndex) -> u32 {
    if config.is_empty() {
        return 0;
    }

    let mut queue = VecDeque::new();
    queue.push_back((config.0, 0u32));

    while let Some((remaining, used)) = queue.pop_front() {
        if remaining == 0 {
            return used;
        }

        let witness = remaining.trailing_zeros() as usize;
        for mask in lines.masks_through(witness) {
            queue.push_back((remaining & !mask, used + 1));
        }
    }

    // Every branch clears at least the witness, so the queue reaches an empty set
    unreachable!("line cover search exhausted without clearing the board")
}

/// Memoized line-cover estimates keyed by enemy placement
#[derive(Debug)]
pub struct HeuristicCache<'a> {
    lines: &'a LineIndex,
    values: FxHashMap<EnemyConfig, u32>,
    hits: usize,
    misses: usize,
}

impl<'a> HeuristicCache<'a> {
    pub fn new(lines: &'a LineIndex) -> Self {
        Self {
            lines,
            values: FxHashMap::default(),
            hits: 0,
            misses: 0,
        }
    }

    /// Lower bound on spreads `mover` still needs to clear `board`
    pub fn estimate(&mut self, board: &Board, mover: Player) -> u32 {
        self.estimate_config(board.enemy_config(mover))
    }

    pub fn estimate_config(&mut self, config: EnemyConfig) -> u32 {
        if let Some(&value) = self.values.get(&config) {
            self.hits += 1;
            return value;
        }

        self.misses += 1;
        let value = min_line_cover(config, self.lines);
        self.values.insert(config, value);
        value
    }

    /// Lookups answered from the cache
    pub fn hits(&self) -> usize {
        self.hits
    }

    /// Lookups that ran the cover search
    pub fn misses(&self) -> usize {
        self.misses
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Hex;
    use crate::game::Piece;

    fn enemies(cells: &[(i8, i8)]) -> Board {
        let mut cells: Vec<(Hex, Piece)> = cells
            .iter()
            .map(|&(r, q)| (Hex::new(r, q), Piece::new(Player::Blue, 1)))
            .collect();
        cells.push((Hex::new(6, 6), Piece::new(Player::Red, 1)));
        Board::from_cells(cells).unwrap()
    }

    #[test]
    fn test_empty_board_is_zero() {
        let lines = LineIndex::new();
        assert_eq!(min_line_cover(EnemyConfig::default(), &lines), 0);

        let mut cache = HeuristicCache::new(&lines);
        assert_eq!(cache.estimate(&enemies(&[]), Player::Red), 0);
    }

    #[test]
    fn test_single_line() {
        let lines = LineIndex::new();
        let mut cache = HeuristicCache::new(&lines);
        // All on q-line r = 2
        assert_eq!(cache.estimate(&enemies(&[(2, 0), (2, 3), (2, 5)]), Player::Red), 1);
        // All on a v-line: (0,4), (1,3), (5,6)
        assert_eq!(cache.estimate(&enemies(&[(0, 4), (1, 3), (5, 6)]), Player::Red), 1);
    }

    #[test]
    fn test_scattered_enemies() {
        let lines = LineIndex::new();
        let mut cache = HeuristicCache::new(&lines);
        // (0,0), (1,2), (3,5) share no line pairwise
        assert_eq!(cache.estimate(&enemies(&[(0, 0), (1, 2), (3, 5)]), Player::Red), 3);
        // (0,0) and (0,3) share a q-line; (4,1) sits on r-line q = 1
        assert_eq!(cache.estimate(&enemies(&[(0, 0), (0, 3), (4, 1)]), Player::Red), 2);
    }

    #[test]
    fn test_nonzero_iff_enemies_present() {
        let lines = LineIndex::new();
        let mut cache = HeuristicCache::new(&lines);
        for hex in Hex::all() {
            if hex == Hex::new(6, 6) {
                continue;
            }
            let board = enemies(&[(hex.r, hex.q)]);
            assert_eq!(cache.estimate(&board, Player::Red), 1);
        }
    }

    #[test]
    fn test_cache_reuses_configurations() {
        let lines = LineIndex::new();
        let mut cache = HeuristicCache::new(&lines);

        let a = enemies(&[(1, 1), (4, 2)]);
        let mut b = a;
        b.set(Hex::new(1, 1), Piece::new(Player::Blue, 5));
        b.set(Hex::new(3, 3), Piece::new(Player::Red, 2));

        let ha = cache.estimate(&a, Player::Red);
        let hb = cache.estimate(&b, Player::Red);
        assert_eq!(ha, hb);
        assert_eq!(cache.misses(), 1);
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.len(), 1);
    }
}
