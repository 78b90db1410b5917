//! Precomputed line tables
//!
//! Every cell lies on exactly one line of each kind:
//! - r-line: fixed `q`, `r` runs `0..DIM`
//! - q-line: fixed `r`, `q` runs `0..DIM`
//! - v-line: from `(0, i)`, repeatedly step `(r + 1, q - 1)` with wraparound
//!
//! A spread travels along exactly one of these lines, so the tables back
//! the line-cover heuristic in [`crate::eval`].

use crate::board::{Hex, CELLS, DIM};

const LINE_LEN: usize = DIM as usize;

/// Line orientation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LineKind {
    R = 0,
    Q = 1,
    V = 2,
}

impl LineKind {
    pub const ALL: [LineKind; 3] = [LineKind::R, LineKind::Q, LineKind::V];
}

/// An ordered run of `DIM` distinct cells
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Line {
    pub kind: LineKind,
    cells: [Hex; LINE_LEN],
    mask: u64,
}

impl Line {
    fn new(kind: LineKind, cells: [Hex; LINE_LEN]) -> Self {
        let mask = cells.iter().fold(0u64, |m, hex| m | (1u64 << hex.index()));
        Self { kind, cells, mask }
    }

    pub fn cells(&self) -> &[Hex] {
        &self.cells
    }

    /// Occupancy mask with bit `hex.index()` set for every member
    pub fn mask(&self) -> u64 {
        self.mask
    }

    pub fn contains(&self, hex: Hex) -> bool {
        self.mask & (1u64 << hex.index()) != 0
    }
}

/// Line tables for the whole board, built once and shared by reference
#[derive(Clone, Debug)]
pub struct LineIndex {
    /// `DIM` lines per kind, kinds laid out R, Q, V
    lines: Vec<Line>,
    /// `[kind][cell]` -> index into `lines`
    by_cell: [[u8; CELLS]; 3],
}

impl LineIndex {
    pub fn new() -> Self {
        let mut lines = Vec::with_capacity(3 * LINE_LEN);
        let mut by_cell = [[0u8; CELLS]; 3];

        for kind in LineKind::ALL {
            for i in 0..DIM {
                let mut cells = [Hex::new(0, 0); LINE_LEN];
                for (j, cell) in cells.iter_mut().enumerate() {
                    let j = j as i32;
                    *cell = match kind {
                        LineKind::R => Hex::new(j as i8, i),
                        LineKind::Q => Hex::new(i, j as i8),
                        LineKind::V => Hex::wrapped(j, i as i32 - j),
                    };
                }

                let id = lines.len() as u8;
                for cell in &cells {
                    by_cell[kind as usize][cell.index()] = id;
                }
                lines.push(Line::new(kind, cells));
            }
        }

        Self { lines, by_cell }
    }

    /// The line of the given kind passing through `hex`
    pub fn line(&self, kind: LineKind, hex: Hex) -> &Line {
        &self.lines[self.by_cell[kind as usize][hex.index()] as usize]
    }

    /// `(r_line, q_line, v_line)` through `hex`
    pub fn lines_through(&self, hex: Hex) -> (&Line, &Line, &Line) {
        (
            self.line(LineKind::R, hex),
            self.line(LineKind::Q, hex),
            self.line(LineKind::V, hex),
        )
    }

    /// Masks of the three lines through the cell at `index`
    pub fn masks_through(&self, index: usize) -> [u64; 3] {
        let hex = Hex::from_index(index);
        LineKind::ALL.map(|kind| self.line(kind, hex).mask())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Line> {
        self.lines.iter()
    }
}

impl Default for LineIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::DIRECTIONS;
    use rustc_hash::FxHashSet;

    #[test]
    fn test_line_completeness() {
        let index = LineIndex::new();
        for hex in Hex::all() {
            let (r, q, v) = index.lines_through(hex);
            for line in [r, q, v] {
                let distinct: FxHashSet<Hex> = line.cells().iter().copied().collect();
                assert_eq!(distinct.len(), DIM as usize);
                assert!(line.contains(hex), "{:?} missing from its {:?} line", hex, line.kind);
                assert_eq!(line.mask().count_ones(), DIM as u32);
            }
        }
    }

    #[test]
    fn test_members_share_line() {
        let index = LineIndex::new();
        for hex in Hex::all() {
            for kind in LineKind::ALL {
                let line = index.line(kind, hex);
                for &member in line.cells() {
                    assert!(std::ptr::eq(index.line(kind, member), line));
                }
            }
        }
    }

    #[test]
    fn test_line_shapes() {
        let index = LineIndex::new();
        let (r, q, v) = index.lines_through(Hex::new(2, 3));
        assert!(r.cells().iter().all(|h| h.q == 3));
        assert!(q.cells().iter().all(|h| h.r == 2));
        assert_eq!(v.cells()[0], Hex::new(0, 5));
        assert!(v.contains(Hex::new(6, 6)));
        assert_eq!(index.iter().count(), 3 * DIM as usize);
    }

    #[test]
    fn test_directions_follow_lines() {
        // Walking any direction from any cell stays on one of the cell's lines
        let index = LineIndex::new();
        for hex in Hex::all() {
            for &dir in &DIRECTIONS {
                let walked: Vec<Hex> = (1..DIM as i32)
                    .scan(hex, |cur, _| {
                        *cur = cur.step(dir);
                        Some(*cur)
                    })
                    .collect();
                let on_line = LineKind::ALL.iter().any(|&kind| {
                    let line = index.line(kind, hex);
                    walked.iter().all(|&h| line.contains(h))
                });
                assert!(on_line, "direction {:?} from {:?} leaves every line", dir, hex);
            }
        }
    }
}
