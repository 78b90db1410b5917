//! Board state and the spread move

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::{Hex, CELLS, DIRECTIONS, MAX_POWER};
use crate::error::BoardError;

// ============================================================================
// CORE TYPES
// ============================================================================

/// Piece colour
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Player {
    #[serde(alias = "r")]
    Red = 0,
    #[serde(alias = "b")]
    Blue = 1,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::Red => Player::Blue,
            Player::Blue => Player::Red,
        }
    }

    /// Parse `r`/`b` or `red`/`blue`, case-insensitive
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "r" | "red" => Some(Player::Red),
            "b" | "blue" => Some(Player::Blue),
            _ => None,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::Red => write!(f, "red"),
            Player::Blue => write!(f, "blue"),
        }
    }
}

/// A piece on the board
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub owner: Player,
    pub power: u8,
}

impl Piece {
    pub const fn new(owner: Player, power: u8) -> Self {
        Self { owner, power }
    }
}

/// A spread of the piece at `from` along `DIRECTIONS[direction]`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub from: Hex,
    pub direction: u8,
}

impl Move {
    pub fn new(from: Hex, direction: u8) -> Self {
        Self { from, direction: direction % 6 }
    }

    /// Direction vector `(dr, dq)`
    pub fn vector(&self) -> (i8, i8) {
        DIRECTIONS[self.direction as usize]
    }

    /// `(r, q, dr, dq)`
    pub fn as_tuple(&self) -> (i8, i8, i8, i8) {
        let (dr, dq) = self.vector();
        (self.from.r, self.from.q, dr, dq)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (r, q, dr, dq) = self.as_tuple();
        write!(f, "SPREAD {} {} {} {}", r, q, dr, dq)
    }
}

/// Enemy-occupied cells, bit `hex.index()` per cell
///
/// Two boards with the same enemy placement share a key regardless of
/// powers or mover pieces.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EnemyConfig(pub u64);

impl EnemyConfig {
    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Enemy positions in ascending `(r, q)` order
    pub fn positions(&self) -> impl Iterator<Item = Hex> {
        let bits = self.0;
        (0..CELLS)
            .filter(move |&i| bits & (1u64 << i) != 0)
            .map(Hex::from_index)
    }
}

// ============================================================================
// BOARD
// ============================================================================

/// Board contents: one optional piece per cell (copy to mutate)
///
/// Cells are stored densely by [`Hex::index`], so equality and hashing
/// cover the full position and iteration runs in ascending `(r, q)` order.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [Option<Piece>; CELLS],
}

impl Board {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    pub fn empty() -> Self {
        Self { cells: [None; CELLS] }
    }

    /// Build a board from placements, rejecting bad cells
    pub fn from_cells<I>(cells: I) -> Result<Self, BoardError>
    where
        I: IntoIterator<Item = (Hex, Piece)>,
    {
        let mut board = Self::empty();
        for (hex, piece) in cells {
            if !hex.is_valid() {
                return Err(BoardError::OutOfBounds { r: hex.r as i32, q: hex.q as i32 });
            }
            if piece.power == 0 || piece.power > MAX_POWER {
                return Err(BoardError::InvalidPower {
                    r: hex.r,
                    q: hex.q,
                    power: piece.power as i32,
                    max: MAX_POWER,
                });
            }
            if board.get(hex).is_some() {
                return Err(BoardError::DuplicateCell { r: hex.r, q: hex.q });
            }
            board.cells[hex.index()] = Some(piece);
        }
        Ok(board)
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================
    //
    // Cell arguments must be on the board (`Hex::is_valid`).

    pub fn get(&self, hex: Hex) -> Option<Piece> {
        self.cells[hex.index()]
    }

    /// Place a piece, replacing whatever was there
    pub fn set(&mut self, hex: Hex, piece: Piece) {
        debug_assert!(piece.power >= 1 && piece.power <= MAX_POWER);
        self.cells[hex.index()] = Some(piece);
    }

    pub fn remove(&mut self, hex: Hex) -> Option<Piece> {
        self.cells[hex.index()].take()
    }

    /// Occupied cells in ascending `(r, q)` order
    pub fn pieces(&self) -> impl Iterator<Item = (Hex, Piece)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(i, cell)| cell.map(|piece| (Hex::from_index(i), piece)))
    }

    pub fn len(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|c| c.is_none())
    }

    pub fn count(&self, player: Player) -> usize {
        self.pieces().filter(|(_, p)| p.owner == player).count()
    }

    /// Sum of the powers of `player`'s pieces
    pub fn total_power(&self, player: Player) -> u32 {
        self.pieces()
            .filter(|(_, p)| p.owner == player)
            .map(|(_, p)| p.power as u32)
            .sum()
    }

    /// True once no piece of `enemy` remains
    pub fn is_cleared(&self, enemy: Player) -> bool {
        self.cells.iter().flatten().all(|p| p.owner != enemy)
    }

    /// Cells held by anyone other than `mover`
    pub fn enemy_config(&self, mover: Player) -> EnemyConfig {
        let mask = self
            .cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| matches!(cell, Some(p) if p.owner != mover))
            .fold(0u64, |m, (i, _)| m | (1u64 << i));
        EnemyConfig(mask)
    }

    // ========================================================================
    // MOVE GENERATION
    // ========================================================================

    /// Every spread available to `player`, by cell then direction
    pub fn legal_moves(&self, player: Player) -> Vec<Move> {
        let mut moves = Vec::new();
        for (hex, piece) in self.pieces() {
            if piece.owner != player {
                continue;
            }
            for direction in 0..DIRECTIONS.len() as u8 {
                moves.push(Move::new(hex, direction));
            }
        }
        moves
    }

    /// `(move, resulting board)` for every spread available to `player`
    pub fn successors(&self, player: Player) -> impl Iterator<Item = (Move, Board)> + '_ {
        self.legal_moves(player)
            .into_iter()
            .map(move |mv| (mv, self.apply_move(mv)))
    }

    // ========================================================================
    // APPLY MOVE
    // ========================================================================

    /// Apply move, return new board
    pub fn apply_move(&self, mv: Move) -> Self {
        self.spread(mv.from, mv.direction)
    }

    /// Spread the piece at `source` along `DIRECTIONS[direction]`
    ///
    /// Copies the board (`CELLS` optional pieces) and mutates the copy.
    /// Each of the `power` cells stepped onto gains a piece of the
    /// spreading colour, flips to it with +1 power, or is removed when
    /// already at `MAX_POWER`. The source cell is emptied. Since
    /// `power < DIM`, a spread never wraps back onto its own source.
    /// An empty source returns an unchanged copy. `source` must be on the
    /// board.
    pub fn spread(&self, source: Hex, direction: u8) -> Self {
        let mut next = *self;
        let Some(piece) = next.remove(source) else {
            return next;
        };

        let mut current = source;
        for _ in 0..piece.power {
            current = current.neighbor(direction);
            next.spread_to(current, piece.owner);
        }

        next
    }

    fn spread_to(&mut self, hex: Hex, colour: Player) {
        let cell = &mut self.cells[hex.index()];
        *cell = match *cell {
            None => Some(Piece::new(colour, 1)),
            Some(p) if p.power == MAX_POWER => None,
            Some(p) => Some(Piece::new(colour, p.power + 1)),
        };
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.pieces().map(|(hex, p)| ((hex.r, hex.q), (p.owner, p.power))))
            .finish()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::DIM;

    fn red(power: u8) -> Piece {
        Piece::new(Player::Red, power)
    }

    fn blue(power: u8) -> Piece {
        Piece::new(Player::Blue, power)
    }

    fn board(cells: &[((i8, i8), Piece)]) -> Board {
        Board::from_cells(cells.iter().map(|&((r, q), p)| (Hex::new(r, q), p))).unwrap()
    }

    fn dir(vector: (i8, i8)) -> u8 {
        crate::board::direction_index(vector).unwrap()
    }

    #[test]
    fn test_spread_captures() {
        let b = board(&[((0, 0), red(1)), ((0, 1), blue(1))]);
        let next = b.spread(Hex::new(0, 0), dir((0, 1)));
        assert_eq!(next.get(Hex::new(0, 0)), None);
        assert_eq!(next.get(Hex::new(0, 1)), Some(red(2)));
        assert!(next.is_cleared(Player::Blue));
    }

    #[test]
    fn test_spread_fills_empty_cells() {
        let b = board(&[((3, 3), red(3))]);
        let next = b.spread(Hex::new(3, 3), dir((1, 0)));
        assert_eq!(next.get(Hex::new(3, 3)), None);
        for r in 4..7 {
            assert_eq!(next.get(Hex::new(r, 3)), Some(red(1)));
        }
        assert_eq!(next.len(), 3);
    }

    #[test]
    fn test_spread_reinforces_own_piece() {
        let b = board(&[((1, 1), red(1)), ((1, 2), red(4))]);
        let next = b.spread(Hex::new(1, 1), dir((0, 1)));
        assert_eq!(next.get(Hex::new(1, 2)), Some(red(5)));
    }

    #[test]
    fn test_overload_removes_piece() {
        let b = board(&[((2, 2), red(1)), ((2, 3), blue(MAX_POWER))]);
        let next = b.spread(Hex::new(2, 2), dir((0, 1)));
        assert_eq!(next.get(Hex::new(2, 3)), None);
        assert!(next.is_empty());
    }

    #[test]
    fn test_spread_wraps_around() {
        let b = board(&[((DIM - 1, 4), red(1))]);
        let next = b.spread(Hex::new(DIM - 1, 4), dir((1, 0)));
        assert_eq!(next.get(Hex::new(0, 4)), Some(red(1)));

        let b = board(&[((5, 0), red(2))]);
        let next = b.spread(Hex::new(5, 0), dir((0, -1)));
        assert_eq!(next.get(Hex::new(5, DIM - 1)), Some(red(1)));
        assert_eq!(next.get(Hex::new(5, DIM - 2)), Some(red(1)));
    }

    #[test]
    fn test_full_power_spread_never_lands_on_source() {
        let b = board(&[((0, 0), red(MAX_POWER))]);
        for d in 0..6 {
            let next = b.spread(Hex::new(0, 0), d);
            assert_eq!(next.get(Hex::new(0, 0)), None);
            assert_eq!(next.len(), MAX_POWER as usize);
        }
    }

    fn power_sum(b: &Board) -> u32 {
        b.total_power(Player::Red) + b.total_power(Player::Blue)
    }

    #[test]
    fn test_spread_never_increases_total_power() {
        let b = board(&[
            ((0, 0), red(3)),
            ((0, 1), blue(6)),
            ((0, 2), red(2)),
            ((0, 3), blue(1)),
            ((4, 4), blue(2)),
        ]);
        for (hex, piece) in b.pieces() {
            for d in 0..6 {
                let next = b.spread(hex, d);
                assert!(power_sum(&next) <= power_sum(&b));
                assert!(next.len() <= b.len() + piece.power as usize - 1);
                let enemy = piece.owner.opponent();
                assert!(next.count(enemy) <= b.count(enemy));
                assert_eq!(next.get(hex), None);
            }
        }
    }

    #[test]
    fn test_capture_transfers_power() {
        let b = board(&[((0, 0), red(1)), ((0, 1), blue(2))]);
        let next = b.spread(Hex::new(0, 0), dir((0, 1)));
        assert_eq!(next.total_power(Player::Red), 3);
        assert_eq!(next.total_power(Player::Blue), 0);
        assert_eq!(power_sum(&next), power_sum(&b));
    }

    #[test]
    fn test_spread_leaves_original_untouched() {
        let b = board(&[((0, 0), red(2)), ((0, 1), blue(1))]);
        let before = b;
        let _ = b.spread(Hex::new(0, 0), dir((0, 1)));
        assert_eq!(b, before);
    }

    #[test]
    fn test_enemy_config_ignores_powers() {
        let a = board(&[((0, 0), red(1)), ((3, 3), blue(1)), ((1, 5), blue(2))]);
        let b = board(&[((6, 6), red(5)), ((3, 3), blue(4)), ((1, 5), blue(6))]);
        assert_eq!(a.enemy_config(Player::Red), b.enemy_config(Player::Red));
        let positions: Vec<Hex> = a.enemy_config(Player::Red).positions().collect();
        assert_eq!(positions, vec![Hex::new(1, 5), Hex::new(3, 3)]);
    }

    #[test]
    fn test_legal_moves() {
        let b = board(&[((0, 0), red(1)), ((2, 2), red(2)), ((4, 4), blue(1))]);
        let moves = b.legal_moves(Player::Red);
        assert_eq!(moves.len(), 12);
        assert!(moves.iter().all(|m| b.get(m.from).map(|p| p.owner) == Some(Player::Red)));
        assert_eq!(b.successors(Player::Blue).count(), 6);
    }

    #[test]
    fn test_from_cells_validation() {
        let out = Board::from_cells([(Hex::new(7, 0), red(1))]);
        assert_eq!(out, Err(BoardError::OutOfBounds { r: 7, q: 0 }));

        let weak = Board::from_cells([(Hex::new(0, 0), red(0))]);
        assert!(matches!(weak, Err(BoardError::InvalidPower { power: 0, .. })));

        let strong = Board::from_cells([(Hex::new(0, 0), blue(7))]);
        assert!(matches!(strong, Err(BoardError::InvalidPower { power: 7, .. })));

        let dup = Board::from_cells([(Hex::new(1, 1), red(1)), (Hex::new(1, 1), blue(1))]);
        assert_eq!(dup, Err(BoardError::DuplicateCell { r: 1, q: 1 }));
    }

    #[test]
    fn test_move_tuple() {
        let mv = Move::new(Hex::new(3, 4), 2);
        assert_eq!(mv.as_tuple(), (3, 4, 0, 1));
        assert_eq!(mv.to_string(), "SPREAD 3 4 0 1");
    }

    #[test]
    fn test_player_labels() {
        assert_eq!(Player::from_label("r"), Some(Player::Red));
        assert_eq!(Player::from_label(" Blue"), Some(Player::Blue));
        assert_eq!(Player::from_label("g"), None);
        assert_eq!(Player::Red.opponent(), Player::Blue);
    }
}
