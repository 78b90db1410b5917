//! Toroidal hex board geometry with axial coordinates

use serde::{Deserialize, Serialize};

/// Board dimension (cells per axis)
pub const DIM: i8 = 7;

/// Number of cells on the board
pub const CELLS: usize = (DIM as usize) * (DIM as usize);

/// Highest power a piece may hold
pub const MAX_POWER: u8 = (DIM - 1) as u8;

/// Axial hex coordinates on the torus, each component in `[0, DIM)`
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Hex {
    pub r: i8,
    pub q: i8,
}

impl Hex {
    pub const fn new(r: i8, q: i8) -> Self {
        Self { r, q }
    }

    /// Build a hex from arbitrary coordinates, reducing both modulo `DIM`
    pub fn wrapped(r: i32, q: i32) -> Self {
        let dim = DIM as i32;
        Self::new(r.rem_euclid(dim) as i8, q.rem_euclid(dim) as i8)
    }

    /// Check if this hex lies inside `[0, DIM)` on both axes
    pub fn is_valid(&self) -> bool {
        (0..DIM).contains(&self.r) && (0..DIM).contains(&self.q)
    }

    /// Dense index `r * DIM + q`
    ///
    /// The hex must satisfy [`Hex::is_valid`]; [`Hex::wrapped`] and
    /// [`Hex::from_index`] always produce one.
    pub fn index(&self) -> usize {
        debug_assert!(self.is_valid(), "hex ({}, {}) is outside the board", self.r, self.q);
        self.r as usize * DIM as usize + self.q as usize
    }

    /// Inverse of [`Hex::index`]
    pub fn from_index(index: usize) -> Self {
        let dim = DIM as usize;
        Self::new((index / dim) as i8, (index % dim) as i8)
    }

    /// Get neighbor in direction (0-5), wrapping around the torus
    pub fn neighbor(&self, direction: u8) -> Hex {
        self.step(DIRECTIONS[direction as usize % 6])
    }

    /// Step once by `(dr, dq)`, wrapping around the torus
    pub fn step(&self, (dr, dq): (i8, i8)) -> Hex {
        Hex::wrapped((self.r + dr) as i32, (self.q + dq) as i32)
    }

    /// Iterate every cell in ascending `(r, q)` order
    pub fn all() -> impl Iterator<Item = Hex> {
        (0..CELLS).map(Hex::from_index)
    }
}

/// Direction vectors in axial coordinates (dr, dq)
pub const DIRECTIONS: [(i8, i8); 6] = [
    (1, -1),
    (1, 0),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (0, -1),
];

/// Index of a direction vector in [`DIRECTIONS`]
pub fn direction_index(direction: (i8, i8)) -> Option<u8> {
    DIRECTIONS
        .iter()
        .position(|&d| d == direction)
        .map(|i| i as u8)
}
