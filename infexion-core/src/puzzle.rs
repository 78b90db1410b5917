//! Puzzle files - starting boards on disk
//!
//! Two formats are accepted:
//! - JSON: `{"name": "...", "cells": [{"r": 0, "q": 0, "player": "red", "power": 1}]}`
//! - Text: one `r,q,colour,power` cell per line, `#` comments allowed

use std::path::Path;

use rand::seq::index::sample;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::board::{Hex, CELLS, DIM, MAX_POWER};
use crate::error::{BoardError, PuzzleError};
use crate::game::{Board, Piece, Player};

/// One occupied cell as written in a puzzle file
#[derive(Clone, Debug, Serialize, Deserialize)]
struct CellEntry {
    r: i32,
    q: i32,
    player: Player,
    power: i32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct PuzzleFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    cells: Vec<CellEntry>,
}

/// A named starting board
#[derive(Clone, Debug)]
pub struct Puzzle {
    pub name: String,
    pub board: Board,
}

impl Puzzle {
    pub fn new(name: impl Into<String>, board: Board) -> Self {
        Self { name: name.into(), board }
    }

    /// Load from a file, choosing the format by extension or content
    pub fn load(path: &Path) -> Result<Self, PuzzleError> {
        let content = std::fs::read_to_string(path)?;
        let is_json = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let mut puzzle = if is_json {
            Self::from_json(&content)?
        } else {
            Self::parse(&content)?
        };

        if puzzle.name == "unnamed" {
            if let Some(stem) = path.file_stem() {
                puzzle.name = stem.to_string_lossy().into_owned();
            }
        }
        Ok(puzzle)
    }

    /// Save as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), PuzzleError> {
        let file = PuzzleFile {
            name: Some(self.name.clone()),
            cells: self
                .board
                .pieces()
                .map(|(hex, piece)| CellEntry {
                    r: hex.r as i32,
                    q: hex.q as i32,
                    player: piece.owner,
                    power: piece.power as i32,
                })
                .collect(),
        };
        let content = serde_json::to_string_pretty(&file)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Parse either format, JSON when the first non-space character is `{`
    pub fn parse(content: &str) -> Result<Self, PuzzleError> {
        if content.trim_start().starts_with('{') {
            Self::from_json(content)
        } else {
            Self::from_text(content)
        }
    }

    pub fn from_json(content: &str) -> Result<Self, PuzzleError> {
        let file: PuzzleFile = serde_json::from_str(content)?;
        let cells = file
            .cells
            .iter()
            .map(|c| checked_cell(c.r, c.q, c.player, c.power))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name: file.name.unwrap_or_else(|| "unnamed".to_string()),
            board: Board::from_cells(cells)?,
        })
    }

    pub fn from_text(content: &str) -> Result<Self, PuzzleError> {
        let mut cells = Vec::new();

        for (i, raw) in content.lines().enumerate() {
            let line = i + 1;
            let text = raw.split('#').next().unwrap_or("").trim();
            if text.is_empty() {
                continue;
            }

            let fields: Vec<&str> = text.split(',').map(str::trim).collect();
            let &[r, q, colour, power] = fields.as_slice() else {
                return Err(PuzzleError::Parse {
                    line,
                    message: format!("expected 4 fields `r,q,colour,power`, found {}", fields.len()),
                });
            };

            let number = |field: &str, what: &str| {
                field.parse::<i32>().map_err(|_| PuzzleError::Parse {
                    line,
                    message: format!("invalid {} `{}`", what, field),
                })
            };
            let r = number(r, "r coordinate")?;
            let q = number(q, "q coordinate")?;
            let power = number(power, "power")?;
            let player = Player::from_label(colour).ok_or_else(|| PuzzleError::Parse {
                line,
                message: format!("unknown colour `{}`", colour),
            })?;

            cells.push(checked_cell(r, q, player, power)?);
        }

        Ok(Self {
            name: "unnamed".to_string(),
            board: Board::from_cells(cells)?,
        })
    }

    /// Text form, one cell per line
    pub fn to_text(&self) -> String {
        self.board
            .pieces()
            .map(|(hex, piece)| {
                let colour = match piece.owner {
                    Player::Red => 'r',
                    Player::Blue => 'b',
                };
                format!("{},{},{},{}\n", hex.r, hex.q, colour, piece.power)
            })
            .collect()
    }

    /// Random board with `movers` red and `enemies` blue pieces on distinct cells
    ///
    /// Not guaranteed solvable.
    pub fn random<R: Rng>(rng: &mut R, movers: usize, enemies: usize) -> Self {
        let movers = movers.min(CELLS);
        let enemies = enemies.min(CELLS - movers);
        let picks = sample(rng, CELLS, movers + enemies);

        let mut board = Board::empty();
        for (i, index) in picks.iter().enumerate() {
            let owner = if i < movers { Player::Red } else { Player::Blue };
            let power = rng.gen_range(1..=MAX_POWER);
            board.set(Hex::from_index(index), Piece::new(owner, power));
        }

        Self::new(format!("random-{}v{}", movers, enemies), board)
    }
}

/// Range-check raw coordinates and power before they reach the board
fn checked_cell(r: i32, q: i32, player: Player, power: i32) -> Result<(Hex, Piece), BoardError> {
    let dim = DIM as i32;
    if !(0..dim).contains(&r) || !(0..dim).contains(&q) {
        return Err(BoardError::OutOfBounds { r, q });
    }
    if !(1..=MAX_POWER as i32).contains(&power) {
        return Err(BoardError::InvalidPower {
            r: r as i8,
            q: q as i8,
            power,
            max: MAX_POWER,
        });
    }
    Ok((Hex::new(r as i8, q as i8), Piece::new(player, power as u8)))
}
