//! Core type definitions for the simulation.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for an animal instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgentId(pub Uuid);

impl AgentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Id drawn from the simulation's own generator, so identical seeds
    /// produce identical worlds down to the ids
    pub fn from_rng<R: rand::Rng>(rng: &mut R) -> Self {
        Self(Uuid::from_u128(rng.gen()))
    }
}

impl Default for AgentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 2D grid coordinate, row-major
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: u32,
    pub col: u32,
}

impl Position {
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Offset by signed deltas, clipped to `[0, rows) x [0, cols)`.
    ///
    /// Returns `None` when the target leaves the grid; there is no
    /// wraparound.
    pub fn offset(&self, drow: i64, dcol: i64, rows: u32, cols: u32) -> Option<Position> {
        let row = i64::from(self.row) + drow;
        let col = i64::from(self.col) + dcol;
        if row < 0 || col < 0 || row >= i64::from(rows) || col >= i64::from(cols) {
            None
        } else {
            Some(Position::new(row as u32, col as u32))
        }
    }

    /// Chebyshev (chessboard) distance to another position
    pub fn chebyshev_distance(&self, other: &Position) -> u32 {
        let dr = self.row.abs_diff(other.row);
        let dc = self.col.abs_diff(other.col);
        dr.max(dc)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// The three living kinds a cell can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Species {
    Wolf,
    Rabbit,
    Grass,
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Species::Wolf => write!(f, "wolf"),
            Species::Rabbit => write!(f, "rabbit"),
            Species::Grass => write!(f, "grass"),
        }
    }
}
