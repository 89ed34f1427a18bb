//! 2D grid of cells for the world.

use crate::grass::Grass;
use crate::rabbit::Rabbit;
use crate::wolf::Wolf;
use meadow_core::{Census, Error, NeighborhoodPolicy, Position, Result, Species};
use serde::{Deserialize, Serialize};

/// One grid cell and the occupant it owns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    Grass(Grass),
    Rabbit(Rabbit),
    Wolf(Wolf),
}

impl Cell {
    pub fn species(&self) -> Option<Species> {
        match self {
            Cell::Empty => None,
            Cell::Grass(_) => Some(Species::Grass),
            Cell::Rabbit(_) => Some(Species::Rabbit),
            Cell::Wolf(_) => Some(Species::Wolf),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn is_grass(&self) -> bool {
        matches!(self, Cell::Grass(_))
    }

    pub fn is_rabbit(&self) -> bool {
        matches!(self, Cell::Rabbit(_))
    }

    pub fn is_wolf(&self) -> bool {
        matches!(self, Cell::Wolf(_))
    }
}

/// A rectangular, non-wrapping world grid.
///
/// Cells own their occupants, so an animal can never appear in two cells:
/// moving one is a `replace` at the source followed by a `set` at the
/// destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    rows: u32,
    cols: u32,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(rows: u32, cols: u32) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(Error::InvalidDimensions { rows, cols });
        }
        let size = (rows as usize) * (cols as usize);
        Ok(Self {
            rows,
            cols,
            cells: vec![Cell::Empty; size],
        })
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Get the cell at an in-bounds position
    pub fn get(&self, pos: Position) -> &Cell {
        &self.cells[self.pos_to_index(pos)]
    }

    /// Get the cell at an in-bounds position, mutably
    pub fn get_mut(&mut self, pos: Position) -> &mut Cell {
        let index = self.pos_to_index(pos);
        &mut self.cells[index]
    }

    /// Overwrite the cell at a position
    pub fn set(&mut self, pos: Position, cell: Cell) {
        let index = self.pos_to_index(pos);
        self.cells[index] = cell;
    }

    /// Overwrite the cell at a position, returning the previous occupant
    pub fn replace(&mut self, pos: Position, cell: Cell) -> Cell {
        let index = self.pos_to_index(pos);
        std::mem::replace(&mut self.cells[index], cell)
    }

    /// Positions within Chebyshev offset `radius` of `center`, excluding
    /// the center, filtered by `policy` and clipped to the grid bounds.
    /// Out-of-bounds candidates are silently omitted; there is no
    /// wraparound.
    pub fn neighbors(
        &self,
        center: Position,
        radius: u32,
        policy: NeighborhoodPolicy,
    ) -> Vec<Position> {
        let radius = i64::from(radius);
        let mut neighbors = Vec::new();

        for drow in -radius..=radius {
            for dcol in -radius..=radius {
                let keep = match policy {
                    NeighborhoodPolicy::Moore => drow != 0 || dcol != 0,
                    NeighborhoodPolicy::DiagonalsOnly => drow != 0 && dcol != 0,
                };
                if !keep {
                    continue;
                }
                if let Some(pos) = center.offset(drow, dcol, self.rows, self.cols) {
                    neighbors.push(pos);
                }
            }
        }

        neighbors
    }

    fn pos_to_index(&self, pos: Position) -> usize {
        (pos.row as usize) * (self.cols as usize) + (pos.col as usize)
    }

    fn index_to_pos(&self, index: usize) -> Position {
        let row = (index / self.cols as usize) as u32;
        let col = (index % self.cols as usize) as u32;
        Position::new(row, col)
    }

    /// Iterator over all positions, row-major
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.cells.len()).map(move |i| self.index_to_pos(i))
    }

    /// Iterator over all cells with their positions, row-major
    pub fn iter(&self) -> impl Iterator<Item = (Position, &Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (self.index_to_pos(i), cell))
    }

    /// Count occupants by kind in one scan
    pub fn census(&self, month: u64) -> Census {
        let mut census = Census::new(month);
        for cell in &self.cells {
            census.record(cell.species());
        }
        census
    }
}
