//! Grass state and spread rules.

use crate::grid::{Cell, Grid};
use meadow_core::{GrassConfig, NeighborhoodPolicy, Position, RunStats, Species};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// A patch of grass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grass {
    pub position: Position,
    /// Carried on the entity; no rule consumes it yet
    pub health: u32,
}

impl Grass {
    pub fn new(position: Position) -> Self {
        Self {
            position,
            health: 100,
        }
    }
}

/// Spread into one empty neighbor when enough grass is established nearby.
///
/// Requires at least `min_grass_neighbors` grass cells and
/// `min_empty_neighbors` empty cells around `pos`; converts a uniformly
/// random empty neighbor. Never touches an occupied cell. `pos` comes from
/// the tick's opening scan; if the grass was overwritten earlier in the
/// tick, the entry is stale and skipped.
pub(crate) fn spread<R: Rng>(
    grid: &mut Grid,
    pos: Position,
    config: &GrassConfig,
    policy: NeighborhoodPolicy,
    rng: &mut R,
    stats: &mut RunStats,
) {
    if !grid.get(pos).is_grass() {
        return;
    }

    let mut grass_neighbors = 0usize;
    let mut empty_cells = Vec::new();
    for neighbor in grid.neighbors(pos, 1, policy) {
        match grid.get(neighbor) {
            Cell::Grass(_) => grass_neighbors += 1,
            Cell::Empty => empty_cells.push(neighbor),
            _ => {}
        }
    }

    if grass_neighbors < config.min_grass_neighbors
        || empty_cells.len() < config.min_empty_neighbors
    {
        return;
    }

    if let Some(&target) = empty_cells.choose(rng) {
        grid.set(target, Cell::Grass(Grass::new(target)));
        stats.record_birth(Species::Grass);
        trace!(position = %target, "grass spread");
    }
}
