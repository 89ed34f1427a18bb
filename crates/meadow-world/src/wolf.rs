//! Wolf lifecycle: aging, hunting, breeding.

use crate::grass::Grass;
use crate::grid::{Cell, Grid};
use meadow_core::{AgentId, MoveGate, NeighborhoodPolicy, Position, RunStats, Species, WolfConfig};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// A wolf on the grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wolf {
    pub id: AgentId,
    /// Age in months
    pub age: u32,
    /// Months this individual can live, fixed at birth
    pub lifespan: u32,
    /// Signed energy reserve; eating raises it, every month lowers it
    pub food_intake: f32,
    pub position: Position,
    /// Where the wolf stood before its last move, for trail reporting
    pub previous_position: Position,
}

impl Wolf {
    /// Wolf with a randomized starting age, used when seeding the world
    pub fn seeded<R: Rng>(config: &WolfConfig, position: Position, rng: &mut R) -> Self {
        let age = rng.gen_range(0..config.seed_age_limit);
        Self::with_age(config, position, age, rng)
    }

    /// Newborn placed by a parent's breed
    pub fn newborn<R: Rng>(config: &WolfConfig, position: Position, rng: &mut R) -> Self {
        Self::with_age(config, position, 0, rng)
    }

    fn with_age<R: Rng>(config: &WolfConfig, position: Position, age: u32, rng: &mut R) -> Self {
        Self {
            id: AgentId::from_rng(rng),
            age,
            lifespan: config.lifespan.sample(rng),
            food_intake: 0.0,
            position,
            previous_position: position,
        }
    }
}

/// Advance one wolf through grow, move, breed.
///
/// `pos` and `id` come from the tick's opening scan; if the cell no longer
/// holds that wolf (overwritten by a newborn earlier in the tick), the
/// entry is stale and skipped.
pub(crate) fn advance<R: Rng>(
    grid: &mut Grid,
    pos: Position,
    id: AgentId,
    config: &WolfConfig,
    policy: NeighborhoodPolicy,
    rng: &mut R,
    stats: &mut RunStats,
) {
    match grid.get(pos) {
        Cell::Wolf(wolf) if wolf.id == id => {}
        _ => return,
    }

    if grow(grid, pos, config, stats) {
        return;
    }
    let pos = relocate(grid, pos, config, policy, rng, stats);
    breed(grid, pos, config, policy, rng, stats);
}

/// Age one month and pay the hunger cost. Returns true when the wolf died;
/// its cell becomes grass.
fn grow(grid: &mut Grid, pos: Position, config: &WolfConfig, stats: &mut RunStats) -> bool {
    let died = match grid.get_mut(pos) {
        Cell::Wolf(wolf) => {
            wolf.age += 1;
            wolf.food_intake -= config.hunger_per_month;
            wolf.age > wolf.lifespan || wolf.food_intake < config.starvation_threshold
        }
        _ => return true,
    };

    if died {
        let old = grid.replace(pos, Cell::Grass(Grass::new(pos)));
        if let Cell::Wolf(wolf) = old {
            debug!(wolf = %wolf.id, position = %pos, age = wolf.age, "wolf died");
        }
        stats.record_death(Species::Wolf);
    }
    died
}

/// Choose a destination and move there, eating a rabbit when one is
/// reachable. The vacated cell becomes grass. Returns the wolf's position
/// after the move; a wolf with no candidate cell stays where it is.
fn relocate<R: Rng>(
    grid: &mut Grid,
    pos: Position,
    config: &WolfConfig,
    policy: NeighborhoodPolicy,
    rng: &mut R,
    stats: &mut RunStats,
) -> Position {
    if config.move_gate == MoveGate::AgeBanded {
        let (age, lifespan) = match grid.get(pos) {
            Cell::Wolf(wolf) => (wolf.age, wolf.lifespan),
            _ => return pos,
        };
        if rng.gen::<f32>() > config.move_profile.chance(age, lifespan) {
            return pos;
        }
    }

    let mut rabbit_cells = Vec::new();
    let mut grass_cells = Vec::new();
    let mut empty_cells = Vec::new();
    for neighbor in grid.neighbors(pos, 1, policy) {
        match grid.get(neighbor) {
            Cell::Rabbit(_) => rabbit_cells.push(neighbor),
            Cell::Grass(_) => grass_cells.push(neighbor),
            Cell::Empty => empty_cells.push(neighbor),
            Cell::Wolf(_) => {}
        }
    }

    // Rabbits first, then grass, then open ground
    let (target, ate) = if let Some(&target) = rabbit_cells.choose(rng) {
        (target, true)
    } else if let Some(&target) = grass_cells.choose(rng) {
        (target, false)
    } else if let Some(&target) = empty_cells.choose(rng) {
        (target, false)
    } else {
        return pos;
    };

    let mut wolf = match grid.replace(pos, Cell::Grass(Grass::new(pos))) {
        Cell::Wolf(wolf) => wolf,
        _ => return pos,
    };
    wolf.previous_position = pos;
    wolf.position = target;
    if ate {
        wolf.food_intake += config.meal_value;
        stats.rabbits_eaten += 1;
        trace!(wolf = %wolf.id, from = %pos, to = %target, "wolf ate a rabbit");
    } else {
        trace!(wolf = %wolf.id, from = %pos, to = %target, "wolf moved");
    }
    grid.set(target, Cell::Wolf(wolf));
    target
}

/// Attempt to place a newborn on a neighboring grass or rabbit cell
fn breed<R: Rng>(
    grid: &mut Grid,
    pos: Position,
    config: &WolfConfig,
    policy: NeighborhoodPolicy,
    rng: &mut R,
    stats: &mut RunStats,
) {
    let (age, lifespan, food_intake) = match grid.get(pos) {
        Cell::Wolf(wolf) => (wolf.age, wolf.lifespan, wolf.food_intake),
        _ => return,
    };
    if age < config.reproductive_age {
        return;
    }
    if rng.gen::<f32>() > config.breed_profile.chance(age, lifespan, food_intake) {
        return;
    }

    let candidates: Vec<Position> = grid
        .neighbors(pos, 1, policy)
        .into_iter()
        .filter(|&neighbor| {
            matches!(grid.get(neighbor), Cell::Grass(_) | Cell::Rabbit(_))
        })
        .collect();
    if candidates.len() < config.min_breed_neighbors {
        return;
    }

    if let Some(&target) = candidates.choose(rng) {
        let cub = Wolf::newborn(config, target, rng);
        debug!(wolf = %cub.id, position = %target, parent = %pos, "wolf born");
        grid.set(target, Cell::Wolf(cub));
        stats.record_birth(Species::Wolf);
    }
}
