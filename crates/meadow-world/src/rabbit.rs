//! Rabbit lifecycle: aging, grazing, breeding.

use crate::grass::Grass;
use crate::grid::{Cell, Grid};
use meadow_core::{
    AgentId, MoveGate, NeighborhoodPolicy, Position, RabbitConfig, RunStats, Species,
};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// A rabbit on the grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rabbit {
    pub id: AgentId,
    /// Age in months
    pub age: u32,
    /// Months this individual can live, fixed at birth
    pub lifespan: u32,
    /// Signed energy reserve; grazing raises it, every month lowers it
    pub food_intake: f32,
    pub position: Position,
}

impl Rabbit {
    /// Rabbit with a randomized starting age, used when seeding the world
    pub fn seeded<R: Rng>(config: &RabbitConfig, position: Position, rng: &mut R) -> Self {
        let age = rng.gen_range(0..config.seed_age_limit);
        Self::with_age(config, position, age, rng)
    }

    /// Newborn placed by a parent's breed
    pub fn newborn<R: Rng>(config: &RabbitConfig, position: Position, rng: &mut R) -> Self {
        Self::with_age(config, position, 0, rng)
    }

    fn with_age<R: Rng>(config: &RabbitConfig, position: Position, age: u32, rng: &mut R) -> Self {
        Self {
            id: AgentId::from_rng(rng),
            age,
            lifespan: config.lifespan.sample(rng),
            food_intake: 0.0,
            position,
        }
    }
}

/// Advance one rabbit through grow, move, breed.
///
/// `pos` and `id` come from the tick's opening scan; if the cell no longer
/// holds that rabbit (eaten by a wolf or overwritten earlier in the tick),
/// the entry is stale and skipped.
pub(crate) fn advance<R: Rng>(
    grid: &mut Grid,
    pos: Position,
    id: AgentId,
    config: &RabbitConfig,
    policy: NeighborhoodPolicy,
    rng: &mut R,
    stats: &mut RunStats,
) {
    match grid.get(pos) {
        Cell::Rabbit(rabbit) if rabbit.id == id => {}
        _ => return,
    }

    if grow(grid, pos, config, rng, stats) {
        return;
    }
    let pos = relocate(grid, pos, config, policy, rng);
    breed(grid, pos, config, policy, rng, stats);
}

/// Age one month and pay the hunger cost. Returns true when the rabbit
/// died; its cell becomes empty with a small chance, grass otherwise.
fn grow<R: Rng>(
    grid: &mut Grid,
    pos: Position,
    config: &RabbitConfig,
    rng: &mut R,
    stats: &mut RunStats,
) -> bool {
    let died = match grid.get_mut(pos) {
        Cell::Rabbit(rabbit) => {
            rabbit.age += 1;
            rabbit.food_intake -= config.hunger_per_month;
            rabbit.age > rabbit.lifespan || rabbit.food_intake < config.starvation_threshold
        }
        _ => return true,
    };

    if died {
        let remains = if rng.gen::<f32>() < config.death_to_empty_chance {
            Cell::Empty
        } else {
            Cell::Grass(Grass::new(pos))
        };
        let old = grid.replace(pos, remains);
        if let Cell::Rabbit(rabbit) = old {
            debug!(rabbit = %rabbit.id, position = %pos, age = rabbit.age, "rabbit died");
        }
        stats.record_death(Species::Rabbit);
    }
    died
}

/// Draw against the age-banded move chance, then hop to a neighboring
/// grass cell (grazing it) or an empty cell. The vacated cell becomes
/// empty. Returns the rabbit's position after the move.
fn relocate<R: Rng>(
    grid: &mut Grid,
    pos: Position,
    config: &RabbitConfig,
    policy: NeighborhoodPolicy,
    rng: &mut R,
) -> Position {
    if config.move_gate == MoveGate::AgeBanded {
        let (age, lifespan) = match grid.get(pos) {
            Cell::Rabbit(rabbit) => (rabbit.age, rabbit.lifespan),
            _ => return pos,
        };
        if rng.gen::<f32>() > config.move_profile.chance(age, lifespan) {
            return pos;
        }
    }

    let mut grass_cells = Vec::new();
    let mut empty_cells = Vec::new();
    for neighbor in grid.neighbors(pos, 1, policy) {
        match grid.get(neighbor) {
            Cell::Grass(_) => grass_cells.push(neighbor),
            Cell::Empty => empty_cells.push(neighbor),
            _ => {}
        }
    }

    // Grass first, then open ground
    let (target, grazed) = if let Some(&target) = grass_cells.choose(rng) {
        (target, true)
    } else if let Some(&target) = empty_cells.choose(rng) {
        (target, false)
    } else {
        return pos;
    };

    let mut rabbit = match grid.replace(pos, Cell::Empty) {
        Cell::Rabbit(rabbit) => rabbit,
        _ => return pos,
    };
    rabbit.position = target;
    if grazed {
        rabbit.food_intake += config.graze_value;
        trace!(rabbit = %rabbit.id, from = %pos, to = %target, "rabbit grazed");
    } else {
        trace!(rabbit = %rabbit.id, from = %pos, to = %target, "rabbit moved");
    }
    grid.set(target, Cell::Rabbit(rabbit));
    target
}

/// Attempt to place a newborn on a neighboring grass cell
fn breed<R: Rng>(
    grid: &mut Grid,
    pos: Position,
    config: &RabbitConfig,
    policy: NeighborhoodPolicy,
    rng: &mut R,
    stats: &mut RunStats,
) {
    let (age, lifespan, food_intake) = match grid.get(pos) {
        Cell::Rabbit(rabbit) => (rabbit.age, rabbit.lifespan, rabbit.food_intake),
        _ => return,
    };
    if age < config.reproductive_age {
        return;
    }
    if rng.gen::<f32>() > config.breed_profile.chance(age, lifespan, food_intake) {
        return;
    }

    let grass_cells: Vec<Position> = grid
        .neighbors(pos, 1, policy)
        .into_iter()
        .filter(|&neighbor| grid.get(neighbor).is_grass())
        .collect();
    if grass_cells.len() < config.min_breed_grass {
        return;
    }

    if let Some(&target) = grass_cells.choose(rng) {
        let kit = Rabbit::newborn(config, target, rng);
        debug!(rabbit = %kit.id, position = %target, parent = %pos, "rabbit born");
        grid.set(target, Cell::Rabbit(kit));
        stats.record_birth(Species::Rabbit);
    }
}
