//! Simulation driver: seeding, the tick loop, and census history.

use crate::grass::{self, Grass};
use crate::grid::{Cell, Grid};
use crate::rabbit::{self, Rabbit};
use crate::wolf::{self, Wolf};
use meadow_core::{
    AgentId, Census, Error, Position, Result, RunStats, SimulationConfig, Species,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::info;

/// The simulation world: a seeded grid advanced one month per `step`.
///
/// Single-threaded and synchronous; every random draw flows through one
/// seeded generator, so runs are reproducible from the configuration alone.
pub struct Simulation {
    grid: Grid,
    config: SimulationConfig,
    rng: ChaCha8Rng,
    month: u64,
    history: Vec<Census>,
    stats: RunStats,
}

impl Simulation {
    /// Build and seed a new world.
    ///
    /// Each cell gets one uniform draw compared against cumulative density
    /// thresholds; seeded animals start at a uniformly random age within
    /// their species bound.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        let world = &config.world;
        let total = world.total_density();
        if total > 1.0 {
            return Err(Error::InvalidDensity { total });
        }

        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let mut grid = Grid::new(world.rows, world.cols)?;

        let positions: Vec<Position> = grid.positions().collect();
        for pos in positions {
            let roll: f32 = rng.gen();
            if roll < world.wolf_density {
                grid.set(pos, Cell::Wolf(Wolf::seeded(&config.wolf, pos, &mut rng)));
            } else if roll < world.wolf_density + world.rabbit_density {
                grid.set(pos, Cell::Rabbit(Rabbit::seeded(&config.rabbit, pos, &mut rng)));
            } else if roll < world.wolf_density + world.rabbit_density + world.grass_density {
                grid.set(pos, Cell::Grass(Grass::new(pos)));
            }
        }

        let seeded = grid.census(0);
        info!(
            rows = world.rows,
            cols = world.cols,
            wolves = seeded.wolves,
            rabbits = seeded.rabbits,
            grass = seeded.grass,
            "world seeded"
        );

        Ok(Self {
            grid,
            config,
            rng,
            month: 0,
            history: vec![seeded],
            stats: RunStats::default(),
        })
    }

    /// Advance the world by one month.
    ///
    /// Occupants are classified once at the start of the tick; the
    /// configured phases then run in order, each agent seeing the grid with
    /// all effects of earlier agents already applied. Entries invalidated
    /// mid-tick (eaten, overwritten, dead) are skipped, never replayed.
    pub fn step(&mut self) -> Result<()> {
        self.month += 1;

        let mut wolves: Vec<(Position, AgentId)> = Vec::new();
        let mut rabbits: Vec<(Position, AgentId)> = Vec::new();
        let mut grasses: Vec<Position> = Vec::new();
        for (pos, cell) in self.grid.iter() {
            match cell {
                Cell::Wolf(wolf) => wolves.push((pos, wolf.id)),
                Cell::Rabbit(rabbit) => rabbits.push((pos, rabbit.id)),
                Cell::Grass(_) => grasses.push(pos),
                Cell::Empty => {}
            }
        }

        let policy = self.config.neighborhood;
        for species in &self.config.phases {
            match species {
                Species::Wolf => {
                    for &(pos, id) in &wolves {
                        wolf::advance(
                            &mut self.grid,
                            pos,
                            id,
                            &self.config.wolf,
                            policy,
                            &mut self.rng,
                            &mut self.stats,
                        );
                    }
                }
                Species::Rabbit => {
                    for &(pos, id) in &rabbits {
                        rabbit::advance(
                            &mut self.grid,
                            pos,
                            id,
                            &self.config.rabbit,
                            policy,
                            &mut self.rng,
                            &mut self.stats,
                        );
                    }
                }
                Species::Grass => {
                    for &pos in &grasses {
                        grass::spread(
                            &mut self.grid,
                            pos,
                            &self.config.grass,
                            policy,
                            &mut self.rng,
                            &mut self.stats,
                        );
                    }
                }
            }
        }

        self.verify_consistency()?;
        self.history.push(self.grid.census(self.month));
        Ok(())
    }

    /// Run for `months` ticks with periodic progress output
    pub fn run(&mut self, months: u64) -> Result<()> {
        info!(months, "starting run");
        for _ in 0..months {
            self.step()?;
            if self.month % 12 == 0 {
                let census = self.census();
                info!(
                    month = census.month,
                    wolves = census.wolves,
                    rabbits = census.rabbits,
                    grass = census.grass,
                    "population census"
                );
            }
        }
        info!(
            month = self.month,
            wolf_births = self.stats.wolf_births,
            wolf_deaths = self.stats.wolf_deaths,
            rabbit_births = self.stats.rabbit_births,
            rabbit_deaths = self.stats.rabbit_deaths,
            rabbits_eaten = self.stats.rabbits_eaten,
            grass_spread = self.stats.grass_spread,
            "run complete"
        );
        Ok(())
    }

    /// Read-only view of the grid; the borrow keeps callers from mutating it
    pub fn snapshot(&self) -> &Grid {
        &self.grid
    }

    /// Current month counter
    pub fn month(&self) -> u64 {
        self.month
    }

    /// Census of the grid as it stands now
    pub fn census(&self) -> Census {
        self.grid.census(self.month)
    }

    /// One census per month, starting with the seeded world at month 0
    pub fn history(&self) -> &[Census] {
        &self.history
    }

    /// Cumulative birth, death, and predation counts
    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Every occupant must report the position of the cell holding it.
    /// A mismatch means a move or breed transaction broke; that is fatal.
    fn verify_consistency(&self) -> Result<()> {
        for (index, cell) in self.grid.iter() {
            let stored = match cell {
                Cell::Wolf(wolf) => wolf.position,
                Cell::Rabbit(rabbit) => rabbit.position,
                Cell::Grass(grass) => grass.position,
                Cell::Empty => continue,
            };
            if stored != index {
                return Err(Error::PositionDrift { index, stored });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meadow_core::{NeighborhoodPolicy, WorldConfig};
    use proptest::prelude::*;

    fn small_config(seed: u64) -> SimulationConfig {
        SimulationConfig {
            seed,
            world: WorldConfig {
                rows: 20,
                cols: 20,
                ..WorldConfig::default()
            },
            ..SimulationConfig::default()
        }
    }

    #[test]
    fn test_rejects_degenerate_dimensions() {
        let mut config = small_config(1);
        config.world.rows = 0;
        assert!(matches!(
            Simulation::new(config),
            Err(Error::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_rejects_overfull_densities() {
        let mut config = small_config(1);
        config.world.grass_density = 0.9;
        config.world.rabbit_density = 0.3;
        assert!(matches!(
            Simulation::new(config),
            Err(Error::InvalidDensity { .. })
        ));
    }

    #[test]
    fn test_seeding_roughly_matches_densities() {
        let sim = Simulation::new(SimulationConfig {
            seed: 42,
            ..SimulationConfig::default()
        })
        .unwrap();

        let census = sim.census();
        let cells = census.total() as f64;
        assert_eq!(cells, 1800.0);

        // 2% wolves, 28% rabbits, 30% grass, with sampling slack
        let wolf_share = census.wolves as f64 / cells;
        let rabbit_share = census.rabbits as f64 / cells;
        let grass_share = census.grass as f64 / cells;
        assert!((0.005..=0.05).contains(&wolf_share), "wolves {wolf_share}");
        assert!((0.22..=0.34).contains(&rabbit_share), "rabbits {rabbit_share}");
        assert!((0.24..=0.36).contains(&grass_share), "grass {grass_share}");
    }

    #[test]
    fn test_seeded_ages_within_species_bounds() {
        let sim = Simulation::new(small_config(7)).unwrap();
        for (_, cell) in sim.snapshot().iter() {
            match cell {
                Cell::Wolf(wolf) => {
                    assert!(wolf.age < 96);
                    assert!((72..=96).contains(&wolf.lifespan));
                }
                Cell::Rabbit(rabbit) => {
                    assert!(rabbit.age < 36);
                    assert!((12..=36).contains(&rabbit.lifespan));
                }
                _ => {}
            }
        }
    }

    #[test]
    fn test_step_increments_month_once() {
        let mut sim = Simulation::new(small_config(3)).unwrap();
        assert_eq!(sim.month(), 0);
        sim.step().unwrap();
        assert_eq!(sim.month(), 1);
        sim.step().unwrap();
        assert_eq!(sim.month(), 2);
    }

    #[test]
    fn test_occupancy_is_conserved_across_ticks() {
        let mut sim = Simulation::new(small_config(9)).unwrap();
        for _ in 0..24 {
            sim.step().unwrap();
            let census = sim.census();
            assert!(census.is_conserving(20, 20), "month {}: {census:?}", sim.month());
        }
    }

    #[test]
    fn test_positions_agree_with_grid_indices() {
        let mut sim = Simulation::new(small_config(13)).unwrap();
        for _ in 0..24 {
            sim.step().unwrap();
        }
        for (index, cell) in sim.snapshot().iter() {
            match cell {
                Cell::Wolf(wolf) => assert_eq!(wolf.position, index),
                Cell::Rabbit(rabbit) => assert_eq!(rabbit.position, index),
                Cell::Grass(grass) => assert_eq!(grass.position, index),
                Cell::Empty => {}
            }
        }
    }

    #[test]
    fn test_snapshot_reads_do_not_mutate() {
        let mut sim = Simulation::new(small_config(17)).unwrap();
        sim.step().unwrap();

        let first = sim.snapshot().clone();
        let first_census = sim.census();
        let second = sim.snapshot().clone();
        let second_census = sim.census();

        assert_eq!(first, second);
        assert_eq!(first_census, second_census);
        assert_eq!(sim.month(), 1);
    }

    #[test]
    fn test_history_records_every_month() {
        let mut sim = Simulation::new(small_config(19)).unwrap();
        sim.run(10).unwrap();
        assert_eq!(sim.history().len(), 11);
        for (month, census) in sim.history().iter().enumerate() {
            assert_eq!(census.month, month as u64);
            assert!(census.is_conserving(20, 20));
        }
    }

    #[test]
    fn test_wolves_only_schedule_leaves_rabbits_untouched() {
        let mut config = small_config(23);
        config.phases = vec![Species::Wolf];
        let mut sim = Simulation::new(config).unwrap();

        let rabbit_ages: Vec<(Position, u32)> = sim
            .snapshot()
            .iter()
            .filter_map(|(pos, cell)| match cell {
                Cell::Rabbit(rabbit) => Some((pos, rabbit.age)),
                _ => None,
            })
            .collect();
        assert!(!rabbit_ages.is_empty());

        sim.step().unwrap();

        // Rabbits neither aged nor moved; some may have been eaten or
        // overwritten by wolves
        for (pos, age) in rabbit_ages {
            if let Cell::Rabbit(rabbit) = sim.snapshot().get(pos) {
                assert_eq!(rabbit.age, age);
            }
        }
    }

    #[test]
    fn test_default_schedule_ages_every_kind() {
        let mut sim = Simulation::new(small_config(29)).unwrap();

        let ages_before: std::collections::HashMap<AgentId, u32> = sim
            .snapshot()
            .iter()
            .filter_map(|(_, cell)| match cell {
                Cell::Wolf(wolf) => Some((wolf.id, wolf.age)),
                Cell::Rabbit(rabbit) => Some((rabbit.id, rabbit.age)),
                _ => None,
            })
            .collect();
        assert!(!ages_before.is_empty());

        sim.step().unwrap();

        // Every animal that survived the tick aged exactly one month;
        // newborns (age 0, unknown id) are not in the map
        let mut survivors = 0;
        for (_, cell) in sim.snapshot().iter() {
            let (id, age) = match cell {
                Cell::Wolf(wolf) => (wolf.id, wolf.age),
                Cell::Rabbit(rabbit) => (rabbit.id, rabbit.age),
                _ => continue,
            };
            if let Some(&before) = ages_before.get(&id) {
                assert_eq!(age, before + 1);
                survivors += 1;
            }
        }
        assert!(survivors > 0);
    }

    #[test]
    fn test_identical_seeds_reproduce_identical_runs() {
        let mut a = Simulation::new(small_config(31)).unwrap();
        let mut b = Simulation::new(small_config(31)).unwrap();
        for _ in 0..12 {
            a.step().unwrap();
            b.step().unwrap();
        }
        assert_eq!(a.snapshot(), b.snapshot());
        assert_eq!(a.history(), b.history());
    }

    #[test]
    fn test_diagonal_policy_runs_clean() {
        let mut config = small_config(37);
        config.neighborhood = NeighborhoodPolicy::DiagonalsOnly;
        let mut sim = Simulation::new(config).unwrap();
        for _ in 0..12 {
            sim.step().unwrap();
            assert!(sim.census().is_conserving(20, 20));
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn prop_conservation_and_consistency_hold(
            seed in 0u64..1000,
            rows in 3u32..16,
            cols in 3u32..16,
            months in 1u64..8,
        ) {
            let config = SimulationConfig {
                seed,
                world: WorldConfig {
                    rows,
                    cols,
                    ..WorldConfig::default()
                },
                ..SimulationConfig::default()
            };
            let mut sim = Simulation::new(config).unwrap();
            for _ in 0..months {
                // step() verifies the position invariant internally
                sim.step().unwrap();
                prop_assert!(sim.census().is_conserving(rows, cols));
            }
            prop_assert_eq!(sim.month(), months);
        }
    }
}
