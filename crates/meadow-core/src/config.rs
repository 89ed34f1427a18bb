//! Configuration types for the simulation.

use crate::{Result, Species};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// World grid and seeding parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Number of grid rows
    pub rows: u32,
    /// Number of grid columns
    pub cols: u32,
    /// Share of cells seeded with a wolf (0.0 to 1.0)
    pub wolf_density: f32,
    /// Share of cells seeded with a rabbit (0.0 to 1.0)
    pub rabbit_density: f32,
    /// Share of cells seeded with grass (0.0 to 1.0)
    pub grass_density: f32,
}

impl WorldConfig {
    /// Sum of all seeding densities; the remainder of the grid stays empty.
    pub fn total_density(&self) -> f32 {
        self.wolf_density + self.rabbit_density + self.grass_density
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            rows: 30,
            cols: 60,
            wolf_density: 0.02,
            rabbit_density: 0.28,
            grass_density: 0.30,
        }
    }
}

/// Inclusive lifespan bounds in months, sampled once per individual at birth
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LifespanRange {
    pub min: u32,
    pub max: u32,
}

impl LifespanRange {
    pub fn sample<R: Rng>(&self, rng: &mut R) -> u32 {
        rng.gen_range(self.min..=self.max)
    }
}

/// Age-banded breeding probability with a food-reserve adjustment
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BreedProfile {
    /// Fraction of lifespan below which the young-band probability applies
    pub young_cutoff: f32,
    /// Fraction of lifespan below which the middle-band probability applies
    pub middle_cutoff: f32,
    pub young: f32,
    pub middle: f32,
    pub old: f32,
    /// Added when the food reserve is positive
    pub fed_bonus: f32,
    /// Subtracted when the food reserve is zero or negative
    pub hungry_penalty: f32,
}

impl BreedProfile {
    /// Breeding probability for an animal `age` months into `lifespan`
    pub fn chance(&self, age: u32, lifespan: u32, food_intake: f32) -> f32 {
        let age = age as f32;
        let lifespan = lifespan as f32;
        let base = if age < lifespan * self.young_cutoff {
            self.young
        } else if age < lifespan * self.middle_cutoff {
            self.middle
        } else {
            self.old
        };
        if food_intake > 0.0 {
            base + self.fed_bonus
        } else {
            base - self.hungry_penalty
        }
    }
}

/// Age-banded movement probability
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MoveProfile {
    pub young_cutoff: f32,
    pub middle_cutoff: f32,
    pub young: f32,
    pub middle: f32,
    pub old: f32,
}

impl MoveProfile {
    pub fn chance(&self, age: u32, lifespan: u32) -> f32 {
        let age = age as f32;
        let lifespan = lifespan as f32;
        if age < lifespan * self.young_cutoff {
            self.young
        } else if age < lifespan * self.middle_cutoff {
            self.middle
        } else {
            self.old
        }
    }
}

/// Whether an animal's move chance is actually drawn before it moves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveGate {
    /// Move every tick, ignoring the move profile
    Always,
    /// Draw against the move profile; a losing draw skips movement
    AgeBanded,
}

/// Which cells count as neighbors of a position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NeighborhoodPolicy {
    /// Full Chebyshev neighborhood: 8 cells at radius 1
    Moore,
    /// Only cells differing in both row and column: 4 cells at radius 1
    DiagonalsOnly,
}

/// Wolf tunables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WolfConfig {
    /// Minimum age in months before breeding is possible
    pub reproductive_age: u32,
    pub lifespan: LifespanRange,
    /// Exclusive upper bound on randomized starting age at seeding
    pub seed_age_limit: u32,
    /// Food reserve lost per month
    pub hunger_per_month: f32,
    /// Food reserve gained by eating a rabbit
    pub meal_value: f32,
    /// Reserve below which the wolf starves
    pub starvation_threshold: f32,
    pub move_gate: MoveGate,
    pub move_profile: MoveProfile,
    pub breed_profile: BreedProfile,
    /// Minimum count of grass-or-rabbit neighbors required to breed
    pub min_breed_neighbors: usize,
}

impl Default for WolfConfig {
    fn default() -> Self {
        Self {
            reproductive_age: 24,
            lifespan: LifespanRange { min: 72, max: 96 },
            seed_age_limit: 96,
            hunger_per_month: 0.2,
            meal_value: 0.8,
            starvation_threshold: -1.0,
            move_gate: MoveGate::Always,
            move_profile: MoveProfile {
                young_cutoff: 0.75,
                middle_cutoff: 0.9,
                young: 0.7,
                middle: 0.5,
                old: 0.3,
            },
            breed_profile: BreedProfile {
                young_cutoff: 0.75,
                middle_cutoff: 0.9,
                young: 0.6,
                middle: 0.4,
                old: 0.2,
                fed_bonus: 0.1,
                hungry_penalty: 0.5,
            },
            min_breed_neighbors: 3,
        }
    }
}

/// Rabbit tunables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RabbitConfig {
    pub reproductive_age: u32,
    pub lifespan: LifespanRange,
    /// Exclusive upper bound on randomized starting age at seeding
    pub seed_age_limit: u32,
    /// Food reserve lost per month
    pub hunger_per_month: f32,
    /// Food reserve gained by grazing a grass cell
    pub graze_value: f32,
    /// Reserve below which the rabbit starves
    pub starvation_threshold: f32,
    /// Chance that a dead rabbit leaves an empty cell instead of grass
    pub death_to_empty_chance: f32,
    pub move_gate: MoveGate,
    pub move_profile: MoveProfile,
    pub breed_profile: BreedProfile,
    /// Minimum count of grass neighbors required to breed
    pub min_breed_grass: usize,
}

impl Default for RabbitConfig {
    fn default() -> Self {
        Self {
            reproductive_age: 5,
            lifespan: LifespanRange { min: 12, max: 36 },
            seed_age_limit: 36,
            hunger_per_month: 0.1,
            graze_value: 0.3,
            starvation_threshold: -1.0,
            death_to_empty_chance: 0.1,
            move_gate: MoveGate::AgeBanded,
            move_profile: MoveProfile {
                young_cutoff: 0.5,
                middle_cutoff: 0.85,
                young: 0.4,
                middle: 0.7,
                old: 0.2,
            },
            breed_profile: BreedProfile {
                young_cutoff: 0.75,
                middle_cutoff: 0.9,
                young: 0.6,
                middle: 0.4,
                old: 0.2,
                fed_bonus: 0.2,
                hungry_penalty: 0.2,
            },
            min_breed_grass: 3,
        }
    }
}

/// Grass tunables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrassConfig {
    /// Grass neighbors required before spreading
    pub min_grass_neighbors: usize,
    /// Empty neighbors required before spreading
    pub min_empty_neighbors: usize,
}

impl Default for GrassConfig {
    fn default() -> Self {
        Self {
            min_grass_neighbors: 2,
            min_empty_neighbors: 1,
        }
    }
}

/// Aggregate configuration handed to the simulation driver
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Random seed for reproducibility
    pub seed: u64,
    pub world: WorldConfig,
    pub neighborhood: NeighborhoodPolicy,
    /// Species advanced each tick, in order
    pub phases: Vec<Species>,
    pub wolf: WolfConfig,
    pub rabbit: RabbitConfig,
    pub grass: GrassConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            world: WorldConfig::default(),
            neighborhood: NeighborhoodPolicy::Moore,
            phases: vec![Species::Wolf, Species::Rabbit, Species::Grass],
            wolf: WolfConfig::default(),
            rabbit: RabbitConfig::default(),
            grass: GrassConfig::default(),
        }
    }
}

impl SimulationConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_default_configs() {
        let world = WorldConfig::default();
        assert_eq!(world.rows, 30);
        assert_eq!(world.cols, 60);
        assert!(world.total_density() <= 1.0);

        let wolf = WolfConfig::default();
        assert_eq!(wolf.reproductive_age, 24);
        assert_eq!(wolf.move_gate, MoveGate::Always);

        let rabbit = RabbitConfig::default();
        assert_eq!(rabbit.reproductive_age, 5);
        assert_eq!(rabbit.move_gate, MoveGate::AgeBanded);

        let config = SimulationConfig::default();
        assert_eq!(config.neighborhood, NeighborhoodPolicy::Moore);
        assert_eq!(
            config.phases,
            vec![Species::Wolf, Species::Rabbit, Species::Grass]
        );
    }

    #[test]
    fn test_lifespan_range_sampling() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let range = LifespanRange { min: 72, max: 96 };
        for _ in 0..200 {
            let lifespan = range.sample(&mut rng);
            assert!((72..=96).contains(&lifespan));
        }
    }

    #[test]
    fn test_breed_profile_bands() {
        let profile = WolfConfig::default().breed_profile;
        // Well fed: band probability plus the bonus
        assert!((profile.chance(10, 96, 1.0) - 0.7).abs() < 1e-6);
        // Hungry: band probability minus the penalty
        assert!((profile.chance(10, 96, 0.0) - 0.1).abs() < 1e-6);
        // Middle band starts at 75% of lifespan
        assert!((profile.chance(72, 96, 1.0) - 0.5).abs() < 1e-6);
        // Old band starts at 90% of lifespan
        assert!((profile.chance(90, 96, 1.0) - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_move_profile_bands() {
        let profile = RabbitConfig::default().move_profile;
        assert!((profile.chance(5, 36) - 0.4).abs() < 1e-6);
        assert!((profile.chance(20, 36) - 0.7).abs() < 1e-6);
        assert!((profile.chance(35, 36) - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_config_json_round_trip() {
        let config = SimulationConfig::default();
        let json = config.to_json().unwrap();
        let restored = SimulationConfig::from_json(&json).unwrap();
        assert_eq!(restored.seed, config.seed);
        assert_eq!(restored.world.rows, config.world.rows);
        assert_eq!(restored.neighborhood, config.neighborhood);
        assert_eq!(restored.phases, config.phases);
    }
}
