//! Predator-prey-vegetation simulation engine.
//!
//! This crate implements the grid world where wolves eat rabbits, rabbits
//! eat grass, and grass spreads into open ground, one month per tick.

pub mod grass;
pub mod grid;
pub mod rabbit;
pub mod simulation;
pub mod wolf;

pub use grass::Grass;
pub use grid::{Cell, Grid};
pub use rabbit::Rabbit;
pub use simulation::Simulation;
pub use wolf::Wolf;
