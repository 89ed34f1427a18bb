//! Core types and utilities for the Meadow predator-prey grid simulation.

pub mod census;
pub mod config;
pub mod error;
pub mod types;

pub use census::*;
pub use config::*;
pub use error::{Error, Result};
pub use types::*;
