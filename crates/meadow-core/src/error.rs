//! Error types for the simulation.

use crate::Position;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid grid dimensions: {rows}x{cols}")]
    InvalidDimensions { rows: u32, cols: u32 },

    #[error("seeding densities sum to {total}, must not exceed 1")]
    InvalidDensity { total: f32 },

    /// An animal's stored position diverged from the cell it occupies.
    /// Indicates a broken move or breed transaction; never recovered.
    #[error("animal at cell {index} reports position {stored}")]
    PositionDrift { index: Position, stored: Position },

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
