use std::io;
use thiserror::Error;

/// Errors raised while constructing a vehicle
#[derive(Debug, Error, PartialEq)]
pub enum VehicleError {
    #[error("fuel capacity must be greater than zero, got {0}")]
    NonPositiveCapacity(f64),
    #[error("current fuel cannot be negative, got {0}")]
    NegativeFuel(f64),
    #[error("current fuel {fuel} exceeds tank capacity {capacity}")]
    FuelExceedsCapacity { fuel: f64, capacity: f64 },
    #[error("traveled distance cannot be negative, got {0}")]
    NegativeDistance(f64),
    #[error("engine displacement must be between {min} and {max}cc, got {value}")]
    DisplacementOutOfRange { value: u32, min: u32, max: u32 },
    #[error("a vehicle named '{0}' already exists")]
    DuplicateName(String),
}

/// Errors raised by the race configuration layer
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("advance range must satisfy 0 < min <= max, got {min}..={max}")]
    InvalidAdvanceRange { min: u32, max: u32 },
    #[error("stunt chance must be within [0, 1], got {0}")]
    InvalidStuntChance(f64),
    #[error("unknown ranking policy '{0}', expected 'ledger' or 'distance'")]
    UnknownRanking(String),
    #[error("could not read race file: {0}")]
    Io(#[from] io::Error),
    #[error("could not parse race file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors raised while building or running a race
#[derive(Debug, Error)]
pub enum RaceError {
    #[error("the race must have a total distance greater than zero")]
    NonPositiveTarget,
    #[error("the participant list cannot be empty")]
    NoParticipants,
    #[error("vehicle '{0}' is entered more than once")]
    DuplicateParticipant(String),
    #[error("the race has already finished")]
    AlreadyFinished,
    #[error("no winner after {limit} turns")]
    TurnLimitExceeded { limit: u64 },
    #[error("race cancelled after {turns} turns")]
    Cancelled { turns: u64 },
    #[error(transparent)]
    Config(#[from] ConfigError),
}
