//! Turn-based race between cars and motorcycles that burn fuel, refuel when
//! they run dry, and are ranked by the distance they cover.

pub mod config;
pub mod error;
pub mod race;
pub mod registry;
pub mod utils;
pub mod vehicle;

pub use config::{RaceConfig, RaceFile, RankingPolicy};
pub use error::{ConfigError, RaceError, VehicleError};
pub use race::{Race, RaceState, TurnReport};
pub use registry::VehicleRegistry;
pub use utils::analytics::{RaceAction, RaceResult};
pub use vehicle::{Stunt, StuntKind, Vehicle, VehicleKind, VehicleSpec};
