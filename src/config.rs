use crate::error::{ConfigError, VehicleError};
use crate::registry::VehicleRegistry;
use crate::vehicle::{Vehicle, VehicleSpec};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::fs::read_to_string;
use std::path::Path;
use std::str::FromStr;

pub const DEFAULT_MIN_ADVANCE: u32 = 10;
pub const DEFAULT_MAX_ADVANCE: u32 = 200;

/// How final ranks are assigned when results are built
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingPolicy {
    /// Rank is the vehicle's slot in the position ledger, which is the
    /// order the participants were entered in. Distance plays no part.
    #[default]
    Ledger,
    /// Rank by distance credited in the ledger, furthest first.
    /// Ledger order breaks ties.
    Distance,
}

impl FromStr for RankingPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ledger" => Ok(RankingPolicy::Ledger),
            "distance" => Ok(RankingPolicy::Distance),
            _ => Err(ConfigError::UnknownRanking(String::from(s))),
        }
    }
}

impl Display for RankingPolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RankingPolicy::Ledger => write!(f, "ledger"),
            RankingPolicy::Distance => write!(f, "distance"),
        }
    }
}

/// Tunables of the race loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaceConfig {
    /// Shortest distance a turn can draw, in km
    pub min_advance: u32,
    /// Longest distance a turn can draw, in km (inclusive)
    pub max_advance: u32,
    /// Stop the driver loop with an error after this many turns
    pub max_turns: Option<u64>,
    /// Seed for the race's random source. Unseeded races use OS entropy.
    pub seed: Option<u64>,
    pub ranking: RankingPolicy,
    /// Probability that the moving vehicle also performs a stunt
    pub stunt_chance: f64,
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            min_advance: DEFAULT_MIN_ADVANCE,
            max_advance: DEFAULT_MAX_ADVANCE,
            max_turns: None,
            seed: None,
            ranking: RankingPolicy::default(),
            stunt_chance: 0.0,
        }
    }
}

impl RaceConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_advance == 0 || self.min_advance > self.max_advance {
            return Err(ConfigError::InvalidAdvanceRange {
                min: self.min_advance,
                max: self.max_advance,
            });
        }
        if !(0.0..=1.0).contains(&self.stunt_chance) {
            return Err(ConfigError::InvalidStuntChance(self.stunt_chance));
        }
        Ok(())
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_max_turns(mut self, max_turns: u64) -> Self {
        self.max_turns = Some(max_turns);
        self
    }

    pub fn with_ranking(mut self, ranking: RankingPolicy) -> Self {
        self.ranking = ranking;
        self
    }

    pub fn with_stunt_chance(mut self, stunt_chance: f64) -> Self {
        self.stunt_chance = stunt_chance;
        self
    }
}

/// A race described in a JSON file: the event itself plus its roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceFile {
    pub name: String,
    pub target_distance: u32,
    pub vehicles: Vec<VehicleSpec>,
    #[serde(default)]
    pub config: RaceConfig,
}

impl RaceFile {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = read_to_string(path)?;
        Self::parse(&raw)
    }

    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let file: RaceFile = serde_json::from_str(raw)?;
        file.config.validate()?;
        Ok(file)
    }

    /// Builds every vehicle of the roster, stopping at the first invalid one
    pub fn build_vehicles(&self, registry: &mut VehicleRegistry) -> Result<Vec<Vehicle>, VehicleError> {
        self.vehicles
            .iter()
            .cloned()
            .map(|spec| Vehicle::new(spec, registry))
            .collect()
    }
}
