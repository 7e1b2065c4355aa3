use crate::error::VehicleError;
use crate::registry::VehicleRegistry;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Kilometers per liter of a regular car
pub const BASE_KM_PER_LITER: f64 = 10.0;
pub const HYBRID_KM_PER_LITER: f64 = 15.0;
pub const MOTORCYCLE_KM_PER_LITER: f64 = 20.0;

pub const MIN_DISPLACEMENT: u32 = 125;
pub const MAX_DISPLACEMENT: u32 = 1000;

/// Kilometers worth of fuel burnt by a drift
pub const DRIFT_KM: f64 = 5.0;
/// Kilometers worth of fuel burnt by a wheelie
pub const WHEELIE_KM: f64 = 6.5;

/// The closed set of vehicle types that can enter a race.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VehicleKind {
    Car {
        #[serde(default)]
        hybrid: bool,
    },
    Motorcycle {
        displacement: u32,
    },
}

impl VehicleKind {
    /// Kilometers covered per liter of fuel.
    /// A motorcycle keeps the same rate over its whole displacement range,
    /// including the 1000cc ceiling.
    pub fn km_per_liter(&self) -> f64 {
        match self {
            VehicleKind::Car { hybrid: true } => HYBRID_KM_PER_LITER,
            VehicleKind::Car { hybrid: false } => BASE_KM_PER_LITER,
            VehicleKind::Motorcycle { .. } => MOTORCYCLE_KM_PER_LITER,
        }
    }

    pub fn stunt(&self) -> StuntKind {
        match self {
            VehicleKind::Car { .. } => StuntKind::Drift,
            VehicleKind::Motorcycle { .. } => StuntKind::Wheelie,
        }
    }

    fn validate(&self) -> Result<(), VehicleError> {
        if let VehicleKind::Motorcycle { displacement } = *self {
            if !(MIN_DISPLACEMENT..=MAX_DISPLACEMENT).contains(&displacement) {
                return Err(VehicleError::DisplacementOutOfRange {
                    value: displacement,
                    min: MIN_DISPLACEMENT,
                    max: MAX_DISPLACEMENT,
                });
            }
        }
        Ok(())
    }
}

impl Display for VehicleKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            VehicleKind::Car { hybrid: true } => write!(f, "hybrid car"),
            VehicleKind::Car { hybrid: false } => write!(f, "car"),
            VehicleKind::Motorcycle { displacement } => write!(f, "motorcycle {}cc", displacement),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StuntKind {
    Drift,
    Wheelie,
}

impl StuntKind {
    /// Distance the stunt is worth in fuel terms
    pub fn equivalent_distance(&self) -> f64 {
        match self {
            StuntKind::Drift => DRIFT_KM,
            StuntKind::Wheelie => WHEELIE_KM,
        }
    }
}

impl Display for StuntKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StuntKind::Drift => write!(f, "Drift"),
            StuntKind::Wheelie => write!(f, "Wheelie"),
        }
    }
}

/// A stunt that was actually performed and the fuel it cost
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stunt {
    pub kind: StuntKind,
    pub liters: f64,
}

/// Struct used for initialization of vehicles.
/// Holds the raw values a vehicle is built from, nothing here is validated yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleSpec {
    pub name: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub model: String,
    pub capacity: f64,
    pub fuel: f64,
    #[serde(default)]
    pub distance: f64,
    #[serde(flatten)]
    pub kind: VehicleKind,
}

impl VehicleSpec {
    pub fn car(name: &str, brand: &str, model: &str, capacity: f64, fuel: f64, hybrid: bool) -> Self {
        Self {
            name: String::from(name),
            brand: String::from(brand),
            model: String::from(model),
            capacity,
            fuel,
            distance: 0.0,
            kind: VehicleKind::Car { hybrid },
        }
    }

    pub fn motorcycle(
        name: &str,
        brand: &str,
        model: &str,
        capacity: f64,
        fuel: f64,
        displacement: u32,
    ) -> Self {
        Self {
            name: String::from(name),
            brand: String::from(brand),
            model: String::from(model),
            capacity,
            fuel,
            distance: 0.0,
            kind: VehicleKind::Motorcycle { displacement },
        }
    }

    /// Starts the vehicle with some kilometers already on the clock
    pub fn with_distance(mut self, distance: f64) -> Self {
        self.distance = distance;
        self
    }
}

/// A vehicle with a fuel tank, ready to race.
///
/// Fuel stays within `[0, capacity]` and the traveled distance never goes
/// down. Both only change through [`Vehicle::travel`], [`Vehicle::refuel`]
/// and [`Vehicle::perform_stunt`].
#[derive(Debug, Serialize)]
pub struct Vehicle {
    name: String,
    brand: String,
    model: String,
    capacity: f64,
    fuel: f64,
    distance: f64,
    kind: VehicleKind,
}

impl Vehicle {
    /// Validates `spec` and reserves its name in `registry`.
    /// The name is only reserved once every other check has passed.
    pub fn new(spec: VehicleSpec, registry: &mut VehicleRegistry) -> Result<Self, VehicleError> {
        // negated comparisons so NaN is rejected as well
        if !(spec.capacity > 0.0) {
            return Err(VehicleError::NonPositiveCapacity(spec.capacity));
        }
        if !(spec.fuel >= 0.0) {
            return Err(VehicleError::NegativeFuel(spec.fuel));
        }
        if spec.fuel > spec.capacity {
            return Err(VehicleError::FuelExceedsCapacity {
                fuel: spec.fuel,
                capacity: spec.capacity,
            });
        }
        if !(spec.distance >= 0.0) {
            return Err(VehicleError::NegativeDistance(spec.distance));
        }
        spec.kind.validate()?;
        registry.register(&spec.name)?;

        Ok(Self {
            name: spec.name,
            brand: spec.brand,
            model: spec.model,
            capacity: spec.capacity,
            fuel: spec.fuel,
            distance: spec.distance,
            kind: spec.kind,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn brand(&self) -> &str {
        &self.brand
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn kind(&self) -> VehicleKind {
        self.kind
    }

    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    pub fn fuel(&self) -> f64 {
        self.fuel
    }

    /// Cumulative kilometers traveled
    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn km_per_liter(&self) -> f64 {
        self.kind.km_per_liter()
    }

    /// Remaining range in kilometers with the fuel currently in the tank.
    pub fn autonomy(&self) -> f64 {
        self.fuel * self.km_per_liter()
    }

    /// Tries to cover `distance` kilometers.
    ///
    /// If the range is sufficient the whole distance is covered and 0 is
    /// returned. Otherwise the vehicle runs until the tank is empty and the
    /// shortfall (the part it could not cover) is returned.
    /// Non-positive distances leave the vehicle untouched.
    pub fn travel(&mut self, distance: f64) -> f64 {
        if !(distance > 0.0) {
            return 0.0;
        }
        let autonomy = self.autonomy();
        if distance <= autonomy {
            // rounding may leave a hair below zero when the tank is emptied exactly
            self.fuel = (self.fuel - distance / self.km_per_liter()).max(0.0);
            self.distance += distance;
            0.0
        } else {
            self.distance += autonomy;
            self.fuel = 0.0;
            distance - autonomy
        }
    }

    /// Adds up to `amount` liters without overflowing the tank.
    /// Returns the liters actually added; negative amounts add nothing.
    pub fn refuel(&mut self, amount: f64) -> f64 {
        if !(amount > 0.0) {
            return 0.0;
        }
        let added = amount.min(self.capacity - self.fuel).max(0.0);
        self.fuel = (self.fuel + added).min(self.capacity);
        debug_assert!(self.fuel >= 0.0 && self.fuel <= self.capacity);
        added
    }

    /// Fills the tank to capacity, returning the liters added
    pub fn fill_up(&mut self) -> f64 {
        self.refuel(self.capacity)
    }

    /// Burns the fuel a stunt is worth without crediting any distance.
    /// Returns `None` when there is not enough range left to pull it off.
    pub fn perform_stunt(&mut self) -> Option<Stunt> {
        let kind = self.kind.stunt();
        let equivalent = kind.equivalent_distance();
        if self.autonomy() < equivalent {
            return None;
        }
        let liters = equivalent / self.km_per_liter();
        self.fuel = (self.fuel - liters).max(0.0);
        Some(Stunt { kind, liters })
    }
}
