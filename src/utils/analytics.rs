use crate::vehicle::{Stunt, Vehicle};
use serde::Serialize;
use std::fmt::{Display, Formatter};

/// Something noteworthy a vehicle did during the race, kept in its history
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum RaceAction {
    Refueled { liters: f64 },
    Stunt(Stunt),
}

impl RaceAction {
    pub fn is_refuel(&self) -> bool {
        matches!(self, RaceAction::Refueled { .. })
    }
}

impl Display for RaceAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RaceAction::Refueled { liters } => write!(f, "Refueled {} L", liters),
            RaceAction::Stunt(stunt) => write!(f, "{} ({:.2} L)", stunt.kind, stunt.liters),
        }
    }
}

/// Final standing of a single vehicle, derived from the race state.
#[derive(Debug, Serialize)]
pub struct RaceResult<'a> {
    pub vehicle: &'a Vehicle,
    /// 1-based, lower is better
    pub rank: usize,
    /// Total kilometers on the vehicle's odometer
    pub distance: f64,
    /// Kilometers credited to the ledger during the race
    pub credited: f64,
    pub refuel_stops: usize,
    pub actions: &'a [RaceAction],
}

impl<'a> RaceResult<'a> {
    pub fn new(vehicle: &'a Vehicle, rank: usize, credited: f64, actions: &'a [RaceAction]) -> Self {
        Self {
            vehicle,
            rank,
            distance: vehicle.distance(),
            credited,
            refuel_stops: actions.iter().filter(|a| a.is_refuel()).count(),
            actions,
        }
    }
}

/// Human readable summary of how far a vehicle can still go
pub fn describe_range(vehicle: &Vehicle) -> String {
    if vehicle.fuel() > 0.0 {
        format!(
            "With {:.1} L of fuel there is range for {:.0} km",
            vehicle.fuel(),
            vehicle.autonomy().round()
        )
    } else {
        String::from("Not enough fuel")
    }
}

/// Prints the results board
pub fn print_board(race_name: &str, results: &[RaceResult<'_>]) {
    println!("{:-<115}", "");
    println!("Results of '{}'", race_name);
    println!("{:-<115}", "");
    println!(
        "{0: <5} | {1: <20} | {2: <20} | {3: <12} | {4: <12} | {5: <8} | {6: <20}",
        "Pos", "Vehicle", "Type", "Race km", "Odometer", "Refuels", "Range left"
    );
    println!("{:-<115}", "");
    for result in results {
        println!(
            "{0: <5} | {1: <20} | {2: <20} | {3: <12.1} | {4: <12.1} | {5: <8} | {6: <20}",
            result.rank,
            result.vehicle.name(),
            result.vehicle.kind().to_string(),
            result.credited,
            result.distance,
            result.refuel_stops,
            describe_range(result.vehicle)
        );
        for action in result.actions {
            println!("      - {}", action);
        }
    }
    println!();
}
