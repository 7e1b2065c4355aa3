use crate::config::{RaceConfig, RankingPolicy};
use crate::error::RaceError;
use crate::utils::analytics::{RaceAction, RaceResult};
use crate::utils::ledger::PositionLedger;
use crate::vehicle::{Stunt, Vehicle};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng, rng};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

pub type Num = u64;

/// Lifecycle of a race. `Ready` until the first turn is played,
/// `Finished` as soon as at least one vehicle reaches the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RaceState {
    Ready,
    Running,
    Finished,
}

/// What happened during a single turn
#[derive(Debug, Clone, PartialEq)]
pub struct TurnReport {
    pub turn: Num,
    pub vehicle: String,
    /// Distance drawn for the turn, in km
    pub advance: f64,
    /// Part of `advance` the vehicle could not cover
    pub shortfall: f64,
    pub refueled: Option<f64>,
    pub stunt: Option<Stunt>,
    pub finished: bool,
}

/// Struct representing a race.
///
/// Each turn a random participant is asked to travel a random distance,
/// gets refueled if it ran dry, and the position ledger is recomputed for
/// everyone. The race finishes once any ledger entry reaches the target.
pub struct Race {
    name: String,
    target_distance: u32,
    participants: Vec<Vehicle>,
    /// Odometer of every participant when the race was built
    start_distances: Vec<f64>,
    state: RaceState,
    ledger: PositionLedger,
    history: HashMap<String, Vec<RaceAction>>,
    turns: Num,
    config: RaceConfig,
    rng: StdRng,
    cancelled: Arc<AtomicBool>,
}

impl Race {
    pub fn new(name: &str, target_distance: u32, participants: Vec<Vehicle>) -> Result<Self, RaceError> {
        Self::with_config(name, target_distance, participants, RaceConfig::default())
    }

    pub fn with_config(
        name: &str,
        target_distance: u32,
        participants: Vec<Vehicle>,
        config: RaceConfig,
    ) -> Result<Self, RaceError> {
        if target_distance == 0 {
            return Err(RaceError::NonPositiveTarget);
        }
        if participants.is_empty() {
            return Err(RaceError::NoParticipants);
        }
        config.validate()?;

        let mut ledger = PositionLedger::new();
        for vehicle in participants.iter() {
            if ledger.get(vehicle.name()).is_some() {
                return Err(RaceError::DuplicateParticipant(String::from(vehicle.name())));
            }
            ledger.insert(vehicle.name(), 0.0);
        }

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rng()),
        };

        Ok(Self {
            name: String::from(name),
            target_distance,
            start_distances: participants.iter().map(Vehicle::distance).collect(),
            participants,
            state: RaceState::Ready,
            ledger,
            history: HashMap::new(),
            turns: 0,
            config,
            rng,
            cancelled: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn target_distance(&self) -> u32 {
        self.target_distance
    }

    pub fn participants(&self) -> &[Vehicle] {
        &self.participants
    }

    pub fn vehicle(&self, name: &str) -> Option<&Vehicle> {
        self.participants.iter().find(|v| v.name() == name)
    }

    pub fn state(&self) -> RaceState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state == RaceState::Finished
    }

    /// Turns played so far
    pub fn turns(&self) -> Num {
        self.turns
    }

    pub fn config(&self) -> &RaceConfig {
        &self.config
    }

    pub fn ledger(&self) -> &PositionLedger {
        &self.ledger
    }

    /// Actions recorded for `name`, oldest first
    pub fn history(&self, name: &str) -> &[RaceAction] {
        self.history.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Flag checked at the top of every turn of [`Race::run`].
    /// Storing `true` makes the driver loop stop with [`RaceError::Cancelled`];
    /// storing `false` again allows the race to be resumed.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        self.cancelled.clone()
    }

    /// Plays turns until there is a winner.
    /// Returns the total number of turns played.
    pub fn run(&mut self) -> Result<Num, RaceError> {
        if self.is_finished() {
            return Err(RaceError::AlreadyFinished);
        }
        info!(
            "Race '{}' started: {} participants, {} km",
            self.name,
            self.participants.len(),
            self.target_distance
        );

        loop {
            if self.cancelled.load(Ordering::Relaxed) {
                warn!("Race '{}' cancelled after {} turns", self.name, self.turns);
                return Err(RaceError::Cancelled { turns: self.turns });
            }
            if let Some(limit) = self.config.max_turns {
                if self.turns >= limit {
                    warn!("Race '{}' hit the turn limit of {}", self.name, limit);
                    return Err(RaceError::TurnLimitExceeded { limit });
                }
            }
            if self.step()?.finished {
                return Ok(self.turns);
            }
        }
    }

    /// Plays a single turn.
    pub fn step(&mut self) -> Result<TurnReport, RaceError> {
        if self.is_finished() {
            return Err(RaceError::AlreadyFinished);
        }
        self.state = RaceState::Running;
        self.turns += 1;

        let slot = self.rng.random_range(0..self.participants.len());
        let advance = f64::from(
            self.rng
                .random_range(self.config.min_advance..=self.config.max_advance),
        );
        let wants_stunt =
            self.config.stunt_chance > 0.0 && self.rng.random_bool(self.config.stunt_chance);

        let vehicle = &mut self.participants[slot];
        let shortfall = vehicle.travel(advance);
        debug!(
            "Turn {}: {} drew {} km, short by {} km",
            self.turns,
            vehicle.name(),
            advance,
            shortfall
        );

        // ran out of range during the turn
        let refueled = if shortfall > 0.0 || vehicle.fuel() <= 0.0 {
            let liters = vehicle.fill_up();
            debug!("{} refueled {} L", vehicle.name(), liters);
            Some(liters)
        } else {
            None
        };

        let stunt = if wants_stunt {
            vehicle.perform_stunt()
        } else {
            None
        };
        if let Some(stunt) = stunt {
            debug!("{} performed a {}", vehicle.name(), stunt.kind);
        }

        let name = String::from(vehicle.name());
        if let Some(liters) = refueled {
            self.record_action(&name, RaceAction::Refueled { liters });
        }
        if let Some(stunt) = stunt {
            self.record_action(&name, RaceAction::Stunt(stunt));
        }

        self.update_positions();

        let finished = !self.determine_winners().is_empty();
        if finished {
            self.state = RaceState::Finished;
            let winners: Vec<&str> = self.determine_winners().iter().map(|v| v.name()).collect();
            info!(
                "Race '{}' finished after {} turns, winners: {}",
                self.name,
                self.turns,
                winners.join(", ")
            );
        }

        Ok(TurnReport {
            turn: self.turns,
            vehicle: name,
            advance,
            shortfall,
            refueled,
            stunt,
            finished,
        })
    }

    /// Recomputes the ledger entry of every participant from the distance
    /// it has covered since the race was built.
    fn update_positions(&mut self) {
        for (vehicle, start) in self.participants.iter().zip(self.start_distances.iter()) {
            self.ledger.advance(vehicle.name(), vehicle.distance() - start);
        }
    }

    fn record_action(&mut self, name: &str, action: RaceAction) {
        self.history
            .entry(String::from(name))
            .or_default()
            .push(action);
    }

    /// Every vehicle whose ledger entry has reached the target, in ledger order.
    /// Empty while nobody has crossed the line.
    pub fn determine_winners(&self) -> Vec<&Vehicle> {
        let target = f64::from(self.target_distance);
        self.ledger
            .iter()
            .filter(|entry| entry.distance >= target)
            .filter_map(|entry| self.vehicle(&entry.name))
            .collect()
    }

    /// Final standing of every participant, ordered by rank.
    ///
    /// With [`RankingPolicy::Ledger`] the rank is the vehicle's ledger slot,
    /// i.e. its entry order, regardless of how far it got.
    pub fn build_results(&self) -> Vec<RaceResult<'_>> {
        let mut results: Vec<RaceResult<'_>> = self
            .participants
            .iter()
            .map(|vehicle| {
                let name = vehicle.name();
                RaceResult::new(
                    vehicle,
                    self.ledger.position(name).unwrap_or(0),
                    self.ledger.get(name).unwrap_or(0.0),
                    self.history(name),
                )
            })
            .collect();

        match self.config.ranking {
            RankingPolicy::Ledger => results.sort_by_key(|r| r.rank),
            RankingPolicy::Distance => {
                results.sort_by(|a, b| b.credited.total_cmp(&a.credited).then(a.rank.cmp(&b.rank)));
                for (i, result) in results.iter_mut().enumerate() {
                    result.rank = i + 1;
                }
            }
        }
        results
    }
}
