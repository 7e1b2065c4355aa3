use fuel_race::{
    Race, RaceAction, RaceConfig, RaceError, RaceState, RankingPolicy, Vehicle, VehicleRegistry,
    VehicleSpec,
};
use std::sync::atomic::Ordering;

fn grid(registry: &mut VehicleRegistry) -> Vec<Vehicle> {
    vec![
        VehicleSpec::car("Aurora", "Seat", "Panda", 50.0, 5.0, true),
        VehicleSpec::car("Boreal", "BMW", "M8", 80.0, 8.0, false),
        VehicleSpec::motorcycle("Céfiro", "Derbi", "Motoreta", 15.0, 1.5, 500),
        VehicleSpec::motorcycle("Fénix", "Honda", "Vital", 20.0, 2.0, 250),
    ]
    .into_iter()
    .map(|spec| Vehicle::new(spec, registry).unwrap())
    .collect()
}

fn seeded(seed: u64) -> RaceConfig {
    RaceConfig::default().with_seed(seed)
}

#[test]
fn rejects_zero_target() {
    let mut registry = VehicleRegistry::new();
    let result = Race::new("T", 0, grid(&mut registry));
    assert!(matches!(result, Err(RaceError::NonPositiveTarget)));
}

#[test]
fn rejects_empty_grid() {
    let result = Race::new("T", 100, Vec::new());
    assert!(matches!(result, Err(RaceError::NoParticipants)));
}

#[test]
fn rejects_vehicle_entered_twice() {
    let mut first = VehicleRegistry::new();
    let mut second = VehicleRegistry::new();
    let vehicles = vec![
        Vehicle::new(VehicleSpec::car("Gemelo", "Seat", "Leon", 40.0, 4.0, false), &mut first).unwrap(),
        Vehicle::new(VehicleSpec::car("Gemelo", "Seat", "Leon", 40.0, 4.0, false), &mut second).unwrap(),
    ];
    let result = Race::new("T", 100, vehicles);
    assert!(matches!(result, Err(RaceError::DuplicateParticipant(name)) if name == "Gemelo"));
}

#[test]
fn rejects_invalid_config() {
    let mut registry = VehicleRegistry::new();
    let config = RaceConfig {
        min_advance: 0,
        ..RaceConfig::default()
    };
    let result = Race::with_config("T", 100, grid(&mut registry), config);
    assert!(matches!(result, Err(RaceError::Config(_))));
}

#[test]
fn ledger_starts_at_zero_for_everyone() {
    let mut registry = VehicleRegistry::new();
    let race = Race::new("T", 500, grid(&mut registry)).unwrap();
    assert_eq!(race.state(), RaceState::Ready);
    assert_eq!(race.ledger().len(), 4);
    assert!(race.ledger().iter().all(|entry| entry.distance == 0.0));
    assert!(race.determine_winners().is_empty());
}

#[test]
fn single_vehicle_wins_alone() {
    let mut registry = VehicleRegistry::new();
    let vehicle =
        Vehicle::new(VehicleSpec::car("VehicleA", "Seat", "Ibiza", 50.0, 5.0, false), &mut registry)
            .unwrap();
    let mut race = Race::with_config("T", 100, vec![vehicle], seeded(42)).unwrap();

    let mut shortfalls = 0;
    while !race.is_finished() {
        let report = race.step().unwrap();
        assert_eq!(report.vehicle, "VehicleA");
        if report.shortfall > 0.0 {
            shortfalls += 1;
            assert_eq!(report.refueled, Some(50.0));
        }
    }

    let winners = race.determine_winners();
    assert_eq!(winners.len(), 1);
    assert_eq!(winners[0].name(), "VehicleA");
    assert!(race.ledger().get("VehicleA").unwrap() >= 100.0);

    let history = race.history("VehicleA");
    assert!(history.len() >= shortfalls);
    assert!(history.iter().all(RaceAction::is_refuel));
    assert!(
        history
            .iter()
            .all(|action| action.to_string().starts_with("Refueled "))
    );
}

#[test]
fn empty_tank_without_shortfall_is_refueled() {
    // every draw is exactly the car's 50 km range, so the tank runs dry
    // without any shortfall
    let mut registry = VehicleRegistry::new();
    let vehicle =
        Vehicle::new(VehicleSpec::car("Justo", "Seat", "Ibiza", 50.0, 5.0, false), &mut registry)
            .unwrap();
    let config = RaceConfig {
        min_advance: 50,
        max_advance: 50,
        ..seeded(6)
    };
    let mut race = Race::with_config("T", 100, vec![vehicle], config).unwrap();

    let report = race.step().unwrap();
    assert_eq!(report.shortfall, 0.0);
    assert_eq!(report.refueled, Some(50.0));
    assert!(!report.finished);
    assert_eq!(race.vehicle("Justo").unwrap().fuel(), 50.0);
    assert_eq!(race.history("Justo"), &[RaceAction::Refueled { liters: 50.0 }]);
    assert_eq!(race.history("Justo")[0].to_string(), "Refueled 50 L");
}

#[test]
fn results_report_the_whole_odometer() {
    let mut registry = VehicleRegistry::new();
    let vehicle = Vehicle::new(
        VehicleSpec::car("Veterano", "Seat", "600", 50.0, 5.0, false).with_distance(5000.0),
        &mut registry,
    )
    .unwrap();
    let mut race = Race::with_config("T", 100, vec![vehicle], seeded(2)).unwrap();
    race.run().unwrap();

    let results = race.build_results();
    let result = &results[0];
    assert_eq!(result.distance, race.vehicle("Veterano").unwrap().distance());
    assert!(result.distance >= 5100.0);
    assert!((result.distance - 5000.0 - result.credited).abs() < 1e-9);
    assert!(result.credited >= 100.0);
}

#[test]
fn ledger_never_decreases() {
    for seed in 0..20 {
        let mut registry = VehicleRegistry::new();
        let mut race = Race::with_config("T", 800, grid(&mut registry), seeded(seed)).unwrap();
        let mut previous: Vec<f64> = race.ledger().iter().map(|e| e.distance).collect();
        while !race.is_finished() {
            race.step().unwrap();
            let current: Vec<f64> = race.ledger().iter().map(|e| e.distance).collect();
            assert_eq!(current.len(), 4);
            assert!(previous.iter().zip(current.iter()).all(|(p, c)| c >= p));
            previous = current;
        }
    }
}

#[test]
fn winners_are_exactly_the_vehicles_over_target() {
    for seed in 0..20 {
        let mut registry = VehicleRegistry::new();
        let mut race = Race::with_config("T", 400, grid(&mut registry), seeded(seed)).unwrap();
        while !race.is_finished() {
            race.step().unwrap();
            let winners: Vec<&str> = race.determine_winners().iter().map(|v| v.name()).collect();
            let expected: Vec<&str> = race
                .ledger()
                .iter()
                .filter(|e| e.distance >= 400.0)
                .map(|e| e.name.as_str())
                .collect();
            assert_eq!(winners, expected);
            assert_eq!(race.is_finished(), !winners.is_empty());
        }
    }
}

#[test]
fn fuel_stays_in_bounds_during_race() {
    let mut registry = VehicleRegistry::new();
    let config = seeded(11).with_stunt_chance(0.5);
    let mut race = Race::with_config("T", 2000, grid(&mut registry), config).unwrap();
    while !race.is_finished() {
        race.step().unwrap();
        assert!(
            race.participants()
                .iter()
                .all(|v| v.fuel() >= 0.0 && v.fuel() <= v.capacity())
        );
    }
}

#[test]
fn run_terminates_and_finishes() {
    let mut registry = VehicleRegistry::new();
    let mut race = Race::with_config("Prueba", 1000, grid(&mut registry), seeded(7)).unwrap();
    let turns = race.run().unwrap();
    assert!(turns > 0);
    assert_eq!(turns, race.turns());
    assert_eq!(race.state(), RaceState::Finished);
    assert!(!race.determine_winners().is_empty());
}

#[test]
fn same_seed_same_race() {
    let mut first_registry = VehicleRegistry::new();
    let mut second_registry = VehicleRegistry::new();
    let mut first = Race::with_config("T", 600, grid(&mut first_registry), seeded(5)).unwrap();
    let mut second = Race::with_config("T", 600, grid(&mut second_registry), seeded(5)).unwrap();
    assert_eq!(first.run().unwrap(), second.run().unwrap());
    let first_ledger: Vec<f64> = first.ledger().iter().map(|e| e.distance).collect();
    let second_ledger: Vec<f64> = second.ledger().iter().map(|e| e.distance).collect();
    assert_eq!(first_ledger, second_ledger);
}

#[test]
fn running_a_finished_race_fails() {
    let mut registry = VehicleRegistry::new();
    let mut race = Race::with_config("T", 100, grid(&mut registry), seeded(3)).unwrap();
    race.run().unwrap();
    let turns = race.turns();
    assert!(matches!(race.run(), Err(RaceError::AlreadyFinished)));
    assert!(matches!(race.step(), Err(RaceError::AlreadyFinished)));
    assert_eq!(race.turns(), turns);
}

#[test]
fn turn_limit_stops_the_loop() {
    let mut registry = VehicleRegistry::new();
    let config = seeded(1).with_max_turns(5);
    let mut race = Race::with_config("Maraton", u32::MAX, grid(&mut registry), config).unwrap();
    assert!(matches!(race.run(), Err(RaceError::TurnLimitExceeded { limit: 5 })));
    assert_eq!(race.turns(), 5);
    assert_eq!(race.state(), RaceState::Running);
}

#[test]
fn cancelled_race_plays_no_turn() {
    let mut registry = VehicleRegistry::new();
    let mut race = Race::with_config("T", 300, grid(&mut registry), seeded(8)).unwrap();
    let handle = race.cancel_handle();
    handle.store(true, Ordering::Relaxed);
    assert!(matches!(race.run(), Err(RaceError::Cancelled { turns: 0 })));
    assert_eq!(race.state(), RaceState::Ready);

    handle.store(false, Ordering::Relaxed);
    assert!(race.run().is_ok());
    assert!(race.is_finished());
}

#[test]
fn ledger_ranking_follows_entry_order() {
    // Ranks come from the ledger slot, not from the distance covered,
    // so a vehicle far behind can still be ranked first.
    let mut registry = VehicleRegistry::new();
    let mut race = Race::with_config("T", 700, grid(&mut registry), seeded(13)).unwrap();
    race.run().unwrap();
    let results = race.build_results();
    let names: Vec<&str> = results.iter().map(|r| r.vehicle.name()).collect();
    assert_eq!(names, vec!["Aurora", "Boreal", "Céfiro", "Fénix"]);
    let ranks: Vec<usize> = results.iter().map(|r| r.rank).collect();
    assert_eq!(ranks, vec![1, 2, 3, 4]);
}

#[test]
fn distance_ranking_puts_a_winner_first() {
    let mut registry = VehicleRegistry::new();
    let config = seeded(13).with_ranking(RankingPolicy::Distance);
    let mut race = Race::with_config("T", 700, grid(&mut registry), config).unwrap();
    race.run().unwrap();
    let results = race.build_results();
    assert!(results.windows(2).all(|pair| pair[0].credited >= pair[1].credited));
    assert_eq!(results[0].rank, 1);
    assert!(results[0].credited >= 700.0);
}

#[test]
fn results_match_race_state() {
    let mut registry = VehicleRegistry::new();
    let config = seeded(21).with_stunt_chance(0.3);
    let mut race = Race::with_config("T", 900, grid(&mut registry), config).unwrap();
    race.run().unwrap();
    for result in race.build_results() {
        let name = result.vehicle.name();
        assert_eq!(result.actions, race.history(name));
        assert_eq!(
            result.refuel_stops,
            race.history(name).iter().filter(|a| a.is_refuel()).count()
        );
        assert_eq!(result.distance, result.vehicle.distance());
        assert_eq!(Some(result.credited), race.ledger().get(name));
    }
}

#[test]
fn results_are_available_before_the_race() {
    let mut registry = VehicleRegistry::new();
    let race = Race::new("T", 100, grid(&mut registry)).unwrap();
    let results = race.build_results();
    assert_eq!(results.len(), 4);
    assert!(results.iter().all(|r| r.distance == 0.0 && r.refuel_stops == 0));
}
