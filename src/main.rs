use anyhow::Context;
use clap::Parser;
use fuel_race::utils::analytics::print_board;
use fuel_race::{RaceConfig, RaceFile, RankingPolicy, Race, VehicleRegistry, VehicleSpec};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON file with the race and its roster, the sample race is used otherwise
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for a reproducible race
    #[arg(short, long)]
    seed: Option<u64>,

    /// Give up after this many turns
    #[arg(long)]
    max_turns: Option<u64>,

    /// How final positions are assigned (ledger, distance)
    #[arg(long)]
    ranking: Option<RankingPolicy>,

    /// Probability of a stunt on each turn
    #[arg(long)]
    stunt_chance: Option<f64>,

    /// Print results as JSON instead of a table
    #[arg(long)]
    json: bool,
}

/// The race shipped with the program
fn sample_race() -> RaceFile {
    RaceFile {
        name: String::from("Prueba"),
        target_distance: 1000,
        vehicles: vec![
            VehicleSpec::car("Aurora", "Seat", "Panda", 50.0, 5.0, true),
            VehicleSpec::car("Boreal", "BMW", "M8", 80.0, 8.0, false),
            VehicleSpec::motorcycle("Céfiro", "Derbi", "Motoreta", 15.0, 1.5, 500),
            VehicleSpec::car("Dinamo", "Citroen", "Sor", 70.0, 7.0, true),
            VehicleSpec::car("Eclipse", "Renault", "Espacio", 60.0, 6.0, false),
            VehicleSpec::motorcycle("Fénix", "Honda", "Vital", 20.0, 2.0, 250),
        ],
        config: RaceConfig::default(),
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let race_file = match &args.config {
        Some(path) => RaceFile::load(path)
            .with_context(|| format!("failed to load race from {}", path.display()))?,
        None => sample_race(),
    };

    let mut config = race_file.config.clone();
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(max_turns) = args.max_turns {
        config.max_turns = Some(max_turns);
    }
    if let Some(ranking) = args.ranking {
        config.ranking = ranking;
    }
    if let Some(stunt_chance) = args.stunt_chance {
        config.stunt_chance = stunt_chance;
    }

    let mut registry = VehicleRegistry::new();
    let vehicles = race_file.build_vehicles(&mut registry)?;
    let mut race = Race::with_config(&race_file.name, race_file.target_distance, vehicles, config)?;

    if !args.json {
        println!("Let the race '{}' begin!", race.name());
    }
    let turns = race.run()?;
    let results = race.build_results();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    let winners: Vec<&str> = race.determine_winners().iter().map(|v| v.name()).collect();
    println!("Finished after {} turns, winners: {}", turns, winners.join(", "));
    print_board(race.name(), &results);
    Ok(())
}
