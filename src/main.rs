//! Demand simulator entry point: runs the cold-storage preset for a year.

use std::process;

use demand_sim::config::ScenarioConfig;
use demand_sim::error::SimError;
use demand_sim::sim::LoadProfiles;

fn run() -> Result<LoadProfiles, SimError> {
    let orchestrator = ScenarioConfig::from_preset("cold_storage")?
        .into_use_case()
        .initialize()?;
    Ok(orchestrator.generate_daily_load_profiles())
}

fn main() {
    tracing_subscriber::fmt().without_time().compact().init();

    match run() {
        Ok(profiles) => println!("{}", profiles.report()),
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    }
}
