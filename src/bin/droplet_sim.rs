//! Runs one droplet scenario.
//!
//! Usage: `droplet_sim [scenario.json] [output.csv]`
//!
//! Without a scenario file the reference water droplet is used.

use droplet_evap_rust::config::ScenarioConfig;
use droplet_evap_rust::sim::{SimProps, Simulation};
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => match ScenarioConfig::from_json_file(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("{}", e);
                return ExitCode::FAILURE;
            }
        },
        None => ScenarioConfig::default(),
    };

    let mut props = SimProps::from_config(&config);
    if let Some(csv_path) = args.next() {
        props = props.with_csv(csv_path);
    }
    props.debug = true;

    let mut sim = Simulation::new(props);
    sim.run();

    ExitCode::SUCCESS
}
