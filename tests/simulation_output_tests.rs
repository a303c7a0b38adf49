use droplet_evap_rust::config::{SaturationConfig, ScenarioConfig};
use droplet_evap_rust::report::CollectingSink;
use droplet_evap_rust::sim::{SimProps, Simulation};
use more_asserts::{assert_gt, assert_lt};
use std::cell::RefCell;
use std::fs;
use std::rc::Rc;

fn quiet_config(steps: i32) -> ScenarioConfig {
    let mut config = ScenarioConfig::default();
    config.numerics.steps = steps;
    config.numerics.report_interval = 0;
    config
}

#[test]
fn test_csv_has_header_initial_row_and_one_row_per_step() {
    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("droplet.csv");

    let props = SimProps::from_config(&quiet_config(10)).with_csv(csv_path.to_string_lossy().to_string());
    let mut sim = Simulation::new(props);
    sim.run();

    let content = fs::read_to_string(&csv_path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 12);
    assert_eq!(
        lines[0],
        "step,time_s,temperature_k,diameter_m,mass_kg,velocity_m_s,position_m,mass_rate_kg_s"
    );
    assert!(lines[1].starts_with("0,0.000000,282.000000,"));
    assert!(lines[11].starts_with("10,0.100000,"));

    let diameters: Vec<f64> = lines[1..]
        .iter()
        .map(|line| line.split(',').nth(3).unwrap().parse().unwrap())
        .collect();
    assert!(diameters.windows(2).all(|pair| pair[1] < pair[0]));

    let last_rate: f64 = lines[11].split(',').nth(7).unwrap().parse().unwrap();
    assert_lt!(last_rate, 0.0);
}

#[test]
fn test_scenario_file_drives_simulation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ethanol.json");
    fs::write(
        &path,
        r#"{
            "name": "ethanol_in_warm_air",
            "numerics": { "steps": 25, "report_interval": 0 },
            "gas": { "temperature_k": 320.0, "vapor_mass_fraction": 0.0 },
            "droplet": { "fluid": "ethanol", "diameter_m": 5e-4, "temperature_k": 293.0 }
        }"#,
    )
    .unwrap();

    let config = ScenarioConfig::from_json_file(&path).unwrap();
    let sink = Rc::new(RefCell::new(CollectingSink::default()));
    let mut sim = Simulation::new(SimProps::from_config(&config).with_sink(Box::new(sink.clone())));
    let start_mass = sim.droplet.mass_kg();
    sim.run();

    let collected = sink.borrow();
    assert_eq!(collected.summaries.len(), 25);
    assert_lt!(sim.droplet.mass_kg(), start_mass);
    assert!(collected.summaries.iter().all(|s| s.mass_rate_kg_s <= 0.0));
}

#[test]
fn test_saturated_gas_keeps_droplet_mass() {
    // gas vapor fraction at the droplet's own equilibrium value
    let mut config = quiet_config(20);
    config.droplet.saturation = SaturationConfig::Constant { pressure_pa: Some(1.2192e3) };
    let x_eq: f64 = 1.2192e3 / 101_325.0;
    let theta = 461.5 / 287.0;
    config.gas.vapor_mass_fraction = x_eq / (x_eq + (1.0 - x_eq) * theta);

    let mut sim = Simulation::from_config(&config);
    let start_mass = sim.droplet.mass_kg();
    sim.run();

    let relative_change = (sim.droplet.mass_kg() - start_mass).abs() / start_mass;
    assert_lt!(relative_change, 1e-6);
}

#[test]
fn test_droplet_in_crossflow_picks_up_speed() {
    let mut config = quiet_config(50);
    config.gas.velocity_m_s = 2.0;

    let mut sim = Simulation::from_config(&config);
    sim.run();

    assert_gt!(sim.droplet.velocity.current, 0.0);
    assert_lt!(sim.droplet.velocity.current, 2.0);
    assert_gt!(sim.droplet.position.current, 0.0);
}
