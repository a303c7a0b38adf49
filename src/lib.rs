pub mod config;
pub mod constants;
pub mod droplet_state;
pub mod error;
pub mod evaporation;
pub mod fluid;
pub mod gas;
pub mod mass_energy;
pub mod math_utils;
pub mod momentum;
pub mod report;
pub mod sim;
pub mod temp_utils;
