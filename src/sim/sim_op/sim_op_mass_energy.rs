use crate::mass_energy::MassEnergyIntegrator;
use crate::sim::sim_op::{SimOp, SimOpHandle};
use crate::sim::Simulation;

/// Mass and energy update for the droplet. Must precede `MomentumOp`.
#[derive(Debug, Default)]
pub struct MassEnergyOp;

impl MassEnergyOp {
    pub fn new() -> Self {
        Self
    }

    pub fn handle() -> SimOpHandle {
        SimOpHandle::new(Box::new(Self::new()))
    }
}

impl SimOp for MassEnergyOp {
    fn name(&self) -> &str {
        "MassEnergyOp"
    }

    fn update_sim(&mut self, sim: &mut Simulation) {
        let integrator = MassEnergyIntegrator::new(sim.phase.as_ref());
        let report = integrator.advance(&mut sim.droplet, sim.dt_s, &sim.gas);

        sim.report_warnings(&report.warnings());
        sim.last_mass_energy = Some(report);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScenarioConfig;
    use more_asserts::assert_lt;

    #[test]
    fn test_records_report() {
        let mut config = ScenarioConfig::default();
        config.numerics.report_interval = 0;
        let mut sim = Simulation::from_config(&config);
        let mut op = MassEnergyOp::new();

        sim.step_with_ops(&mut [&mut op as &mut dyn SimOp]);

        let report = sim.last_mass_energy.unwrap();
        assert_lt!(report.mass_rate_kg_s, 0.0);
        assert!(report.warnings().is_empty());
    }
}
