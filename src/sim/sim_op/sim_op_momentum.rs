use crate::momentum::MomentumIntegrator;
use crate::sim::sim_op::{SimOp, SimOpHandle};
use crate::sim::Simulation;

/// Drag-driven velocity and position update.
///
/// With two-way coupling enabled the gas parcel keeps the momentum it
/// received from the droplet for the next step.
#[derive(Debug, Default)]
pub struct MomentumOp {
    integrator: MomentumIntegrator,
}

impl MomentumOp {
    pub fn new() -> Self {
        Self {
            integrator: MomentumIntegrator::new(),
        }
    }

    pub fn handle() -> SimOpHandle {
        SimOpHandle::new(Box::new(Self::new()))
    }
}

impl SimOp for MomentumOp {
    fn name(&self) -> &str {
        "MomentumOp"
    }

    fn update_sim(&mut self, sim: &mut Simulation) {
        let report = self
            .integrator
            .advance(&mut sim.droplet, sim.dt_s, sim.gas_volume_m3, &sim.gas);

        if sim.two_way_coupling {
            sim.gas.velocity_m_s = report.gas_velocity_m_s;
        }

        sim.report_warnings(&report.warnings());
        sim.last_momentum = Some(report);
    }
}
