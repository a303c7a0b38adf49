mod sim_op_csv_writer;
mod sim_op_mass_energy;
mod sim_op_momentum;
mod sim_op_progress_reporter;

pub use sim_op_csv_writer::CsvWriterOp;
pub use sim_op_mass_energy::MassEnergyOp;
pub use sim_op_momentum::MomentumOp;
pub use sim_op_progress_reporter::ProgressReporterOp;

use crate::sim::Simulation;

pub trait SimOp {
    /// The name of this operator (for identification and lookup)
    fn name(&self) -> &str;

    /// Called once at the beginning of the simulation
    fn init_sim(&mut self, _sim: &mut Simulation) {
        // Default implementation does nothing
    }

    /// Called every simulation step
    fn update_sim(&mut self, _sim: &mut Simulation) {
        // Default implementation does nothing
    }

    /// Called once at the end of the simulation
    fn after_sim(&mut self, _sim: &mut Simulation) {
        // Default implementation does nothing
    }
}

pub struct SimOpHandle {
    pub op: Box<dyn SimOp>,
}

impl SimOpHandle {
    /// Create a new SimOpHandle with the given operation
    pub fn new(op: Box<dyn SimOp>) -> Self {
        SimOpHandle { op }
    }
}
