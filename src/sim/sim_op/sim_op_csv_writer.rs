use crate::report::StepSummary;
use crate::sim::sim_op::{SimOp, SimOpHandle};
use crate::sim::Simulation;
use std::fs::OpenOptions;
use std::io::Write;

pub const CSV_HEADER: &str =
    "step,time_s,temperature_k,diameter_m,mass_kg,velocity_m_s,position_m,mass_rate_kg_s";

/// CSV Writer Operator
///
/// Writes one row per step, plus the initial state as step 0:
/// - step, time_s: step number and simulated time
/// - temperature_k, diameter_m, mass_kg: droplet thermal and size state
/// - velocity_m_s, position_m: droplet kinematics
/// - mass_rate_kg_s: evaporation rate used in the step (negative when evaporating)
pub struct CsvWriterOp {
    /// Path to the CSV file to write
    pub file_path: String,

    /// Whether the header has been written
    header_written: bool,
}

impl CsvWriterOp {
    /// Create a new CSV writer operator
    ///
    /// # Arguments
    /// * `file_path` - Path to the CSV file to write (will be created/overwritten)
    pub fn new(file_path: String) -> Self {
        Self {
            file_path,
            header_written: false,
        }
    }

    /// Create a handle for the CSV writer operator
    pub fn handle(file_path: String) -> SimOpHandle {
        SimOpHandle::new(Box::new(Self::new(file_path)))
    }

    /// Write the CSV header if not already written
    fn write_header(&mut self) -> Result<(), std::io::Error> {
        if self.header_written {
            return Ok(());
        }

        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.file_path)?;

        writeln!(file, "{}", CSV_HEADER)?;

        self.header_written = true;
        Ok(())
    }

    fn write_row(&self, summary: &StepSummary) -> Result<(), std::io::Error> {
        let mut file = OpenOptions::new().append(true).open(&self.file_path)?;

        writeln!(
            file,
            "{},{:.6},{:.6},{:.9e},{:.9e},{:.9e},{:.9e},{:.9e}",
            summary.step,
            summary.time_s,
            summary.temperature_k,
            summary.diameter_m,
            summary.mass_kg,
            summary.velocity_m_s,
            summary.position_m,
            summary.mass_rate_kg_s
        )
    }
}

impl SimOp for CsvWriterOp {
    fn name(&self) -> &str {
        "CsvWriterOp"
    }

    fn init_sim(&mut self, sim: &mut Simulation) {
        // Write header and initial state (step 0)
        if let Err(e) = self.write_header() {
            log::warn!("failed to write CSV header to {}: {}", self.file_path, e);
            return;
        }

        if let Err(e) = self.write_row(&sim.summary()) {
            log::warn!("failed to write initial CSV row to {}: {}", self.file_path, e);
        }
    }

    fn update_sim(&mut self, sim: &mut Simulation) {
        if !self.header_written {
            return;
        }
        if let Err(e) = self.write_row(&sim.summary()) {
            log::warn!(
                "failed to write CSV row for step {} to {}: {}",
                sim.current_step(),
                self.file_path,
                e
            );
        }
    }
}
