use crate::sim::sim_op::{SimOp, SimOpHandle};
use crate::sim::Simulation;
use colored::Colorize;

/// Progress Reporter Operator
///
/// Prints the droplet's state at a fixed step interval, plus a start and
/// end banner with the overall mass loss.
#[derive(Debug, Clone)]
pub struct ProgressReporterOp {
    pub name: String,
    pub report_interval: i32, // Report every N steps
    initial_mass_kg: f64,
}

impl ProgressReporterOp {
    pub fn new(report_interval: i32) -> Self {
        Self {
            name: "ProgressReporterOp".to_string(),
            report_interval,
            initial_mass_kg: 0.0,
        }
    }

    pub fn handle(report_interval: i32) -> SimOpHandle {
        SimOpHandle::new(Box::new(Self::new(report_interval)))
    }

    fn should_report(&self, step: i32) -> bool {
        self.report_interval > 0 && step % self.report_interval == 0
    }

    fn mass_loss_percent(&self, sim: &Simulation) -> f64 {
        if self.initial_mass_kg > 0.0 {
            100.0 * (1.0 - sim.droplet.mass_kg() / self.initial_mass_kg)
        } else {
            0.0
        }
    }
}

impl SimOp for ProgressReporterOp {
    fn name(&self) -> &str {
        &self.name
    }

    fn init_sim(&mut self, sim: &mut Simulation) {
        self.initial_mass_kg = sim.droplet.mass_kg();
        println!("💧 Starting droplet simulation {}...", sim.name.bold());
        println!("   Step {}: {}", sim.current_step(), sim.droplet);
    }

    fn update_sim(&mut self, sim: &mut Simulation) {
        if !self.should_report(sim.current_step()) {
            return;
        }

        let time = format!("t = {:.3}s", sim.time_s());
        let mut line = format!("   Step {} ({}): {}", sim.current_step(), time.cyan(), sim.droplet);
        if let Some(report) = sim.last_mass_energy {
            if report.boiling.is_some() {
                line.push_str(&format!("  {}", "boiling".red().bold()));
            }
        }
        if sim.droplet.is_evaporated() {
            line.push_str(&format!("  {}", "evaporated".yellow()));
        }
        println!("{}", line);
    }

    fn after_sim(&mut self, sim: &mut Simulation) {
        println!(
            "✅ Simulation complete after {} steps ({:.3}s)",
            sim.current_step(),
            sim.time_s()
        );
        println!("   Final: {}", sim.droplet);
        println!(
            "   Mass lost: {}",
            format!("{:.4}%", self.mass_loss_percent(sim)).green()
        );
    }
}
