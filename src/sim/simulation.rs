use crate::config::ScenarioConfig;
use crate::droplet_state::DropletState;
use crate::error::ConvergenceWarning;
use crate::fluid::PhaseEquilibrium;
use crate::gas::GasState;
use crate::mass_energy::MassEnergyReport;
use crate::momentum::MomentumReport;
use crate::report::{DiagnosticSink, LogSink, StepSummary};
use crate::sim::sim_op::{
    CsvWriterOp, MassEnergyOp, MomentumOp, ProgressReporterOp, SimOp, SimOpHandle,
};
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct OpTiming {
    pub op_name: String,
    pub init_time: Duration,
    pub total_update_time: Duration,
    pub update_call_count: u32,
    pub after_time: Duration,
}

impl OpTiming {
    pub fn new(op_name: String) -> Self {
        Self {
            op_name,
            init_time: Duration::ZERO,
            total_update_time: Duration::ZERO,
            update_call_count: 0,
            after_time: Duration::ZERO,
        }
    }

    pub fn avg_update_time(&self) -> Duration {
        if self.update_call_count > 0 {
            self.total_update_time / self.update_call_count
        } else {
            Duration::ZERO
        }
    }

    pub fn total_time(&self) -> Duration {
        self.init_time + self.total_update_time + self.after_time
    }
}

/// One droplet in one gas parcel, advanced by a pipeline of operators.
pub struct Simulation {
    pub name: String,
    pub droplet: DropletState,
    pub gas: GasState,
    pub phase: Box<dyn PhaseEquilibrium>,
    pub gas_volume_m3: f64,
    pub dt_s: f64,
    pub ops: Vec<Box<dyn SimOp>>,
    pub sink: Box<dyn DiagnosticSink>,
    pub step: i32,
    pub sim_steps: i32,
    pub two_way_coupling: bool,
    pub last_mass_energy: Option<MassEnergyReport>,
    pub last_momentum: Option<MomentumReport>,
    pub debug: bool,
    pub op_timings: Vec<OpTiming>,
}

pub struct SimProps {
    pub name: String,
    pub droplet: DropletState,
    pub gas: GasState,
    pub phase: Box<dyn PhaseEquilibrium>,
    pub gas_volume_m3: f64,
    pub dt_s: f64,
    pub ops: Vec<SimOpHandle>,
    pub sink: Box<dyn DiagnosticSink>,
    pub sim_steps: i32,
    pub two_way_coupling: bool,
    pub debug: bool,
}

impl SimProps {
    /// Props for a scenario with the standard pipeline: mass/energy, then
    /// momentum, then the console reporter when `report_interval > 0`.
    pub fn from_config(config: &ScenarioConfig) -> SimProps {
        let mut ops = vec![MassEnergyOp::handle(), MomentumOp::handle()];
        if config.numerics.report_interval > 0 {
            ops.push(ProgressReporterOp::handle(config.numerics.report_interval));
        }

        SimProps {
            name: config.name.clone(),
            droplet: config.droplet_state(),
            gas: config.gas_state(),
            phase: config.phase_model(),
            gas_volume_m3: config.numerics.gas_volume_m3,
            dt_s: config.numerics.dt_s,
            ops,
            sink: Box::new(LogSink),
            sim_steps: config.numerics.steps,
            two_way_coupling: config.numerics.two_way_coupling,
            debug: false,
        }
    }

    pub fn with_csv(mut self, file_path: String) -> SimProps {
        self.ops.push(CsvWriterOp::handle(file_path));
        self
    }

    pub fn with_sink(mut self, sink: Box<dyn DiagnosticSink>) -> SimProps {
        self.sink = sink;
        self
    }
}

impl Simulation {
    pub fn new(props: SimProps) -> Simulation {
        let ops: Vec<Box<dyn SimOp>> = props.ops.into_iter().map(|handle| handle.op).collect();
        let op_timings = ops.iter().map(|op| OpTiming::new(op.name().to_string())).collect();

        Simulation {
            name: props.name,
            droplet: props.droplet,
            gas: props.gas,
            phase: props.phase,
            gas_volume_m3: props.gas_volume_m3,
            dt_s: props.dt_s,
            ops,
            sink: props.sink,
            step: -1,
            sim_steps: props.sim_steps,
            two_way_coupling: props.two_way_coupling,
            last_mass_energy: None,
            last_momentum: None,
            debug: props.debug,
            op_timings,
        }
    }

    pub fn from_config(config: &ScenarioConfig) -> Simulation {
        Simulation::new(SimProps::from_config(config))
    }

    /// Get the current simulation step number
    pub fn current_step(&self) -> i32 {
        self.step
    }

    /// Elapsed simulated time in seconds
    pub fn time_s(&self) -> f64 {
        self.step.max(0) as f64 * self.dt_s
    }

    /// Snapshot of the droplet after the most recent step
    pub fn summary(&self) -> StepSummary {
        StepSummary {
            step: self.step.max(0),
            time_s: self.time_s(),
            temperature_k: self.droplet.temperature(),
            diameter_m: self.droplet.diameter(),
            mass_kg: self.droplet.mass_kg(),
            velocity_m_s: self.droplet.velocity.current,
            position_m: self.droplet.position.current,
            mass_rate_kg_s: self.last_mass_energy.map_or(0.0, |report| report.mass_rate_kg_s),
        }
    }

    /// Run a single step with custom operators (for testing)
    pub fn step_with_ops(&mut self, ops: &mut [&mut dyn SimOp]) {
        self.step = self.step.max(0) + 1;
        for op in ops {
            op.update_sim(self);
        }
        self.finish_step();
    }

    pub fn run(&mut self) {
        if self.step > -1 {
            log::warn!("simulation {} has already run; ignoring run()", self.name);
            return;
        }
        log::info!(
            "running {} for {} steps of {}s",
            self.name,
            self.sim_steps,
            self.dt_s
        );

        self.step = 0;
        self.simulate_init();
        while self.step < self.sim_steps {
            self.step += 1;
            self.simulate_step();
            self.finish_step();
        }
        self.simulate_end();

        log::info!("{} finished: {}", self.name, self.droplet);
        if self.debug {
            self.print_timing_report();
        }
    }

    fn finish_step(&mut self) {
        let summary = self.summary();
        self.sink.step_summary(&summary);
    }

    /// Forward solver warnings for the current step to the sink
    pub fn report_warnings(&mut self, warnings: &[ConvergenceWarning]) {
        for warning in warnings {
            self.sink.convergence_warning(self.step, warning);
        }
    }

    fn simulate_init(&mut self) {
        let mut ops = std::mem::take(&mut self.ops);

        for (i, op) in ops.iter_mut().enumerate() {
            let start = Instant::now();
            op.init_sim(self);
            self.op_timings[i].init_time = start.elapsed();
        }
        self.ops = ops;
    }

    fn simulate_end(&mut self) {
        let mut ops = std::mem::take(&mut self.ops);

        for (i, op) in ops.iter_mut().enumerate() {
            let start = Instant::now();
            op.after_sim(self);
            self.op_timings[i].after_time = start.elapsed();
        }
        self.ops = ops;
    }

    fn simulate_step(&mut self) {
        let mut ops = std::mem::take(&mut self.ops);

        for (i, op) in ops.iter_mut().enumerate() {
            let start = Instant::now();
            op.update_sim(self);
            self.op_timings[i].total_update_time += start.elapsed();
            self.op_timings[i].update_call_count += 1;
        }
        self.ops = ops;
    }

    pub fn print_timing_report(&self) {
        println!("\n📊 === SIMULATION TIMING REPORT ===");
        println!("🔄 Total steps: {}", self.sim_steps);
        println!("⏱️  Seconds per step: {}", self.dt_s);
        println!();

        let total_time: Duration = self.op_timings.iter().map(OpTiming::total_time).sum();

        println!("📈 PER-OPERATION BREAKDOWN:");
        for timing in &self.op_timings {
            let total_op_time = timing.total_time();
            let percentage = if total_time.as_micros() > 0 {
                (total_op_time.as_micros() as f64 / total_time.as_micros() as f64) * 100.0
            } else {
                0.0
            };

            println!(
                "  🔧 {:<20} | Total: {:>8}µs | Avg/step: {:>6}µs | Init: {:>6}µs | After: {:>6}µs | Share: {:>5.1}%",
                timing.op_name,
                total_op_time.as_micros(),
                timing.avg_update_time().as_micros(),
                timing.init_time.as_micros(),
                timing.after_time.as_micros(),
                percentage
            );
        }

        println!();
        println!("⏱️  TOTAL SIMULATION TIME: {:.3}ms", total_time.as_secs_f64() * 1000.0);
        println!("📊 === END TIMING REPORT ===\n");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SaturationConfig;
    use crate::error::SolverKind;
    use crate::report::{CollectingSink, NullSink};
    use more_asserts::{assert_gt, assert_lt};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn quiet_config() -> ScenarioConfig {
        let mut config = ScenarioConfig::default();
        config.numerics.report_interval = 0;
        config.numerics.steps = 20;
        config
    }

    fn silent_sim(config: &ScenarioConfig) -> Simulation {
        Simulation::new(SimProps::from_config(config).with_sink(Box::new(NullSink)))
    }

    #[test]
    fn test_from_config_builds_pipeline() {
        let sim = Simulation::from_config(&ScenarioConfig::default());
        let names: Vec<&str> = sim.ops.iter().map(|op| op.name()).collect();
        assert_eq!(names, vec!["MassEnergyOp", "MomentumOp", "ProgressReporterOp"]);
        assert_eq!(sim.current_step(), -1);
    }

    #[test]
    fn test_run_sends_one_summary_per_step() {
        let sink = Rc::new(RefCell::new(CollectingSink::default()));
        let props = SimProps::from_config(&quiet_config()).with_sink(Box::new(sink.clone()));
        let mut sim = Simulation::new(props);

        sim.run();

        let collected = sink.borrow();
        assert_eq!(collected.summaries.len(), 20);
        assert_eq!(collected.summaries[0].step, 1);
        assert_eq!(collected.summaries[19].step, 20);
        assert!(collected.warnings.is_empty());
        assert_lt!(collected.summaries[19].diameter_m, collected.summaries[0].diameter_m);
        assert_eq!(sim.current_step(), 20);
    }

    #[test]
    fn test_second_run_is_ignored() {
        let mut sim = silent_sim(&quiet_config());
        sim.run();
        let droplet = sim.droplet.clone();
        sim.run();
        assert_eq!(sim.droplet, droplet);
    }

    #[test]
    fn test_two_way_coupling_drags_gas_along() {
        let mut config = quiet_config();
        config.droplet.velocity_m_s = 5.0;

        let mut one_way = silent_sim(&config);
        one_way.run();
        assert_eq!(one_way.gas.velocity_m_s, 0.0);

        config.numerics.two_way_coupling = true;
        let mut two_way = silent_sim(&config);
        two_way.run();
        assert_gt!(two_way.gas.velocity_m_s, 0.0);
        assert_lt!(two_way.gas.velocity_m_s, two_way.droplet.velocity.current);
    }

    #[test]
    fn test_boiling_warnings_reach_sink_with_their_step() {
        // flat saturation curve above ambient: the boiling search fails every step
        let mut config = quiet_config();
        config.numerics.steps = 3;
        config.droplet.saturation = SaturationConfig::Constant { pressure_pa: Some(2.0e5) };
        let sink = Rc::new(RefCell::new(CollectingSink::default()));
        let mut sim = Simulation::new(SimProps::from_config(&config).with_sink(Box::new(sink.clone())));

        sim.run();

        let collected = sink.borrow();
        let boiling_steps: Vec<i32> = collected
            .warnings
            .iter()
            .filter(|(_, warning)| warning.solver == SolverKind::BoilingPoint)
            .map(|(step, _)| *step)
            .collect();
        assert_eq!(boiling_steps, vec![1, 2, 3]);
        assert_eq!(collected.summaries.len(), 3);
    }

    #[test]
    fn test_report_warnings_tags_current_step() {
        let sink = Rc::new(RefCell::new(CollectingSink::default()));
        let mut sim = Simulation::new(SimProps::from_config(&quiet_config()).with_sink(Box::new(sink.clone())));
        sim.step = 4;
        let warning = ConvergenceWarning {
            solver: SolverKind::Momentum,
            iterations: 20,
            last_value: 4.9,
        };

        sim.report_warnings(&[warning.clone()]);

        assert_eq!(sink.borrow().warnings, vec![(4, warning)]);
    }

    #[test]
    fn test_step_with_ops_runs_only_given_ops() {
        let mut sim = silent_sim(&quiet_config());
        let start = sim.droplet.clone();
        let mut mass_energy = MassEnergyOp::new();

        sim.step_with_ops(&mut [&mut mass_energy as &mut dyn SimOp]);

        assert_eq!(sim.current_step(), 1);
        assert_lt!(sim.droplet.mass.current, start.mass.current);
        assert_eq!(sim.droplet.velocity, start.velocity);
        assert!(sim.last_mass_energy.is_some());
        assert!(sim.last_momentum.is_none());
    }
}
