//! Solver outcomes and the diagnostic side channel.
//!
//! Solvers never print. They return a [`SolveOutcome`]; the integrators
//! bundle those into reports, and the driver forwards anything worth
//! surfacing to a [`DiagnosticSink`].

use crate::error::{ConvergenceWarning, SolverKind};
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;

/// Result of one iterative solve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SolveOutcome {
    pub value: f64,
    pub converged: bool,
    pub iterations: usize,
}

impl SolveOutcome {
    pub fn converged(value: f64, iterations: usize) -> Self {
        Self { value, converged: true, iterations }
    }

    pub fn exhausted(value: f64, iterations: usize) -> Self {
        Self { value, converged: false, iterations }
    }

    /// A warning for `solver` if this solve hit its cap
    pub fn warning(&self, solver: SolverKind) -> Option<ConvergenceWarning> {
        if self.converged {
            None
        } else {
            Some(ConvergenceWarning {
                solver,
                iterations: self.iterations,
                last_value: self.value,
            })
        }
    }
}

/// State of the droplet after a completed step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepSummary {
    pub step: i32,
    pub time_s: f64,
    pub temperature_k: f64,
    pub diameter_m: f64,
    pub mass_kg: f64,
    pub velocity_m_s: f64,
    pub position_m: f64,
    pub mass_rate_kg_s: f64,
}

/// Receiver for convergence warnings and step summaries.
///
/// Sinks must not influence the simulation; both methods default to no-ops.
pub trait DiagnosticSink {
    fn convergence_warning(&mut self, _step: i32, _warning: &ConvergenceWarning) {}

    fn step_summary(&mut self, _summary: &StepSummary) {}
}

/// Forwards diagnostics to the `log` facade.
#[derive(Debug, Default)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn convergence_warning(&mut self, step: i32, warning: &ConvergenceWarning) {
        log::warn!("step {}: {}", step, warning);
    }

    fn step_summary(&mut self, summary: &StepSummary) {
        log::debug!(
            "step {} t={:.3}s T={:.3}K D={:.6e}m v={:.6e}m/s x={:.6e}m mdot={:.4e}kg/s",
            summary.step,
            summary.time_s,
            summary.temperature_k,
            summary.diameter_m,
            summary.velocity_m_s,
            summary.position_m,
            summary.mass_rate_kg_s
        );
    }
}

/// Keeps every diagnostic in memory.
#[derive(Debug, Default)]
pub struct CollectingSink {
    pub warnings: Vec<(i32, ConvergenceWarning)>,
    pub summaries: Vec<StepSummary>,
}

impl DiagnosticSink for CollectingSink {
    fn convergence_warning(&mut self, step: i32, warning: &ConvergenceWarning) {
        self.warnings.push((step, warning.clone()));
    }

    fn step_summary(&mut self, summary: &StepSummary) {
        self.summaries.push(summary.clone());
    }
}

/// A shared sink, so the caller can inspect it after handing a clone to a simulation
impl<S: DiagnosticSink> DiagnosticSink for Rc<RefCell<S>> {
    fn convergence_warning(&mut self, step: i32, warning: &ConvergenceWarning) {
        self.borrow_mut().convergence_warning(step, warning);
    }

    fn step_summary(&mut self, summary: &StepSummary) {
        self.borrow_mut().step_summary(summary);
    }
}

/// Discards everything.
#[derive(Debug, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_converged_outcome_has_no_warning() {
        let outcome = SolveOutcome::converged(1.0, 3);
        assert!(outcome.warning(SolverKind::Momentum).is_none());
    }

    #[test]
    fn test_exhausted_outcome_carries_last_value() {
        let outcome = SolveOutcome::exhausted(0.25, 40);
        let warning = outcome.warning(SolverKind::EvaporationRate).unwrap();
        assert_eq!(warning.solver, SolverKind::EvaporationRate);
        assert_eq!(warning.iterations, 40);
        assert_eq!(warning.last_value, 0.25);
    }

    #[test]
    fn test_collecting_sink_records_in_order() {
        let mut sink = CollectingSink::default();
        let warning = SolveOutcome::exhausted(1.0, 20).warning(SolverKind::Momentum).unwrap();
        sink.convergence_warning(4, &warning);
        sink.convergence_warning(7, &warning);
        assert_eq!(sink.warnings.iter().map(|(step, _)| *step).collect::<Vec<_>>(), vec![4, 7]);
    }
}
