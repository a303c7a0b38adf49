//! Implicit mass and energy update for one droplet step.
//!
//! Mass follows a BDF2 step driven by the Langmuir-Knudsen rate. Enthalpy
//! solves the implicit balance
//!
//! `h1 + S - E (T_g - h1/cp) = 0`
//!
//! where `S` holds the BDF2 history and the latent heat sink and `E` the
//! blowing-corrected convective coefficient. The root is found by Newton
//! steps inside a bracket, falling back to bisection whenever a step leaves
//! the bracket.

use crate::constants::{
    BDF2_ALPHA1, BDF2_ALPHA2, BDF2_BETA, BLOWING_CORRECTION_THRESHOLD, BOILING_MAX_ITERATIONS,
    BOILING_PRESSURE_TOLERANCE, BOILING_SLOPE_FLOOR, ENTHALPY_BRACKET_TOLERANCE,
    ENTHALPY_MAX_ITERATIONS, ENTHALPY_MIN_ITERATIONS, ENTHALPY_OVERSHOOT_AFTER,
    ENTHALPY_OVERSHOOT_FACTOR, ENTHALPY_RELATIVE_TOLERANCE, EVAPORATED_MASS_FRACTION,
    HEAT_TRANSFER_DIAMETER_FLOOR_M, HEAT_TRANSFER_ENHANCEMENT, MASS_FLOOR_KG, PI,
};
use crate::droplet_state::{DropletState, History2};
use crate::error::{ConvergenceWarning, SolverKind};
use crate::evaporation::{self, nusselt_number, EvaporationInputs};
use crate::fluid::PhaseEquilibrium;
use crate::gas::GasState;
use crate::math_utils::bdf2_advance;
use crate::report::SolveOutcome;

/// What happened during one mass/energy step.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MassEnergyReport {
    /// Rate used for the mass update, after the triple-point clamp
    pub mass_rate_kg_s: f64,
    pub evaporation: Option<SolveOutcome>,
    pub enthalpy: Option<SolveOutcome>,
    /// Present only when the boiling clamp fired
    pub boiling: Option<SolveOutcome>,
}

impl MassEnergyReport {
    pub fn warnings(&self) -> Vec<ConvergenceWarning> {
        [
            self.evaporation.and_then(|o| o.warning(SolverKind::EvaporationRate)),
            self.enthalpy.and_then(|o| o.warning(SolverKind::EnthalpyBalance)),
            self.boiling.and_then(|o| o.warning(SolverKind::BoilingPoint)),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

/// Advances droplet mass and enthalpy against a phase-equilibrium model.
pub struct MassEnergyIntegrator<'a> {
    phase: &'a dyn PhaseEquilibrium,
}

impl<'a> MassEnergyIntegrator<'a> {
    pub fn new(phase: &'a dyn PhaseEquilibrium) -> Self {
        Self { phase }
    }

    /// Advance `state.mass` and `state.enthalpy` by `dt` seconds.
    ///
    /// A non-positive `dt` leaves the state untouched. A droplet that has
    /// fully evaporated keeps zero mass and its last enthalpy.
    pub fn advance(&self, state: &mut DropletState, dt: f64, gas: &GasState) -> MassEnergyReport {
        if dt <= 0.0 {
            return MassEnergyReport::default();
        }
        if state.is_evaporated() {
            hold(state);
            return MassEnergyReport::default();
        }

        let diameter = state.diameter();
        let droplet_k = state.temperature();
        let saturation_pa = self.phase.saturation_pressure(droplet_k);
        let reynolds = gas.reynolds_number(diameter, gas.velocity_m_s - state.velocity.current);

        let evaporation = evaporation::mass_rate(&EvaporationInputs::from_gas(
            gas,
            self.phase.vapor_gas_constant(),
            diameter,
            droplet_k,
            saturation_pa,
            reynolds,
        ));

        let mut mdot = evaporation.value;
        if droplet_k < self.phase.triple_point_k() {
            // only condensation (frost) below the triple point
            mdot = mdot.max(0.0);
        }

        let prandtl = gas.prandtl_number();
        let blowing_reynolds = (-mdot / (diameter * gas.viscosity_pa_s * PI)).max(0.0);
        let nusselt = nusselt_number(reynolds, prandtl);
        let blowing_correction = blowing_heat_transfer_factor(0.5 * prandtl * blowing_reynolds);

        let h_current = state.enthalpy.current;
        let h_previous = state.enthalpy.previous;

        state.mass.push(next_mass(&state.mass, dt, mdot));

        let mut report = MassEnergyReport {
            mass_rate_kg_s: mdot,
            evaporation: Some(evaporation),
            ..Default::default()
        };

        if state.is_evaporated() {
            state.enthalpy.push(h_current);
            return report;
        }

        let diameter = state.diameter().max(HEAT_TRANSFER_DIAMETER_FLOOR_M);
        let dt_beta = dt * BDF2_BETA;
        let latent = self.phase.latent_heat_j_kg(droplet_k);
        let mass = state.mass.current.max(MASS_FLOOR_KG) as f64;

        let fixed_source = BDF2_ALPHA1 * h_current + BDF2_ALPHA2 * h_previous - dt_beta * latent * mdot / mass;
        let relaxation_time = state.density() * diameter * diameter / (18.0 * gas.viscosity_pa_s);
        let exchange = dt_beta * HEAT_TRANSFER_ENHANCEMENT * blowing_correction * nusselt
            * gas.specific_heat_j_kg_k
            / (3.0 * prandtl * relaxation_time);
        let cp = state.specific_heat();
        let gas_k = gas.temperature_k;

        let enthalpy = solve_enthalpy_balance(h_current, |h1| {
            h1 + fixed_source - exchange * (gas_k - h1 / cp)
        });
        state.enthalpy.push(enthalpy.value);
        report.enthalpy = Some(enthalpy);

        report.boiling = limit_to_boiling(state, self.phase, gas.pressure_pa);
        report
    }
}

/// Shift mass and enthalpy histories without changing the current values
fn hold(state: &mut DropletState) {
    state.mass.push(0.0);
    let h = state.enthalpy.current;
    state.enthalpy.push(h);
}

/// BDF2 mass update, snapped to zero once below 1% of the current mass
fn next_mass(mass: &History2<f32>, dt: f64, mdot: f64) -> f32 {
    let current = mass.current as f64;
    let next = bdf2_advance(dt, mdot, current, mass.previous as f64);
    if next < EVAPORATED_MASS_FRACTION * current {
        0.0
    } else {
        next as f32
    }
}

/// beta / (e^beta - 1), the reduction of heat transfer by outward vapor flow
pub fn blowing_heat_transfer_factor(beta: f64) -> f64 {
    if beta > BLOWING_CORRECTION_THRESHOLD {
        beta / beta.exp_m1()
    } else {
        1.0
    }
}

/// Root of a monotonically increasing enthalpy residual, starting from `h0`.
///
/// Newton steps assume unit slope. The bracket starts as `[0, inf)`; while
/// no upper bound is known, negative residuals past the fourth iteration
/// overshoot by 10% to find one. Once bracketed, any step that leaves the
/// bracket is replaced by bisection.
pub fn solve_enthalpy_balance(h0: f64, residual: impl Fn(f64) -> f64) -> SolveOutcome {
    let mut h1 = h0;
    let mut lo = 0.0_f64;
    let mut hi = f64::INFINITY;
    let mut found_hi = false;

    for iteration in 0..ENTHALPY_MAX_ITERATIONS {
        let func = residual(h1);

        if iteration >= ENTHALPY_MIN_ITERATIONS
            && (func.abs() < ENTHALPY_RELATIVE_TOLERANCE * h0.max(h1) || hi - lo < ENTHALPY_BRACKET_TOLERANCE)
        {
            return SolveOutcome::converged(h1, iteration + 1);
        }

        if func < 0.0 {
            lo = h1;
        }
        if func > 0.0 {
            hi = h1;
            found_hi = true;
        }

        h1 -= func;

        if !found_hi && iteration > ENTHALPY_OVERSHOOT_AFTER && func < 0.0 {
            h1 *= ENTHALPY_OVERSHOOT_FACTOR;
        }
        if found_hi && (h1 > lo.max(hi) || h1 < lo.min(hi)) {
            h1 = 0.5 * (lo + hi);
        }
    }

    SolveOutcome::exhausted(h1, ENTHALPY_MAX_ITERATIONS)
}

/// Temperature at which the saturation pressure equals `gas_pressure_pa`,
/// searched between the triple point and `upper_k`.
pub fn boiling_temperature(phase: &dyn PhaseEquilibrium, upper_k: f64, gas_pressure_pa: f64) -> SolveOutcome {
    let mut t_max = upper_k;
    let mut t_min = phase.triple_point_k().min(upper_k);
    let mut t_boil = 0.9 * t_max + 0.1 * t_min;

    for iteration in 0..BOILING_MAX_ITERATIONS {
        let (pressure, slope) = phase.saturation_pressure_with_slope(t_boil);
        let excess = pressure - gas_pressure_pa;
        if excess.abs() < BOILING_PRESSURE_TOLERANCE * gas_pressure_pa {
            return SolveOutcome::converged(t_boil, iteration + 1);
        }
        if excess > 0.0 {
            t_max = t_boil;
        }
        if excess < 0.0 {
            t_min = t_boil;
        }

        t_boil -= excess / slope.max(BOILING_SLOPE_FLOOR);
        if t_boil > t_max || t_boil < t_min {
            t_boil = 0.5 * (t_max + t_min);
        }
    }

    SolveOutcome::exhausted(t_boil, BOILING_MAX_ITERATIONS)
}

/// Pull the droplet back to the local boiling point if it has passed it.
///
/// Returns the boiling search outcome when the clamp fired, `None` when the
/// ambient pressure already exceeds the saturation pressure.
pub fn limit_to_boiling(
    state: &mut DropletState,
    phase: &dyn PhaseEquilibrium,
    gas_pressure_pa: f64,
) -> Option<SolveOutcome> {
    let droplet_k = state.temperature();
    if phase.saturation_pressure(droplet_k) <= gas_pressure_pa {
        return None;
    }

    let boiling = boiling_temperature(phase, droplet_k, gas_pressure_pa);
    state.set_temperature(boiling.value.min(droplet_k));
    Some(boiling)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fluid::{ClausiusClapeyron, ConstantSaturation, FluidType};
    use approx::assert_abs_diff_eq;
    use more_asserts::{assert_gt, assert_le, assert_lt};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn reference_gas() -> GasState {
        GasState::air(298.0, 101_325.0, 0.001)
    }

    fn water_droplet(kelvin: f64) -> DropletState {
        DropletState::new(1000.0, 4184.0, kelvin, 1.1e-3)
    }

    #[test]
    fn test_reference_step_evaporates_and_warms() {
        let phase = ConstantSaturation::new(FluidType::Water);
        let mut droplet = water_droplet(282.0);
        let start_mass = droplet.mass.current;

        let report = MassEnergyIntegrator::new(&phase).advance(&mut droplet, 1e-2, &reference_gas());

        assert_lt!(report.mass_rate_kg_s, 0.0);
        assert_lt!(droplet.mass.current, start_mass);
        assert_eq!(droplet.mass.previous, start_mass);
        // convection from 298K air outweighs the latent sink at 282K
        assert_gt!(droplet.temperature(), 282.0);
        assert_lt!(droplet.temperature(), 282.1);
        assert!(report.enthalpy.unwrap().converged);
        assert!(report.boiling.is_none());
        assert!(report.warnings().is_empty());
    }

    #[test]
    fn test_below_triple_point_only_condenses() {
        let phase = ConstantSaturation::new(FluidType::Water);
        let mut droplet = water_droplet(260.0);
        let start_mass = droplet.mass.current;

        let report = MassEnergyIntegrator::new(&phase).advance(&mut droplet, 1e-2, &reference_gas());

        assert_lt!(report.evaporation.unwrap().value, 0.0);
        assert_eq!(report.mass_rate_kg_s, 0.0);
        assert_eq!(droplet.mass.current, start_mass);
    }

    #[test]
    fn test_zero_time_step_is_a_no_op() {
        let phase = ConstantSaturation::new(FluidType::Water);
        let mut droplet = water_droplet(282.0);
        let before = droplet.clone();

        MassEnergyIntegrator::new(&phase).advance(&mut droplet, 0.0, &reference_gas());

        assert_eq!(droplet, before);
    }

    #[test]
    fn test_evaporated_droplet_holds_enthalpy() {
        let phase = ConstantSaturation::new(FluidType::Water);
        let mut droplet = water_droplet(290.0);
        droplet.mass.push(0.0);
        droplet.mass.push(0.0);
        let enthalpy = droplet.enthalpy.current;

        let report = MassEnergyIntegrator::new(&phase).advance(&mut droplet, 1e-2, &reference_gas());

        assert_eq!(droplet.mass.current, 0.0);
        assert_eq!(droplet.enthalpy.current, enthalpy);
        assert!(report.evaporation.is_none());
    }

    #[test]
    fn test_blowing_factor_limits() {
        assert_eq!(blowing_heat_transfer_factor(0.0), 1.0);
        assert_abs_diff_eq!(blowing_heat_transfer_factor(1e-3), 1.0, epsilon = 1e-3);
        assert_lt!(blowing_heat_transfer_factor(2.0), 0.5);
    }

    #[test]
    fn test_enthalpy_solve_unit_slope() {
        let outcome = solve_enthalpy_balance(1.0e6, |h| h - 1.2e6);
        assert!(outcome.converged);
        assert_abs_diff_eq!(outcome.value, 1.2e6, epsilon = 1e-6);
        assert_eq!(outcome.iterations, ENTHALPY_MIN_ITERATIONS + 1);
    }

    #[test]
    fn test_enthalpy_solve_steep_residual_falls_back_to_bisection() {
        let outcome = solve_enthalpy_balance(1.0e5, |h| 1000.0 * (h - 2.0e5));
        assert!(outcome.converged);
        assert_abs_diff_eq!(outcome.value, 2.0e5, epsilon = 1e-3);
    }

    #[test]
    fn test_enthalpy_solve_shallow_residual_overshoots_to_bracket() {
        let outcome = solve_enthalpy_balance(1.0e3, |h| 0.5 * (h - 1.0e6));
        assert!(outcome.converged);
        assert_abs_diff_eq!(outcome.value, 1.0e6, epsilon = 5.0);
    }

    #[test]
    fn test_mass_snap_compares_against_current_mass() {
        // current 1.0, previous 0.1: next lands between 1% of previous and 1% of current
        let history = History2 { current: 1.0_f32, previous: 0.1_f32 };
        assert_eq!(next_mass(&history, 1.0, -1.9425), 0.0);

        let kept = next_mass(&history, 1.0, -1.92);
        assert_abs_diff_eq!(kept as f64, 0.02, epsilon = 1e-6);
    }

    #[test]
    fn test_enthalpy_solve_without_root_returns_last_iterate() {
        // residual stays negative for every h >= 0, so no upper bracket is ever found
        let outcome = solve_enthalpy_balance(1.0e5, |h| -(1.0 + h));

        assert!(!outcome.converged);
        assert_eq!(outcome.iterations, ENTHALPY_MAX_ITERATIONS);
        assert!(outcome.value.is_finite());
        assert_gt!(outcome.value, 1.0e5);
        let warning = outcome.warning(SolverKind::EnthalpyBalance).unwrap();
        assert_eq!(warning.last_value, outcome.value);
    }

    #[test]
    fn test_boiling_clamp_pulls_back_to_boiling_point() {
        let phase = ClausiusClapeyron::new(FluidType::Water);
        let mut droplet = water_droplet(380.0);

        let outcome = limit_to_boiling(&mut droplet, &phase, 101_325.0).unwrap();

        assert!(outcome.converged);
        assert_abs_diff_eq!(droplet.temperature(), 373.15, epsilon = 0.05);
    }

    #[test]
    fn test_boiling_clamp_ignores_subcooled_droplet() {
        let phase = ClausiusClapeyron::new(FluidType::Water);
        let mut droplet = water_droplet(350.0);
        let before = droplet.clone();

        assert!(limit_to_boiling(&mut droplet, &phase, 101_325.0).is_none());
        assert_eq!(droplet, before);
    }

    #[test]
    fn test_boiling_clamp_never_heats() {
        let phase = ClausiusClapeyron::new(FluidType::Water);
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..50 {
            let kelvin = rng.random_range(280.0..480.0);
            let pressure = rng.random_range(2.0e3..3.0e5);
            let mut droplet = water_droplet(kelvin);
            limit_to_boiling(&mut droplet, &phase, pressure);
            assert_le!(droplet.temperature(), kelvin);
        }
    }

    #[test]
    fn test_boiling_search_without_slope_reports_warning() {
        // a flat curve above ambient has no boiling point
        let phase = ConstantSaturation::with_pressure(FluidType::Water, 2.0e5);
        let mut droplet = water_droplet(300.0);

        let outcome = limit_to_boiling(&mut droplet, &phase, 101_325.0).unwrap();

        assert!(!outcome.converged);
        assert!(outcome.warning(SolverKind::BoilingPoint).is_some());
        assert_le!(droplet.temperature(), 300.0);
    }
}
