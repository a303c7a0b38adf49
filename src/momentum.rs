use crate::constants::{
    BDF2_BETA, DRAG_REGIME_REYNOLDS, MAX_VOLUME_FRACTION,
    MOMENTUM_MAX_ITERATIONS, MOMENTUM_MIN_ITERATIONS, MOMENTUM_TOLERANCE, MOMENTUM_VELOCITY_SCALE,
    PI, VOLUME_FLOOR_M3,
};
use crate::droplet_state::DropletState;
use crate::error::{ConvergenceWarning, SolverKind};
use crate::gas::GasState;
use crate::math_utils::{bdf2_advance, bdf2_history};
use crate::report::SolveOutcome;
use serde::Serialize;

/// Which drag correlation was used on the final sub-iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DragRegime {
    /// Re < 100, standard drag reduced by evaporative blowing
    BlowingCorrected,
    /// Re >= 100, Clift-Gauvin
    CliftGauvin,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MomentumReport {
    pub velocity: SolveOutcome,
    /// Gas parcel velocity after exchanging momentum with the droplet
    pub gas_velocity_m_s: f64,
    pub position_m: f64,
    pub regime: DragRegime,
    pub reynolds: f64,
}

impl MomentumReport {
    pub fn warnings(&self) -> Vec<ConvergenceWarning> {
        self.velocity.warning(SolverKind::Momentum).into_iter().collect()
    }
}

/// Low-Re drag factor with the blowing correction, excluding the volume fraction term
pub fn blowing_drag_factor(reynolds: f64, blowing_reynolds: f64) -> f64 {
    let a = 0.09 + 0.077 * (-0.4 * reynolds).exp();
    let b = 0.4 + 0.77 * (-0.04 * reynolds).exp();
    let standard = 1.0 + 0.0545 * reynolds + 0.1 * reynolds.sqrt() * (1.0 - 0.03 * reynolds);
    standard / (1.0 + a * blowing_reynolds.powf(b))
}

/// Clift-Gauvin drag factor, excluding the volume fraction term
pub fn clift_gauvin_drag_factor(reynolds: f64) -> f64 {
    1.0 + 0.15 * reynolds.powf(0.687) + 0.0175 * reynolds / (1.0 + 4.25e4 * (reynolds + 1e-20).powf(-1.16))
}

/// Drag enhancement for a droplet that fills a large share of its gas parcel
pub fn volume_fraction_drag(droplet_volume_m3: f64, parcel_volume_m3: f64) -> f64 {
    let alpha = MAX_VOLUME_FRACTION.min(droplet_volume_m3 / parcel_volume_m3.max(VOLUME_FLOOR_M3));
    ((8.0 * alpha).powi(6) - 0.001).max(0.0)
}

/// Total drag factor and the regime it came from
pub fn drag_factor(reynolds: f64, blowing_reynolds: f64, volume_fraction_term: f64) -> (f64, DragRegime) {
    if reynolds < DRAG_REGIME_REYNOLDS {
        (
            blowing_drag_factor(reynolds, blowing_reynolds) + volume_fraction_term,
            DragRegime::BlowingCorrected,
        )
    } else {
        (clift_gauvin_drag_factor(reynolds) + volume_fraction_term, DragRegime::CliftGauvin)
    }
}

/// Advances droplet velocity and position with drag coupled to a finite gas parcel.
///
/// Must run after the mass/energy update of the same step: the blowing
/// Reynolds number comes from the mass change it just recorded.
#[derive(Debug, Default, Clone, Copy)]
pub struct MomentumIntegrator;

impl MomentumIntegrator {
    pub fn new() -> Self {
        Self
    }

    /// Advance `state.velocity` and `state.position` by `dt` seconds.
    ///
    /// `gas` supplies the parcel velocity at the start of the step. The
    /// parcel velocity after the exchange is returned in the report; the
    /// caller decides whether to write it back. A non-positive `dt` leaves
    /// the state untouched.
    pub fn advance(
        &self,
        state: &mut DropletState,
        dt: f64,
        gas_volume_m3: f64,
        gas: &GasState,
    ) -> MomentumReport {
        let v_n = state.velocity.current;
        if dt <= 0.0 {
            return MomentumReport {
                velocity: SolveOutcome::converged(v_n, 0),
                gas_velocity_m_s: gas.velocity_m_s,
                position_m: state.position.current,
                regime: DragRegime::BlowingCorrected,
                reynolds: 0.0,
            };
        }

        let dt_beta = dt * BDF2_BETA;
        let diameter = state.diameter();
        let droplet_mass = state.mass_kg();
        let mdot = state.mass_rate(dt);
        let gas_mass = gas.parcel_mass(gas_volume_m3);
        let fp_vf = volume_fraction_drag(state.volume(), gas_volume_m3);
        let fixed_source = bdf2_history(v_n, state.velocity.previous);
        let blowing_reynolds = (mdot / (diameter * gas.viscosity_pa_s * PI)).abs();
        let exchange = droplet_mass / gas_mass;

        let mut velocity = v_n;
        let mut gas_velocity = gas.velocity_m_s;
        let mut regime = DragRegime::BlowingCorrected;
        let mut reynolds = 0.0;
        let mut outcome = None;

        for iteration in 0..MOMENTUM_MAX_ITERATIONS {
            // the gas takes up the droplet's momentum change on every pass
            if iteration > 0 {
                gas_velocity -= (velocity - v_n) * exchange;
            }

            reynolds = gas.reynolds_number(diameter, gas_velocity - velocity);
            let (fp, used) = drag_factor(reynolds, blowing_reynolds, fp_vf);
            regime = used;

            let relaxation_time = state.density() * diameter * diameter / (18.0 * gas.viscosity_pa_s * fp);
            let vcoef = dt_beta / relaxation_time;

            let residual = (vcoef * gas_velocity + fixed_source) / (1.0 + vcoef) - velocity;
            let slope = -vcoef * exchange / (1.0 + vcoef) - 1.0;
            velocity -= residual / slope;

            if iteration >= MOMENTUM_MIN_ITERATIONS
                && residual.abs() / (slope.abs() * (MOMENTUM_VELOCITY_SCALE + velocity.abs())) < MOMENTUM_TOLERANCE
            {
                outcome = Some(SolveOutcome::converged(velocity, iteration + 1));
                break;
            }
        }

        let position = bdf2_advance(dt, velocity, state.position.current, state.position.previous);

        state.velocity.push(velocity);
        state.position.push(position);

        MomentumReport {
            velocity: outcome.unwrap_or(SolveOutcome::exhausted(velocity, MOMENTUM_MAX_ITERATIONS)),
            gas_velocity_m_s: gas_velocity,
            position_m: position,
            regime,
            reynolds,
        }
    }
}
