//! Langmuir-Knudsen non-equilibrium evaporation rate.
//!
//! The rate is found as a fixed point over the blowing Reynolds number
//! `Re_b = -mdot / (D mu pi)`: the surface vapor fraction depends on
//! `Re_b` through the Knudsen-layer correction, and `Re_b` depends on the
//! surface vapor fraction through the Spalding mass transfer number.

use crate::constants::{
    EVAPORATION_COEFFICIENT, EVAPORATION_MAX_DAMPING, EVAPORATION_MAX_ITERATIONS,
    EVAPORATION_TOLERANCE, LOG_ARGUMENT_FLOOR, MASS_FRACTION_DENOM_FLOOR, PI,
    TRANSFER_CORRELATION_COEFFICIENT,
};
use crate::gas::GasState;
use crate::report::SolveOutcome;

/// Everything the evaporation rate depends on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvaporationInputs {
    pub diameter_m: f64,
    pub droplet_temperature_k: f64,
    pub saturation_pressure_pa: f64,
    pub reynolds: f64,
    pub gas_viscosity_pa_s: f64,
    pub gas_specific_heat_j_kg_k: f64,
    pub gas_thermal_conductivity_w_m_k: f64,
    pub gas_pressure_pa: f64,
    pub gas_constant_j_kg_k: f64,
    pub schmidt_number: f64,
    pub vapor_gas_constant_j_kg_k: f64,
    pub far_field_vapor_mass_fraction: f64,
}

impl EvaporationInputs {
    pub fn from_gas(
        gas: &GasState,
        vapor_gas_constant_j_kg_k: f64,
        diameter_m: f64,
        droplet_temperature_k: f64,
        saturation_pressure_pa: f64,
        reynolds: f64,
    ) -> Self {
        Self {
            diameter_m,
            droplet_temperature_k,
            saturation_pressure_pa,
            reynolds,
            gas_viscosity_pa_s: gas.viscosity_pa_s,
            gas_specific_heat_j_kg_k: gas.specific_heat_j_kg_k,
            gas_thermal_conductivity_w_m_k: gas.thermal_conductivity_w_m_k,
            gas_pressure_pa: gas.pressure_pa,
            gas_constant_j_kg_k: gas.gas_constant_j_kg_k,
            schmidt_number: gas.schmidt_number,
            vapor_gas_constant_j_kg_k,
            far_field_vapor_mass_fraction: gas.vapor_mass_fraction,
        }
    }

    fn prandtl_number(&self) -> f64 {
        self.gas_viscosity_pa_s * self.gas_specific_heat_j_kg_k / self.gas_thermal_conductivity_w_m_k
    }

    /// Ratio of vapor to carrier gas constants (theta_2)
    fn gas_constant_ratio(&self) -> f64 {
        self.vapor_gas_constant_j_kg_k / self.gas_constant_j_kg_k
    }
}

/// Sh = 2 + 0.552 sqrt(Re) Sc^(1/3)
pub fn sherwood_number(reynolds: f64, schmidt_number: f64) -> f64 {
    2.0 + TRANSFER_CORRELATION_COEFFICIENT * reynolds.sqrt() * schmidt_number.cbrt()
}

/// Nu = 2 + 0.552 sqrt(Re) Pr^(1/3)
pub fn nusselt_number(reynolds: f64, prandtl_number: f64) -> f64 {
    2.0 + TRANSFER_CORRELATION_COEFFICIENT * reynolds.sqrt() * prandtl_number.cbrt()
}

/// Equilibrium surface mole fraction of vapor, capped at 1
pub fn equilibrium_mole_fraction(saturation_pressure_pa: f64, gas_pressure_pa: f64) -> f64 {
    (saturation_pressure_pa / gas_pressure_pa).min(1.0)
}

/// Equilibrium surface mass fraction of vapor
pub fn equilibrium_mass_fraction(
    saturation_pressure_pa: f64,
    gas_pressure_pa: f64,
    gas_constant_j_kg_k: f64,
    vapor_gas_constant_j_kg_k: f64,
) -> f64 {
    let x_eq = equilibrium_mole_fraction(saturation_pressure_pa, gas_pressure_pa);
    let theta2 = vapor_gas_constant_j_kg_k / gas_constant_j_kg_k;
    (x_eq / (x_eq + (1.0 - x_eq) * theta2).max(MASS_FRACTION_DENOM_FLOOR)).min(1.0)
}

/// Knudsen layer thickness, Lk = mu sqrt(2 pi T Rv) / (alpha_e Sc P)
pub fn knudsen_layer_thickness(
    droplet_temperature_k: f64,
    vapor_gas_constant_j_kg_k: f64,
    gas_viscosity_pa_s: f64,
    schmidt_number: f64,
    gas_pressure_pa: f64,
) -> f64 {
    gas_viscosity_pa_s * (2.0 * PI * droplet_temperature_k * vapor_gas_constant_j_kg_k).sqrt()
        / (EVAPORATION_COEFFICIENT * schmidt_number * gas_pressure_pa)
}

/// Surface vapor mass fraction with the Knudsen-layer correction applied
///
/// The mole fraction is reduced by `2 beta Lk / D` with `beta = Pr Re_b / 2`
/// and then converted to a mass fraction. The result is not clamped.
pub fn non_equilibrium_mass_fraction(
    equilibrium_mole_fraction: f64,
    knudsen_layer_m: f64,
    diameter_m: f64,
    gas_constant_ratio: f64,
    prandtl_number: f64,
    blowing_reynolds: f64,
) -> f64 {
    let beta = 0.5 * prandtl_number * blowing_reynolds;
    let x_neq = (equilibrium_mole_fraction - 2.0 * beta * knudsen_layer_m / diameter_m).max(0.0);
    x_neq / (x_neq + (1.0 - x_neq) * gas_constant_ratio)
}

/// Re_b implied by a surface vapor fraction, via B_M and ln(1 + B_M)
fn blowing_reynolds_for(surface_fraction: f64, far_field_fraction: f64, sherwood: f64, schmidt: f64) -> f64 {
    let transfer_number =
        (surface_fraction - far_field_fraction) / (1.0 - surface_fraction).max(MASS_FRACTION_DENOM_FLOOR);
    let hm = (1.0 + transfer_number).max(LOG_ARGUMENT_FLOOR).ln();
    hm * sherwood / schmidt
}

/// Mass rate of the droplet in kg/s: negative for evaporation, positive for condensation
///
/// Hitting the iteration cap is not an error: the last iterate is returned
/// with `converged == false`.
pub fn mass_rate(inputs: &EvaporationInputs) -> SolveOutcome {
    let d = inputs.diameter_m;
    let y_inf = inputs.far_field_vapor_mass_fraction;
    let pr = inputs.prandtl_number();
    let sc = inputs.schmidt_number;
    let sh = sherwood_number(inputs.reynolds, sc);
    let theta2 = inputs.gas_constant_ratio();

    let x_eq = equilibrium_mole_fraction(inputs.saturation_pressure_pa, inputs.gas_pressure_pa);
    let y_eq = equilibrium_mass_fraction(
        inputs.saturation_pressure_pa,
        inputs.gas_pressure_pa,
        inputs.gas_constant_j_kg_k,
        inputs.vapor_gas_constant_j_kg_k,
    );
    let y_min = y_eq.min(y_inf);
    let y_max = y_eq.max(y_inf);

    let lk = knudsen_layer_thickness(
        inputs.droplet_temperature_k,
        inputs.vapor_gas_constant_j_kg_k,
        inputs.gas_viscosity_pa_s,
        sc,
        inputs.gas_pressure_pa,
    );
    let damping = EVAPORATION_MAX_DAMPING.min(0.5 * d / lk);

    // seed from the midpoint of the admissible surface fraction range
    let mut re_b = blowing_reynolds_for(0.5 * (y_min + y_max), y_inf, sh, sc);

    let to_mass_rate = |re_b: f64| -re_b * d * inputs.gas_viscosity_pa_s * PI;

    for iteration in 0..EVAPORATION_MAX_ITERATIONS {
        let y_surface = non_equilibrium_mass_fraction(x_eq, lk, d, theta2, pr, re_b).clamp(y_min, y_max);
        let re_b_new = blowing_reynolds_for(y_surface, y_inf, sh, sc);

        if (re_b_new - re_b).abs() < EVAPORATION_TOLERANCE {
            return SolveOutcome::converged(to_mass_rate(re_b_new), iteration + 1);
        }

        re_b = damping * re_b_new + (1.0 - damping) * re_b;
    }

    SolveOutcome::exhausted(to_mass_rate(re_b), EVAPORATION_MAX_ITERATIONS)
}
