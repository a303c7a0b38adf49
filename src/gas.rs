use serde::{Deserialize, Serialize};

/// Carrier-gas properties seen by the droplet during one step
///
/// All values are SI. `vapor_mass_fraction` is the far-field mass
/// fraction of the droplet's own vapor in the carrier gas.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct GasState {
    pub temperature_k: f64,
    pub pressure_pa: f64,
    pub velocity_m_s: f64,
    pub density_kg_m3: f64,
    pub viscosity_pa_s: f64,
    pub specific_heat_j_kg_k: f64,
    pub thermal_conductivity_w_m_k: f64,
    pub gas_constant_j_kg_k: f64,
    pub schmidt_number: f64,
    pub vapor_mass_fraction: f64,
}

impl GasState {
    /// Dry air with a trace of water vapor, at the given temperature and pressure
    pub fn air(temperature_k: f64, pressure_pa: f64, vapor_mass_fraction: f64) -> Self {
        let gas_constant_j_kg_k = 287.0;
        Self {
            temperature_k,
            pressure_pa,
            velocity_m_s: 0.0,
            density_kg_m3: ideal_gas_density(pressure_pa, gas_constant_j_kg_k, temperature_k),
            viscosity_pa_s: 1.861e-5,
            specific_heat_j_kg_k: 1005.0,
            thermal_conductivity_w_m_k: 0.0257,
            gas_constant_j_kg_k,
            schmidt_number: 0.61,
            vapor_mass_fraction,
        }
    }

    pub fn with_velocity(mut self, velocity_m_s: f64) -> Self {
        self.velocity_m_s = velocity_m_s;
        self
    }

    /// Pr = mu * cp / lambda
    pub fn prandtl_number(&self) -> f64 {
        self.viscosity_pa_s * self.specific_heat_j_kg_k / self.thermal_conductivity_w_m_k
    }

    /// Particle Reynolds number for a sphere of `diameter` moving at `relative_speed`
    pub fn reynolds_number(&self, diameter: f64, relative_speed: f64) -> f64 {
        self.density_kg_m3 * diameter * relative_speed.abs() / self.viscosity_pa_s
    }

    /// Mass of the gas parcel of `volume_m3`, never exactly zero
    pub fn parcel_mass(&self, volume_m3: f64) -> f64 {
        self.density_kg_m3 * volume_m3 + crate::constants::GAS_MASS_EPSILON_KG
    }
}

/// rho = P / (R T)
pub fn ideal_gas_density(pressure_pa: f64, gas_constant_j_kg_k: f64, temperature_k: f64) -> f64 {
    pressure_pa / (gas_constant_j_kg_k * temperature_k)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_air_density_at_reference_conditions() {
        let gas = GasState::air(298.0, 101_325.0, 0.001);
        assert_abs_diff_eq!(gas.density_kg_m3, 1.1847, epsilon = 1e-3);
    }

    #[test]
    fn test_air_prandtl_number() {
        let gas = GasState::air(298.0, 101_325.0, 0.0);
        assert_abs_diff_eq!(gas.prandtl_number(), 0.7278, epsilon = 1e-3);
    }

    #[test]
    fn test_reynolds_is_symmetric_in_direction() {
        let gas = GasState::air(298.0, 101_325.0, 0.0);
        assert_eq!(gas.reynolds_number(1e-3, 2.0), gas.reynolds_number(1e-3, -2.0));
        assert_eq!(gas.reynolds_number(1e-3, 0.0), 0.0);
    }
}
