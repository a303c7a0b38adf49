//! Utilities for converting between temperature and specific enthalpy
//! for a liquid with constant specific heat.

/// Computes specific enthalpy (J/kg) from temperature in Kelvin.
///
/// # Arguments
/// - `temp_k`: Temperature in Kelvin
/// - `specific_heat`: Specific heat capacity in J/(kg·K)
pub fn enthalpy_from_kelvin(temp_k: f64, specific_heat: f64) -> f64 {
    specific_heat * temp_k
}

/// Computes temperature in Kelvin from specific enthalpy (J/kg).
pub fn kelvin_from_enthalpy(enthalpy_j_kg: f64, specific_heat: f64) -> f64 {
    enthalpy_j_kg / specific_heat
}
