// src/fluid.rs - Working-fluid profiles and the phase-equilibrium capability

use crate::constants::STANDARD_PRESSURE_PA;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FluidType {
    Water,
    Ethanol,
}

impl FluidType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FluidType::Water => "water",
            FluidType::Ethanol => "ethanol",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "water" => Some(FluidType::Water),
            "ethanol" => Some(FluidType::Ethanol),
            _ => None,
        }
    }

    pub fn profile(&self) -> &'static FluidProfile {
        get_profile(*self)
    }
}

#[derive(Debug, Clone)]
pub struct FluidProfile {
    pub kind: FluidType,
    pub triple_point_k: f64,
    pub normal_boiling_point_k: f64,
    pub boiling_reference_pressure_pa: f64,
    pub latent_heat_j_kg: f64,
    pub vapor_gas_constant_j_kg_k: f64,
    pub liquid_density_kg_m3: f64,
    pub liquid_specific_heat_j_kg_k: f64,
    /// Stand-in saturation pressure used by `ConstantSaturation`
    pub stand_in_saturation_pressure_pa: f64,
}

pub static FLUID_PROFILES: Lazy<HashMap<FluidType, FluidProfile>> = Lazy::new(|| {
    use FluidType::*;
    let mut m = HashMap::new();

    m.insert(Water, FluidProfile {
        kind: Water,
        triple_point_k: 273.16,
        normal_boiling_point_k: 373.15,
        boiling_reference_pressure_pa: STANDARD_PRESSURE_PA,
        latent_heat_j_kg: 2477e3, // at 283K
        vapor_gas_constant_j_kg_k: 461.5,
        liquid_density_kg_m3: 1000.0,
        liquid_specific_heat_j_kg_k: 4184.0,
        stand_in_saturation_pressure_pa: 1.2192e3, // at 283K
    });

    m.insert(Ethanol, FluidProfile {
        kind: Ethanol,
        triple_point_k: 159.0,
        normal_boiling_point_k: 351.4,
        boiling_reference_pressure_pa: STANDARD_PRESSURE_PA,
        latent_heat_j_kg: 0.846e6,
        vapor_gas_constant_j_kg_k: 180.5,
        liquid_density_kg_m3: 789.0,
        liquid_specific_heat_j_kg_k: 2440.0,
        stand_in_saturation_pressure_pa: 5.95e3, // at 293K
    });

    m
});

pub fn get_profile(kind: FluidType) -> &'static FluidProfile {
    // every FluidType variant is inserted above
    &FLUID_PROFILES[&kind]
}

/// Saturation and phase constants of the droplet's liquid
///
/// The evaporation and boiling logic only ever talks to the fluid through
/// this trait.
pub trait PhaseEquilibrium {
    /// Saturation pressure (Pa) and its temperature derivative (Pa/K)
    fn saturation_pressure_with_slope(&self, kelvin: f64) -> (f64, f64);

    /// Saturation pressure in Pa
    fn saturation_pressure(&self, kelvin: f64) -> f64 {
        self.saturation_pressure_with_slope(kelvin).0
    }

    /// Below this temperature only condensation is allowed
    fn triple_point_k(&self) -> f64;

    /// Latent heat of vaporization in J/kg
    fn latent_heat_j_kg(&self, kelvin: f64) -> f64;

    /// Specific gas constant of the vapor in J/(kg·K)
    fn vapor_gas_constant(&self) -> f64;
}

/// Fixed saturation pressure regardless of temperature (dP/dT = 0)
#[derive(Debug, Clone)]
pub struct ConstantSaturation {
    pub profile: &'static FluidProfile,
    pub pressure_pa: f64,
}

impl ConstantSaturation {
    pub fn new(kind: FluidType) -> Self {
        let profile = get_profile(kind);
        Self {
            profile,
            pressure_pa: profile.stand_in_saturation_pressure_pa,
        }
    }

    pub fn with_pressure(kind: FluidType, pressure_pa: f64) -> Self {
        Self {
            profile: get_profile(kind),
            pressure_pa,
        }
    }
}

impl PhaseEquilibrium for ConstantSaturation {
    fn saturation_pressure_with_slope(&self, _kelvin: f64) -> (f64, f64) {
        (self.pressure_pa, 0.0)
    }

    fn triple_point_k(&self) -> f64 {
        self.profile.triple_point_k
    }

    fn latent_heat_j_kg(&self, _kelvin: f64) -> f64 {
        self.profile.latent_heat_j_kg
    }

    fn vapor_gas_constant(&self) -> f64 {
        self.profile.vapor_gas_constant_j_kg_k
    }
}

/// Clausius-Clapeyron curve anchored at the normal boiling point
///
/// P(T) = P_ref * exp(L/Rv * (1/T_b - 1/T))
#[derive(Debug, Clone)]
pub struct ClausiusClapeyron {
    pub profile: &'static FluidProfile,
}

impl ClausiusClapeyron {
    pub fn new(kind: FluidType) -> Self {
        Self {
            profile: get_profile(kind),
        }
    }
}

impl PhaseEquilibrium for ClausiusClapeyron {
    fn saturation_pressure_with_slope(&self, kelvin: f64) -> (f64, f64) {
        let p = self.profile;
        let l_over_r = p.latent_heat_j_kg / p.vapor_gas_constant_j_kg_k;
        let kelvin = kelvin.max(1.0);
        let pressure = p.boiling_reference_pressure_pa
            * (l_over_r * (1.0 / p.normal_boiling_point_k - 1.0 / kelvin)).exp();
        (pressure, pressure * l_over_r / (kelvin * kelvin))
    }

    fn triple_point_k(&self) -> f64 {
        self.profile.triple_point_k
    }

    fn latent_heat_j_kg(&self, _kelvin: f64) -> f64 {
        self.profile.latent_heat_j_kg
    }

    fn vapor_gas_constant(&self) -> f64 {
        self.profile.vapor_gas_constant_j_kg_k
    }
}
