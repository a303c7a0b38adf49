//! Scenario configuration: numerics, carrier gas and droplet initial state.
//!
//! Every section defaults to the reference scenario, a 1.1 mm water droplet
//! at 282 K in still air at 298 K, so a partial JSON file only needs the
//! values it changes.

use crate::droplet_state::DropletState;
use crate::error::ConfigError;
use crate::fluid::{ClausiusClapeyron, ConstantSaturation, FluidType, PhaseEquilibrium};
use crate::gas::{ideal_gas_density, GasState};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub name: String,
    pub numerics: NumericsConfig,
    pub gas: GasConfig,
    pub droplet: DropletConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumericsConfig {
    pub dt_s: f64,
    pub steps: i32,
    /// Volume of the gas parcel the droplet exchanges momentum with
    pub gas_volume_m3: f64,
    /// Console report every N steps; 0 disables the reporter
    pub report_interval: i32,
    /// Feed the coupled gas velocity back into the next step
    pub two_way_coupling: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GasConfig {
    pub temperature_k: f64,
    pub pressure_pa: f64,
    pub velocity_m_s: f64,
    /// Derived from the ideal-gas law when absent
    pub density_kg_m3: Option<f64>,
    pub viscosity_pa_s: f64,
    pub specific_heat_j_kg_k: f64,
    pub thermal_conductivity_w_m_k: f64,
    pub gas_constant_j_kg_k: f64,
    pub schmidt_number: f64,
    pub vapor_mass_fraction: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DropletConfig {
    pub fluid: FluidType,
    pub diameter_m: f64,
    pub temperature_k: f64,
    pub velocity_m_s: f64,
    /// Falls back to the fluid profile
    pub density_kg_m3: Option<f64>,
    /// Falls back to the fluid profile
    pub specific_heat_j_kg_k: Option<f64>,
    pub saturation: SaturationConfig,
}

/// Which saturation-pressure curve the droplet uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum SaturationConfig {
    /// Fixed pressure; the fluid's stand-in value when `pressure_pa` is absent
    Constant {
        #[serde(default)]
        pressure_pa: Option<f64>,
    },
    ClausiusClapeyron,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            name: "reference_water_droplet".to_string(),
            numerics: NumericsConfig::default(),
            gas: GasConfig::default(),
            droplet: DropletConfig::default(),
        }
    }
}

impl Default for NumericsConfig {
    fn default() -> Self {
        Self {
            dt_s: 1e-2,
            steps: 100,
            gas_volume_m3: 8e-3,
            report_interval: 10,
            two_way_coupling: false,
        }
    }
}

impl Default for GasConfig {
    fn default() -> Self {
        Self {
            temperature_k: 298.0,
            pressure_pa: 101_325.0,
            velocity_m_s: 0.0,
            density_kg_m3: None,
            viscosity_pa_s: 1.861e-5,
            specific_heat_j_kg_k: 1005.0,
            thermal_conductivity_w_m_k: 0.0257,
            gas_constant_j_kg_k: 287.0,
            schmidt_number: 0.61,
            vapor_mass_fraction: 0.001,
        }
    }
}

impl Default for DropletConfig {
    fn default() -> Self {
        Self {
            fluid: FluidType::Water,
            diameter_m: 1.1e-3,
            temperature_k: 282.0,
            velocity_m_s: 0.0,
            density_kg_m3: None,
            specific_heat_j_kg_k: None,
            saturation: SaturationConfig::default(),
        }
    }
}

impl Default for SaturationConfig {
    fn default() -> Self {
        SaturationConfig::Constant { pressure_pa: None }
    }
}

fn require_positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("must be positive, got {}", value),
        })
    }
}

impl ScenarioConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: ScenarioConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("numerics.dt_s", self.numerics.dt_s)?;
        require_positive("numerics.gas_volume_m3", self.numerics.gas_volume_m3)?;
        if self.numerics.steps < 0 {
            return Err(ConfigError::Invalid {
                field: "numerics.steps",
                reason: format!("must not be negative, got {}", self.numerics.steps),
            });
        }

        require_positive("gas.temperature_k", self.gas.temperature_k)?;
        require_positive("gas.pressure_pa", self.gas.pressure_pa)?;
        require_positive("gas.viscosity_pa_s", self.gas.viscosity_pa_s)?;
        require_positive("gas.specific_heat_j_kg_k", self.gas.specific_heat_j_kg_k)?;
        require_positive("gas.thermal_conductivity_w_m_k", self.gas.thermal_conductivity_w_m_k)?;
        require_positive("gas.gas_constant_j_kg_k", self.gas.gas_constant_j_kg_k)?;
        require_positive("gas.schmidt_number", self.gas.schmidt_number)?;
        if let Some(density) = self.gas.density_kg_m3 {
            require_positive("gas.density_kg_m3", density)?;
        }
        if !(0.0..1.0).contains(&self.gas.vapor_mass_fraction) {
            return Err(ConfigError::Invalid {
                field: "gas.vapor_mass_fraction",
                reason: format!("must lie in [0, 1), got {}", self.gas.vapor_mass_fraction),
            });
        }

        require_positive("droplet.diameter_m", self.droplet.diameter_m)?;
        require_positive("droplet.temperature_k", self.droplet.temperature_k)?;
        require_positive("droplet.density_kg_m3", self.droplet_density())?;
        require_positive("droplet.specific_heat_j_kg_k", self.droplet_specific_heat())?;
        if let SaturationConfig::Constant { pressure_pa: Some(pressure) } = self.droplet.saturation {
            require_positive("droplet.saturation.pressure_pa", pressure)?;
        }

        Ok(())
    }

    pub fn droplet_density(&self) -> f64 {
        self.droplet
            .density_kg_m3
            .unwrap_or(self.droplet.fluid.profile().liquid_density_kg_m3)
    }

    pub fn droplet_specific_heat(&self) -> f64 {
        self.droplet
            .specific_heat_j_kg_k
            .unwrap_or(self.droplet.fluid.profile().liquid_specific_heat_j_kg_k)
    }

    pub fn gas_state(&self) -> GasState {
        let gas = &self.gas;
        GasState {
            temperature_k: gas.temperature_k,
            pressure_pa: gas.pressure_pa,
            velocity_m_s: gas.velocity_m_s,
            density_kg_m3: gas
                .density_kg_m3
                .unwrap_or_else(|| ideal_gas_density(gas.pressure_pa, gas.gas_constant_j_kg_k, gas.temperature_k)),
            viscosity_pa_s: gas.viscosity_pa_s,
            specific_heat_j_kg_k: gas.specific_heat_j_kg_k,
            thermal_conductivity_w_m_k: gas.thermal_conductivity_w_m_k,
            gas_constant_j_kg_k: gas.gas_constant_j_kg_k,
            schmidt_number: gas.schmidt_number,
            vapor_mass_fraction: gas.vapor_mass_fraction,
        }
    }

    pub fn droplet_state(&self) -> DropletState {
        DropletState::new(
            self.droplet_density(),
            self.droplet_specific_heat(),
            self.droplet.temperature_k,
            self.droplet.diameter_m,
        )
        .with_velocity(self.droplet.velocity_m_s)
    }

    pub fn phase_model(&self) -> Box<dyn PhaseEquilibrium> {
        let fluid = self.droplet.fluid;
        match self.droplet.saturation {
            SaturationConfig::Constant { pressure_pa: None } => Box::new(ConstantSaturation::new(fluid)),
            SaturationConfig::Constant { pressure_pa: Some(pressure) } => {
                Box::new(ConstantSaturation::with_pressure(fluid, pressure))
            }
            SaturationConfig::ClausiusClapeyron => Box::new(ClausiusClapeyron::new(fluid)),
        }
    }
}
