use crate::constants::DIAMETER_FLOOR_M;
use crate::math_utils::{sphere_diameter, sphere_volume};
use crate::temp_utils::{enthalpy_from_kelvin, kelvin_from_enthalpy};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Two most recent values of a quantity, newest first
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct History2<T> {
    pub current: T,
    pub previous: T,
}

impl<T: Copy> History2<T> {
    pub fn filled(value: T) -> Self {
        Self {
            current: value,
            previous: value,
        }
    }

    /// Shift the history by one level and make `value` current
    pub fn push(&mut self, value: T) {
        self.previous = self.current;
        self.current = value;
    }
}

/// Three most recent values of a quantity, newest first
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct History3<T> {
    pub current: T,
    pub previous: T,
    pub before_previous: T,
}

impl<T: Copy> History3<T> {
    pub fn filled(value: T) -> Self {
        Self {
            current: value,
            previous: value,
            before_previous: value,
        }
    }

    /// Shift the history by one level and make `value` current
    pub fn push(&mut self, value: T) {
        self.before_previous = self.previous;
        self.previous = self.current;
        self.current = value;
    }
}

/// Time history of a single spherical droplet
///
/// Mass and enthalpy are written by the mass/energy integrator, velocity and
/// position by the momentum integrator. Diameter and temperature are derived.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DropletState {
    pub velocity: History3<f64>,
    pub enthalpy: History2<f64>,
    pub position: History2<f64>,
    pub mass: History2<f32>,
    density: f64,
    specific_heat: f64,
}

impl DropletState {
    /// A droplet at rest at the origin with a uniform history
    pub fn new(density: f64, specific_heat: f64, temperature_k: f64, diameter_m: f64) -> Self {
        let mass = (density * sphere_volume(diameter_m)) as f32;
        Self {
            velocity: History3::filled(0.0),
            enthalpy: History2::filled(enthalpy_from_kelvin(temperature_k, specific_heat)),
            position: History2::filled(0.0),
            mass: History2::filled(mass),
            density,
            specific_heat,
        }
    }

    /// Start every velocity slot at `velocity_m_s`
    pub fn with_velocity(mut self, velocity_m_s: f64) -> Self {
        self.velocity = History3::filled(velocity_m_s);
        self
    }

    pub fn density(&self) -> f64 {
        self.density
    }

    pub fn specific_heat(&self) -> f64 {
        self.specific_heat
    }

    pub fn mass_kg(&self) -> f64 {
        self.mass.current as f64
    }

    pub fn diameter(&self) -> f64 {
        sphere_diameter(self.mass_kg() / self.density).max(DIAMETER_FLOOR_M)
    }

    pub fn volume(&self) -> f64 {
        sphere_volume(self.diameter())
    }

    pub fn temperature(&self) -> f64 {
        kelvin_from_enthalpy(self.enthalpy.current, self.specific_heat)
    }

    /// Overwrite the current enthalpy with the value for `kelvin`
    pub fn set_temperature(&mut self, kelvin: f64) {
        self.enthalpy.current = enthalpy_from_kelvin(kelvin, self.specific_heat);
    }

    /// Mass change over the last step divided by `dt`; zero for a non-positive step
    pub fn mass_rate(&self, dt: f64) -> f64 {
        if dt <= 0.0 {
            return 0.0;
        }
        (self.mass.current as f64 - self.mass.previous as f64) / dt
    }

    pub fn is_evaporated(&self) -> bool {
        self.mass.current <= 0.0
    }
}

impl fmt::Display for DropletState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Temperature: {:.4}\t Diameter: {:.6e}\tVelocity {:.6e}\t Position(x) {:.6e}",
            self.temperature(),
            self.diameter(),
            self.velocity.current,
            self.position.current
        )
    }
}
