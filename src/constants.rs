pub const PI: f64 = std::f64::consts::PI;

// BDF2 time advance coefficients
pub const BDF2_BETA: f64 = 2.0 / 3.0;
pub const BDF2_ALPHA1: f64 = -4.0 / 3.0;
pub const BDF2_ALPHA2: f64 = 1.0 / 3.0;

// Floors used in place of zero denominators
pub const DIAMETER_FLOOR_M: f64 = 1e-20;
pub const HEAT_TRANSFER_DIAMETER_FLOOR_M: f64 = 1e-10;
pub const MASS_FRACTION_DENOM_FLOOR: f64 = 1e-30;
pub const LOG_ARGUMENT_FLOOR: f64 = 1e-40;
pub const MASS_FLOOR_KG: f32 = 1e-30;
pub const VOLUME_FLOOR_M3: f64 = 1e-30;
pub const GAS_MASS_EPSILON_KG: f64 = 1e-30;

// Mass below this fraction of the current value counts as fully evaporated
pub const EVAPORATED_MASS_FRACTION: f64 = 0.01;

// Langmuir-Knudsen evaporation
pub const EVAPORATION_MAX_ITERATIONS: usize = 40;
pub const EVAPORATION_TOLERANCE: f64 = 1e-5;
pub const EVAPORATION_MAX_DAMPING: f64 = 0.8;
pub const EVAPORATION_COEFFICIENT: f64 = 1.0; // accommodation coefficient alpha_e

// Ranz-Marshall style transfer correlations: 2 + 0.552 sqrt(Re) X^(1/3)
pub const TRANSFER_CORRELATION_COEFFICIENT: f64 = 0.552;

// Empirical enhancement applied to the convective heat-transfer coefficient
pub const HEAT_TRANSFER_ENHANCEMENT: f64 = 1.55;
pub const BLOWING_CORRECTION_THRESHOLD: f64 = 1e-6;

// Enthalpy root solve
pub const ENTHALPY_MAX_ITERATIONS: usize = 100;
pub const ENTHALPY_MIN_ITERATIONS: usize = 3;
pub const ENTHALPY_RELATIVE_TOLERANCE: f64 = 1e-6;
pub const ENTHALPY_BRACKET_TOLERANCE: f64 = 1e-5;
pub const ENTHALPY_OVERSHOOT_AFTER: usize = 4;
pub const ENTHALPY_OVERSHOOT_FACTOR: f64 = 1.1;

// Boiling point search
pub const BOILING_MAX_ITERATIONS: usize = 50;
pub const BOILING_PRESSURE_TOLERANCE: f64 = 1e-4;
pub const BOILING_SLOPE_FLOOR: f64 = 1e-30;

// Momentum coupling loop
pub const MOMENTUM_MAX_ITERATIONS: usize = 20;
pub const MOMENTUM_MIN_ITERATIONS: usize = 2;
pub const MOMENTUM_TOLERANCE: f64 = 1e-5;
pub const MOMENTUM_VELOCITY_SCALE: f64 = 0.1;
pub const DRAG_REGIME_REYNOLDS: f64 = 100.0;
pub const MAX_VOLUME_FRACTION: f64 = 2.0;

pub const STANDARD_PRESSURE_PA: f64 = 101_325.0;
