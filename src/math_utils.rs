//! Mathematical utility functions for the droplet integrators
//!
//! This module provides the BDF2 step, sphere geometry and the
//! percentage-deviation helpers used by tests.

use crate::constants::{BDF2_ALPHA1, BDF2_ALPHA2, BDF2_BETA, PI};

/// Assert that the deviation between two values is less than a threshold
///
/// This macro combines deviation calculation with assertion for cleaner test code.
/// It calculates the percentage deviation between `actual` and `expected`, then
/// asserts that this deviation is less than the specified `max_deviation`.
#[macro_export]
macro_rules! assert_deviation {
    ($actual:expr, $expected:expr, $max_deviation:expr) => {
        {
            let actual_val = $actual;
            let expected_val = $expected;
            let max_dev = $max_deviation;
            let actual_deviation = $crate::math_utils::deviation(actual_val, expected_val);

            if actual_deviation >= max_dev {
                panic!(
                    "assertion failed: deviation {:.2}% >= {:.2}%\n  actual: {:?},\n  expected: {:?}",
                    actual_deviation, max_dev, actual_val, expected_val
                );
            }
        }
    };
    ($actual:expr, $expected:expr, $max_deviation:expr, $($arg:tt)+) => {
        {
            let actual_val = $actual;
            let expected_val = $expected;
            let max_dev = $max_deviation;
            let actual_deviation = $crate::math_utils::deviation(actual_val, expected_val);

            if actual_deviation >= max_dev {
                panic!(
                    "assertion failed: deviation {:.2}% >= {:.2}%: {}\n  actual: {:?},\n  expected: {:?}",
                    actual_deviation, max_dev, format_args!($($arg)+), actual_val, expected_val
                );
            }
        }
    };
}

/// Second-order backward-difference step for `dy/dt = rate`
///
/// # Arguments
/// * `dt` - Time step in seconds
/// * `rate` - Time derivative evaluated at the new level
/// * `current` - Value at level n
/// * `previous` - Value at level n-1
///
/// # Examples
/// ```
/// use droplet_evap_rust::math_utils::bdf2_advance;
///
/// // A constant history with zero rate stays put
/// assert!((bdf2_advance(0.01, 0.0, 2.0, 2.0) - 2.0).abs() < 1e-12);
/// ```
pub fn bdf2_advance(dt: f64, rate: f64, current: f64, previous: f64) -> f64 {
    dt * BDF2_BETA * rate + bdf2_history(current, previous)
}

/// The history part of a BDF2 step, `-alpha1 * y_n - alpha2 * y_(n-1)`
pub fn bdf2_history(current: f64, previous: f64) -> f64 {
    -BDF2_ALPHA1 * current - BDF2_ALPHA2 * previous
}

/// Volume of a sphere from its diameter
pub fn sphere_volume(diameter: f64) -> f64 {
    PI * diameter.powi(3) / 6.0
}

/// Diameter of a sphere from its volume
pub fn sphere_diameter(volume: f64) -> f64 {
    (6.0 * volume / PI).cbrt()
}

/// Calculate the percentage deviation between two values
///
/// Returns the percentage difference of `actual` from `expected`.
/// Uses the expected value as the reference (base) for the percentage calculation.
///
/// # Examples
/// ```
/// use droplet_evap_rust::math_utils::deviation;
///
/// // 105 is 5% higher than 100
/// assert_eq!(deviation(105.0, 100.0), 5.0);
///
/// // 95 is 5% lower than 100
/// assert_eq!(deviation(95.0, 100.0), 5.0);
/// ```
pub fn deviation(actual: f64, expected: f64) -> f64 {
    if expected.abs() < f64::EPSILON {
        if actual.abs() < f64::EPSILON {
            0.0
        } else {
            f64::INFINITY
        }
    } else {
        ((actual - expected).abs() / expected.abs()) * 100.0
    }
}
