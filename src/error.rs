//! Error types for scenario loading and solver diagnostics.

use std::fmt;
use thiserror::Error;

/// Errors raised while loading or validating a scenario.
///
/// The integrators themselves never fail; only configuration does.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read scenario file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse scenario: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid scenario value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// The iterative solvers that can run out of iterations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolverKind {
    EvaporationRate,
    EnthalpyBalance,
    BoilingPoint,
    Momentum,
}

impl fmt::Display for SolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SolverKind::EvaporationRate => "evaporation rate",
            SolverKind::EnthalpyBalance => "particle enthalpy update",
            SolverKind::BoilingPoint => "boiling temperature",
            SolverKind::Momentum => "particle momentum update",
        };
        f.write_str(name)
    }
}

/// A solver hit its iteration cap; the step continued with the last iterate.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{solver} failed to converge after {iterations} iterations (last value {last_value:e})")]
pub struct ConvergenceWarning {
    pub solver: SolverKind,
    pub iterations: usize,
    pub last_value: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convergence_warning_message() {
        let warning = ConvergenceWarning {
            solver: SolverKind::EnthalpyBalance,
            iterations: 100,
            last_value: 1.5e6,
        };
        let message = warning.to_string();
        assert!(message.starts_with("particle enthalpy update failed to converge"));
        assert!(message.contains("100 iterations"));
    }

    #[test]
    fn test_invalid_config_message() {
        let error = ConfigError::Invalid {
            field: "numerics.dt_s",
            reason: "must be positive".to_string(),
        };
        assert_eq!(error.to_string(), "invalid scenario value for `numerics.dt_s`: must be positive");
    }

    #[test]
    fn test_parse_error_converts() {
        let parsed: Result<serde_json::Value, _> = serde_json::from_str("{ not json");
        let error: ConfigError = parsed.unwrap_err().into();
        assert!(matches!(error, ConfigError::Parse(_)));
    }
}
