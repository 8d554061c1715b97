// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration validation
//!
//! Every violation is collected so a user sees all problems in one pass.

use lifnet_neural::{LifError, LifParameters, SynapseParameters};

use crate::{ConfigError, ConfigResult, LifnetConfig, SearchStrategy};

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validation errors that can occur during config validation
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    InvalidValue { field: String, reason: String },
    InvalidModel { section: &'static str, error: LifError },
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { field, reason } => {
                write!(f, "Invalid configuration value for {}: {}", field, reason)
            }
            Self::InvalidModel { section, error } => {
                write!(f, "[{}] {}", section, error)
            }
        }
    }
}

/// Validate the complete configuration
///
/// Checks for:
/// - Physically meaningful neuron and synapse parameters
/// - Positive step size and non-negative duration
/// - A usable threshold search and firing-rate range
/// - A known log level
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` listing every violation
pub fn validate_config(config: &LifnetConfig) -> ConfigResult<()> {
    let mut errors = Vec::new();

    validate_models(config, &mut errors);
    validate_simulation(config, &mut errors);
    validate_threshold_search(config, &mut errors);
    validate_firing_rate(config, &mut errors);
    validate_logging(config, &mut errors);

    if !errors.is_empty() {
        let error_messages = errors
            .iter()
            .map(|e| format!("  - {}", e))
            .collect::<Vec<_>>()
            .join("\n");

        return Err(ConfigError::ValidationError(format!(
            "Configuration validation failed:\n{}",
            error_messages
        )));
    }

    Ok(())
}

fn invalid(field: &str, reason: impl Into<String>) -> ConfigValidationError {
    ConfigValidationError::InvalidValue {
        field: field.to_string(),
        reason: reason.into(),
    }
}

fn validate_models(config: &LifnetConfig, errors: &mut Vec<ConfigValidationError>) {
    let n = &config.neuron;
    let neuron = LifParameters {
        t_m: n.t_m,
        e_l: n.e_l,
        v_reset: n.v_reset,
        v_th: n.v_th,
        r_m: n.r_m,
        i_e: n.i_e,
    };
    if let Err(error) = neuron.validate() {
        errors.push(ConfigValidationError::InvalidModel {
            section: "neuron",
            error,
        });
    }

    let s = &config.synapse;
    let synapse = SynapseParameters {
        g_s: s.g_s,
        p_max: s.p_max,
        t_s: s.t_s,
        e_s: s.e_s,
    };
    if let Err(error) = synapse.validate() {
        errors.push(ConfigValidationError::InvalidModel {
            section: "synapse",
            error,
        });
    }
}

fn validate_simulation(config: &LifnetConfig, errors: &mut Vec<ConfigValidationError>) {
    let sim = &config.simulation;
    if !sim.dt.is_finite() || sim.dt <= 0.0 {
        errors.push(invalid("simulation.dt", format!("must be > 0, got {}", sim.dt)));
    }
    if !sim.duration.is_finite() || sim.duration < 0.0 {
        errors.push(invalid(
            "simulation.duration",
            format!("must be >= 0, got {}", sim.duration),
        ));
    }
    if sim.dt.is_finite() && sim.dt > 0.0 && sim.duration.is_finite() && sim.duration < sim.dt {
        errors.push(invalid(
            "simulation.duration",
            format!("shorter than one step ({} < {})", sim.duration, sim.dt),
        ));
    }
}

fn validate_threshold_search(config: &LifnetConfig, errors: &mut Vec<ConfigValidationError>) {
    let t = &config.threshold_search;
    match t.strategy {
        SearchStrategy::Linear => {
            if !t.step.is_finite() || t.step <= 0.0 {
                errors.push(invalid("threshold_search.step", "must be > 0"));
            }
            if !t.start.is_finite() {
                errors.push(invalid("threshold_search.start", "must be finite"));
            }
        }
        SearchStrategy::Bisection => {
            if !(t.low.is_finite() && t.high.is_finite() && t.low < t.high) {
                errors.push(invalid(
                    "threshold_search.low",
                    format!("must be below threshold_search.high ({} >= {})", t.low, t.high),
                ));
            }
            if !t.tolerance.is_finite() || t.tolerance <= 0.0 {
                errors.push(invalid("threshold_search.tolerance", "must be > 0"));
            }
        }
    }
}

fn validate_firing_rate(config: &LifnetConfig, errors: &mut Vec<ConfigValidationError>) {
    let f = &config.firing_rate;
    if !f.i_step.is_finite() || f.i_step <= 0.0 {
        errors.push(invalid("firing_rate.i_step", "must be > 0"));
    }
    if !(f.i_start.is_finite() && f.i_stop.is_finite() && f.i_start <= f.i_stop) {
        errors.push(invalid(
            "firing_rate.i_start",
            format!("must not exceed firing_rate.i_stop ({} > {})", f.i_start, f.i_stop),
        ));
    }
}

fn validate_logging(config: &LifnetConfig, errors: &mut Vec<ConfigValidationError>) {
    let level = config.logging.level.to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(invalid(
            "logging.level",
            format!("'{}' is not one of {}", config.logging.level, LOG_LEVELS.join(", ")),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reports_every_violation() {
        let mut config = LifnetConfig::default();
        config.neuron.t_m = 0.0;
        config.synapse.p_max = 2.0;
        config.simulation.dt = -1.0;
        config.logging.level = "loud".to_string();

        let message = match validate_config(&config) {
            Err(ConfigError::ValidationError(message)) => message,
            other => panic!("expected validation error, got {:?}", other),
        };
        assert!(message.contains("[neuron]"));
        assert!(message.contains("[synapse]"));
        assert!(message.contains("simulation.dt"));
        assert!(message.contains("logging.level"));
    }

    #[test]
    fn test_threshold_below_reset_is_rejected() {
        let mut config = LifnetConfig::default();
        config.neuron.v_th = -75.0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_bisection_bracket() {
        let mut config = LifnetConfig::default();
        config.threshold_search.strategy = SearchStrategy::Bisection;
        assert!(validate_config(&config).is_ok());

        config.threshold_search.low = 6.0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_firing_rate_range() {
        let mut config = LifnetConfig::default();
        config.firing_rate.i_start = 9.0;
        assert!(validate_config(&config).is_err());
    }
}
