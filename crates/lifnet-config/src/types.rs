// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! Every struct maps to a section of `lifnet_configuration.toml`. Missing
//! sections and keys fall back to the canonical single-cell scenario.

use std::path::PathBuf;

use lifnet_engine::{current_range, PairedNeuronExperiment, RunWindow, ThresholdSearch};
use lifnet_neural::{LifParameters, SynapseParameters};
use serde::{Deserialize, Serialize};

use crate::ConfigResult;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LifnetConfig {
    pub neuron: NeuronConfig,
    pub synapse: SynapseConfig,
    pub simulation: SimulationConfig,
    pub threshold_search: ThresholdSearchConfig,
    pub firing_rate: FiringRateConfig,
    pub pair: PairConfig,
    pub logging: LoggingConfig,
}

impl LifnetConfig {
    pub fn lif_parameters(&self) -> ConfigResult<LifParameters> {
        let n = &self.neuron;
        Ok(LifParameters::new(n.t_m, n.e_l, n.v_reset, n.v_th, n.r_m, n.i_e)?)
    }

    pub fn synapse_parameters(&self) -> ConfigResult<SynapseParameters> {
        let s = &self.synapse;
        Ok(SynapseParameters::new(s.g_s, s.p_max, s.t_s, s.e_s)?)
    }

    pub fn run_window(&self) -> ConfigResult<RunWindow> {
        Ok(RunWindow::new(self.simulation.dt, self.simulation.duration)?)
    }

    pub fn threshold_search(&self) -> ThresholdSearch {
        let t = &self.threshold_search;
        match t.strategy {
            SearchStrategy::Linear => ThresholdSearch::Linear {
                start: t.start,
                step: t.step,
            },
            SearchStrategy::Bisection => ThresholdSearch::Bisection {
                low: t.low,
                high: t.high,
                tolerance: t.tolerance,
            },
        }
    }

    /// Injected currents of the firing-rate sweep
    pub fn firing_rate_currents(&self) -> ConfigResult<Vec<f64>> {
        let f = &self.firing_rate;
        Ok(current_range(f.i_start, f.i_stop, f.i_step)?)
    }

    pub fn paired_experiment(&self) -> ConfigResult<PairedNeuronExperiment> {
        Ok(PairedNeuronExperiment::new(
            self.lif_parameters()?,
            self.synapse_parameters()?,
            self.run_window()?,
        )?)
    }
}

/// Intrinsic neuron parameters
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct NeuronConfig {
    pub t_m: f64,
    pub e_l: f64,
    pub v_reset: f64,
    pub v_th: f64,
    pub r_m: f64,
    pub i_e: f64,
}

impl Default for NeuronConfig {
    fn default() -> Self {
        let p = LifParameters::default();
        Self {
            t_m: p.t_m,
            e_l: p.e_l,
            v_reset: p.v_reset,
            v_th: p.v_th,
            r_m: p.r_m,
            i_e: p.i_e,
        }
    }
}

/// Synapse parameters shared by both synapses of a paired run
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SynapseConfig {
    pub g_s: f64,
    pub p_max: f64,
    pub t_s: f64,
    pub e_s: f64,
}

impl Default for SynapseConfig {
    fn default() -> Self {
        let p = SynapseParameters::default();
        Self {
            g_s: p.g_s,
            p_max: p.p_max,
            t_s: p.t_s,
            e_s: p.e_s,
        }
    }
}

/// Step size and run length (ms)
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub dt: f64,
    pub duration: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            dt: 1.0,
            duration: 1000.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchStrategy {
    Linear,
    Bisection,
}

/// Threshold current search. `start`/`step` drive the linear search,
/// `low`/`high`/`tolerance` the bisection.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ThresholdSearchConfig {
    pub strategy: SearchStrategy,
    pub start: f64,
    pub step: f64,
    pub low: f64,
    pub high: f64,
    pub tolerance: f64,
}

impl Default for ThresholdSearchConfig {
    fn default() -> Self {
        Self {
            strategy: SearchStrategy::Linear,
            start: 3.5,
            step: 0.01,
            low: 0.0,
            high: 5.0,
            tolerance: 1e-4,
        }
    }
}

/// Current range of the firing-rate curve (nA)
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FiringRateConfig {
    pub i_start: f64,
    pub i_stop: f64,
    pub i_step: f64,
}

impl Default for FiringRateConfig {
    fn default() -> Self {
        Self {
            i_start: 2.0,
            i_stop: 5.0,
            i_step: 0.1,
        }
    }
}

/// Paired-neuron run
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PairConfig {
    /// Seed for the initial potential draw
    pub seed: u64,
    /// Fixed initial potentials; drawn from `[V_reset, V_th)` when absent
    pub initial_potentials: Option<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// trace, debug, info, warn or error
    pub level: String,
    /// Also write JSON logs under `log_dir` (needs the `file-logging` feature)
    pub file_logging: bool,
    pub log_dir: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_logging: false,
            log_dir: PathBuf::from("./logs"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_canonical_scenario() {
        let config = LifnetConfig::default();
        assert_eq!(config.lif_parameters().unwrap(), LifParameters::default());
        assert_eq!(config.synapse_parameters().unwrap(), SynapseParameters::default());
        assert_eq!(config.run_window().unwrap(), RunWindow::new(1.0, 1000.0).unwrap());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: LifnetConfig = toml::from_str(
            r#"
            [neuron]
            i_e = 2.9

            [threshold_search]
            strategy = "bisection"
            "#,
        )
        .unwrap();
        assert_eq!(config.neuron.i_e, 2.9);
        assert_eq!(config.neuron.t_m, 10.0);
        assert!(matches!(
            config.threshold_search(),
            ThresholdSearch::Bisection { low, high, .. } if low == 0.0 && high == 5.0
        ));
    }

    #[test]
    fn test_conversion_rejects_invalid_neuron() {
        let mut config = LifnetConfig::default();
        config.neuron.r_m = 0.0;
        assert!(config.lif_parameters().is_err());
        assert!(config.paired_experiment().is_err());
    }

    #[test]
    fn test_firing_rate_currents() {
        let currents = LifnetConfig::default().firing_rate_currents().unwrap();
        assert_eq!(currents.len(), 31);
        assert_eq!(currents[0], 2.0);
    }
}
