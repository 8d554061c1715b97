// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Parameter sweeps built from independent fixed-duration runs.
//!
//! Every run constructs a fresh neuron at `V_reset`; nothing carries over from
//! one sweep point to the next.

use lifnet_neural::{LifError, LifParameters, Neuron, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::network::Network;
use crate::simulation::{ExcitationMode, Simulation};

/// Upper bound on runs a single threshold search may spend
pub const MAX_SEARCH_RUNS: usize = 100_000;

/// Step size and length of one run (ms)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunWindow {
    pub dt: f64,
    pub duration: f64,
}

impl RunWindow {
    pub fn new(dt: f64, duration: f64) -> Result<Self> {
        let window = Self { dt, duration };
        window.validate()?;
        Ok(window)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(LifError::InvalidTimeStep(self.dt));
        }
        if !self.duration.is_finite() || self.duration < 0.0 {
            return Err(LifError::InvalidDuration(self.duration));
        }
        Ok(())
    }
}

impl Default for RunWindow {
    fn default() -> Self {
        Self {
            dt: 1.0,
            duration: 1000.0,
        }
    }
}

/// Spikes of a lone current-driven neuron over one run
pub fn count_spikes(params: &LifParameters, window: &RunWindow) -> Result<usize> {
    window.validate()?;
    let mut network = Network::new();
    let id = network.add_neuron(Neuron::at_reset(*params)?);
    let mut sim = Simulation::new(network, window.dt, ExcitationMode::Standalone)?;
    let summary = sim.run_for(window.duration)?;
    Ok(summary.spikes(id))
}

/// Whether a fresh neuron stays silent for the whole run
pub fn runs_to_completion_without_firing(params: &LifParameters, window: &RunWindow) -> Result<bool> {
    Ok(count_spikes(params, window)? == 0)
}

/// How to look for the smallest injected current that makes the neuron fire
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum ThresholdSearch {
    /// Start from a firing current and lower it by `step` until a run stays silent
    Linear { start: f64, step: f64 },
    /// Halve `[low, high]` until it is narrower than `tolerance`;
    /// `low` must stay silent and `high` must fire
    Bisection { low: f64, high: f64, tolerance: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdEstimate {
    /// Smallest tested current that fired (nA)
    pub numeric: f64,
    /// Largest tested current that stayed silent (nA)
    pub silent: f64,
    /// `(V_th − E_L) / R_m`
    pub analytic: f64,
    /// Simulation runs spent
    pub runs: usize,
}

impl ThresholdEstimate {
    pub fn error(&self) -> f64 {
        self.numeric - self.analytic
    }
}

pub fn find_threshold_current(
    params: &LifParameters,
    window: &RunWindow,
    search: ThresholdSearch,
) -> Result<ThresholdEstimate> {
    window.validate()?;
    let silent_at = |i_e: f64| runs_to_completion_without_firing(&params.with_injected_current(i_e), window);

    let estimate = match search {
        ThresholdSearch::Linear { start, step } => {
            if !start.is_finite() || !step.is_finite() || step <= 0.0 {
                return Err(LifError::InvalidSearch(format!(
                    "linear search needs a finite start and a step > 0, got start={start}, step={step}"
                )));
            }
            if silent_at(start)? {
                return Err(LifError::InvalidSearch(format!(
                    "start current {start} nA does not fire within {} ms",
                    window.duration
                )));
            }

            let mut runs = 1;
            let mut firing = start;
            loop {
                if runs >= MAX_SEARCH_RUNS {
                    return Err(LifError::InvalidSearch(format!(
                        "no silent current found after {runs} runs"
                    )));
                }
                let candidate = start - runs as f64 * step;
                runs += 1;
                if silent_at(candidate)? {
                    break ThresholdEstimate {
                        numeric: firing,
                        silent: candidate,
                        analytic: params.analytic_threshold_current(),
                        runs,
                    };
                }
                firing = candidate;
            }
        }
        ThresholdSearch::Bisection {
            low,
            high,
            tolerance,
        } => {
            if !low.is_finite() || !high.is_finite() || low >= high || !tolerance.is_finite() || tolerance <= 0.0 {
                return Err(LifError::InvalidSearch(format!(
                    "bisection needs low < high and tolerance > 0, got [{low}, {high}], tolerance={tolerance}"
                )));
            }
            if !silent_at(low)? {
                return Err(LifError::InvalidSearch(format!("low current {low} nA already fires")));
            }
            if silent_at(high)? {
                return Err(LifError::InvalidSearch(format!("high current {high} nA never fires")));
            }

            let (mut low, mut high) = (low, high);
            let mut runs = 2;
            while high - low > tolerance {
                if runs >= MAX_SEARCH_RUNS {
                    return Err(LifError::InvalidSearch(format!(
                        "bisection did not reach tolerance {tolerance} after {runs} runs"
                    )));
                }
                let mid = low + (high - low) / 2.0;
                runs += 1;
                if silent_at(mid)? {
                    low = mid;
                } else {
                    high = mid;
                }
                debug!(low, high, "bisection step");
            }
            ThresholdEstimate {
                numeric: high,
                silent: low,
                analytic: params.analytic_threshold_current(),
                runs,
            }
        }
    };

    info!(
        numeric = estimate.numeric,
        analytic = estimate.analytic,
        runs = estimate.runs,
        "threshold current found"
    );
    Ok(estimate)
}

/// One point of a current–firing-rate curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FiringRatePoint {
    /// Injected current (nA)
    pub i_e: f64,
    pub spike_count: usize,
    pub rate_hz: f64,
}

pub fn firing_rate_curve(
    params: &LifParameters,
    currents: &[f64],
    window: &RunWindow,
) -> Result<Vec<FiringRatePoint>> {
    window.validate()?;
    currents
        .iter()
        .map(|&i_e| {
            let spike_count = count_spikes(&params.with_injected_current(i_e), window)?;
            let rate_hz = if window.duration > 0.0 {
                spike_count as f64 * 1000.0 / window.duration
            } else {
                0.0
            };
            debug!(i_e, spike_count, rate_hz, "firing rate point");
            Ok(FiringRatePoint {
                i_e,
                spike_count,
                rate_hz,
            })
        })
        .collect()
}

/// `start, start + step, ...` up to and including `stop`
pub fn current_range(start: f64, stop: f64, step: f64) -> Result<Vec<f64>> {
    if !start.is_finite() || !stop.is_finite() || !step.is_finite() || step <= 0.0 || stop < start {
        return Err(LifError::InvalidSearch(format!(
            "current range needs start <= stop and step > 0, got {start}..={stop} by {step}"
        )));
    }
    let count = ((stop - start) / step + 1e-9).floor() as usize + 1;
    Ok((0..count).map(|k| start + k as f64 * step).collect())
}
