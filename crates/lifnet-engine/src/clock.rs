// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Simulation clock
//!
//! One clock per run, written only by the driver. Time is derived from the step
//! counter so long runs do not accumulate floating-point drift.

use lifnet_neural::{LifError, Result};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationClock {
    dt: f64,
    step: u64,
}

impl SimulationClock {
    pub fn new(dt: f64) -> Result<Self> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(LifError::InvalidTimeStep(dt));
        }
        Ok(Self { dt, step: 0 })
    }

    /// Current simulation time (ms)
    #[inline]
    pub fn now(&self) -> f64 {
        self.step as f64 * self.dt
    }

    #[inline]
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Steps taken since construction or the last reset
    #[inline]
    pub fn step(&self) -> u64 {
        self.step
    }

    #[inline]
    pub fn advance(&mut self) {
        self.step += 1;
    }

    pub fn reset(&mut self) {
        self.step = 0;
    }

    /// Number of steps a run of `duration` ms takes: every `t = k·dt < duration`
    pub fn steps_for(&self, duration: f64) -> Result<u64> {
        if !duration.is_finite() || duration < 0.0 {
            return Err(LifError::InvalidDuration(duration));
        }
        let ratio = duration / self.dt;
        let nearest = ratio.round();
        // 100.0 / 0.1 must be 1000 steps, not 1001
        let steps = if (ratio - nearest).abs() < 1e-9 {
            nearest
        } else {
            ratio.ceil()
        };
        Ok(steps as u64)
    }
}
