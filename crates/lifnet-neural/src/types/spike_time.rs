// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Last-spike bookkeeping for synapses.
//!
//! A synapse that has never seen a presynaptic spike is distinct from one whose
//! presynaptic neuron fired at `t = 0`; `SpikeTime::Never` keeps the two apart.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Simulation time (ms) of the most recent presynaptic spike
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SpikeTime {
    #[default]
    Never,
    At(f64),
}

impl SpikeTime {
    /// Milliseconds elapsed between the recorded spike and `t`, if any spike was recorded
    #[inline]
    pub fn elapsed_at(self, t: f64) -> Option<f64> {
        match self {
            SpikeTime::Never => None,
            SpikeTime::At(t_f) => Some(t - t_f),
        }
    }

    #[inline]
    pub fn as_option(self) -> Option<f64> {
        match self {
            SpikeTime::Never => None,
            SpikeTime::At(t_f) => Some(t_f),
        }
    }

    #[inline]
    pub fn has_fired(self) -> bool {
        matches!(self, SpikeTime::At(_))
    }
}
