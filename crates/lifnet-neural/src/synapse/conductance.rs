// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! Conductance synapse with exponentially decaying release probability
//!
//! ```text
//! P_s(t) = P_max · exp(−(t − T_f) / t_s)
//! ```
//!
//! `T_f` is the time of the most recent presynaptic spike. Before the first
//! spike nothing has been released and `P_s = 0`.
//!
//! Whether a synapse is excitatory or inhibitory is only a matter of where
//! `E_s` sits relative to the postsynaptic membrane potential; no sign is
//! enforced here.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::types::error::require_finite;
use crate::types::{LifError, NeuronId, Result, SpikeTime, SynapseId};

/// Conventional equilibrium potential of an excitatory synapse (mV)
pub const EXCITATORY_REVERSAL: f64 = 0.0;

/// Conventional equilibrium potential of an inhibitory synapse (mV)
pub const INHIBITORY_REVERSAL: f64 = -80.0;

/// Immutable synapse parameters
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SynapseParameters {
    /// Conductance weight (>= 0)
    pub g_s: f64,

    /// Release probability right after a presynaptic spike, in [0, 1]
    pub p_max: f64,

    /// Release probability decay constant (ms)
    pub t_s: f64,

    /// Postsynaptic equilibrium potential (mV)
    pub e_s: f64,
}

impl SynapseParameters {
    pub fn new(g_s: f64, p_max: f64, t_s: f64, e_s: f64) -> Result<Self> {
        let params = Self { g_s, p_max, t_s, e_s };
        params.validate()?;
        Ok(params)
    }

    pub fn excitatory(g_s: f64, p_max: f64, t_s: f64) -> Self {
        Self {
            g_s,
            p_max,
            t_s,
            e_s: EXCITATORY_REVERSAL,
        }
    }

    pub fn inhibitory(g_s: f64, p_max: f64, t_s: f64) -> Self {
        Self {
            g_s,
            p_max,
            t_s,
            e_s: INHIBITORY_REVERSAL,
        }
    }

    pub fn validate(&self) -> Result<()> {
        require_finite("G_s", self.g_s)?;
        require_finite("P_max", self.p_max)?;
        require_finite("t_s", self.t_s)?;
        require_finite("E_s", self.e_s)?;

        if self.g_s < 0.0 {
            return Err(LifError::invalid("G_s", self.g_s, "must be >= 0"));
        }
        if !(0.0..=1.0).contains(&self.p_max) {
            return Err(LifError::invalid("P_max", self.p_max, "must be in [0, 1]"));
        }
        if self.t_s <= 0.0 {
            return Err(LifError::invalid("t_s", self.t_s, "must be > 0"));
        }
        Ok(())
    }
}

impl Default for SynapseParameters {
    fn default() -> Self {
        Self::excitatory(0.015, 0.5, 10.0)
    }
}

/// Chemical synapse between one presynaptic and one postsynaptic neuron
#[derive(Debug, Clone)]
pub struct Synapse {
    params: SynapseParameters,
    last_spike: SpikeTime,
    endpoints: Option<(NeuronId, NeuronId)>,
}

impl Synapse {
    pub fn new(params: SynapseParameters) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            params,
            last_spike: SpikeTime::Never,
            endpoints: None,
        })
    }

    #[inline]
    pub fn params(&self) -> &SynapseParameters {
        &self.params
    }

    #[inline]
    pub fn g_s(&self) -> f64 {
        self.params.g_s
    }

    #[inline]
    pub fn p_max(&self) -> f64 {
        self.params.p_max
    }

    #[inline]
    pub fn t_s(&self) -> f64 {
        self.params.t_s
    }

    #[inline]
    pub fn e_s(&self) -> f64 {
        self.params.e_s
    }

    /// Time of the most recent presynaptic spike
    #[inline]
    pub fn last_spike(&self) -> SpikeTime {
        self.last_spike
    }

    #[inline]
    pub fn presynaptic(&self) -> Option<NeuronId> {
        self.endpoints.map(|(pre, _)| pre)
    }

    #[inline]
    pub fn postsynaptic(&self) -> Option<NeuronId> {
        self.endpoints.map(|(_, post)| post)
    }

    /// Release probability at simulation time `t`.
    ///
    /// `t` earlier than the last spike yields a value above `P_max`; callers
    /// must not move the clock backwards.
    #[inline]
    pub fn release_probability(&self, t: f64) -> f64 {
        match self.last_spike.elapsed_at(t) {
            Some(elapsed) => self.params.p_max * (-elapsed / self.params.t_s).exp(),
            None => 0.0,
        }
    }

    /// Overwrite the last presynaptic spike time
    #[inline]
    pub fn record_spike(&mut self, t_f: f64) {
        self.last_spike = SpikeTime::At(t_f);
    }

    /// Forget every recorded spike
    pub fn clear_spikes(&mut self) {
        self.last_spike = SpikeTime::Never;
    }

    /// Record which neurons this synapse joins. Self-connections and rebinding
    /// are rejected and leave the synapse untouched.
    pub fn bind(&mut self, id: SynapseId, pre: NeuronId, post: NeuronId) -> Result<()> {
        if pre == post {
            return Err(LifError::SelfConnection(pre));
        }
        if let Some((pre, post)) = self.endpoints {
            return Err(LifError::SynapseAlreadyConnected {
                synapse: id,
                pre,
                post,
            });
        }
        self.endpoints = Some((pre, post));
        Ok(())
    }
}
