// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # LIF (Leaky Integrate-and-Fire) Neuron Model
//!
//! ## Model Dynamics
//!
//! ```text
//! Standalone (current-driven):
//!     t_m · dV/dt = E_L − V + R_m·I_e
//!
//! Synaptic (conductance-coupled):
//!     t_m · dV/dt = E_L − V − R_m·(P_s·G_s)·(V − E_s) + R_m·I_e
//!
//!     Where:
//!     - P_s = release probability of the incoming synapse at time t
//!     - G_s = synaptic conductance weight
//!     - E_s = synaptic equilibrium potential
//!
//! Integration (forward Euler, step dT):
//!     V ← V + dT · dV/dt
//!
//! Firing Check:
//!     if V > V_th:
//!         FIRE and reset to V_reset
//! ```
//!
//! Both modes share the membrane time constant `t_m`. The synaptic decay
//! constant `t_s` only shapes the release probability, never the membrane
//! integration.
//!
//! "Fired" is a per-step event, not a state: a neuron that crosses threshold is
//! back at `V_reset` before the step returns.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::synapse::Synapse;
use crate::types::error::require_finite;
use crate::types::{LifError, NeuronId, Result, SynapseId, SynapseSlot};

/// Intrinsic electrical parameters of a LIF neuron
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LifParameters {
    /// Membrane time constant (ms)
    pub t_m: f64,

    /// Resting (leak reversal) potential (mV)
    pub e_l: f64,

    /// Potential the membrane is forced to after a spike (mV)
    pub v_reset: f64,

    /// Spike threshold (mV), must exceed `v_reset`
    pub v_th: f64,

    /// Membrane resistance (MΩ)
    pub r_m: f64,

    /// Injected current (nA)
    pub i_e: f64,
}

impl LifParameters {
    pub fn new(t_m: f64, e_l: f64, v_reset: f64, v_th: f64, r_m: f64, i_e: f64) -> Result<Self> {
        let params = Self {
            t_m,
            e_l,
            v_reset,
            v_th,
            r_m,
            i_e,
        };
        params.validate()?;
        Ok(params)
    }

    /// Same cell, different injected current
    pub fn with_injected_current(self, i_e: f64) -> Self {
        Self { i_e, ..self }
    }

    pub fn validate(&self) -> Result<()> {
        require_finite("t_m", self.t_m)?;
        require_finite("E_L", self.e_l)?;
        require_finite("V_reset", self.v_reset)?;
        require_finite("V_th", self.v_th)?;
        require_finite("R_m", self.r_m)?;
        require_finite("I_e", self.i_e)?;

        if self.t_m <= 0.0 {
            return Err(LifError::invalid("t_m", self.t_m, "must be > 0"));
        }
        if self.r_m <= 0.0 {
            return Err(LifError::invalid("R_m", self.r_m, "must be > 0"));
        }
        if self.v_th <= self.v_reset {
            return Err(LifError::invalid("V_th", self.v_th, "must be > V_reset"));
        }
        Ok(())
    }

    /// Smallest injected current for which the steady state exceeds threshold:
    /// `(V_th − E_L) / R_m`
    pub fn analytic_threshold_current(&self) -> f64 {
        (self.v_th - self.e_l) / self.r_m
    }

    /// Potential the standalone membrane converges to when it never fires
    pub fn steady_state_potential(&self) -> f64 {
        self.e_l + self.r_m * self.i_e
    }

    /// Whether the standalone neuron eventually fires under its injected current
    pub fn is_suprathreshold(&self) -> bool {
        self.steady_state_potential() > self.v_th
    }
}

impl Default for LifParameters {
    fn default() -> Self {
        Self {
            t_m: 10.0,
            e_l: -70.0,
            v_reset: -70.0,
            v_th: -40.0,
            r_m: 10.0,
            i_e: 3.1,
        }
    }
}

/// Result of one integration step
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Excitation {
    /// Membrane potential after the step (already reset if `fired`)
    pub v: f64,
    pub fired: bool,
}

/// Where the synaptic term of a coupled step came from
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SynapticInput {
    /// The incoming synapse was read; `p_s` is its release probability at `t`
    Connected { p_s: f64 },
    /// No incoming synapse: the step ran in standalone mode instead
    MissingFallback,
}

/// Result of one synaptically-driven step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynapticExcitation {
    pub excitation: Excitation,
    pub input: SynapticInput,
}

impl SynapticExcitation {
    #[inline]
    pub fn synapse_found(&self) -> bool {
        matches!(self.input, SynapticInput::Connected { .. })
    }
}

/// Leaky integrate-and-fire point neuron
///
/// Synapse references are plain handles; the owning network keeps the synapses.
#[derive(Debug, Clone)]
pub struct Neuron {
    params: LifParameters,
    v: f64,
    incoming: Option<SynapseId>,
    outgoing: Option<SynapseId>,
}

impl Neuron {
    pub fn new(v_initial: f64, params: LifParameters) -> Result<Self> {
        params.validate()?;
        require_finite("V_initial", v_initial)?;
        Ok(Self {
            params,
            v: v_initial,
            incoming: None,
            outgoing: None,
        })
    }

    /// Neuron starting at its own reset potential
    pub fn at_reset(params: LifParameters) -> Result<Self> {
        Self::new(params.v_reset, params)
    }

    #[inline]
    pub fn params(&self) -> &LifParameters {
        &self.params
    }

    #[inline]
    pub fn membrane_potential(&self) -> f64 {
        self.v
    }

    #[inline]
    pub fn incoming(&self) -> Option<SynapseId> {
        self.incoming
    }

    #[inline]
    pub fn outgoing(&self) -> Option<SynapseId> {
        self.outgoing
    }

    /// Record `synapse` in one of this neuron's slots.
    ///
    /// An occupied slot is never overwritten.
    pub fn attach(&mut self, slot: SynapseSlot, synapse: SynapseId, me: NeuronId) -> Result<()> {
        let target = match slot {
            SynapseSlot::Incoming => &mut self.incoming,
            SynapseSlot::Outgoing => &mut self.outgoing,
        };
        if let Some(existing) = *target {
            return Err(LifError::SlotOccupied {
                neuron: me,
                slot,
                existing,
            });
        }
        *target = Some(synapse);
        Ok(())
    }

    /// Set the membrane potential
    #[inline]
    pub fn reset(&mut self, v: f64) {
        self.v = v;
    }

    /// One forward-Euler step of the current-driven membrane equation
    pub fn excite(&mut self, dt: f64) -> Excitation {
        let p = &self.params;
        let dv = dt * (1.0 / p.t_m) * (p.e_l - self.v + p.r_m * p.i_e);
        self.integrate(dv)
    }

    /// One forward-Euler step of the conductance-coupled membrane equation.
    ///
    /// `incoming` is the synapse feeding this neuron, read at simulation time `t`.
    /// Without one the step falls back to [`Neuron::excite`] and reports
    /// [`SynapticInput::MissingFallback`].
    ///
    /// Recording the spike on the outgoing synapse is the caller's job, since
    /// the neuron does not own it.
    pub fn synaptic_excite(&mut self, dt: f64, t: f64, incoming: Option<&Synapse>) -> SynapticExcitation {
        let Some(synapse) = incoming else {
            debug!(v = self.v, "no incoming synapse, falling back to standalone excitation");
            return SynapticExcitation {
                excitation: self.excite(dt),
                input: SynapticInput::MissingFallback,
            };
        };

        let p = &self.params;
        let p_s = synapse.release_probability(t);
        let coupling = p.r_m * (p_s * synapse.g_s()) * (self.v - synapse.e_s());
        let dv = dt / p.t_m * (p.e_l - self.v - coupling + p.r_m * p.i_e);

        SynapticExcitation {
            excitation: self.integrate(dv),
            input: SynapticInput::Connected { p_s },
        }
    }

    #[inline]
    fn integrate(&mut self, dv: f64) -> Excitation {
        self.v += dv;
        let fired = self.v > self.params.v_th;
        if fired {
            self.reset(self.params.v_reset);
        }
        Excitation { v: self.v, fired }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synapse::SynapseParameters;

    fn canonical(i_e: f64) -> LifParameters {
        LifParameters::default().with_injected_current(i_e)
    }

    #[test]
    fn test_single_euler_step() {
        let mut neuron = Neuron::at_reset(canonical(3.1)).unwrap();
        let step = neuron.excite(1.0);
        // -70 + 1 * 0.1 * (-70 + 70 + 31) = -66.9
        assert!((step.v - (-66.9)).abs() < 1e-12);
        assert!(!step.fired);
    }

    #[test]
    fn test_fires_and_resets_within_the_same_step() {
        let params = canonical(3.1);
        let mut neuron = Neuron::new(-40.5, params).unwrap();
        // -40.5 + 0.1 * (-70 + 40.5 + 31) = -40.35, still below
        assert!(!neuron.excite(1.0).fired);

        let mut neuron = Neuron::new(-39.95, params).unwrap();
        let step = neuron.excite(1.0);
        assert!(step.fired);
        assert_eq!(step.v, params.v_reset);
        assert_eq!(neuron.membrane_potential(), params.v_reset);
    }

    #[test]
    fn test_first_spike_of_canonical_cell() {
        // V_n = -39 - 31 * 0.9^n exceeds -40 first at n = 33
        let mut neuron = Neuron::at_reset(canonical(3.1)).unwrap();
        let first = (1..=100).find(|_| neuron.excite(1.0).fired);
        assert_eq!(first, Some(33));
    }

    #[test]
    fn test_reset_sets_potential() {
        let mut neuron = Neuron::at_reset(canonical(0.0)).unwrap();
        neuron.reset(12.5);
        assert_eq!(neuron.membrane_potential(), 12.5);
    }

    #[test]
    fn test_parameter_validation() {
        assert!(LifParameters::default().validate().is_ok());

        let bad_tm = LifParameters { t_m: 0.0, ..Default::default() };
        assert!(matches!(
            bad_tm.validate(),
            Err(LifError::InvalidParameter { name: "t_m", .. })
        ));

        let bad_rm = LifParameters { r_m: -1.0, ..Default::default() };
        assert!(bad_rm.validate().is_err());

        let bad_th = LifParameters { v_th: -70.0, ..Default::default() };
        assert!(bad_th.validate().is_err());

        let nan = LifParameters { i_e: f64::NAN, ..Default::default() };
        assert!(nan.validate().is_err());

        assert!(Neuron::new(f64::INFINITY, LifParameters::default()).is_err());
    }

    #[test]
    fn test_analytic_threshold() {
        let params = LifParameters::default();
        assert!((params.analytic_threshold_current() - 3.0).abs() < 1e-12);
        assert!(canonical(3.1).is_suprathreshold());
        assert!(!canonical(2.9).is_suprathreshold());
    }

    #[test]
    fn test_synaptic_excite_without_synapse_falls_back() {
        let mut coupled = Neuron::at_reset(canonical(3.1)).unwrap();
        let mut plain = Neuron::at_reset(canonical(3.1)).unwrap();

        let result = coupled.synaptic_excite(1.0, 0.0, None);
        assert_eq!(result.input, SynapticInput::MissingFallback);
        assert!(!result.synapse_found());
        assert_eq!(result.excitation, plain.excite(1.0));
    }

    #[test]
    fn test_silent_synapse_matches_standalone() {
        // A synapse that never saw a spike releases nothing
        let synapse = Synapse::new(SynapseParameters::default()).unwrap();
        let mut coupled = Neuron::at_reset(canonical(3.1)).unwrap();
        let mut plain = Neuron::at_reset(canonical(3.1)).unwrap();

        let result = coupled.synaptic_excite(1.0, 5.0, Some(&synapse));
        assert_eq!(result.input, SynapticInput::Connected { p_s: 0.0 });
        assert_eq!(result.excitation, plain.excite(1.0));
    }

    #[test]
    fn test_synaptic_term_sign_follows_equilibrium_potential() {
        let params = canonical(0.0);
        let mut excitatory = Synapse::new(SynapseParameters::excitatory(0.015, 0.5, 10.0)).unwrap();
        let mut inhibitory = Synapse::new(SynapseParameters::inhibitory(0.015, 0.5, 10.0)).unwrap();
        excitatory.record_spike(0.0);
        inhibitory.record_spike(0.0);

        let mut a = Neuron::new(-60.0, params).unwrap();
        let mut b = Neuron::new(-60.0, params).unwrap();
        let up = a.synaptic_excite(1.0, 0.0, Some(&excitatory)).excitation.v;
        let down = b.synaptic_excite(1.0, 0.0, Some(&inhibitory)).excitation.v;

        // leak alone: -60 + 0.1 * (-70 + 60) = -61
        // excitatory: coupling = 10 * 0.0075 * (-60 - 0) = -4.5 -> -60 + 0.1 * (-10 + 4.5) = -60.55
        // inhibitory: coupling = 10 * 0.0075 * (-60 + 80) = 1.5 -> -60 + 0.1 * (-10 - 1.5) = -61.15
        assert!((up - (-60.55)).abs() < 1e-9);
        assert!((down - (-61.15)).abs() < 1e-9);
    }

    #[test]
    fn test_occupied_slot_is_rejected() {
        let mut neuron = Neuron::at_reset(LifParameters::default()).unwrap();
        let me = NeuronId(0);
        neuron.attach(SynapseSlot::Incoming, SynapseId(1), me).unwrap();
        let err = neuron.attach(SynapseSlot::Incoming, SynapseId(2), me).unwrap_err();
        assert_eq!(
            err,
            LifError::SlotOccupied {
                neuron: me,
                slot: SynapseSlot::Incoming,
                existing: SynapseId(1),
            }
        );
        assert_eq!(neuron.incoming(), Some(SynapseId(1)));
        assert_eq!(neuron.outgoing(), None);
    }
}
