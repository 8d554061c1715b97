// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # Fixed-Step Simulation Driver
//!
//! Owns the network and the single simulation clock. One call to
//! [`Simulation::step`] updates every scheduled neuron exactly once at the
//! current clock value and then advances the clock by `dt`.
//!
//! ## Update Order
//! Neurons are updated one after another in the configured order (insertion
//! order unless [`Simulation::with_update_order`] says otherwise). In synaptic
//! mode a spike is recorded on the outgoing synapse immediately, so a neuron
//! later in the order sees it within the same step and an earlier one sees it
//! on the next step.

use std::collections::BTreeMap;

use ahash::AHashSet;
use lifnet_neural::{LifError, NeuronId, Result};
use tracing::{debug, trace};

use crate::clock::SimulationClock;
use crate::network::Network;
use crate::spike_ledger::SpikeLedger;
use crate::trace::VoltageTrace;

/// Which excitation operation the driver calls on each neuron
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExcitationMode {
    /// Injected current only; synapses are ignored
    #[default]
    Standalone,
    /// Injected current plus the incoming synapse; spikes propagate to outgoing synapses
    Synaptic,
}

/// Outcome of one neuron in one step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeuronStep {
    pub neuron: NeuronId,
    /// Membrane potential after the step
    pub v: f64,
    pub fired: bool,
    /// Synaptic mode only: `false` when the neuron had no incoming synapse and
    /// fell back to standalone excitation
    pub synapse_found: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StepReport {
    /// Step index within the run, starting at 0
    pub step: u64,
    /// Clock value the step was evaluated at
    pub t: f64,
    pub neurons: Vec<NeuronStep>,
}

impl StepReport {
    pub fn fired(&self) -> impl Iterator<Item = NeuronId> + '_ {
        self.neurons.iter().filter(|n| n.fired).map(|n| n.neuron)
    }
}

/// Totals for one call to [`Simulation::run_for`]
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub steps: u64,
    pub t_start: f64,
    pub t_end: f64,
    pub spike_counts: BTreeMap<NeuronId, usize>,
}

impl RunSummary {
    pub fn spikes(&self, neuron: NeuronId) -> usize {
        self.spike_counts.get(&neuron).copied().unwrap_or(0)
    }

    pub fn total_spikes(&self) -> usize {
        self.spike_counts.values().sum()
    }

    /// Mean firing rate of `neuron` over the run, in Hz
    pub fn firing_rate_hz(&self, neuron: NeuronId) -> f64 {
        let duration = self.t_end - self.t_start;
        if duration <= 0.0 {
            return 0.0;
        }
        self.spikes(neuron) as f64 * 1000.0 / duration
    }
}

#[derive(Debug, Clone)]
pub struct Simulation {
    network: Network,
    clock: SimulationClock,
    mode: ExcitationMode,
    order: Vec<NeuronId>,
    ledger: SpikeLedger,
}

impl Simulation {
    /// Driver over every neuron of `network`, in insertion order
    pub fn new(network: Network, dt: f64, mode: ExcitationMode) -> Result<Self> {
        let clock = SimulationClock::new(dt)?;
        let order = network.neuron_ids().collect();
        Ok(Self {
            network,
            clock,
            mode,
            order,
            ledger: SpikeLedger::new(),
        })
    }

    /// Update only the listed neurons, in exactly this order.
    ///
    /// Unknown or repeated ids are rejected.
    pub fn with_update_order(mut self, order: Vec<NeuronId>) -> Result<Self> {
        let mut seen = AHashSet::with_capacity(order.len());
        for &id in &order {
            if !self.network.contains_neuron(id) {
                return Err(LifError::NeuronNotFound(id));
            }
            if !seen.insert(id) {
                return Err(LifError::DuplicateInUpdateOrder(id));
            }
        }
        self.order = order;
        Ok(self)
    }

    #[inline]
    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    #[inline]
    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    #[inline]
    pub fn mode(&self) -> ExcitationMode {
        self.mode
    }

    #[inline]
    pub fn update_order(&self) -> &[NeuronId] {
        &self.order
    }

    #[inline]
    pub fn network(&self) -> &Network {
        &self.network
    }

    /// Spikes recorded since construction or the last [`Simulation::reset`]
    #[inline]
    pub fn ledger(&self) -> &SpikeLedger {
        &self.ledger
    }

    pub fn into_network(self) -> Network {
        self.network
    }

    /// Advance every scheduled neuron by one step
    pub fn step(&mut self) -> Result<StepReport> {
        let t = self.clock.now();
        let dt = self.clock.dt();
        let mut neurons = Vec::with_capacity(self.order.len());

        for &id in &self.order {
            let (excitation, synapse_found) = match self.mode {
                ExcitationMode::Standalone => (self.network.excite(id, dt)?, false),
                ExcitationMode::Synaptic => {
                    let result = self.network.synaptic_excite(id, dt, t)?;
                    (result.excitation, result.synapse_found())
                }
            };

            if excitation.fired {
                self.ledger.record(id, t);
                trace!(neuron = %id, t, "spike");
            }
            neurons.push(NeuronStep {
                neuron: id,
                v: excitation.v,
                fired: excitation.fired,
                synapse_found,
            });
        }

        let report = StepReport {
            step: self.clock.step(),
            t,
            neurons,
        };
        self.clock.advance();
        Ok(report)
    }

    /// Run for `duration` ms, handing every step report to `observer`
    pub fn run_with<F>(&mut self, duration: f64, mut observer: F) -> Result<RunSummary>
    where
        F: FnMut(&StepReport),
    {
        let steps = self.clock.steps_for(duration)?;
        let t_start = self.clock.now();
        let mut spike_counts: BTreeMap<NeuronId, usize> =
            self.order.iter().map(|&id| (id, 0)).collect();

        for _ in 0..steps {
            let report = self.step()?;
            for id in report.fired() {
                *spike_counts.entry(id).or_insert(0) += 1;
            }
            observer(&report);
        }

        let summary = RunSummary {
            steps,
            t_start,
            t_end: self.clock.now(),
            spike_counts,
        };
        debug!(
            steps,
            t_end = summary.t_end,
            spikes = summary.total_spikes(),
            mode = ?self.mode,
            "run complete"
        );
        Ok(summary)
    }

    pub fn run_for(&mut self, duration: f64) -> Result<RunSummary> {
        self.run_with(duration, |_| {})
    }

    /// Run for `duration` ms and keep the membrane potential of every step
    pub fn run_traced(&mut self, duration: f64) -> Result<(RunSummary, VoltageTrace)> {
        let mut trace = VoltageTrace::new();
        let summary = self.run_with(duration, |report| trace.push(report))?;
        Ok((summary, trace))
    }

    /// Rewind the clock, clear the ledger and return every neuron and synapse
    /// to its initial resting state
    pub fn reset(&mut self) {
        self.clock.reset();
        self.ledger.clear();
        self.network.reset_state();
    }
}
