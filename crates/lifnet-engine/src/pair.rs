// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Two identical neurons driving each other through reciprocal synapses.
//!
//! Random initial potentials come from a caller-supplied [`rand::Rng`], so a
//! seeded `StdRng` reproduces a run exactly.

use lifnet_neural::{LifParameters, Neuron, Result, Synapse, SynapseParameters};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::network::Network;
use crate::simulation::{ExcitationMode, Simulation};
use crate::sweep::RunWindow;
use crate::trace::VoltageTrace;

/// Uniform draw from `[V_reset, V_th)`
pub fn draw_initial_potential<R: Rng + ?Sized>(rng: &mut R, params: &LifParameters) -> f64 {
    rng.gen_range(params.v_reset..params.v_th)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PairedNeuronExperiment {
    pub neuron: LifParameters,
    pub synapse: SynapseParameters,
    pub window: RunWindow,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairOutcome {
    pub initial: [f64; 2],
    pub spike_counts: [usize; 2],
    pub trace: VoltageTrace,
}

impl PairOutcome {
    pub fn total_spikes(&self) -> usize {
        self.spike_counts.iter().sum()
    }
}

impl PairedNeuronExperiment {
    pub fn new(neuron: LifParameters, synapse: SynapseParameters, window: RunWindow) -> Result<Self> {
        neuron.validate()?;
        synapse.validate()?;
        window.validate()?;
        Ok(Self {
            neuron,
            synapse,
            window,
        })
    }

    /// Same experiment with a different synapse (e.g. inhibitory instead of excitatory)
    pub fn with_synapse(self, synapse: SynapseParameters) -> Self {
        Self { synapse, ..self }
    }

    /// Driver over the wired pair, A updated before B every step
    pub fn build(&self, v_a: f64, v_b: f64) -> Result<Simulation> {
        let mut network = Network::new();
        let a = network.add_neuron(Neuron::new(v_a, self.neuron)?);
        let b = network.add_neuron(Neuron::new(v_b, self.neuron)?);
        let a_to_b = network.add_synapse(Synapse::new(self.synapse)?);
        let b_to_a = network.add_synapse(Synapse::new(self.synapse)?);
        network.connect(a_to_b, a, b)?;
        network.connect(b_to_a, b, a)?;

        Simulation::new(network, self.window.dt, ExcitationMode::Synaptic)
    }

    pub fn run(&self, v_a: f64, v_b: f64) -> Result<PairOutcome> {
        let mut sim = self.build(v_a, v_b)?;
        let (summary, trace) = sim.run_traced(self.window.duration)?;
        let ids: Vec<_> = sim.network().neuron_ids().collect();
        let spike_counts = [summary.spikes(ids[0]), summary.spikes(ids[1])];

        info!(
            v_a,
            v_b,
            e_s = self.synapse.e_s,
            spikes_a = spike_counts[0],
            spikes_b = spike_counts[1],
            "paired run complete"
        );
        Ok(PairOutcome {
            initial: [v_a, v_b],
            spike_counts,
            trace,
        })
    }

    /// Run from initial potentials drawn uniformly from `[V_reset, V_th)`
    pub fn run_random<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<PairOutcome> {
        let v_a = draw_initial_potential(rng, &self.neuron);
        let v_b = draw_initial_potential(rng, &self.neuron);
        self.run(v_a, v_b)
    }
}

impl Default for PairedNeuronExperiment {
    fn default() -> Self {
        Self {
            neuron: LifParameters::default(),
            synapse: SynapseParameters::default(),
            window: RunWindow::default(),
        }
    }
}
