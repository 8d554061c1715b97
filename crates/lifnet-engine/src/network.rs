// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Neuron/synapse arena
//!
//! The network owns every neuron and synapse. Neurons refer to synapses, and
//! synapses to neurons, by id only.
//!
//! Each neuron has at most one incoming and one outgoing synapse. Connecting a
//! synapse into an occupied slot is rejected rather than replacing the earlier
//! connection.

use lifnet_neural::{
    Excitation, LifError, Neuron, NeuronId, Result, Synapse, SynapseId, SynapseSlot,
    SynapticExcitation,
};
use tracing::{trace, warn};

#[derive(Debug, Clone, Default)]
pub struct Network {
    neurons: Vec<Neuron>,
    synapses: Vec<Synapse>,
}

impl Network {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_neuron(&mut self, neuron: Neuron) -> NeuronId {
        let id = NeuronId(self.neurons.len() as u32);
        self.neurons.push(neuron);
        id
    }

    pub fn add_synapse(&mut self, synapse: Synapse) -> SynapseId {
        let id = SynapseId(self.synapses.len() as u32);
        self.synapses.push(synapse);
        id
    }

    #[inline]
    pub fn neuron_count(&self) -> usize {
        self.neurons.len()
    }

    #[inline]
    pub fn synapse_count(&self) -> usize {
        self.synapses.len()
    }

    /// Neuron ids in insertion order
    pub fn neuron_ids(&self) -> impl Iterator<Item = NeuronId> + '_ {
        (0..self.neurons.len() as u32).map(NeuronId)
    }

    pub fn contains_neuron(&self, id: NeuronId) -> bool {
        id.index() < self.neurons.len()
    }

    pub fn neuron(&self, id: NeuronId) -> Result<&Neuron> {
        self.neurons.get(id.index()).ok_or(LifError::NeuronNotFound(id))
    }

    pub fn neuron_mut(&mut self, id: NeuronId) -> Result<&mut Neuron> {
        self.neurons
            .get_mut(id.index())
            .ok_or(LifError::NeuronNotFound(id))
    }

    pub fn synapse(&self, id: SynapseId) -> Result<&Synapse> {
        self.synapses
            .get(id.index())
            .ok_or(LifError::SynapseNotFound(id))
    }

    pub fn synapse_mut(&mut self, id: SynapseId) -> Result<&mut Synapse> {
        self.synapses
            .get_mut(id.index())
            .ok_or(LifError::SynapseNotFound(id))
    }

    /// Wire `synapse` as the outgoing synapse of `pre` and the incoming synapse of `post`.
    ///
    /// Every check runs before anything is mutated, so a rejected connection
    /// leaves the network exactly as it was.
    pub fn connect(&mut self, synapse: SynapseId, pre: NeuronId, post: NeuronId) -> Result<()> {
        if let Err(err) = self.check_connection(synapse, pre, post) {
            warn!(%synapse, %pre, %post, error = %err, "rejected synapse connection");
            return Err(err);
        }

        self.synapses[synapse.index()].bind(synapse, pre, post)?;
        self.neurons[pre.index()].attach(SynapseSlot::Outgoing, synapse, pre)?;
        self.neurons[post.index()].attach(SynapseSlot::Incoming, synapse, post)?;
        trace!(%synapse, %pre, %post, "connected");
        Ok(())
    }

    fn check_connection(&self, synapse: SynapseId, pre: NeuronId, post: NeuronId) -> Result<()> {
        let syn = self.synapse(synapse)?;
        let pre_neuron = self.neuron(pre)?;
        let post_neuron = self.neuron(post)?;

        if pre == post {
            return Err(LifError::SelfConnection(pre));
        }
        if let (Some(bound_pre), Some(bound_post)) = (syn.presynaptic(), syn.postsynaptic()) {
            return Err(LifError::SynapseAlreadyConnected {
                synapse,
                pre: bound_pre,
                post: bound_post,
            });
        }
        if let Some(existing) = pre_neuron.outgoing() {
            return Err(LifError::SlotOccupied {
                neuron: pre,
                slot: SynapseSlot::Outgoing,
                existing,
            });
        }
        if let Some(existing) = post_neuron.incoming() {
            return Err(LifError::SlotOccupied {
                neuron: post,
                slot: SynapseSlot::Incoming,
                existing,
            });
        }
        Ok(())
    }

    /// Standalone step of one neuron
    pub fn excite(&mut self, id: NeuronId, dt: f64) -> Result<Excitation> {
        Ok(self.neuron_mut(id)?.excite(dt))
    }

    /// Synaptically-driven step of one neuron at simulation time `t`.
    ///
    /// When the neuron fires, `t` is recorded on its outgoing synapse (if any).
    pub fn synaptic_excite(&mut self, id: NeuronId, dt: f64, t: f64) -> Result<SynapticExcitation> {
        let Self { neurons, synapses } = self;
        let neuron = neurons
            .get_mut(id.index())
            .ok_or(LifError::NeuronNotFound(id))?;

        let incoming = neuron.incoming().and_then(|s| synapses.get(s.index()));
        let result = neuron.synaptic_excite(dt, t, incoming);

        if result.excitation.fired {
            match neuron.outgoing().and_then(|s| synapses.get_mut(s.index())) {
                Some(outgoing) => outgoing.record_spike(t),
                None => trace!(neuron = %id, t, "fired without an outgoing synapse"),
            }
        }
        Ok(result)
    }

    /// Put every neuron back at its reset potential and forget all spikes
    pub fn reset_state(&mut self) {
        for neuron in &mut self.neurons {
            let v_reset = neuron.params().v_reset;
            neuron.reset(v_reset);
        }
        for synapse in &mut self.synapses {
            synapse.clear_spikes();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lifnet_neural::{LifParameters, SpikeTime, SynapseParameters, SynapticInput};

    fn network_with(count: usize) -> Network {
        let mut network = Network::new();
        for _ in 0..count {
            network.add_neuron(Neuron::at_reset(LifParameters::default()).unwrap());
        }
        network
    }

    fn synapse() -> Synapse {
        Synapse::new(SynapseParameters::default()).unwrap()
    }

    #[test]
    fn test_connect_wires_both_sides() {
        let mut network = network_with(2);
        let s = network.add_synapse(synapse());
        network.connect(s, NeuronId(0), NeuronId(1)).unwrap();

        assert_eq!(network.neuron(NeuronId(0)).unwrap().outgoing(), Some(s));
        assert_eq!(network.neuron(NeuronId(0)).unwrap().incoming(), None);
        assert_eq!(network.neuron(NeuronId(1)).unwrap().incoming(), Some(s));
        assert_eq!(network.synapse(s).unwrap().presynaptic(), Some(NeuronId(0)));
        assert_eq!(network.synapse(s).unwrap().postsynaptic(), Some(NeuronId(1)));
    }

    #[test]
    fn test_self_connection_is_rejected_without_mutation() {
        let mut network = network_with(1);
        let s = network.add_synapse(synapse());
        let err = network.connect(s, NeuronId(0), NeuronId(0)).unwrap_err();

        assert_eq!(err, LifError::SelfConnection(NeuronId(0)));
        let neuron = network.neuron(NeuronId(0)).unwrap();
        assert_eq!(neuron.incoming(), None);
        assert_eq!(neuron.outgoing(), None);
        assert_eq!(network.synapse(s).unwrap().presynaptic(), None);
    }

    #[test]
    fn test_occupied_slot_keeps_earlier_connection() {
        let mut network = network_with(3);
        let first = network.add_synapse(synapse());
        let second = network.add_synapse(synapse());
        network.connect(first, NeuronId(0), NeuronId(1)).unwrap();

        let err = network.connect(second, NeuronId(0), NeuronId(2)).unwrap_err();
        assert!(matches!(
            err,
            LifError::SlotOccupied { slot: SynapseSlot::Outgoing, .. }
        ));
        assert_eq!(network.neuron(NeuronId(0)).unwrap().outgoing(), Some(first));
        assert_eq!(network.neuron(NeuronId(2)).unwrap().incoming(), None);
        assert_eq!(network.synapse(second).unwrap().presynaptic(), None);
    }

    #[test]
    fn test_unknown_ids() {
        let mut network = network_with(1);
        let s = network.add_synapse(synapse());
        assert_eq!(
            network.connect(s, NeuronId(0), NeuronId(7)),
            Err(LifError::NeuronNotFound(NeuronId(7)))
        );
        assert_eq!(
            network.connect(SynapseId(9), NeuronId(0), NeuronId(0)),
            Err(LifError::SynapseNotFound(SynapseId(9)))
        );
        assert!(network.excite(NeuronId(3), 1.0).is_err());
    }

    #[test]
    fn test_spike_is_recorded_on_outgoing_synapse() {
        let mut network = Network::new();
        let params = LifParameters::default();
        let pre = network.add_neuron(Neuron::new(-39.95, params).unwrap());
        let post = network.add_neuron(Neuron::at_reset(params).unwrap());
        let s = network.add_synapse(synapse());
        network.connect(s, pre, post).unwrap();

        let result = network.synaptic_excite(pre, 1.0, 7.0).unwrap();
        assert!(result.excitation.fired);
        // pre has no incoming synapse
        assert_eq!(result.input, SynapticInput::MissingFallback);
        assert_eq!(network.synapse(s).unwrap().last_spike(), SpikeTime::At(7.0));

        let downstream = network.synaptic_excite(post, 1.0, 7.0).unwrap();
        assert_eq!(downstream.input, SynapticInput::Connected { p_s: 0.5 });
    }

    #[test]
    fn test_reset_state() {
        let mut network = network_with(2);
        let s = network.add_synapse(synapse());
        network.connect(s, NeuronId(0), NeuronId(1)).unwrap();
        network.synapse_mut(s).unwrap().record_spike(3.0);
        network.neuron_mut(NeuronId(1)).unwrap().reset(-50.0);

        network.reset_state();
        assert_eq!(network.neuron(NeuronId(1)).unwrap().membrane_potential(), -70.0);
        assert_eq!(network.synapse(s).unwrap().last_spike(), SpikeTime::Never);
    }
}
