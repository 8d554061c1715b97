// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! SpikeLedger - spike times per neuron for one run.
//!
//! Times are the clock values at which the spike was detected, in the order
//! they occurred.

use ahash::AHashMap;
use lifnet_neural::NeuronId;

#[derive(Debug, Clone, Default)]
pub struct SpikeLedger {
    spikes: AHashMap<NeuronId, Vec<f64>>,
}

impl SpikeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn record(&mut self, neuron: NeuronId, t: f64) {
        self.spikes.entry(neuron).or_default().push(t);
    }

    pub fn times(&self, neuron: NeuronId) -> &[f64] {
        self.spikes.get(&neuron).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn count(&self, neuron: NeuronId) -> usize {
        self.times(neuron).len()
    }

    pub fn total(&self) -> usize {
        self.spikes.values().map(Vec::len).sum()
    }

    pub fn first_spike(&self, neuron: NeuronId) -> Option<f64> {
        self.times(neuron).first().copied()
    }

    /// Mean firing rate in Hz over `duration_ms`
    pub fn firing_rate_hz(&self, neuron: NeuronId, duration_ms: f64) -> f64 {
        if duration_ms <= 0.0 {
            return 0.0;
        }
        self.count(neuron) as f64 * 1000.0 / duration_ms
    }

    pub fn clear(&mut self) {
        self.spikes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_and_rates() {
        let mut ledger = SpikeLedger::new();
        ledger.record(NeuronId(0), 33.0);
        ledger.record(NeuronId(0), 66.0);
        ledger.record(NeuronId(1), 10.0);

        assert_eq!(ledger.count(NeuronId(0)), 2);
        assert_eq!(ledger.count(NeuronId(2)), 0);
        assert_eq!(ledger.total(), 3);
        assert_eq!(ledger.first_spike(NeuronId(0)), Some(33.0));
        assert_eq!(ledger.times(NeuronId(0)), &[33.0, 66.0]);
        assert!((ledger.firing_rate_hz(NeuronId(0), 1000.0) - 2.0).abs() < 1e-12);
        assert_eq!(ledger.firing_rate_hz(NeuronId(0), 0.0), 0.0);

        ledger.clear();
        assert_eq!(ledger.total(), 0);
    }
}
