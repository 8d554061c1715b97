// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Reciprocally coupled neuron pairs: excitatory vs. inhibitory synapses

use lifnet_engine::{PairedNeuronExperiment, RunWindow};
use lifnet_neural::{LifParameters, SynapseParameters};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn experiment(synapse: SynapseParameters) -> PairedNeuronExperiment {
    PairedNeuronExperiment::new(
        LifParameters::default(),
        synapse,
        RunWindow::new(1.0, 1000.0).unwrap(),
    )
    .unwrap()
}

#[test]
fn test_excitatory_pair_fires_at_least_as_much_as_inhibitory() {
    let excitatory = experiment(SynapseParameters::excitatory(0.015, 0.5, 10.0));
    let inhibitory = excitatory.with_synapse(SynapseParameters::inhibitory(0.015, 0.5, 10.0));

    let exc = excitatory.run(-70.0, -55.0).unwrap();
    let inh = inhibitory.run(-70.0, -55.0).unwrap();

    assert!(exc.total_spikes() > 0);
    assert!(
        exc.total_spikes() >= inh.total_spikes(),
        "excitatory {} < inhibitory {}",
        exc.total_spikes(),
        inh.total_spikes()
    );
}

#[test]
fn test_excitation_dominates_from_random_starts() {
    let excitatory = experiment(SynapseParameters::excitatory(0.015, 0.5, 10.0));
    let inhibitory = excitatory.with_synapse(SynapseParameters::inhibitory(0.015, 0.5, 10.0));
    let mut rng = StdRng::seed_from_u64(2025);

    for _ in 0..10 {
        let v_a = rng.gen_range(-70.0..-40.0);
        let v_b = rng.gen_range(-70.0..-40.0);
        let exc = excitatory.run(v_a, v_b).unwrap();
        let inh = inhibitory.run(v_a, v_b).unwrap();
        assert!(exc.total_spikes() >= inh.total_spikes());
    }
}

#[test]
fn test_zero_conductance_decouples_the_pair() {
    let silent = experiment(SynapseParameters::excitatory(0.0, 0.5, 10.0));
    let outcome = silent.run(-70.0, -70.0).unwrap();
    // both neurons behave like the lone canonical cell
    assert_eq!(outcome.spike_counts, [30, 30]);
}

#[test]
fn test_outcome_serializes_to_json() {
    let outcome = experiment(SynapseParameters::default())
        .run_random(&mut StdRng::seed_from_u64(1))
        .unwrap();
    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["trace"]["times"].as_array().unwrap().len(), 1000);
    assert_eq!(json["spike_counts"].as_array().unwrap().len(), 2);
}
