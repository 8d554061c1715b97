// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # lifnet Simulation Engine
//!
//! Fixed-step driver for networks of LIF neurons.
//!
//! ## Step Order
//! Each step the driver:
//! 1. Reads the clock value `t`
//! 2. Updates every scheduled neuron once, sequentially, in the configured order
//! 3. Records spikes at `t` on the firing neuron's outgoing synapse
//! 4. Advances the clock by `dt`
//!
//! A spike recorded by an earlier neuron is visible to later neurons in the
//! same step.
//!
//! ## Sweeps
//! Threshold searches and firing-rate curves are sequences of independent runs,
//! each on a freshly built neuron.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod clock;
pub mod network;
pub mod pair;
pub mod simulation;
pub mod spike_ledger;
pub mod sweep;
pub mod trace;

pub use clock::SimulationClock;
pub use network::Network;
pub use pair::{draw_initial_potential, PairOutcome, PairedNeuronExperiment};
pub use simulation::{ExcitationMode, NeuronStep, RunSummary, Simulation, StepReport};
pub use spike_ledger::SpikeLedger;
pub use sweep::{
    count_spikes, current_range, find_threshold_current, firing_rate_curve,
    runs_to_completion_without_firing, FiringRatePoint, RunWindow, ThresholdEstimate,
    ThresholdSearch,
};
pub use trace::{NeuronSeries, VoltageTrace};

// Re-export the leaf crate so callers need a single dependency
pub use lifnet_neural;
