// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # lifnet
//!
//! Leaky integrate-and-fire (LIF) neurons, conductance-based synapses with an
//! exponentially decaying release probability, and a fixed-time-step driver
//! that couples them.
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! lifnet = "0.1"  # Default: config + observability
//! ```
//!
//! ## Feature Flags
//!
//! - **`config`** (default): TOML configuration with env/CLI overrides
//! - **`observability`** (default): logging setup and per-crate debug flags
//! - **`file-logging`**: JSON log file per run
//!
//! ## Usage Examples
//!
//! ### Single neuron with constant current
//!
//! ```rust
//! use lifnet::prelude::*;
//!
//! let mut network = Network::new();
//! let id = network.add_neuron(Neuron::at_reset(LifParameters::default())?);
//!
//! let mut sim = Simulation::new(network, 1.0, ExcitationMode::Standalone)?;
//! let summary = sim.run_for(1000.0)?;
//! assert_eq!(summary.spikes(id), 30);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ### Threshold search
//!
//! ```rust
//! use lifnet::prelude::*;
//!
//! let estimate = find_threshold_current(
//!     &LifParameters::default(),
//!     &RunWindow::default(),
//!     ThresholdSearch::Bisection { low: 0.0, high: 5.0, tolerance: 1e-4 },
//! )?;
//! assert!(estimate.error() < 1e-3);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Foundation: lifnet-neural                              │
//! │  (Neuron, Synapse, ids, LifError)                       │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Simulation: lifnet-engine                              │
//! │  (Network, clock, driver, sweeps, paired experiment)    │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Infrastructure: lifnet-config, lifnet-observability    │
//! │  (TOML + overrides, logging)                            │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## License
//!
//! Apache-2.0

// Re-export foundation
pub use lifnet_neural as neural;

// Re-export simulation
pub use lifnet_engine as engine;

// Re-export infrastructure
#[cfg(feature = "config")]
pub use lifnet_config as config;

#[cfg(feature = "observability")]
pub use lifnet_observability as observability;

/// Prelude - commonly used types and functions
pub mod prelude {
    pub use crate::neural::{
        Excitation, LifError, LifParameters, Neuron, NeuronId, SpikeTime, Synapse, SynapseId,
        SynapseParameters, SynapticExcitation, SynapticInput,
    };

    pub use crate::engine::{
        find_threshold_current, firing_rate_curve, runs_to_completion_without_firing,
        ExcitationMode, FiringRatePoint, Network, PairOutcome, PairedNeuronExperiment,
        RunSummary, RunWindow, Simulation, StepReport, ThresholdEstimate, ThresholdSearch,
        VoltageTrace,
    };

    #[cfg(feature = "config")]
    pub use crate::config::{load_config, LifnetConfig};
}
