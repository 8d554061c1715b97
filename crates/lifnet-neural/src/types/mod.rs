// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Core type definitions shared by neurons, synapses and the engine.

pub mod error;
pub mod ids;
pub mod spike_time;

pub use error::{LifError, Result, SynapseSlot};
pub use ids::{NeuronId, SynapseId};
pub use spike_time::SpikeTime;
