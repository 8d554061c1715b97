// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Conductance-based chemical synapses

pub mod conductance;

pub use conductance::{Synapse, SynapseParameters};
