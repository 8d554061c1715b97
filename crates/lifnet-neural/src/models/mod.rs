// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # Neuron Models
//!
//! lifnet simulates a single point-neuron model: leaky integrate-and-fire driven
//! either by an injected current alone or by an injected current plus one
//! conductance-based synapse.

pub mod lif;

pub use lif::{Excitation, LifParameters, Neuron, SynapticExcitation, SynapticInput};
