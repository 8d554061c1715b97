// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # lifnet Neural Entities
//!
//! The two leaf entities of a lifnet simulation:
//! - **Neuron**: leaky integrate-and-fire point neuron with its own membrane potential
//! - **Synapse**: conductance-based chemical synapse with an exponentially decaying
//!   release probability
//!
//! Neither entity owns a clock. Every operation that depends on simulation time
//! receives it as a parameter, so a neuron or synapse can be exercised in isolation.
//!
//! ```
//! use lifnet_neural::{LifParameters, Neuron};
//!
//! let params = LifParameters::default();
//! let mut neuron = Neuron::at_reset(params)?;
//! let step = neuron.excite(1.0);
//! assert!(!step.fired);
//! # Ok::<(), lifnet_neural::LifError>(())
//! ```

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod models;
pub mod synapse;
pub mod types;

pub use models::{Excitation, LifParameters, Neuron, SynapticExcitation, SynapticInput};
pub use synapse::{Synapse, SynapseParameters};
pub use types::{LifError, NeuronId, Result, SpikeTime, SynapseId, SynapseSlot};
