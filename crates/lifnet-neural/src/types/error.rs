// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Error types for lifnet operations

use core::fmt;

use super::ids::{NeuronId, SynapseId};

/// Which synapse reference of a neuron an operation touched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SynapseSlot {
    Incoming,
    Outgoing,
}

impl fmt::Display for SynapseSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SynapseSlot::Incoming => write!(f, "incoming"),
            SynapseSlot::Outgoing => write!(f, "outgoing"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LifError {
    #[error("invalid parameter {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("cannot connect {0} to itself")]
    SelfConnection(NeuronId),

    #[error("{0} not found")]
    NeuronNotFound(NeuronId),

    #[error("{0} not found")]
    SynapseNotFound(SynapseId),

    #[error("{synapse} is already connected ({pre} -> {post})")]
    SynapseAlreadyConnected {
        synapse: SynapseId,
        pre: NeuronId,
        post: NeuronId,
    },

    #[error("{neuron} already has an {slot} synapse ({existing})")]
    SlotOccupied {
        neuron: NeuronId,
        slot: SynapseSlot,
        existing: SynapseId,
    },

    #[error("{0} appears more than once in the update order")]
    DuplicateInUpdateOrder(NeuronId),

    #[error("time step must be finite and > 0, got {0}")]
    InvalidTimeStep(f64),

    #[error("duration must be finite and >= 0, got {0}")]
    InvalidDuration(f64),

    #[error("invalid search: {0}")]
    InvalidSearch(String),
}

impl LifError {
    pub(crate) fn invalid(name: &'static str, value: f64, reason: &'static str) -> Self {
        LifError::InvalidParameter {
            name,
            value,
            reason,
        }
    }
}

pub type Result<T> = core::result::Result<T, LifError>;

/// Reject NaN and infinities before they reach the integrator.
pub(crate) fn require_finite(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(LifError::invalid(name, value, "must be finite"))
    }
}
