// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Membrane potential traces collected step by step during a run

use lifnet_neural::NeuronId;
use serde::{Deserialize, Serialize};

use crate::simulation::StepReport;

/// Potentials of one neuron, aligned with [`VoltageTrace::times`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeuronSeries {
    pub neuron: NeuronId,
    pub v: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VoltageTrace {
    /// Clock value of each step
    pub times: Vec<f64>,
    pub series: Vec<NeuronSeries>,
}

impl VoltageTrace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one step. Neurons are added to the trace the first time they appear.
    pub fn push(&mut self, report: &StepReport) {
        let sample = self.times.len();
        self.times.push(report.t);
        for step in &report.neurons {
            let position = match self.series.iter().position(|s| s.neuron == step.neuron) {
                Some(position) => position,
                None => {
                    self.series.push(NeuronSeries {
                        neuron: step.neuron,
                        v: Vec::with_capacity(sample + 1),
                    });
                    self.series.len() - 1
                }
            };
            self.series[position].v.push(step.v);
        }
    }

    pub fn voltages(&self, neuron: NeuronId) -> Option<&[f64]> {
        self.series
            .iter()
            .find(|s| s.neuron == neuron)
            .map(|s| s.v.as_slice())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}
