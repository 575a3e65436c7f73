use serde::{Deserialize, Serialize};

use crate::arch::{activations::ActFn, loss::Loss};

/// Describes one layer of a network, its input size is inferred from the layer before it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerConfig {
    Dense {
        n_out: usize,
        act_fn: Option<ActFn>,
    },
    Conv2d {
        filters: usize,
        kernel: (usize, usize),
        stride: (usize, usize),
        act_fn: Option<ActFn>,
    },
    MaxPool2d {
        kernel: (usize, usize),
        stride: (usize, usize),
    },
    /// The last layer of every network, it's the one that knows the loss.
    Output {
        n_out: usize,
        act_fn: ActFn,
        loss: Loss,
    },
}

impl LayerConfig {
    pub fn is_output(&self) -> bool {
        matches!(self, LayerConfig::Output { .. })
    }
}
