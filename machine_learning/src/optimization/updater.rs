use serde::{Deserialize, Serialize};

use super::{Adam, GradientDescent, Optimizer};
use crate::{Result, config::OptimizerConfig};

/// The optimizer a `Network` trains with, built from its `OptimizerConfig`.
#[derive(Debug, Clone)]
pub enum Updater {
    Adam(Adam),
    GradientDescent(GradientDescent),
}

/// The part of an `Updater` that is written into a model file's header, the moment buffers go
/// into the payload.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdaterState {
    Adam { beta1_t: f32, beta2_t: f32 },
    GradientDescent,
}

impl Updater {
    /// Creates a fresh `Updater` for `len` parameters.
    pub fn from_config(config: &OptimizerConfig, len: usize) -> Self {
        match *config {
            OptimizerConfig::Adam {
                learning_rate,
                beta1,
                beta2,
                epsilon,
            } => Self::Adam(Adam::new(len, learning_rate, beta1, beta2, epsilon)),
            OptimizerConfig::GradientDescent { learning_rate } => {
                Self::GradientDescent(GradientDescent::new(learning_rate))
            }
        }
    }

    pub fn state(&self) -> UpdaterState {
        match self {
            Self::Adam(adam) => {
                let (beta1_t, beta2_t) = adam.bias_powers();
                UpdaterState::Adam { beta1_t, beta2_t }
            }
            Self::GradientDescent(_) => UpdaterState::GradientDescent,
        }
    }

    /// Returns the buffers that must be persisted alongside the parameters.
    pub fn buffers(&self) -> Vec<&[f32]> {
        match self {
            Self::Adam(adam) => {
                let (m, v) = adam.moments();
                vec![m, v]
            }
            Self::GradientDescent(_) => Vec::new(),
        }
    }

    /// Restores a saved state, `buffers` must be laid out as returned by `buffers`.
    pub fn restore(&mut self, state: UpdaterState, buffers: &[&[f32]]) -> Result<()> {
        match (self, state) {
            (Self::Adam(adam), UpdaterState::Adam { beta1_t, beta2_t }) => {
                let [m, v] = buffers else {
                    return Err(crate::MlErr::MalformedModel(format!(
                        "adam needs 2 state buffers, got {}",
                        buffers.len()
                    )));
                };

                adam.restore((beta1_t, beta2_t), m, v)
            }
            (Self::GradientDescent(_), UpdaterState::GradientDescent) => Ok(()),
            (_, state) => Err(crate::MlErr::MalformedModel(format!(
                "optimizer state {state:?} doesn't match the configured optimizer"
            ))),
        }
    }
}

impl Optimizer for Updater {
    fn update_params(&mut self, grad: &[f32], params: &mut [f32]) -> Result<()> {
        match self {
            Self::Adam(adam) => adam.update_params(grad, params),
            Self::GradientDescent(gd) => gd.update_params(grad, params),
        }
    }
}
