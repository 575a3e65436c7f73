use std::num::NonZeroUsize;

use super::{InputType, LayerConfig, NetworkConfig, OptimizerConfig, WeightInit};
use crate::{MlErr, Result};

/// The seed used when none is given.
pub const DEFAULT_SEED: u64 = 123;

/// Builds validated `NetworkConfig`s.
#[derive(Debug, Clone, Default)]
pub struct NetworkBuilder {
    seed: Option<u64>,
    weight_init: WeightInit,
    optimizer: OptimizerConfig,
    input: Option<InputType>,
    layers: Vec<LayerConfig>,
    batch_size: Option<NonZeroUsize>,
}

impl NetworkBuilder {
    /// Creates a new `NetworkBuilder` with Xavier initialization, Adam with a learning rate of
    /// `0.001` and a seed of `123`.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn weight_init(mut self, weight_init: WeightInit) -> Self {
        self.weight_init = weight_init;
        self
    }

    pub fn optimizer(mut self, optimizer: OptimizerConfig) -> Self {
        self.optimizer = optimizer;
        self
    }

    pub fn input_type(mut self, input: InputType) -> Self {
        self.input = Some(input);
        self
    }

    /// Appends a layer to the stack.
    pub fn layer(mut self, layer: LayerConfig) -> Self {
        self.layers.push(layer);
        self
    }

    /// Sets the amount of samples per update, by default every fit pass is a single batch.
    pub fn batch_size(mut self, batch_size: NonZeroUsize) -> Self {
        self.batch_size = Some(batch_size);
        self
    }

    /// Builds the config.
    ///
    /// # Returns
    /// The config or an error if no input type was given or the layers don't chain.
    pub fn build(self) -> Result<NetworkConfig> {
        let input = self
            .input
            .ok_or_else(|| MlErr::InvalidConfig("missing the input type".into()))?;

        let config = NetworkConfig {
            seed: self.seed.unwrap_or(DEFAULT_SEED),
            weight_init: self.weight_init,
            optimizer: self.optimizer,
            input,
            layers: self.layers,
            batch_size: self.batch_size,
        };

        config.resolve()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arch::{activations::ActFn, loss::Loss};

    #[test]
    fn defaults() {
        let config = NetworkBuilder::new()
            .input_type(InputType::FeedForward { size: 3 })
            .layer(LayerConfig::Output {
                n_out: 2,
                act_fn: ActFn::Softmax,
                loss: Loss::NegativeLogLikelihood,
            })
            .build()
            .unwrap();

        assert_eq!(config.seed(), DEFAULT_SEED);
        assert_eq!(config.weight_init(), WeightInit::Xavier);
        assert_eq!(*config.optimizer(), OptimizerConfig::adam(1e-3));
        assert_eq!(config.batch_size(), None);
        assert_eq!(config.loss().unwrap(), Loss::NegativeLogLikelihood);
    }

    #[test]
    fn missing_input_type() {
        let result = NetworkBuilder::new()
            .layer(LayerConfig::Output {
                n_out: 2,
                act_fn: ActFn::Softmax,
                loss: Loss::NegativeLogLikelihood,
            })
            .build();

        assert!(matches!(result, Err(MlErr::InvalidConfig(_))));
    }
}
