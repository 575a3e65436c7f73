use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use super::{InputType, LayerConfig, NetworkBuilder, OptimizerConfig, WeightInit};
use crate::{
    MlErr, Result,
    arch::{
        Shape,
        activations::ActFn,
        layers::{Conv2d, Layer, MaxPool2d},
        loss::Loss,
    },
};

/// The immutable description of a network: its layers and how to initialize and train them.
///
/// Only a `NetworkBuilder` can create one, so every `NetworkConfig` in memory has been
/// validated, except for the ones read back from a model file which are validated again when
/// the network is rebuilt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub(super) seed: u64,
    pub(super) weight_init: WeightInit,
    pub(super) optimizer: OptimizerConfig,
    pub(super) input: InputType,
    pub(super) layers: Vec<LayerConfig>,
    pub(super) batch_size: Option<NonZeroUsize>,
}

impl NetworkConfig {
    pub fn builder() -> NetworkBuilder {
        NetworkBuilder::new()
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn weight_init(&self) -> WeightInit {
        self.weight_init
    }

    pub fn optimizer(&self) -> &OptimizerConfig {
        &self.optimizer
    }

    pub fn input(&self) -> InputType {
        self.input
    }

    pub fn layers(&self) -> &[LayerConfig] {
        &self.layers
    }

    /// The amount of samples per parameter update, `None` means the whole dataset.
    pub fn batch_size(&self) -> Option<NonZeroUsize> {
        self.batch_size
    }

    /// Returns the loss of the output layer.
    pub fn loss(&self) -> Result<Loss> {
        match self.layers.last() {
            Some(LayerConfig::Output { loss, .. }) => Ok(*loss),
            _ => Err(MlErr::InvalidConfig(
                "the last layer must be an output layer".into(),
            )),
        }
    }

    /// Infers the shape flowing between every pair of layers and builds them.
    ///
    /// # Returns
    /// The layers in order or an error if they don't chain.
    pub fn resolve(&self) -> Result<Vec<Layer>> {
        self.validate_optimizer()?;

        if self.layers.is_empty() {
            return Err(MlErr::InvalidConfig(
                "a network needs at least one layer".into(),
            ));
        }

        let mut shape = self.input.shape();
        if shape.is_empty() {
            return Err(MlErr::InvalidConfig(format!(
                "the input shape {shape} has no values"
            )));
        }

        let last = self.layers.len() - 1;
        let mut layers = Vec::with_capacity(self.layers.len());

        for (i, layer_config) in self.layers.iter().enumerate() {
            if layer_config.is_output() != (i == last) {
                return Err(MlErr::InvalidConfig(format!(
                    "layer {i}: the output layer must be the last one and there must be only one"
                )));
            }

            let layer = self.resolve_layer(i, *layer_config, shape)?;
            shape = layer.output_shape();
            layers.push(layer);
        }

        Ok(layers)
    }

    fn resolve_layer(&self, i: usize, config: LayerConfig, input: Shape) -> Result<Layer> {
        match config {
            LayerConfig::Dense { n_out, act_fn } => self.resolve_dense(i, n_out, act_fn, input),
            LayerConfig::Output { n_out, act_fn, .. } => {
                self.resolve_dense(i, n_out, Some(act_fn), input)
            }
            LayerConfig::Conv2d {
                filters,
                kernel,
                stride,
                act_fn,
            } => {
                if filters == 0 {
                    return Err(MlErr::InvalidConfig(format!(
                        "layer {i}: a convolution needs at least one filter"
                    )));
                }

                Ok(Layer::Conv2d(Conv2d::new(
                    input, filters, kernel, stride, act_fn,
                )?))
            }
            LayerConfig::MaxPool2d { kernel, stride } => {
                Ok(Layer::MaxPool2d(MaxPool2d::new(input, kernel, stride)?))
            }
        }
    }

    fn resolve_dense(
        &self,
        i: usize,
        n_out: usize,
        act_fn: Option<ActFn>,
        input: Shape,
    ) -> Result<Layer> {
        if n_out == 0 {
            return Err(MlErr::InvalidConfig(format!(
                "layer {i}: a dense layer needs at least one output"
            )));
        }

        // Image rows are already flat, a dense layer just reads them as vectors.
        Ok(Layer::dense((input.len(), n_out), act_fn))
    }

    fn validate_optimizer(&self) -> Result<()> {
        let lr = self.optimizer.learning_rate();

        if !lr.is_finite() || lr <= 0. {
            return Err(MlErr::InvalidConfig(format!(
                "the learning rate must be finite and positive, got {lr}"
            )));
        }

        if let OptimizerConfig::Adam {
            beta1,
            beta2,
            epsilon,
            ..
        } = self.optimizer
        {
            let in_range = |b: f32| (0. ..1.).contains(&b);
            if !in_range(beta1) || !in_range(beta2) || epsilon.is_nan() || epsilon <= 0. {
                return Err(MlErr::InvalidConfig(format!(
                    "invalid adam hyperparameters: beta1 {beta1}, beta2 {beta2}, epsilon {epsilon}"
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(n_out: usize) -> LayerConfig {
        LayerConfig::Output {
            n_out,
            act_fn: ActFn::Softmax,
            loss: Loss::NegativeLogLikelihood,
        }
    }

    fn conv(filters: usize) -> LayerConfig {
        LayerConfig::Conv2d {
            filters,
            kernel: (5, 5),
            stride: (1, 1),
            act_fn: Some(ActFn::Relu),
        }
    }

    fn pool() -> LayerConfig {
        LayerConfig::MaxPool2d {
            kernel: (2, 2),
            stride: (2, 2),
        }
    }

    #[test]
    fn infers_dense_sizes() {
        let config = NetworkConfig::builder()
            .input_type(InputType::FeedForward { size: 13 })
            .layer(LayerConfig::Dense {
                n_out: 256,
                act_fn: Some(ActFn::Relu),
            })
            .layer(LayerConfig::Dense {
                n_out: 128,
                act_fn: Some(ActFn::Relu),
            })
            .layer(output(10))
            .build()
            .unwrap();

        let sizes: Vec<_> = config.resolve().unwrap().iter().map(Layer::size).collect();
        assert_eq!(sizes, [13 * 256 + 256, 256 * 128 + 128, 128 * 10 + 10]);
    }

    #[test]
    fn infers_convolutional_shapes() {
        let config = NetworkConfig::builder()
            .input_type(InputType::Convolutional {
                height: 128,
                width: 128,
                channels: 1,
            })
            .layer(conv(32))
            .layer(pool())
            .layer(conv(64))
            .layer(pool())
            .layer(output(10))
            .build()
            .unwrap();

        let layers = config.resolve().unwrap();
        let shapes: Vec<_> = layers.iter().map(Layer::output_shape).collect();
        let image = |channels, side| Shape::Image {
            channels,
            height: side,
            width: side,
        };

        assert_eq!(
            shapes,
            [
                image(32, 124),
                image(32, 62),
                image(64, 58),
                image(64, 29),
                Shape::Flat(10)
            ]
        );
        assert_eq!(layers[4].size(), 64 * 29 * 29 * 10 + 10);
    }

    #[test]
    fn missing_output_layer() {
        let result = NetworkConfig::builder()
            .input_type(InputType::FeedForward { size: 4 })
            .layer(LayerConfig::Dense {
                n_out: 2,
                act_fn: None,
            })
            .build();

        assert!(matches!(result, Err(MlErr::InvalidConfig(_))));
    }

    #[test]
    fn output_layer_not_last() {
        let result = NetworkConfig::builder()
            .input_type(InputType::FeedForward { size: 4 })
            .layer(output(2))
            .layer(output(2))
            .build();

        assert!(matches!(result, Err(MlErr::InvalidConfig(_))));
    }

    #[test]
    fn empty_stack() {
        let result = NetworkConfig::builder()
            .input_type(InputType::FeedForward { size: 4 })
            .build();

        assert!(matches!(result, Err(MlErr::InvalidConfig(_))));
    }

    #[test]
    fn kernel_larger_than_input() {
        let result = NetworkConfig::builder()
            .input_type(InputType::Convolutional {
                height: 4,
                width: 4,
                channels: 1,
            })
            .layer(conv(2))
            .layer(output(2))
            .build();

        assert!(matches!(result, Err(MlErr::InvalidConfig(_))));
    }

    #[test]
    fn convolution_after_flat_input() {
        let result = NetworkConfig::builder()
            .input_type(InputType::FeedForward { size: 64 })
            .layer(conv(2))
            .layer(output(2))
            .build();

        assert!(matches!(result, Err(MlErr::InvalidConfig(_))));
    }

    #[test]
    fn non_positive_learning_rate() {
        for lr in [0., -1., f32::NAN] {
            let result = NetworkConfig::builder()
                .optimizer(OptimizerConfig::adam(lr))
                .input_type(InputType::FeedForward { size: 4 })
                .layer(output(2))
                .build();

            assert!(matches!(result, Err(MlErr::InvalidConfig(_))), "lr {lr}");
        }
    }

    #[test]
    fn zero_sized_layers() {
        let result = NetworkConfig::builder()
            .input_type(InputType::FeedForward { size: 0 })
            .layer(output(2))
            .build();
        assert!(result.is_err());

        let result = NetworkConfig::builder()
            .input_type(InputType::FeedForward { size: 4 })
            .layer(output(0))
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn json_round_trip_keeps_the_config() {
        let config = NetworkConfig::builder()
            .seed(7)
            .weight_init(WeightInit::XavierUniform)
            .input_type(InputType::Convolutional {
                height: 8,
                width: 8,
                channels: 2,
            })
            .layer(conv(3))
            .layer(output(4))
            .build()
            .unwrap();

        let json = serde_json::to_string(&config).unwrap();
        let back: NetworkConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(back, config);
    }
}
