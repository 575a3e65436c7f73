use machine_learning::{
    arch::{activations::ActFn, loss::Loss},
    config::{InputType, LayerConfig},
    NetworkConfig,
};

use super::{base_network, ModelSlot, SoundTrainer, TrainerKind};
use crate::Result;

/// Classifies MFCC vectors with a dense network:
/// `input -> 256 (ReLU) -> 128 (ReLU) -> output (softmax, NLL)`.
#[derive(Debug)]
pub struct MfccTrainer {
    input_size: usize,
    output_size: usize,
    learning_rate: f32,
    slot: ModelSlot,
}

impl MfccTrainer {
    pub const DEFAULT_INPUT_SIZE: usize = 13;
    pub const DEFAULT_OUTPUT_SIZE: usize = 10;
    pub const DEFAULT_LEARNING_RATE: f32 = 0.001;

    /// Creates a new `MfccTrainer`, the model is built on `initialize` or on the first `train`.
    ///
    /// # Arguments
    /// * `input_size` - The amount of coefficients per sample.
    /// * `output_size` - The amount of classes.
    /// * `learning_rate` - Adam's learning rate.
    pub fn new(input_size: usize, output_size: usize, learning_rate: f32) -> Self {
        Self {
            input_size,
            output_size,
            learning_rate,
            slot: ModelSlot::empty(TrainerKind::Mfcc),
        }
    }

    pub fn input_size(&self) -> usize {
        self.input_size
    }

    pub fn output_size(&self) -> usize {
        self.output_size
    }

    pub fn learning_rate(&self) -> f32 {
        self.learning_rate
    }
}

impl Default for MfccTrainer {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_INPUT_SIZE,
            Self::DEFAULT_OUTPUT_SIZE,
            Self::DEFAULT_LEARNING_RATE,
        )
    }
}

impl SoundTrainer for MfccTrainer {
    fn kind(&self) -> TrainerKind {
        TrainerKind::Mfcc
    }

    fn network_config(&self) -> Result<NetworkConfig> {
        let config = base_network(self.learning_rate)
            .input_type(InputType::FeedForward {
                size: self.input_size,
            })
            .layer(LayerConfig::Dense {
                n_out: 256,
                act_fn: Some(ActFn::Relu),
            })
            .layer(LayerConfig::Dense {
                n_out: 128,
                act_fn: Some(ActFn::Relu),
            })
            .layer(LayerConfig::Output {
                n_out: self.output_size,
                act_fn: ActFn::Softmax,
                loss: Loss::NegativeLogLikelihood,
            })
            .build()?;

        Ok(config)
    }

    fn slot(&self) -> &ModelSlot {
        &self.slot
    }

    fn slot_mut(&mut self) -> &mut ModelSlot {
        &mut self.slot
    }
}

#[cfg(test)]
mod tests {
    use machine_learning::config::OptimizerConfig;

    use super::*;
    use crate::{trainer::SEED, TrainerErr};

    #[test]
    fn topology() {
        let config = MfccTrainer::new(20, 4, 0.01).network_config().unwrap();

        assert_eq!(config.input(), InputType::FeedForward { size: 20 });
        assert_eq!(config.seed(), SEED);
        assert_eq!(*config.optimizer(), OptimizerConfig::adam(0.01));

        let widths: Vec<_> = config
            .layers()
            .iter()
            .map(|layer| match *layer {
                LayerConfig::Dense { n_out, .. } | LayerConfig::Output { n_out, .. } => n_out,
                _ => 0,
            })
            .collect();
        assert_eq!(widths, [256, 128, 4]);
    }

    #[test]
    fn zero_classes_is_an_invalid_config() {
        let mut trainer = MfccTrainer::new(13, 0, 0.001);

        assert!(matches!(
            trainer.initialize(),
            Err(TrainerErr::InvalidConfig(_))
        ));
        assert!(!trainer.is_initialized());
    }
}
