use machine_learning::{
    arch::{activations::ActFn, loss::Loss},
    config::{InputType, LayerConfig},
    NetworkConfig,
};

use super::{base_network, ModelSlot, SoundTrainer, TrainerKind};
use crate::Result;

/// Classifies spectrogram images with a small convolutional network:
/// `conv 5x5 (32) -> max pool 2x2 -> conv 5x5 (64) -> max pool 2x2 -> output (softmax, NLL)`.
#[derive(Debug)]
pub struct SpectrogramTrainer {
    height: usize,
    width: usize,
    channels: usize,
    output_size: usize,
    learning_rate: f32,
    slot: ModelSlot,
}

impl SpectrogramTrainer {
    pub const DEFAULT_HEIGHT: usize = 128;
    pub const DEFAULT_WIDTH: usize = 128;
    pub const DEFAULT_CHANNELS: usize = 1;
    pub const DEFAULT_OUTPUT_SIZE: usize = 10;
    pub const DEFAULT_LEARNING_RATE: f32 = 0.001;

    /// Creates a new `SpectrogramTrainer`, the model is built on `initialize` or on the first
    /// `train`.
    ///
    /// # Arguments
    /// * `height`, `width`, `channels` - The shape of each spectrogram.
    /// * `output_size` - The amount of classes.
    /// * `learning_rate` - Adam's learning rate.
    pub fn new(
        height: usize,
        width: usize,
        channels: usize,
        output_size: usize,
        learning_rate: f32,
    ) -> Self {
        Self {
            height,
            width,
            channels,
            output_size,
            learning_rate,
            slot: ModelSlot::empty(TrainerKind::Spectrogram),
        }
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn output_size(&self) -> usize {
        self.output_size
    }

    pub fn learning_rate(&self) -> f32 {
        self.learning_rate
    }
}

impl Default for SpectrogramTrainer {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_HEIGHT,
            Self::DEFAULT_WIDTH,
            Self::DEFAULT_CHANNELS,
            Self::DEFAULT_OUTPUT_SIZE,
            Self::DEFAULT_LEARNING_RATE,
        )
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

fn max_pool() -> LayerConfig {
    LayerConfig::MaxPool2d {
        kernel: (2, 2),
        stride: (2, 2),
    }
}

impl SoundTrainer for SpectrogramTrainer {
    fn kind(&self) -> TrainerKind {
        TrainerKind::Spectrogram
    }

    fn network_config(&self) -> Result<NetworkConfig> {
        let config = base_network(self.learning_rate)
            .input_type(InputType::Convolutional {
                height: self.height,
                width: self.width,
                channels: self.channels,
            })
            .layer(conv(32))
            .layer(max_pool())
            .layer(conv(64))
            .layer(max_pool())
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
