mod kind;
mod mfcc;
mod slot;
mod sound_trainer;
mod spectrogram;

use machine_learning::{
    config::{NetworkBuilder, OptimizerConfig, WeightInit},
    NetworkConfig,
};

pub use kind::TrainerKind;
pub use mfcc::MfccTrainer;
pub use slot::ModelSlot;
pub use sound_trainer::SoundTrainer;
pub use spectrogram::SpectrogramTrainer;

mod sealed {
    pub trait Sealed {}

    impl Sealed for super::MfccTrainer {}
    impl Sealed for super::SpectrogramTrainer {}
}

/// Every trainer seeds its weights with this value so initialization is reproducible.
pub const SEED: u64 = 123;

/// The initialization and optimizer both trainers share.
fn base_network(learning_rate: f32) -> NetworkBuilder {
    NetworkConfig::builder()
        .seed(SEED)
        .weight_init(WeightInit::Xavier)
        .optimizer(OptimizerConfig::adam(learning_rate))
}
