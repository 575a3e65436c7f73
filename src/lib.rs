//! Audio classifiers assembled over the `machine_learning` crate: a dense network over MFCC
//! vectors and a small convolutional network over spectrogram images.

pub mod config;
pub mod error;
pub mod synthetic;
pub mod trainer;

pub use config::{MfccConfig, SpectrogramConfig, TrainerConfig};
pub use error::{Result, TrainerErr};
pub use trainer::{MfccTrainer, SoundTrainer, SpectrogramTrainer, TrainerKind};
