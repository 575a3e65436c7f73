use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{MfccTrainer, Result, SoundTrainer, SpectrogramTrainer, TrainerErr, TrainerKind};

/// Hyperparameters of an `MfccTrainer`, missing fields take the trainer's defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MfccConfig {
    pub input_size: usize,
    pub output_size: usize,
    pub learning_rate: f32,
}

impl Default for MfccConfig {
    fn default() -> Self {
        Self {
            input_size: MfccTrainer::DEFAULT_INPUT_SIZE,
            output_size: MfccTrainer::DEFAULT_OUTPUT_SIZE,
            learning_rate: MfccTrainer::DEFAULT_LEARNING_RATE,
        }
    }
}

/// Hyperparameters of a `SpectrogramTrainer`, missing fields take the trainer's defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpectrogramConfig {
    pub height: usize,
    pub width: usize,
    pub channels: usize,
    pub output_size: usize,
    pub learning_rate: f32,
}

impl Default for SpectrogramConfig {
    fn default() -> Self {
        Self {
            height: SpectrogramTrainer::DEFAULT_HEIGHT,
            width: SpectrogramTrainer::DEFAULT_WIDTH,
            channels: SpectrogramTrainer::DEFAULT_CHANNELS,
            output_size: SpectrogramTrainer::DEFAULT_OUTPUT_SIZE,
            learning_rate: SpectrogramTrainer::DEFAULT_LEARNING_RATE,
        }
    }
}

/// A trainer described as data, tagged by `kind`:
///
/// ```json
/// { "kind": "mfcc", "input_size": 13, "output_size": 10, "learning_rate": 0.001 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TrainerConfig {
    Mfcc(MfccConfig),
    Spectrogram(SpectrogramConfig),
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self::Mfcc(MfccConfig::default())
    }
}

impl TrainerConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| TrainerErr::InvalidConfig(e.to_string()))
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .map_err(|e| TrainerErr::InvalidConfig(format!("{}: {e}", path.display())))?;

        Self::from_json_str(&json)
    }

    pub fn kind(&self) -> TrainerKind {
        match self {
            TrainerConfig::Mfcc(_) => TrainerKind::Mfcc,
            TrainerConfig::Spectrogram(_) => TrainerKind::Spectrogram,
        }
    }

    /// Builds the described trainer, without a model.
    ///
    /// # Returns
    /// The trainer or `InvalidConfig` if its hyperparameters can't form a valid topology.
    pub fn build(&self) -> Result<Box<dyn SoundTrainer>> {
        let trainer: Box<dyn SoundTrainer> = match *self {
            TrainerConfig::Mfcc(MfccConfig {
                input_size,
                output_size,
                learning_rate,
            }) => Box::new(MfccTrainer::new(input_size, output_size, learning_rate)),
            TrainerConfig::Spectrogram(SpectrogramConfig {
                height,
                width,
                channels,
                output_size,
                learning_rate,
            }) => Box::new(SpectrogramTrainer::new(
                height,
                width,
                channels,
                output_size,
                learning_rate,
            )),
        };

        trainer.network_config()?;
        Ok(trainer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_the_defaults() {
        let config = TrainerConfig::from_json_str(r#"{ "kind": "mfcc", "input_size": 20 }"#)
            .unwrap();

        assert_eq!(
            config,
            TrainerConfig::Mfcc(MfccConfig {
                input_size: 20,
                ..MfccConfig::default()
            })
        );
    }

    #[test]
    fn spectrogram_config() {
        let json = r#"{ "kind": "spectrogram", "height": 32, "width": 48, "channels": 2,
                        "output_size": 3, "learning_rate": 0.01 }"#;
        let config = TrainerConfig::from_json_str(json).unwrap();

        assert_eq!(config.kind(), TrainerKind::Spectrogram);
        assert_eq!(
            config,
            TrainerConfig::Spectrogram(SpectrogramConfig {
                height: 32,
                width: 48,
                channels: 2,
                output_size: 3,
                learning_rate: 0.01,
            })
        );
    }

    #[test]
    fn unknown_kind() {
        let result = TrainerConfig::from_json_str(r#"{ "kind": "waveform" }"#);
        assert!(matches!(result, Err(TrainerErr::InvalidConfig(_))));
    }

    #[test]
    fn build_returns_an_uninitialized_trainer() {
        let trainer = TrainerConfig::default().build().unwrap();

        assert_eq!(trainer.kind(), TrainerKind::Mfcc);
        assert!(!trainer.is_initialized());
    }

    #[test]
    fn build_rejects_impossible_topologies() {
        let config = TrainerConfig::Spectrogram(SpectrogramConfig {
            height: 4,
            ..SpectrogramConfig::default()
        });

        assert!(matches!(config.build(), Err(TrainerErr::InvalidConfig(_))));
    }
}
