use std::path::Path;

use log::{debug, info, warn};
use machine_learning::{DataSet, NetworkConfig};
use ndarray::{Array2, ArrayView2};

use super::{sealed::Sealed, ModelSlot, TrainerKind};
use crate::Result;

/// A trainer assembles a fixed network topology from its hyperparameters and drives the
/// network's lifecycle: initialization, training, evaluation and persistence.
///
/// Implementors only describe their topology and hand out their `ModelSlot`, every operation
/// is shared. The set of trainers is closed:
///
/// ```compile_fail
/// use machine_learning::NetworkConfig;
/// use sound_trainers::{trainer::ModelSlot, Result, SoundTrainer, TrainerKind};
///
/// struct Other(ModelSlot);
///
/// impl SoundTrainer for Other {
///     fn kind(&self) -> TrainerKind {
///         TrainerKind::Mfcc
///     }
///
///     fn network_config(&self) -> Result<NetworkConfig> {
///         unimplemented!()
///     }
///
///     fn slot(&self) -> &ModelSlot {
///         &self.0
///     }
///
///     fn slot_mut(&mut self) -> &mut ModelSlot {
///         &mut self.0
///     }
/// }
/// ```
pub trait SoundTrainer: Sealed {
    fn kind(&self) -> TrainerKind;

    /// Builds the network config for the current hyperparameters.
    ///
    /// # Errors
    /// `InvalidConfig` if the hyperparameters can't form a valid topology.
    fn network_config(&self) -> Result<NetworkConfig>;

    fn slot(&self) -> &ModelSlot;

    fn slot_mut(&mut self) -> &mut ModelSlot;

    /// Builds a freshly initialized model, overwriting the current one.
    fn initialize(&mut self) -> Result<()> {
        let config = self.network_config()?;
        self.slot_mut().initialize(config)?;
        Ok(())
    }

    /// Runs `epochs` full passes over `data`, initializing the model first if there's none.
    fn train(&mut self, data: &DataSet, epochs: usize) -> Result<()> {
        if !self.is_initialized() {
            self.initialize()?;
        }

        let kind = self.kind();
        info!("training {kind} model: epochs={epochs} samples={}", data.num_samples());

        let network = self.slot_mut().network_mut("train")?;
        for epoch in 1..=epochs {
            let loss = network.fit(data)?;
            debug!("{kind} epoch {epoch}/{epochs}: loss={loss}");
        }

        Ok(())
    }

    /// Scores the current weights over `data`, lower is better.
    fn evaluate(&mut self, data: &DataSet) -> Result<f64> {
        let kind = self.kind();
        let score = self.slot_mut().network_mut("evaluate")?.score(data)? as f64;

        if !score.is_finite() {
            warn!("{kind} model scored {score}");
        }

        Ok(score)
    }

    /// Class probabilities for each row of `features`.
    fn predict(&mut self, features: ArrayView2<f32>) -> Result<Array2<f32>> {
        Ok(self.slot_mut().network_mut("predict")?.output(features)?)
    }

    fn save_model(&self, path: &Path) -> Result<()> {
        self.slot().save(path)
    }

    /// Replaces the current model with the one at `path`.
    ///
    /// # Errors
    /// `Io` if the file can't be read or isn't a model, `TopologyMismatch` if it's a model
    /// for the other kind of trainer. The current model is kept on error.
    fn load_model(&mut self, path: &Path) -> Result<()> {
        self.slot_mut().load(path)
    }

    fn is_initialized(&self) -> bool {
        self.slot().is_initialized()
    }

    fn config(&self) -> Option<&NetworkConfig> {
        self.slot().config()
    }

    /// The amount of trainable parameters of the current model.
    fn num_params(&self) -> Option<usize> {
        self.slot().num_params()
    }
}
