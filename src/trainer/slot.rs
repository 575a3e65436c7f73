use std::path::Path;

use log::info;
use machine_learning::{Network, NetworkConfig};

use super::TrainerKind;
use crate::{Result, TrainerErr};

/// The model owned by a trainer: either absent or a fully initialized `Network`.
#[derive(Debug)]
pub struct ModelSlot {
    kind: TrainerKind,
    network: Option<Network>,
}

impl ModelSlot {
    pub(crate) fn empty(kind: TrainerKind) -> Self {
        Self {
            kind,
            network: None,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.network.is_some()
    }

    pub fn config(&self) -> Option<&NetworkConfig> {
        self.network.as_ref().map(Network::config)
    }

    pub fn num_params(&self) -> Option<usize> {
        self.network.as_ref().map(Network::num_params)
    }

    /// Replaces the model with a freshly initialized network.
    pub(crate) fn initialize(&mut self, config: NetworkConfig) -> Result<&mut Network> {
        let network = Network::init(config)?;
        info!(
            "initialized {} model with {} parameters",
            self.kind,
            network.num_params()
        );

        Ok(self.network.insert(network))
    }

    /// Returns the model or an `Uninitialized` error naming `op`.
    pub(crate) fn network_mut(&mut self, op: &'static str) -> Result<&mut Network> {
        let kind = self.kind;
        self.network
            .as_mut()
            .ok_or(TrainerErr::Uninitialized { kind, op })
    }

    pub(crate) fn save(&self, path: &Path) -> Result<()> {
        let network = self.network.as_ref().ok_or(TrainerErr::Uninitialized {
            kind: self.kind,
            op: "save_model",
        })?;

        network
            .save(path)
            .map_err(|e| TrainerErr::io("save", path, e))?;

        info!("saved {} model to {}", self.kind, path.display());
        Ok(())
    }

    /// Loads a model, the current one is only replaced if the loaded one fits this kind.
    pub(crate) fn load(&mut self, path: &Path) -> Result<()> {
        let network = Network::load(path).map_err(|e| TrainerErr::io("load", path, e))?;

        let input = network.config().input();
        if !self.kind.accepts(&input) {
            return Err(TrainerErr::TopologyMismatch {
                kind: self.kind,
                found: input,
            });
        }

        info!("loaded {} model from {}", self.kind, path.display());
        self.network = Some(network);
        Ok(())
    }
}
