mod persistence;

use std::{cell::RefCell, num::NonZeroUsize, rc::Rc};

use log::{debug, info};
use ndarray::{Array2, ArrayView2};
use rand::{SeedableRng, rngs::StdRng};

use crate::{
    DataSet, MlErr, Result,
    arch::{
        Model, Sequential,
        layers::Layer,
        loss::{Loss, LossFn},
    },
    config::NetworkConfig,
    initialization::{ChainedParamGen, ParamGen, layer_param_gen},
    optimization::Updater,
};

/// A trainable network: the layers described by a `NetworkConfig` together with their
/// parameters and the optimizer state.
///
/// A `Network` is always fully initialized, there's no way of getting one without weights.
#[derive(Debug, Clone)]
pub struct Network {
    config: NetworkConfig,
    model: Sequential,
    params: Vec<f32>,
    grad: Vec<f32>,
    updater: Updater,
    loss_fn: Loss,
    epoch_count: usize,
}

impl Network {
    /// Builds the network described by `config` and initializes its weights from the config's
    /// seed, so two networks built from the same config start identical.
    ///
    /// # Returns
    /// The network or an error if the config is invalid.
    pub fn init(config: NetworkConfig) -> Result<Self> {
        let model = Sequential::new(config.resolve()?);
        let size = model.size();

        let rng = Rc::new(RefCell::new(StdRng::seed_from_u64(config.seed())));
        let param_gens = model
            .layers()
            .iter()
            .filter_map(Layer::param_layout)
            .map(|layout| layer_param_gen(config.weight_init(), rng.clone(), layout))
            .collect::<Result<Vec<_>>>()?;

        let params = ChainedParamGen::new(param_gens)
            .sample(size)
            .unwrap_or_default();

        let network = Self::from_parts(config, model, params)?;
        info!(
            "initialized network: layers={} params={}",
            network.model.layers().len(),
            network.num_params()
        );

        Ok(network)
    }

    fn from_parts(config: NetworkConfig, model: Sequential, params: Vec<f32>) -> Result<Self> {
        let size = model.size();
        if params.len() != size {
            return Err(MlErr::SizeMismatch {
                what: "network parameters",
                got: params.len(),
                expected: size,
            });
        }

        Ok(Self {
            loss_fn: config.loss()?,
            updater: Updater::from_config(config.optimizer(), size),
            grad: vec![0.; size],
            config,
            model,
            params,
            epoch_count: 0,
        })
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    pub fn num_params(&self) -> usize {
        self.params.len()
    }

    pub fn params(&self) -> &[f32] {
        &self.params
    }

    /// The amount of `fit` passes this network has been through, saved models included.
    pub fn epoch_count(&self) -> usize {
        self.epoch_count
    }

    /// Runs one full pass over `data`, updating the parameters after every batch.
    ///
    /// # Returns
    /// The mean batch loss or an error if the data doesn't fit the network.
    pub fn fit(&mut self, data: &DataSet) -> Result<f32> {
        self.check_dataset(data)?;

        let batch_size = match self.config.batch_size() {
            Some(batch_size) => batch_size,
            None => NonZeroUsize::new(data.num_samples()).ok_or(MlErr::EmptyDataSet)?,
        };

        let loss = self.model.backprop(
            &mut self.params,
            &mut self.grad,
            &self.loss_fn,
            &mut self.updater,
            data.batches(batch_size),
        )?;

        self.epoch_count += 1;
        debug!(epoch = self.epoch_count; "fit pass done: loss={loss}");
        Ok(loss)
    }

    /// Computes the loss of the current parameters over the whole of `data`.
    pub fn score(&mut self, data: &DataSet) -> Result<f32> {
        self.check_dataset(data)?;

        let y_pred = self.model.forward(&self.params, data.features())?;
        Ok(self.loss_fn.loss(y_pred.view(), data.labels()))
    }

    /// Feeds `x` forward, one sample per row.
    pub fn output(&mut self, x: ArrayView2<f32>) -> Result<Array2<f32>> {
        self.check_features(x.ncols())?;
        self.model.forward(&self.params, x)
    }

    fn check_dataset(&self, data: &DataSet) -> Result<()> {
        self.check_features(data.num_features())?;

        let classes = self.output_size();
        if data.num_classes() != classes {
            return Err(MlErr::SizeMismatch {
                what: "dataset classes",
                got: data.num_classes(),
                expected: classes,
            });
        }

        Ok(())
    }

    fn check_features(&self, got: usize) -> Result<()> {
        let expected = self.config.input().shape().len();

        if got != expected {
            return Err(MlErr::SizeMismatch {
                what: "input features",
                got,
                expected,
            });
        }

        Ok(())
    }

    fn output_size(&self) -> usize {
        self.model
            .layers()
            .last()
            .map(|layer| layer.output_shape().len())
            .unwrap_or_default()
    }
}
