use ndarray::{Array2, ArrayView2};

use super::{Model, activations::ActFn, layers::Layer, loss::LossFn};
use crate::{MlErr, Result, optimization::Optimizer};

/// A sequential model: information flows forward when computing an output and backward when
/// computing the *deltas* of its layers.
#[derive(Debug, Clone)]
pub struct Sequential {
    layers: Vec<Layer>,
}

impl Sequential {
    /// Creates a new `Sequential`.
    ///
    /// # Arguments
    /// * `layers` - The layers the sequential is composed of.
    ///
    /// # Returns
    /// A new `Sequential` instance.
    pub fn new<I>(layers: I) -> Self
    where
        I: IntoIterator<Item = Layer>,
    {
        Self {
            layers: layers.into_iter().collect(),
        }
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Makes a forward pass through the network.
    ///
    /// # Arguments
    /// * `params` - The parameters of every layer, laid out in layer order.
    /// * `x` - The input data.
    ///
    /// # Returns
    /// The prediction for the given input or an error if occurred.
    pub fn forward(&mut self, params: &[f32], x: ArrayView2<f32>) -> Result<Array2<f32>> {
        self.check_params(params.len())?;

        let mut offset = 0;
        let mut out = x.to_owned();

        for layer in self.layers.iter_mut() {
            let size = layer.size();
            out = layer.forward(&params[offset..offset + size], out.view())?;
            offset += size;
        }

        Ok(out)
    }

    /// Computes the loss of a single batch and writes its gradient into `grad`.
    ///
    /// # Arguments
    /// * `params` - The model's parameters.
    /// * `grad` - Overwritten with the gradient of the loss w.r.t. `params`.
    /// * `loss_fn` - The loss function.
    /// * `x` - The input batch.
    /// * `y` - The expected output batch.
    ///
    /// # Returns
    /// The batch loss.
    pub fn compute_gradient<L: LossFn>(
        &mut self,
        params: &[f32],
        grad: &mut [f32],
        loss_fn: &L,
        x: ArrayView2<f32>,
        y: ArrayView2<f32>,
    ) -> Result<f32> {
        self.check_params(grad.len())?;

        let y_pred = self.forward(params, x)?;
        if y_pred.dim() != y.dim() {
            return Err(MlErr::SizeMismatch {
                what: "label columns",
                got: y.ncols(),
                expected: y_pred.ncols(),
            });
        }

        let loss = loss_fn.loss(y_pred.view(), y);
        grad.fill(0.);

        let mut end = params.len();
        let mut hidden = self.layers.len();
        let mut d = loss_fn.loss_prime(y_pred.view(), y);

        // A softmax output skips its jacobian when the loss knows the delta of the sums.
        if let Some(Layer::Dense(output)) = self.layers.last() {
            let dz = match output.act_fn() {
                Some(ActFn::Softmax) => loss_fn.softmax_delta(y_pred.view(), y),
                _ => None,
            };

            if let Some(dz) = dz {
                let start = end - output.size();
                d = output.backward_sums(&params[start..end], &mut grad[start..end], dz.view())?;
                end = start;
                hidden -= 1;
            }
        }

        for layer in self.layers[..hidden].iter_mut().rev() {
            let start = end - layer.size();
            d = layer.backward(&params[start..end], &mut grad[start..end], d.view())?;
            end = start;
        }

        Ok(loss)
    }

    fn check_params(&self, len: usize) -> Result<()> {
        let expected = self.size();

        if len != expected {
            return Err(MlErr::SizeMismatch {
                what: "model parameters",
                got: len,
                expected,
            });
        }

        Ok(())
    }
}

impl Model for Sequential {
    fn size(&self) -> usize {
        self.layers.iter().map(|layer| layer.size()).sum()
    }

    // The epoch loss is approximated by averaging the loss of each batch instead of forwarding
    // the whole dataset again with the final parameters.
    fn backprop<'a, L, O, I>(
        &mut self,
        params: &mut [f32],
        grad: &mut [f32],
        loss_fn: &L,
        optimizer: &mut O,
        batches: I,
    ) -> Result<f32>
    where
        L: LossFn,
        O: Optimizer,
        I: Iterator<Item = (ArrayView2<'a, f32>, ArrayView2<'a, f32>)>,
    {
        let mut total_loss = 0.0;
        let mut num_batches = 0;

        for (x, y) in batches {
            total_loss += self.compute_gradient(params, grad, loss_fn, x, y)?;
            num_batches += 1;
            optimizer.update_params(grad, params)?;
        }

        if num_batches == 0 {
            return Err(MlErr::EmptyDataSet);
        }

        Ok(total_loss / num_batches as f32)
    }
}
