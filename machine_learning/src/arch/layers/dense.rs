use ndarray::{linalg, prelude::*};

use super::ParamLayout;
use crate::{MlErr, Result, arch::activations::ActFn};

/// A fully connected layer, `a = act_fn(x · w + b)`.
///
/// Image shaped inputs are consumed as their flattened rows.
#[derive(Debug, Clone)]
pub struct Dense {
    dim: (usize, usize),
    act_fn: Option<ActFn>,
    size: usize,

    // Forward metadata
    x: Array2<f32>,
    z: Array2<f32>,
    a: Array2<f32>,
}

impl Dense {
    /// Creates a new `Dense` layer.
    ///
    /// # Arguments
    /// * `dim` - The `(inputs, outputs)` dimension of the layer.
    /// * `act_fn` - An optional activation function applied to the weighted sums.
    pub fn new(dim: (usize, usize), act_fn: Option<ActFn>) -> Self {
        let zeros = Array2::zeros((0, 0));

        Self {
            dim,
            size: (dim.0 + 1) * dim.1,
            act_fn,
            x: zeros.clone(),
            z: zeros.clone(),
            a: zeros,
        }
    }

    /// Returns the size of this layer.
    ///
    /// # Returns
    /// The amount of parameters this layer has.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn dim(&self) -> (usize, usize) {
        self.dim
    }

    pub fn act_fn(&self) -> Option<ActFn> {
        self.act_fn
    }

    /// The split of this layer's parameters into weights and biases.
    pub fn param_layout(&self) -> ParamLayout {
        ParamLayout {
            weights: self.dim.0 * self.dim.1,
            biases: self.dim.1,
            fan_in: self.dim.0,
            fan_out: self.dim.1,
        }
    }

    /// Computes the layer's output for a batch of inputs, caching what `backward` needs.
    ///
    /// # Arguments
    /// * `params` - This layer's parameter slice.
    /// * `x` - The input batch, one sample per row.
    pub fn forward(&mut self, params: &[f32], x: ArrayView2<f32>) -> Result<Array2<f32>> {
        if x.ncols() != self.dim.0 {
            return Err(MlErr::SizeMismatch {
                what: "dense layer input",
                got: x.ncols(),
                expected: self.dim.0,
            });
        }

        let (w, b) = self.view_params(params)?;

        let mut z = Array2::zeros((x.nrows(), self.dim.1));
        linalg::general_mat_mul(1.0, &x, &w, 0.0, &mut z);
        z += &b;

        self.x = x.to_owned();

        let Some(act_fn) = self.act_fn else {
            self.z = z.clone();
            return Ok(z);
        };

        self.a = act_fn.forward(z.view());
        self.z = z;
        Ok(self.a.clone())
    }

    /// Writes this layer's gradient into `grad` and returns the delta for the previous layer.
    ///
    /// # Arguments
    /// * `params` - This layer's parameter slice.
    /// * `grad` - This layer's gradient slice.
    /// * `d` - The loss derivative w.r.t. this layer's output.
    pub fn backward(
        &mut self,
        params: &[f32],
        grad: &mut [f32],
        d: ArrayView2<f32>,
    ) -> Result<Array2<f32>> {
        let dz = match self.act_fn {
            Some(act_fn) => act_fn.backward(self.z.view(), self.a.view(), d),
            None => d.to_owned(),
        };

        self.backward_sums(params, grad, dz.view())
    }

    /// Like `backward`, but `d` is already the loss derivative w.r.t. the weighted sums, so the
    /// activation is skipped.
    pub fn backward_sums(
        &self,
        params: &[f32],
        grad: &mut [f32],
        d: ArrayView2<f32>,
    ) -> Result<Array2<f32>> {
        let (mut dw, mut db) = self.view_grad(grad)?;
        linalg::general_mat_mul(1.0, &self.x.t(), &d, 0.0, &mut dw);
        db.assign(&d.sum_axis(Axis(0)));

        let (w, _) = self.view_params(params)?;
        let mut dx = Array2::zeros((d.nrows(), self.dim.0));
        linalg::general_mat_mul(1.0, &d, &w.t(), 0.0, &mut dx);

        Ok(dx)
    }

    /// Gives a view of the raw gradient slice as the delta weights and delta biases of this layer.
    ///
    /// # Arguments
    /// * `grad` - A gradient slice.
    ///
    /// # Returns
    /// A tuple containing the delta weights and delta biases.
    fn view_grad<'a>(
        &self,
        grad: &'a mut [f32],
    ) -> Result<(ArrayViewMut2<'a, f32>, ArrayViewMut1<'a, f32>)> {
        let w_size = self.size - self.dim.1;
        let (dw_raw, db_raw) = grad.split_at_mut(w_size);
        let dw = ArrayViewMut2::from_shape(self.dim, dw_raw)?;
        let db = ArrayViewMut1::from_shape(self.dim.1, db_raw)?;
        Ok((dw, db))
    }

    /// Gives a view of the raw parameter slice as the weights and biases of this layer.
    ///
    /// # Arguments
    /// * `params` - A slice of parameters.
    ///
    /// # Returns
    /// A tuple containing the weights and biases.
    fn view_params<'a>(
        &self,
        params: &'a [f32],
    ) -> Result<(ArrayView2<'a, f32>, ArrayView1<'a, f32>)> {
        if params.len() != self.size {
            return Err(MlErr::SizeMismatch {
                what: "dense layer parameters",
                got: params.len(),
                expected: self.size,
            });
        }

        let w_size = self.size - self.dim.1;
        let weights = ArrayView2::from_shape(self.dim, &params[..w_size])?;
        let biases = ArrayView1::from_shape(self.dim.1, &params[w_size..])?;
        Ok((weights, biases))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_applies_weights_then_bias() {
        // w = [[1, 2], [3, 4]], b = [0.5, -100]
        let params = [1., 2., 3., 4., 0.5, -100.];
        let mut dense = Dense::new((2, 2), Some(ActFn::Relu));
        let x = array![[1f32, 1.]];

        let a = dense.forward(&params, x.view()).unwrap();
        assert_eq!(a, array![[4.5f32, 0.]]);
    }

    #[test]
    fn backward_computes_weight_bias_and_input_deltas() {
        let params = [1., 2., 3., 4., 0., 0.];
        let mut grad = [0.; 6];
        let mut dense = Dense::new((2, 2), None);
        let x = array![[1f32, 2.]];

        dense.forward(&params, x.view()).unwrap();
        let d = array![[1f32, 0.]];
        let dx = dense.backward(&params, &mut grad, d.view()).unwrap();

        assert_eq!(grad, [1., 0., 2., 0., 1., 0.]);
        assert_eq!(dx, array![[1f32, 3.]]);
    }

    #[test]
    fn wrong_input_width_is_an_error() {
        let params = [0.; 6];
        let mut dense = Dense::new((2, 2), None);
        let x = Array2::zeros((1, 3));

        assert!(matches!(
            dense.forward(&params, x.view()),
            Err(MlErr::SizeMismatch {
                got: 3,
                expected: 2,
                ..
            })
        ));
    }
}
