use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};

use super::{relu, softmax};

/// The activation functions a layer can apply to its weighted sums.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActFn {
    Relu,
    Softmax,
}
use ActFn::*;

impl ActFn {
    /// Activates a batch of weighted sums, one sample per row.
    pub fn forward(&self, z: ArrayView2<f32>) -> Array2<f32> {
        match self {
            Relu => z.mapv(relu::f),
            Softmax => softmax::forward(z),
        }
    }

    /// Propagates `d` (the loss derivative w.r.t. the activations) back to the weighted sums.
    ///
    /// # Arguments
    /// * `z` - The weighted sums seen on the forward pass.
    /// * `a` - The activations produced on the forward pass.
    /// * `d` - The incoming delta.
    pub fn backward(
        &self,
        z: ArrayView2<f32>,
        a: ArrayView2<f32>,
        d: ArrayView2<f32>,
    ) -> Array2<f32> {
        match self {
            Relu => {
                let mut d = d.to_owned();
                d.zip_mut_with(&z, |d, &z| *d *= relu::df(z));
                d
            }
            Softmax => softmax::backward(a, d),
        }
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    #[test]
    fn relu_clamps_negatives() {
        let z = array![[-1., 0., 2.5]];
        assert_eq!(ActFn::Relu.forward(z.view()), array![[0f32, 0., 2.5]]);
    }

    #[test]
    fn relu_blocks_gradient_of_inactive_units() {
        let z = array![[-1., 3.]];
        let a = ActFn::Relu.forward(z.view());
        let d = array![[5., 7.]];

        assert_eq!(ActFn::Relu.backward(z.view(), a.view(), d.view()), array![[0f32, 7.]]);
    }

    #[test]
    fn softmax_rows_sum_to_one() {
        let z = array![[1., 2., 3.], [1000., 1000., 1000.]];
        let a = ActFn::Softmax.forward(z.view());

        for row in a.rows() {
            assert!((row.sum() - 1.).abs() < 1e-6);
        }

        assert!((a[[1, 0]] - 1. / 3.).abs() < 1e-6);
        assert!(a[[0, 2]] > a[[0, 1]] && a[[0, 1]] > a[[0, 0]]);
    }

    #[test]
    fn softmax_backward_of_uniform_delta_is_zero() {
        let z = array![[0.3, -1.2, 2.0]];
        let a = ActFn::Softmax.forward(z.view());
        let d = array![[4., 4., 4.]];

        let dz = ActFn::Softmax.backward(z.view(), a.view(), d.view());
        assert!(dz.iter().all(|v| v.abs() < 1e-5));
    }
}
