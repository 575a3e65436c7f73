mod loss_fn;
mod mse;
mod nll;

use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};

pub use loss_fn::LossFn;
pub use mse::Mse;
pub use nll::Nll;

/// The loss functions an output layer can be trained with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Loss {
    NegativeLogLikelihood,
    Mse,
}

impl LossFn for Loss {
    fn loss(&self, y_pred: ArrayView2<f32>, y: ArrayView2<f32>) -> f32 {
        match self {
            Loss::NegativeLogLikelihood => Nll.loss(y_pred, y),
            Loss::Mse => Mse.loss(y_pred, y),
        }
    }

    fn loss_prime(&self, y_pred: ArrayView2<f32>, y: ArrayView2<f32>) -> Array2<f32> {
        match self {
            Loss::NegativeLogLikelihood => Nll.loss_prime(y_pred, y),
            Loss::Mse => Mse.loss_prime(y_pred, y),
        }
    }

    fn softmax_delta(&self, y_pred: ArrayView2<f32>, y: ArrayView2<f32>) -> Option<Array2<f32>> {
        match self {
            Loss::NegativeLogLikelihood => Nll.softmax_delta(y_pred, y),
            Loss::Mse => Mse.softmax_delta(y_pred, y),
        }
    }
}
