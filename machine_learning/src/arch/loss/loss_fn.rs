use ndarray::{Array2, ArrayView2};

pub trait LossFn {
    /// The mean loss of a batch of predictions.
    fn loss(&self, y_pred: ArrayView2<f32>, y: ArrayView2<f32>) -> f32;

    /// The derivative of `loss` w.r.t. each prediction.
    fn loss_prime(&self, y_pred: ArrayView2<f32>, y: ArrayView2<f32>) -> Array2<f32>;

    /// The derivative of `loss` w.r.t. the weighted sums of a softmax output layer, given the
    /// softmax probabilities `y_pred`.
    ///
    /// Losses that don't simplify through the softmax return `None` and are chained through
    /// `loss_prime` and the softmax jacobian instead.
    fn softmax_delta(&self, _y_pred: ArrayView2<f32>, _y: ArrayView2<f32>) -> Option<Array2<f32>> {
        None
    }
}
