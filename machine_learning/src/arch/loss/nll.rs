use ndarray::{Array2, ArrayView2, Zip};

use super::LossFn;

/// Keeps `ln` finite when a predicted probability underflows to zero.
const MIN_PROB: f32 = 1e-7;

/// Negative log likelihood over one-hot labels, averaged over the batch.
///
/// Expects `y_pred` to hold probabilities, i.e. the output of a softmax layer.
#[derive(Debug, Default, Clone, Copy)]
pub struct Nll;

impl Nll {
    /// Returns a new `Nll`.
    pub fn new() -> Self {
        Self
    }
}

impl LossFn for Nll {
    fn loss(&self, y_pred: ArrayView2<f32>, y: ArrayView2<f32>) -> f32 {
        let n = y_pred.nrows().max(1) as f32;
        let log_likelihood = Zip::from(&y_pred)
            .and(&y)
            .fold(0., |acc, &p, &t| acc + t * p.max(MIN_PROB).ln());

        -log_likelihood / n
    }

    fn loss_prime(&self, y_pred: ArrayView2<f32>, y: ArrayView2<f32>) -> Array2<f32> {
        let n = y_pred.nrows().max(1) as f32;
        Zip::from(&y_pred)
            .and(&y)
            .map_collect(|&p, &t| -t / (p.max(MIN_PROB) * n))
    }

    // Through a softmax the `1 / p` of `loss_prime` cancels against the jacobian, leaving
    // `(p * sum(t) - t) / n` per row. This stays exact when `p` underflows.
    fn softmax_delta(&self, y_pred: ArrayView2<f32>, y: ArrayView2<f32>) -> Option<Array2<f32>> {
        let n = y_pred.nrows().max(1) as f32;
        let mut delta = Array2::zeros(y_pred.raw_dim());

        Zip::from(delta.rows_mut())
            .and(y_pred.rows())
            .and(y.rows())
            .for_each(|mut delta, p, t| {
                let mass = t.sum();
                Zip::from(&mut delta)
                    .and(&p)
                    .and(&t)
                    .for_each(|d, &p, &t| *d = (p * mass - t) / n);
            });

        Some(delta)
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;
    use crate::arch::activations::ActFn;

    #[test]
    fn loss_is_the_mean_negative_log_of_the_true_class() {
        let y_pred = array![[0.5f32, 0.5], [0.25, 0.75]];
        let y = array![[1f32, 0.], [0., 1.]];

        let expected = -(0.5f32.ln() + 0.75f32.ln()) / 2.;
        assert!((Nll.loss(y_pred.view(), y.view()) - expected).abs() < 1e-6);
    }

    #[test]
    fn confident_correct_predictions_have_no_loss() {
        let y_pred = array![[1f32, 0.]];
        let y = array![[1f32, 0.]];

        assert_eq!(Nll.loss(y_pred.view(), y.view()), 0.);
    }

    #[test]
    fn zero_probabilities_keep_the_loss_finite() {
        let y_pred = array![[0f32, 1.]];
        let y = array![[1f32, 0.]];

        assert!(Nll.loss(y_pred.view(), y.view()).is_finite());
        assert!(Nll.loss_prime(y_pred.view(), y.view()).iter().all(|g| g.is_finite()));
    }

    #[test]
    fn gradient_only_touches_the_true_class() {
        let y_pred = array![[0.5f32, 0.5]];
        let y = array![[0f32, 1.]];

        assert_eq!(
            Nll.loss_prime(y_pred.view(), y.view()),
            array![[0f32, -2.]]
        );
    }

    #[test]
    fn softmax_delta_is_probabilities_minus_labels() {
        let y_pred = array![[0.2f32, 0.8], [0.5, 0.5]];
        let y = array![[1f32, 0.], [0., 1.]];

        let delta = Nll.softmax_delta(y_pred.view(), y.view()).unwrap();
        let expected = array![[-0.4f32, 0.4], [0.25, -0.25]];
        assert!(
            Zip::from(&delta)
                .and(&expected)
                .all(|&d, &e| (d - e).abs() < 1e-6),
            "{delta}"
        );
    }

    #[test]
    fn saturated_wrong_prediction_keeps_a_full_gradient() {
        let z = array![[0f32, 30.]];
        let y = array![[1f32, 0.]];
        let a = ActFn::Softmax.forward(z.view());

        let delta = Nll.softmax_delta(a.view(), y.view()).unwrap();
        assert!((delta[[0, 0]] + 1.).abs() < 1e-6, "{delta}");
        assert!((delta[[0, 1]] - 1.).abs() < 1e-6, "{delta}");
    }
}
