use std::{cell::RefCell, rc::Rc};

use rand::Rng;
use rand_distr::{Distribution, Normal, Uniform};

use super::ParamGen;
use crate::Result;

/// A parameter generator that follows a certain probabilistic distribution.
pub struct RandParamGen<R: Rng, D: Distribution<f32>> {
    rng: Rc<RefCell<R>>,
    distribution: D,
    remaining: usize,
}

impl<R: Rng, D: Distribution<f32>> RandParamGen<R, D> {
    /// Creates a new `RandParamGen` parameter generator.
    ///
    /// # Arguments
    /// * `rng` - A random number generator, shared by every layer so a single seed drives
    ///   the whole network.
    /// * `distribution` - The distribution to sample the random numbers from.
    /// * `limit` - The maximum amount of numbers to generate.
    pub fn new(rng: Rc<RefCell<R>>, distribution: D, limit: usize) -> Self {
        Self {
            rng,
            distribution,
            remaining: limit,
        }
    }
}

impl<R: Rng> RandParamGen<R, Uniform<f32>> {
    /// Creates a new `RandParamGen` with a uniform distribution over `[low, high)`.
    ///
    /// # Returns
    /// An error if the range is invalid (low > high).
    pub fn uniform(rng: Rc<RefCell<R>>, limit: usize, low: f32, high: f32) -> Result<Self> {
        Ok(Self::new(rng, Uniform::new(low, high)?, limit))
    }

    /// Creates a new `RandParamGen` using Xavier uniform initialization.
    ///
    /// # Arguments
    /// * `rng` - A random number generator.
    /// * `limit` - The maximum amount of numbers to generate.
    /// * `fan_in` - The number of input units in the weight tensor.
    /// * `fan_out` - The number of output units in the weight tensor.
    ///
    /// # Returns
    /// An error if the calculated range is invalid.
    pub fn xavier_uniform(
        rng: Rc<RefCell<R>>,
        limit: usize,
        fan_in: usize,
        fan_out: usize,
    ) -> Result<Self> {
        let range = (6. / (fan_in + fan_out) as f32).sqrt();
        Self::uniform(rng, limit, -range, range)
    }
}

impl<R: Rng> RandParamGen<R, Normal<f32>> {
    /// Creates a new `RandParamGen` with a normal distribution.
    ///
    /// # Returns
    /// An error if `std_dev` is not finite (Nan or infinite).
    pub fn normal(rng: Rc<RefCell<R>>, limit: usize, mean: f32, std_dev: f32) -> Result<Self> {
        Ok(Self::new(rng, Normal::new(mean, std_dev)?, limit))
    }

    /// Creates a new `RandParamGen` using Xavier normal initialization, that is, a centered
    /// normal with a standard deviation of `sqrt(2 / (fan_in + fan_out))`.
    ///
    /// # Returns
    /// An error if the calculated standard deviation is not finite (Nan or infinite).
    pub fn xavier(
        rng: Rc<RefCell<R>>,
        limit: usize,
        fan_in: usize,
        fan_out: usize,
    ) -> Result<Self> {
        let std_dev = (2. / (fan_in + fan_out) as f32).sqrt();
        Self::normal(rng, limit, 0., std_dev)
    }
}

impl<R: Rng, D: Distribution<f32>> ParamGen for RandParamGen<R, D> {
    fn sample(&mut self, mut n: usize) -> Option<Vec<f32>> {
        if self.remaining == 0 {
            return None;
        }

        n = n.min(self.remaining);
        self.remaining -= n;

        let mut rng = self.rng.borrow_mut();
        let sample = (0..n)
            .map(|_| self.distribution.sample(&mut *rng))
            .collect();
        Some(sample)
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    fn seeded_rng() -> Rc<RefCell<StdRng>> {
        Rc::new(RefCell::new(StdRng::seed_from_u64(42)))
    }

    #[test]
    fn partial() {
        let mut param_gen = RandParamGen::normal(seeded_rng(), 10, 0., 1.).unwrap();

        assert_eq!(param_gen.sample(7).unwrap().len(), 7);
        assert_eq!(param_gen.sample(7).unwrap().len(), 3);
        assert!(param_gen.sample(1).is_none());
    }

    #[test]
    fn xavier_uniform_stays_within_bounds() {
        let (fan_in, fan_out) = (20, 4);
        let bound = (6. / (fan_in + fan_out) as f32).sqrt();

        let mut param_gen =
            RandParamGen::xavier_uniform(seeded_rng(), 1000, fan_in, fan_out).unwrap();
        let sample = param_gen.sample(1000).unwrap();

        assert!(sample.iter().all(|w| (-bound..bound).contains(w)));
    }

    #[test]
    fn xavier_is_centered_and_scaled_by_the_fans() {
        let (fan_in, fan_out) = (30, 20);
        let expected_std = (2. / (fan_in + fan_out) as f32).sqrt();

        let mut param_gen = RandParamGen::xavier(seeded_rng(), 10_000, fan_in, fan_out).unwrap();
        let sample = param_gen.sample(10_000).unwrap();

        let n = sample.len() as f32;
        let mean = sample.iter().sum::<f32>() / n;
        let std = (sample.iter().map(|w| (w - mean).powi(2)).sum::<f32>() / n).sqrt();

        assert!(mean.abs() < 0.01, "mean {mean}");
        assert!((std - expected_std).abs() < 0.01, "std {std}");
    }

    #[test]
    fn same_seed_same_weights() {
        let a = RandParamGen::xavier(seeded_rng(), 8, 3, 3)
            .unwrap()
            .sample(8);
        let b = RandParamGen::xavier(seeded_rng(), 8, 3, 3)
            .unwrap()
            .sample(8);

        assert_eq!(a, b);
    }

    #[test]
    fn invalid_range() {
        assert!(RandParamGen::uniform(seeded_rng(), 1, 1., -1.).is_err());
    }
}
