use super::ParamGen;

/// Concatenates the output of several generators, draining each one before moving on.
///
/// A network's parameters are every layer's weights followed by its biases, so the network
/// chains one generator per layer and each layer chains its weight distribution with its
/// zeroed biases.
pub struct ChainedParamGen {
    param_gens: Vec<Box<dyn ParamGen>>,
    curr: usize,
}

impl ChainedParamGen {
    /// Creates a new `ChainedParamGen`.
    ///
    /// # Arguments
    /// * `param_gens` - The generators, in the order their parameters are laid out.
    pub fn new(param_gens: Vec<Box<dyn ParamGen>>) -> Self {
        Self {
            param_gens,
            curr: 0,
        }
    }

    fn is_exhausted(&self) -> bool {
        self.curr == self.param_gens.len()
    }
}

impl ParamGen for ChainedParamGen {
    fn sample(&mut self, n: usize) -> Option<Vec<f32>> {
        let mut sample = Vec::with_capacity(n);

        while sample.len() < n {
            let Some(param_gen) = self.param_gens.get_mut(self.curr) else {
                break;
            };

            match param_gen.sample(n - sample.len()) {
                Some(part) if !part.is_empty() => sample.extend(part),
                _ => self.curr += 1,
            }
        }

        if sample.is_empty() && self.is_exhausted() {
            return None;
        }

        Some(sample)
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::{arch::layers::ParamLayout, config::WeightInit, initialization::layer_param_gen};

    // A (2, 3) dense layer followed by a (3, 1) one.
    const LAYOUTS: [ParamLayout; 2] = [
        ParamLayout {
            weights: 6,
            biases: 3,
            fan_in: 2,
            fan_out: 3,
        },
        ParamLayout {
            weights: 3,
            biases: 1,
            fan_in: 3,
            fan_out: 1,
        },
    ];

    fn network_gen(seed: u64) -> ChainedParamGen {
        let rng = Rc::new(RefCell::new(StdRng::seed_from_u64(seed)));
        let layers = LAYOUTS
            .into_iter()
            .map(|layout| layer_param_gen(WeightInit::Xavier, rng.clone(), layout).unwrap())
            .collect();

        ChainedParamGen::new(layers)
    }

    #[test]
    fn empty() {
        let mut param_gen = ChainedParamGen::new(vec![]);
        assert!(param_gen.sample(1).is_none());
    }

    #[test]
    fn each_layer_is_weights_then_zeroed_biases() {
        let mut param_gen = network_gen(123);
        let params = param_gen.sample(13).unwrap();

        assert_eq!(params.len(), 13);
        assert!(params[..6].iter().all(|&w| w != 0.));
        assert_eq!(params[6..9], [0.; 3]);
        assert!(params[9..12].iter().all(|&w| w != 0.));
        assert_eq!(params[12], 0.);
        assert!(param_gen.sample(1).is_none());
    }

    #[test]
    fn oversized_requests_stop_at_the_last_layer() {
        let mut param_gen = network_gen(123);
        assert_eq!(param_gen.sample(100).unwrap().len(), 13);
    }

    #[test]
    fn sampling_in_parts_matches_sampling_at_once() {
        let whole = network_gen(7).sample(13).unwrap();

        let mut param_gen = network_gen(7);
        let mut parts = Vec::new();
        while let Some(part) = param_gen.sample(4) {
            parts.extend(part);
        }

        assert_eq!(parts, whole);
    }
}
