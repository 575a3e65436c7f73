//! Seeded random datasets, for demos and smoke tests.

use machine_learning::DataSet;
use ndarray::Array2;
use ndarray_rand::{
    rand::{rngs::StdRng, Rng, SeedableRng},
    rand_distr::Uniform,
    RandomExt,
};

use crate::{Result, TrainerErr};

/// Builds a dataset of uniformly random features in `[0, 1)` with random one-hot labels.
///
/// # Arguments
/// * `samples` - The amount of rows.
/// * `features` - The width of each row, `height * width * channels` for spectrograms.
/// * `classes` - The width of each label.
/// * `seed` - Seeds both features and labels.
pub fn random_dataset(
    samples: usize,
    features: usize,
    classes: usize,
    seed: u64,
) -> Result<DataSet> {
    if classes == 0 {
        return Err(TrainerErr::InvalidConfig(
            "a dataset needs at least one class".into(),
        ));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let labels: Vec<usize> = (0..samples).map(|_| rng.random_range(0..classes)).collect();
    labeled_dataset(&labels, features, classes, &mut rng)
}

/// Builds a dataset of uniformly random features in `[0, 1)` with the given class per row.
pub fn labeled_dataset<R: Rng>(
    labels: &[usize],
    features: usize,
    classes: usize,
    rng: &mut R,
) -> Result<DataSet> {
    let distribution =
        Uniform::new(0f32, 1.).map_err(|e| TrainerErr::InvalidConfig(e.to_string()))?;

    let x = Array2::random_using((labels.len(), features), distribution, rng);
    let y = DataSet::one_hot(labels, classes)?;
    Ok(DataSet::new(x, y)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_dataset() {
        let a = random_dataset(8, 5, 3, 42).unwrap();
        let b = random_dataset(8, 5, 3, 42).unwrap();

        assert_eq!(a.features(), b.features());
        assert_eq!(a.labels(), b.labels());
        assert_eq!(a.num_classes(), 3);
    }

    #[test]
    fn features_are_in_the_unit_interval() {
        let data = random_dataset(16, 4, 2, 1).unwrap();
        assert!(data.features().iter().all(|x| (0. ..1.).contains(x)));
    }
}
