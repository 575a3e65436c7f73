use std::num::NonZeroUsize;

use ndarray::{Array2, Array4, ArrayView2, Axis};

use crate::{MlErr, Result};

/// A supervised dataset: one row of features and one row of (one-hot) labels per sample.
#[derive(Debug, Clone)]
pub struct DataSet {
    features: Array2<f32>,
    labels: Array2<f32>,
}

impl DataSet {
    /// Creates a new `DataSet`.
    ///
    /// # Arguments
    /// * `features` - A `(samples, features)` matrix.
    /// * `labels` - A `(samples, classes)` matrix.
    ///
    /// # Returns
    /// A new `DataSet` or an error if it's empty or the row counts differ.
    pub fn new(features: Array2<f32>, labels: Array2<f32>) -> Result<Self> {
        if features.nrows() == 0 {
            return Err(MlErr::EmptyDataSet);
        }

        if features.nrows() != labels.nrows() {
            return Err(MlErr::SizeMismatch {
                what: "dataset label rows",
                got: labels.nrows(),
                expected: features.nrows(),
            });
        }

        Ok(Self { features, labels })
    }

    /// Creates a new `DataSet` from a batch of images laid out as `[N, C, H, W]`.
    ///
    /// Each image is flattened in channel, row, column order, which is the layout the
    /// convolutional layers read.
    pub fn from_images(images: Array4<f32>, labels: Array2<f32>) -> Result<Self> {
        let (n, c, h, w) = images.dim();
        let flat: Vec<f32> = images.iter().copied().collect();
        let features = Array2::from_shape_vec((n, c * h * w), flat)?;
        Self::new(features, labels)
    }

    /// Builds a one-hot label matrix.
    ///
    /// # Arguments
    /// * `classes` - The class index of each sample.
    /// * `num_classes` - The width of each label row.
    ///
    /// # Returns
    /// The label matrix or an error if a class is out of range.
    pub fn one_hot(classes: &[usize], num_classes: usize) -> Result<Array2<f32>> {
        let mut labels = Array2::zeros((classes.len(), num_classes));

        for (i, &class) in classes.iter().enumerate() {
            if class >= num_classes {
                return Err(MlErr::SizeMismatch {
                    what: "one-hot class index",
                    got: class,
                    expected: num_classes,
                });
            }

            labels[[i, class]] = 1.0;
        }

        Ok(labels)
    }

    #[inline]
    pub fn num_samples(&self) -> usize {
        self.features.nrows()
    }

    #[inline]
    pub fn num_features(&self) -> usize {
        self.features.ncols()
    }

    #[inline]
    pub fn num_classes(&self) -> usize {
        self.labels.ncols()
    }

    pub fn features(&self) -> ArrayView2<'_, f32> {
        self.features.view()
    }

    pub fn labels(&self) -> ArrayView2<'_, f32> {
        self.labels.view()
    }

    /// Splits the dataset into consecutive `(features, labels)` batches, the last one may be
    /// smaller than `batch_size`.
    pub fn batches(
        &self,
        batch_size: NonZeroUsize,
    ) -> impl Iterator<Item = (ArrayView2<'_, f32>, ArrayView2<'_, f32>)> {
        let size = batch_size.get();

        self.features
            .axis_chunks_iter(Axis(0), size)
            .zip(self.labels.axis_chunks_iter(Axis(0), size))
    }
}
