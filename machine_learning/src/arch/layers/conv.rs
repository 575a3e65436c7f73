use ndarray::{linalg, prelude::*};

use super::ParamLayout;
use crate::{
    MlErr, Result,
    arch::{Shape, activations::ActFn},
};

/// A 2D convolution without padding.
///
/// Every input row is read as a `channels x height x width` image and every output row is
/// written as a `filters x out_height x out_width` image. Internally the batch is unrolled
/// into patches (one row per output position) so the convolution becomes one matrix product
/// with the `(channels * kh * kw, filters)` kernel matrix.
#[derive(Debug, Clone)]
pub struct Conv2d {
    input: (usize, usize, usize),
    output: (usize, usize),
    filters: usize,
    kernel: (usize, usize),
    stride: (usize, usize),
    act_fn: Option<ActFn>,
    size: usize,

    // Forward metadata, in patch layout
    cols: Array2<f32>,
    z: Array2<f32>,
    a: Array2<f32>,
}

impl Conv2d {
    /// Creates a new `Conv2d` layer.
    ///
    /// # Arguments
    /// * `input` - The image shape of each input sample.
    /// * `filters` - The amount of output channels.
    /// * `kernel` - The `(height, width)` of each filter.
    /// * `stride` - The `(vertical, horizontal)` step between positions.
    /// * `act_fn` - An optional activation function.
    ///
    /// # Returns
    /// A new `Conv2d` or an error if the kernel doesn't fit the input.
    pub fn new(
        input: Shape,
        filters: usize,
        kernel: (usize, usize),
        stride: (usize, usize),
        act_fn: Option<ActFn>,
    ) -> Result<Self> {
        let Shape::Image {
            channels,
            height,
            width,
        } = input
        else {
            return Err(MlErr::InvalidConfig(format!(
                "a convolution needs an image input, got {input}"
            )));
        };

        let output = (
            window_count(height, kernel.0, stride.0)?,
            window_count(width, kernel.1, stride.1)?,
        );

        let empty = Array2::zeros((0, 0));

        Ok(Self {
            input: (channels, height, width),
            output,
            filters,
            kernel,
            stride,
            act_fn,
            size: (channels * kernel.0 * kernel.1 + 1) * filters,
            cols: empty.clone(),
            z: empty.clone(),
            a: empty,
        })
    }

    /// Returns the amount of parameters this layer has.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn output_shape(&self) -> Shape {
        Shape::Image {
            channels: self.filters,
            height: self.output.0,
            width: self.output.1,
        }
    }

    /// The split of this layer's parameters into weights and biases.
    pub fn param_layout(&self) -> ParamLayout {
        let (kh, kw) = self.kernel;

        ParamLayout {
            weights: self.patch_len() * self.filters,
            biases: self.filters,
            fan_in: self.patch_len(),
            fan_out: self.filters * kh * kw,
        }
    }

    pub fn forward(&mut self, params: &[f32], x: ArrayView2<f32>) -> Result<Array2<f32>> {
        let (c, h, w) = self.input;
        if x.ncols() != c * h * w {
            return Err(MlErr::SizeMismatch {
                what: "convolution input",
                got: x.ncols(),
                expected: c * h * w,
            });
        }

        let (weights, biases) = self.view_params(params)?;
        let cols = self.im2col(x);

        let mut z = Array2::zeros((cols.nrows(), self.filters));
        linalg::general_mat_mul(1.0, &cols, &weights, 0.0, &mut z);
        z += &biases;

        let out = match self.act_fn {
            Some(act_fn) => {
                self.a = act_fn.forward(z.view());
                self.to_channels_first(self.a.view(), x.nrows())?
            }
            None => self.to_channels_first(z.view(), x.nrows())?,
        };

        self.cols = cols;
        self.z = z;
        Ok(out)
    }

    pub fn backward(
        &mut self,
        params: &[f32],
        grad: &mut [f32],
        d: ArrayView2<f32>,
    ) -> Result<Array2<f32>> {
        let n = d.nrows();
        let mut dz = self.to_patches(d)?;

        if let Some(act_fn) = self.act_fn {
            dz = act_fn.backward(self.z.view(), self.a.view(), dz.view());
        }

        let (mut dw, mut db) = self.view_grad(grad)?;
        linalg::general_mat_mul(1.0, &self.cols.t(), &dz, 0.0, &mut dw);
        db.assign(&dz.sum_axis(Axis(0)));

        let (weights, _) = self.view_params(params)?;
        let mut dcols = Array2::zeros((dz.nrows(), weights.nrows()));
        linalg::general_mat_mul(1.0, &dz, &weights.t(), 0.0, &mut dcols);

        Ok(self.col2im(dcols.view(), n))
    }

    fn patch_len(&self) -> usize {
        self.input.0 * self.kernel.0 * self.kernel.1
    }

    /// Unrolls every receptive field of the batch into a row.
    fn im2col(&self, x: ArrayView2<f32>) -> Array2<f32> {
        let (c, h, w) = self.input;
        let (kh, kw) = self.kernel;
        let (sh, sw) = self.stride;
        let (oh, ow) = self.output;

        let mut cols = Array2::zeros((x.nrows() * oh * ow, self.patch_len()));

        for (s, sample) in x.outer_iter().enumerate() {
            for oy in 0..oh {
                for ox in 0..ow {
                    let mut patch = cols.row_mut((s * oh + oy) * ow + ox);
                    let mut col = 0;

                    for ch in 0..c {
                        for ky in 0..kh {
                            let start = ch * h * w + (oy * sh + ky) * w + ox * sw;
                            for kx in 0..kw {
                                patch[col] = sample[start + kx];
                                col += 1;
                            }
                        }
                    }
                }
            }
        }

        cols
    }

    /// The inverse of `im2col`, overlapping receptive fields accumulate.
    fn col2im(&self, dcols: ArrayView2<f32>, n: usize) -> Array2<f32> {
        let (c, h, w) = self.input;
        let (kh, kw) = self.kernel;
        let (sh, sw) = self.stride;
        let (oh, ow) = self.output;

        let mut dx = Array2::zeros((n, c * h * w));

        for (s, mut sample) in dx.outer_iter_mut().enumerate() {
            for oy in 0..oh {
                for ox in 0..ow {
                    let patch = dcols.row((s * oh + oy) * ow + ox);
                    let mut col = 0;

                    for ch in 0..c {
                        for ky in 0..kh {
                            let start = ch * h * w + (oy * sh + ky) * w + ox * sw;
                            for kx in 0..kw {
                                sample[start + kx] += patch[col];
                                col += 1;
                            }
                        }
                    }
                }
            }
        }

        dx
    }

    /// `(n * positions, filters)` -> `(n, filters * positions)`.
    fn to_channels_first(&self, patches: ArrayView2<f32>, n: usize) -> Result<Array2<f32>> {
        let positions = self.output.0 * self.output.1;

        let out = patches
            .into_shape_with_order((n, positions, self.filters))?
            .permuted_axes([0, 2, 1])
            .as_standard_layout()
            .into_owned()
            .into_shape_with_order((n, self.filters * positions))?;

        Ok(out)
    }

    /// `(n, filters * positions)` -> `(n * positions, filters)`.
    fn to_patches(&self, d: ArrayView2<f32>) -> Result<Array2<f32>> {
        let n = d.nrows();
        let positions = self.output.0 * self.output.1;

        let patches = d
            .as_standard_layout()
            .into_owned()
            .into_shape_with_order((n, self.filters, positions))?
            .permuted_axes([0, 2, 1])
            .as_standard_layout()
            .into_owned()
            .into_shape_with_order((n * positions, self.filters))?;

        Ok(patches)
    }

    fn view_grad<'a>(
        &self,
        grad: &'a mut [f32],
    ) -> Result<(ArrayViewMut2<'a, f32>, ArrayViewMut1<'a, f32>)> {
        let w_size = self.size - self.filters;
        let (dw_raw, db_raw) = grad.split_at_mut(w_size);
        let dw = ArrayViewMut2::from_shape((self.patch_len(), self.filters), dw_raw)?;
        let db = ArrayViewMut1::from_shape(self.filters, db_raw)?;
        Ok((dw, db))
    }

    fn view_params<'a>(
        &self,
        params: &'a [f32],
    ) -> Result<(ArrayView2<'a, f32>, ArrayView1<'a, f32>)> {
        if params.len() != self.size {
            return Err(MlErr::SizeMismatch {
                what: "convolution parameters",
                got: params.len(),
                expected: self.size,
            });
        }

        let w_size = self.size - self.filters;
        let weights = ArrayView2::from_shape((self.patch_len(), self.filters), &params[..w_size])?;
        let biases = ArrayView1::from_shape(self.filters, &params[w_size..])?;
        Ok((weights, biases))
    }
}

/// The amount of windows of `kernel` size that fit in `size` moving `stride` at a time.
pub(super) fn window_count(size: usize, kernel: usize, stride: usize) -> Result<usize> {
    if kernel == 0 || stride == 0 || kernel > size {
        return Err(MlErr::InvalidConfig(format!(
            "a window of {kernel} with stride {stride} doesn't fit an input of {size}"
        )));
    }

    Ok((size - kernel) / stride + 1)
}
