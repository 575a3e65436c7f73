use ndarray::prelude::*;

use super::conv::window_count;
use crate::{MlErr, Result, arch::Shape};

/// Max pooling over each channel independently, without padding.
#[derive(Debug, Clone)]
pub struct MaxPool2d {
    input: (usize, usize, usize),
    output: (usize, usize),
    kernel: (usize, usize),
    stride: (usize, usize),

    // Forward metadata: for every output value, the index of the input value that won.
    argmax: Array2<usize>,
}

impl MaxPool2d {
    /// Creates a new `MaxPool2d` layer.
    ///
    /// # Returns
    /// A new `MaxPool2d` or an error if the window doesn't fit the input.
    pub fn new(input: Shape, kernel: (usize, usize), stride: (usize, usize)) -> Result<Self> {
        let Shape::Image {
            channels,
            height,
            width,
        } = input
        else {
            return Err(MlErr::InvalidConfig(format!(
                "pooling needs an image input, got {input}"
            )));
        };

        let output = (
            window_count(height, kernel.0, stride.0)?,
            window_count(width, kernel.1, stride.1)?,
        );

        Ok(Self {
            input: (channels, height, width),
            output,
            kernel,
            stride,
            argmax: Array2::zeros((0, 0)),
        })
    }

    pub fn output_shape(&self) -> Shape {
        Shape::Image {
            channels: self.input.0,
            height: self.output.0,
            width: self.output.1,
        }
    }

    pub fn forward(&mut self, x: ArrayView2<f32>) -> Result<Array2<f32>> {
        let (c, h, w) = self.input;
        let (kh, kw) = self.kernel;
        let (sh, sw) = self.stride;
        let (oh, ow) = self.output;

        if x.ncols() != c * h * w {
            return Err(MlErr::SizeMismatch {
                what: "pooling input",
                got: x.ncols(),
                expected: c * h * w,
            });
        }

        let mut out = Array2::zeros((x.nrows(), c * oh * ow));
        let mut argmax = Array2::zeros(out.raw_dim());

        for (s, sample) in x.outer_iter().enumerate() {
            for ch in 0..c {
                for oy in 0..oh {
                    for ox in 0..ow {
                        let o = (ch * oh + oy) * ow + ox;
                        let mut best = ch * h * w + oy * sh * w + ox * sw;

                        for ky in 0..kh {
                            for kx in 0..kw {
                                let i = ch * h * w + (oy * sh + ky) * w + ox * sw + kx;
                                if sample[i] > sample[best] {
                                    best = i;
                                }
                            }
                        }

                        out[[s, o]] = sample[best];
                        argmax[[s, o]] = best;
                    }
                }
            }
        }

        self.argmax = argmax;
        Ok(out)
    }

    /// Routes each delta back to the input value that was the maximum of its window.
    pub fn backward(&mut self, d: ArrayView2<f32>) -> Result<Array2<f32>> {
        let (c, h, w) = self.input;

        if d.dim() != self.argmax.dim() {
            return Err(MlErr::SizeMismatch {
                what: "pooling delta",
                got: d.len(),
                expected: self.argmax.len(),
            });
        }

        let mut dx = Array2::zeros((d.nrows(), c * h * w));

        for ((s, o), &i) in self.argmax.indexed_iter() {
            dx[[s, i]] += d[[s, o]];
        }

        Ok(dx)
    }
}
