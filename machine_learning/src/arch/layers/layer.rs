use ndarray::{Array2, ArrayView2};

use super::{Conv2d, Dense, MaxPool2d, ParamLayout};
use crate::{
    Result,
    arch::{Shape, activations::ActFn},
};

/// The layers a `Sequential` model can be made of.
#[derive(Debug, Clone)]
pub enum Layer {
    Dense(Dense),
    Conv2d(Conv2d),
    MaxPool2d(MaxPool2d),
}

impl Layer {
    pub fn dense(dim: (usize, usize), act_fn: Option<ActFn>) -> Self {
        Self::Dense(Dense::new(dim, act_fn))
    }

    /// Returns the amount of parameters of the layer.
    pub fn size(&self) -> usize {
        match self {
            Self::Dense(l) => l.size(),
            Self::Conv2d(l) => l.size(),
            Self::MaxPool2d(_) => 0,
        }
    }

    /// Returns the shape of the samples this layer outputs.
    pub fn output_shape(&self) -> Shape {
        match self {
            Self::Dense(l) => Shape::Flat(l.dim().1),
            Self::Conv2d(l) => l.output_shape(),
            Self::MaxPool2d(l) => l.output_shape(),
        }
    }

    /// Returns how the layer's parameters are laid out, `None` for parameterless layers.
    pub fn param_layout(&self) -> Option<ParamLayout> {
        match self {
            Self::Dense(l) => Some(l.param_layout()),
            Self::Conv2d(l) => Some(l.param_layout()),
            Self::MaxPool2d(_) => None,
        }
    }

    pub fn forward(&mut self, params: &[f32], x: ArrayView2<f32>) -> Result<Array2<f32>> {
        match self {
            Self::Dense(l) => l.forward(params, x),
            Self::Conv2d(l) => l.forward(params, x),
            Self::MaxPool2d(l) => l.forward(x),
        }
    }

    pub fn backward(
        &mut self,
        params: &[f32],
        grad: &mut [f32],
        d: ArrayView2<f32>,
    ) -> Result<Array2<f32>> {
        match self {
            Self::Dense(l) => l.backward(params, grad, d),
            Self::Conv2d(l) => l.backward(params, grad, d),
            Self::MaxPool2d(l) => l.backward(d),
        }
    }
}
