mod conv;
mod dense;
mod layer;
mod pool;

pub use conv::Conv2d;
pub use dense::Dense;
pub use layer::Layer;
pub use pool::MaxPool2d;

/// How a layer's parameter slice splits into weights and biases, plus the fans used to scale
/// the weight initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamLayout {
    pub weights: usize,
    pub biases: usize,
    pub fan_in: usize,
    pub fan_out: usize,
}
