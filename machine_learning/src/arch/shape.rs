use std::fmt::{self, Display};

/// The shape of a single sample as it flows between layers.
///
/// Samples always travel as rows of a 2D batch matrix; `Image` only tells the layers how to
/// interpret that row (channel, row, column order).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Flat(usize),
    Image {
        channels: usize,
        height: usize,
        width: usize,
    },
}

impl Shape {
    /// Returns the amount of values in one sample of this shape.
    pub fn len(&self) -> usize {
        match *self {
            Shape::Flat(size) => size,
            Shape::Image {
                channels,
                height,
                width,
            } => channels * height * width,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Flat(size) => write!(f, "[{size}]"),
            Shape::Image {
                channels,
                height,
                width,
            } => write!(f, "[{channels}x{height}x{width}]"),
        }
    }
}
