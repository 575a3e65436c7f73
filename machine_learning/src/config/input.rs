use serde::{Deserialize, Serialize};

use crate::arch::Shape;

/// The kind of samples a network is fed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputType {
    FeedForward {
        size: usize,
    },
    Convolutional {
        height: usize,
        width: usize,
        channels: usize,
    },
}

impl InputType {
    pub fn shape(&self) -> Shape {
        match *self {
            InputType::FeedForward { size } => Shape::Flat(size),
            InputType::Convolutional {
                height,
                width,
                channels,
            } => Shape::Image {
                channels,
                height,
                width,
            },
        }
    }

    pub fn is_convolutional(&self) -> bool {
        matches!(self, InputType::Convolutional { .. })
    }
}
