use serde::{Deserialize, Serialize};

/// How the weights of every layer are initialized, biases always start at zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightInit {
    #[default]
    Xavier,
    XavierUniform,
    Zeros,
}
