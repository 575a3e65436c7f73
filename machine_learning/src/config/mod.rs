mod builder;
mod input;
mod layer;
mod network;
mod optimizer;
mod weight_init;

pub use builder::{DEFAULT_SEED, NetworkBuilder};
pub use input::InputType;
pub use layer::LayerConfig;
pub use network::NetworkConfig;
pub use optimizer::OptimizerConfig;
pub use weight_init::WeightInit;
