pub mod arch;
pub mod config;
pub mod dataset;
pub mod error;
pub mod initialization;
pub mod network;
pub mod optimization;
mod test;

pub use config::NetworkConfig;
pub use dataset::DataSet;
pub use error::{MlErr, Result};
pub use network::Network;
