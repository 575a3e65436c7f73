pub mod activations;
pub mod layers;
pub mod loss;
mod model;
mod sequential;
mod shape;

pub use model::Model;
pub use sequential::Sequential;
pub use shape::Shape;
