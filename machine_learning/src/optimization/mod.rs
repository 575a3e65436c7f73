mod adam;
mod gradient_descent;
mod optimizer;
mod updater;

pub use adam::Adam;
pub use gradient_descent::GradientDescent;
pub use optimizer::Optimizer;
pub use updater::{Updater, UpdaterState};
