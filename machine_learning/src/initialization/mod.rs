mod chained;
mod constant;
mod param_gen;
mod random;

use std::{cell::RefCell, rc::Rc};

use rand::Rng;

pub use chained::ChainedParamGen;
pub use constant::ConstParamGen;
pub use param_gen::ParamGen;
pub use random::RandParamGen;

use crate::{Result, arch::layers::ParamLayout, config::WeightInit};

/// Builds the generator for one layer: its weights follow `init` and its biases start at zero.
///
/// # Arguments
/// * `init` - The weight initialization scheme.
/// * `rng` - The random number generator shared across the whole network.
/// * `layout` - How the layer's parameters are laid out.
///
/// # Returns
/// The layer's generator or an error if the fans yield an invalid distribution.
pub fn layer_param_gen<R: Rng + 'static>(
    init: WeightInit,
    rng: Rc<RefCell<R>>,
    layout: ParamLayout,
) -> Result<Box<dyn ParamGen>> {
    let ParamLayout {
        weights,
        biases,
        fan_in,
        fan_out,
    } = layout;

    let weight_gen: Box<dyn ParamGen> = match init {
        WeightInit::Xavier => Box::new(RandParamGen::xavier(rng, weights, fan_in, fan_out)?),
        WeightInit::XavierUniform => Box::new(RandParamGen::xavier_uniform(
            rng, weights, fan_in, fan_out,
        )?),
        WeightInit::Zeros => Box::new(ConstParamGen::new(0., weights)),
    };

    Ok(Box::new(ChainedParamGen::new(vec![
        weight_gen,
        Box::new(ConstParamGen::new(0., biases)),
    ])))
}
