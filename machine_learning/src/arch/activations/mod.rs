mod act_fn;
mod relu;
mod softmax;

pub use act_fn::ActFn;
