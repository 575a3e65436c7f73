/// Produces the initial values of a run of parameters, a few at a time.
pub trait ParamGen {
    /// Samples up to `n` parameters, fewer once the generator runs low.
    ///
    /// # Returns
    /// `None` once every parameter this generator owns has been handed out.
    fn sample(&mut self, n: usize) -> Option<Vec<f32>>;
}
