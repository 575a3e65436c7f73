/// Rectified linear unit.
pub fn f(z: f32) -> f32 {
    z.max(0.)
}

pub fn df(z: f32) -> f32 {
    if z > 0. { 1. } else { 0. }
}
