use ndarray::{Array2, ArrayView2, Zip};

/// Applies softmax over each row of `z`, shifting by the row maximum to keep `exp` finite.
pub fn forward(z: ArrayView2<f32>) -> Array2<f32> {
    let mut a = z.to_owned();

    for mut row in a.rows_mut() {
        let max = row.fold(f32::NEG_INFINITY, |m, &v| m.max(v));
        row.mapv_inplace(|v| (v - max).exp());
        let sum = row.sum();
        row /= sum;
    }

    a
}

/// Multiplies `d` by the softmax jacobian of each row: `a * (d - <d, a>)`.
pub fn backward(a: ArrayView2<f32>, d: ArrayView2<f32>) -> Array2<f32> {
    let mut out = Array2::zeros(a.raw_dim());

    Zip::from(out.rows_mut())
        .and(a.rows())
        .and(d.rows())
        .for_each(|mut out, a, d| {
            let dot = a.dot(&d);
            out.assign(&(&d - dot));
            out *= &a;
        });

    out
}
