use ndarray::Array1;

pub(crate) fn normalize_vector(vec: &Array1<f32>) -> Array1<f32> {
    let norm: f32 = vec.iter().map(|&x| x * x).sum::<f32>().sqrt();
    if norm > 1e-10 {
        vec / norm
    } else {
        Array1::zeros(vec.len())
    }
}

/// Dampens repeated terms: `tf` becomes `1 + ln(tf)` for every non-zero count.
pub(crate) fn sublinear_scale(counts: &mut Array1<f32>) {
    counts.mapv_inplace(|tf| if tf > 0.0 { 1.0 + tf.ln() } else { tf });
}
