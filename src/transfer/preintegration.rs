// Copyright @yucwang 2026

use crate::core::compositing::{composite_front_to_back, opacity_correction};
use crate::math::constants::{Float, Vector4f};
use crate::math::spectrum::premultiply;
use crate::transfer::piecewise::TransferFunction;

pub const DEFAULT_INTEGRATION_STEPS: usize = 100;

/// Premultiplied colour of a reference-length ray segment whose scalar value
/// varies linearly from a front to a back sample, indexed by both values.
pub struct PreIntegrationTable {
    entries: Vec<Vector4f>,
    dim: usize,
    domain: (Float, Float),
}

impl PreIntegrationTable {
    pub fn build(tf: &TransferFunction, dim: usize, steps: usize) -> Self {
        let dim = dim.max(2);
        let steps = steps.max(1);
        let inv_dim = 1.0 / (dim as Float - 1.0);
        let ratio = 1.0 / steps as Float;

        let mut entries = Vec::with_capacity(dim * dim);
        for front in 0..dim {
            let s_f = front as Float * inv_dim;
            for back in 0..dim {
                let s_b = back as Float * inv_dim;
                let mut acc = Vector4f::zeros();
                for k in 0..steps {
                    let w = (k as Float + 0.5) * ratio;
                    let mut c = tf.classify_normalized(s_f + (s_b - s_f) * w);
                    c.w = opacity_correction(c.w, ratio);
                    acc = composite_front_to_back(acc, premultiply(c));
                }
                entries.push(acc);
            }
        }

        log::debug!("Built {}x{} pre-integration table with {} steps.", dim, dim, steps);

        Self { entries, dim, domain: tf.domain() }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    fn index(&self, s: Float) -> usize {
        let t = (s - self.domain.0) / (self.domain.1 - self.domain.0);
        let t = if t.is_nan() { 0.0 } else { t.max(0.0).min(1.0) };
        ((t * (self.dim as Float - 1.0)).round() as usize).min(self.dim - 1)
    }

    pub fn lookup(&self, s_front: Float, s_back: Float) -> Vector4f {
        self.entries[self.index(s_front) * self.dim + self.index(s_back)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::spectrum::premultiply;

    #[test]
    fn test_constant_segment_matches_sample() {
        let tf = TransferFunction::ramp();
        let table = PreIntegrationTable::build(&tf, 11, DEFAULT_INTEGRATION_STEPS);
        let c = table.lookup(0.8, 0.8);
        let expected = premultiply(tf.classify(0.8));
        assert!((c - expected).norm() < 1e-4);
    }

    #[test]
    fn test_transparent_segment() {
        let tf = TransferFunction::rainbow();
        let table = PreIntegrationTable::build(&tf, 16, 20);
        assert_eq!(table.lookup(0.0, 0.1), Vector4f::zeros());
        assert_eq!(table.dim(), 16);
    }

    #[test]
    fn test_segment_crossing_threshold_is_partial() {
        let tf = TransferFunction::ramp();
        let table = PreIntegrationTable::build(&tf, 21, DEFAULT_INTEGRATION_STEPS);
        let full = table.lookup(1.0, 1.0);
        let half = table.lookup(0.0, 1.0);
        assert!(half.w > 0.0);
        assert!(half.w < full.w);
        assert!(half.w <= 1.0);
    }
}
