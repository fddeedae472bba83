// Copyright @yucwang 2026

use crate::math::constants::{Float, MatrixXF};

const SOURCE_WIDTH: Float = 0.12;

/// Velocity of a swirling source that circles the centre of the unit
/// square, sampled at the cell centres of a `dim x dim` grid. Stands in for
/// the fluid simulation when rendering without one.
pub fn swirling_source(dim: usize, time: Float) -> (MatrixXF, MatrixXF) {
    let cx = 0.5 + 0.25 * time.cos();
    let cy = 0.5 + 0.25 * time.sin();
    let inv_dim = 1.0 / dim.max(1) as Float;
    let inv_two_sigma2 = 1.0 / (2.0 * SOURCE_WIDTH * SOURCE_WIDTH);

    let falloff = |x: usize, y: usize| {
        let rx = (x as Float + 0.5) * inv_dim - cx;
        let ry = (y as Float + 0.5) * inv_dim - cy;
        (rx, ry, (-(rx * rx + ry * ry) * inv_two_sigma2).exp())
    };

    let vx = MatrixXF::from_fn(dim, dim, |y, x| {
        let (rx, ry, f) = falloff(x, y);
        (rx - ry) * f
    });
    let vy = MatrixXF::from_fn(dim, dim, |y, x| {
        let (rx, ry, f) = falloff(x, y);
        (ry + rx) * f
    });

    (vx, vy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocess::divergence::backward_divergence;

    #[test]
    fn test_source_diverges() {
        let dim = 32;
        let (vx, vy) = swirling_source(dim, 0.0);
        assert_eq!(vx.shape(), (dim, dim));
        let cell = 1.0 / dim as Float;
        let div = backward_divergence(&vx, &vy, cell, cell).expect("same shapes");
        // Source centre sits at (0.75, 0.5) for t = 0.
        assert!(div[(16, 24)] > 0.0);
        assert!(div.iter().all(|v| v.is_finite()));
    }
}
