// Copyright @yucwang 2026

use crate::math::constants::{Float, MatrixXF};

/// Divergence of a periodic 2D vector field with backward differences.
/// Grids are indexed `(y, x)`; the cell before index 0 wraps to the last one.
pub fn backward_divergence(vx: &MatrixXF, vy: &MatrixXF, cell_w: Float, cell_h: Float) -> Result<MatrixXF, String> {
    if vx.shape() != vy.shape() {
        return Err(format!("vector components differ in shape: {:?} vs {:?}", vx.shape(), vy.shape()));
    }
    if !(cell_w > 0.0) || !(cell_h > 0.0) {
        return Err(format!("cell size must be positive, got {} x {}", cell_w, cell_h));
    }

    let (rows, cols) = vx.shape();
    Ok(MatrixXF::from_fn(rows, cols, |y, x| {
        let px = (x + cols - 1) % cols;
        let py = (y + rows - 1) % rows;
        (vx[(y, x)] - vx[(y, px)]) / cell_w + (vy[(y, x)] - vy[(py, x)]) / cell_h
    }))
}
