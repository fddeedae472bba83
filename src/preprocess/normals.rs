// Copyright @yucwang 2026

use crate::math::constants::{Float, MatrixXF, Vector3f};

/// Per-vertex normals of a height plot, row-major over `(y, x)`. Interior
/// points use central differences, borders one-sided ones.
pub fn heightplot_normals(heights: &MatrixXF, cell_w: Float, cell_h: Float) -> Vec<Vector3f> {
    let (rows, cols) = heights.shape();
    let mut normals = Vec::with_capacity(rows * cols);

    for y in 0..rows {
        let (y0, y1) = (y.saturating_sub(1), (y + 1).min(rows - 1));
        for x in 0..cols {
            let (x0, x1) = (x.saturating_sub(1), (x + 1).min(cols - 1));
            let dhdx = if x1 > x0 {
                (heights[(y, x1)] - heights[(y, x0)]) / ((x1 - x0) as Float * cell_w)
            } else {
                0.0
            };
            let dhdy = if y1 > y0 {
                (heights[(y1, x)] - heights[(y0, x)]) / ((y1 - y0) as Float * cell_h)
            } else {
                0.0
            };
            let n = Vector3f::new(-dhdx, -dhdy, 1.0);
            normals.push(n.try_normalize(1e-12).unwrap_or_else(|| Vector3f::new(0.0, 0.0, 1.0)));
        }
    }

    normals
}
