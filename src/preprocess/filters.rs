// Copyright @yucwang 2026

use crate::math::constants::{Float, MatrixXF};

type Kernel3 = [[Float; 3]; 3];

const GAUSSIAN: Kernel3 = [
    [1.0 / 16.0, 2.0 / 16.0, 1.0 / 16.0],
    [2.0 / 16.0, 4.0 / 16.0, 2.0 / 16.0],
    [1.0 / 16.0, 2.0 / 16.0, 1.0 / 16.0],
];

const SOBEL_X: Kernel3 = [
    [-1.0, 0.0, 1.0],
    [-2.0, 0.0, 2.0],
    [-1.0, 0.0, 1.0],
];

const SOBEL_Y: Kernel3 = [
    [-1.0, -2.0, -1.0],
    [0.0, 0.0, 0.0],
    [1.0, 2.0, 1.0],
];

// Borders repeat the edge value.
fn convolve3(grid: &MatrixXF, kernel: &Kernel3) -> MatrixXF {
    let (rows, cols) = grid.shape();
    MatrixXF::from_fn(rows, cols, |y, x| {
        let mut sum = 0.0;
        for (ky, row) in kernel.iter().enumerate() {
            let sy = (y + ky).saturating_sub(1).min(rows - 1);
            for (kx, weight) in row.iter().enumerate() {
                let sx = (x + kx).saturating_sub(1).min(cols - 1);
                sum += weight * grid[(sy, sx)];
            }
        }
        sum
    })
}

pub fn gaussian_blur(grid: &MatrixXF) -> MatrixXF {
    convolve3(grid, &GAUSSIAN)
}

pub struct SobelGradients {
    pub magnitude: MatrixXF,
    /// Radians, `atan2(gy, gx)`.
    pub direction: MatrixXF,
}

pub fn sobel_gradients(grid: &MatrixXF) -> SobelGradients {
    let gx = convolve3(grid, &SOBEL_X);
    let gy = convolve3(grid, &SOBEL_Y);
    SobelGradients {
        magnitude: gx.zip_map(&gy, |a, b| (a * a + b * b).sqrt()),
        direction: gx.zip_map(&gy, |a, b| b.atan2(a)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blur_preserves_constant_and_spreads_impulse() {
        let flat = MatrixXF::from_element(4, 4, 3.0);
        assert!(gaussian_blur(&flat).iter().all(|v| (v - 3.0).abs() < 1e-6));

        let mut impulse = MatrixXF::zeros(5, 5);
        impulse[(2, 2)] = 16.0;
        let blurred = gaussian_blur(&impulse);
        assert_eq!(blurred[(2, 2)], 4.0);
        assert_eq!(blurred[(1, 2)], 2.0);
        assert_eq!(blurred[(1, 1)], 1.0);
        assert_eq!(blurred[(0, 0)], 0.0);
        assert!((blurred.sum() - 16.0).abs() < 1e-5);
    }

    #[test]
    fn test_sobel_on_ramp() {
        let ramp = MatrixXF::from_fn(5, 5, |_, x| x as Float);
        let g = sobel_gradients(&ramp);
        assert_eq!(g.magnitude[(2, 2)], 8.0);
        assert!(g.direction[(2, 2)].abs() < 1e-6);
        assert_eq!(g.magnitude.shape(), (5, 5));
    }

    #[test]
    fn test_single_cell_grid() {
        let one = MatrixXF::from_element(1, 1, 2.0);
        assert_eq!(gaussian_blur(&one)[(0, 0)], 2.0);
        assert_eq!(sobel_gradients(&one).magnitude[(0, 0)], 0.0);
    }
}
