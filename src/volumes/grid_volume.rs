// Copyright @yucwang 2026

use crate::core::volume::Volume;
use crate::math::aabb::AABB;
use crate::math::constants::{Float, MatrixXF, Vector3f};
use crate::volumes::VolumeFilterMode;

/// Single-channel sampled density field, the CPU counterpart of a 3D
/// texture. Voxel values sit on the grid nodes spanning `bbox`.
pub struct GridVolume {
    // rows are `z * yres + y`, columns are `x`
    data: MatrixXF,
    xres: usize,
    yres: usize,
    zres: usize,
    bbox: AABB,
    filter_mode: VolumeFilterMode,
}

impl GridVolume {
    pub fn new(data: Vec<Float>, res: (usize, usize, usize), bbox: AABB) -> Result<Self, String> {
        let (xres, yres, zres) = res;
        if xres == 0 || yres == 0 || zres == 0 {
            return Err("grid dimensions must be positive".to_string());
        }
        let expected = xres
            .checked_mul(yres)
            .and_then(|v| v.checked_mul(zres))
            .ok_or_else(|| "grid dimensions overflow".to_string())?;
        if data.len() != expected {
            return Err(format!("grid expects {} values, got {}", expected, data.len()));
        }
        if !bbox.is_valid() {
            return Err("grid bbox is empty".to_string());
        }

        let rows = yres * zres;
        let data = MatrixXF::from_fn(rows, xres, |row, col| data[row * xres + col]);

        Ok(Self {
            data,
            xres,
            yres,
            zres,
            bbox,
            filter_mode: VolumeFilterMode::Trilinear,
        })
    }

    /// Stacks equally sized 2D frames (rows = y, cols = x) along z, oldest
    /// frame first.
    pub fn from_frames(frames: &[MatrixXF], bbox: AABB) -> Result<Self, String> {
        let first = frames.first().ok_or_else(|| "no frames to stack".to_string())?;
        let (yres, xres) = first.shape();
        let mut data = Vec::with_capacity(xres * yres * frames.len());
        for (z, frame) in frames.iter().enumerate() {
            if frame.shape() != (yres, xres) {
                return Err(format!("frame {} has shape {:?}, expected {:?}", z, frame.shape(), (yres, xres)));
            }
            for y in 0..yres {
                for x in 0..xres {
                    data.push(frame[(y, x)]);
                }
            }
        }

        Self::new(data, (xres, yres, frames.len()), bbox)
    }

    /// Samples another field on a `resolution^3` node grid over its bbox.
    pub fn voxelize(volume: &dyn Volume, resolution: usize) -> Self {
        let res = resolution.max(2);
        let bbox = volume.bbox();
        let bbox = if bbox.is_valid() { bbox } else { AABB::unit() };
        let diag = bbox.diagnal();
        let inv = 1.0 / (res as Float - 1.0);

        let rows = res * res;
        let data = MatrixXF::from_fn(rows, res, |row, x| {
            let z = row / res;
            let y = row % res;
            let p = bbox.p_min + Vector3f::new(
                diag.x * x as Float * inv,
                diag.y * y as Float * inv,
                diag.z * z as Float * inv,
            );
            volume.eval(p)
        });

        log::debug!("Voxelized {} into a {}^3 grid.", volume.describe(), res);

        Self {
            data,
            xres: res,
            yres: res,
            zres: res,
            bbox,
            filter_mode: VolumeFilterMode::Trilinear,
        }
    }

    pub fn set_filter_mode(&mut self, filter_mode: VolumeFilterMode) {
        self.filter_mode = filter_mode;
    }

    pub fn resolution(&self) -> (usize, usize, usize) {
        (self.xres, self.yres, self.zres)
    }

    fn fetch(&self, x: usize, y: usize, z: usize) -> Float {
        self.data[(z * self.yres + y, x)]
    }

    fn sample_nearest(&self, p: Vector3f) -> Float {
        let x = (p.x * (self.xres as Float - 1.0) + 0.5).floor() as usize;
        let y = (p.y * (self.yres as Float - 1.0) + 0.5).floor() as usize;
        let z = (p.z * (self.zres as Float - 1.0) + 0.5).floor() as usize;

        self.fetch(x.min(self.xres - 1), y.min(self.yres - 1), z.min(self.zres - 1))
    }

    fn sample_trilinear(&self, p: Vector3f) -> Float {
        let x = p.x * (self.xres as Float - 1.0);
        let y = p.y * (self.yres as Float - 1.0);
        let z = p.z * (self.zres as Float - 1.0);

        let x0 = (x.floor() as usize).min(self.xres - 1);
        let y0 = (y.floor() as usize).min(self.yres - 1);
        let z0 = (z.floor() as usize).min(self.zres - 1);
        let x1 = (x0 + 1).min(self.xres - 1);
        let y1 = (y0 + 1).min(self.yres - 1);
        let z1 = (z0 + 1).min(self.zres - 1);

        let tx = x - x0 as Float;
        let ty = y - y0 as Float;
        let tz = z - z0 as Float;

        let c00 = self.fetch(x0, y0, z0) * (1.0 - tx) + self.fetch(x1, y0, z0) * tx;
        let c10 = self.fetch(x0, y1, z0) * (1.0 - tx) + self.fetch(x1, y1, z0) * tx;
        let c01 = self.fetch(x0, y0, z1) * (1.0 - tx) + self.fetch(x1, y0, z1) * tx;
        let c11 = self.fetch(x0, y1, z1) * (1.0 - tx) + self.fetch(x1, y1, z1) * tx;

        let c0 = c00 * (1.0 - ty) + c10 * ty;
        let c1 = c01 * (1.0 - ty) + c11 * ty;

        c0 * (1.0 - tz) + c1 * tz
    }
}

impl Volume for GridVolume {
    fn bbox(&self) -> AABB {
        self.bbox
    }

    fn eval(&self, p_world: Vector3f) -> Float {
        let diag = self.bbox.diagnal();
        if diag.x.abs() < 1e-8 || diag.y.abs() < 1e-8 || diag.z.abs() < 1e-8 {
            return 0.0;
        }

        let p = (p_world - self.bbox.p_min).component_div(&diag);
        if p.iter().any(|c| !(0.0..=1.0).contains(c)) {
            return 0.0;
        }

        match self.filter_mode {
            VolumeFilterMode::Nearest => self.sample_nearest(p),
            VolumeFilterMode::Trilinear => self.sample_trilinear(p),
        }
    }

    fn voxel_size(&self) -> Option<Float> {
        let diag = self.bbox.diagnal();
        let res = [self.xres, self.yres, self.zres];
        let size = (0..3)
            .filter(|idx| res[*idx] > 1)
            .map(|idx| diag[idx] / (res[idx] as Float - 1.0))
            .fold(std::f32::INFINITY, Float::min);

        if size.is_finite() { Some(size) } else { Some(self.bbox.widest_edge()) }
    }

    fn describe(&self) -> String {
        format!("GridVolume {}x{}x{}", self.xres, self.yres, self.zres)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp_volume() -> GridVolume {
        let data: Vec<f32> = (0..8).map(|v| v as f32).collect();
        GridVolume::new(data, (2, 2, 2), AABB::unit()).expect("valid grid")
    }

    #[test]
    fn grid_volume_trilinear_center() {
        let vol = ramp_volume();
        let v = vol.eval(Vector3f::new(0.5, 0.5, 0.5));
        assert!((v - 3.5).abs() < 1e-5);
    }

    #[test]
    fn grid_volume_nearest_corner() {
        let mut vol = ramp_volume();
        vol.set_filter_mode(VolumeFilterMode::Nearest);
        assert_eq!(vol.eval(Vector3f::new(0.1, 0.1, 0.1)), 0.0);
        assert_eq!(vol.eval(Vector3f::new(0.9, 0.1, 0.9)), 5.0);
    }

    #[test]
    fn grid_volume_outside_is_zero() {
        let vol = ramp_volume();
        assert_eq!(vol.eval(Vector3f::new(1.01, 0.5, 0.5)), 0.0);
        assert_eq!(vol.eval(Vector3f::new(0.5, -0.01, 0.5)), 0.0);
        assert_eq!(vol.eval(Vector3f::new(1.0, 1.0, 1.0)), 7.0);
    }

    #[test]
    fn grid_volume_rejects_bad_input() {
        assert!(GridVolume::new(vec![0.0; 7], (2, 2, 2), AABB::unit()).is_err());
        assert!(GridVolume::new(vec![], (0, 2, 2), AABB::unit()).is_err());
        assert!(GridVolume::from_frames(&[], AABB::unit()).is_err());
    }

    #[test]
    fn grid_volume_from_frames_stacks_along_z() {
        let f0 = MatrixXF::from_element(3, 4, 1.0);
        let f1 = MatrixXF::from_element(3, 4, 3.0);
        let vol = GridVolume::from_frames(&[f0, f1], AABB::unit()).expect("frames stack");
        assert_eq!(vol.resolution(), (4, 3, 2));
        assert!((vol.eval(Vector3f::new(0.3, 0.3, 0.5)) - 2.0).abs() < 1e-5);

        let bad = [MatrixXF::zeros(3, 4), MatrixXF::zeros(4, 3)];
        assert!(GridVolume::from_frames(&bad, AABB::unit()).is_err());
    }

    #[test]
    fn grid_volume_voxel_size() {
        let vol = GridVolume::new(vec![0.0; 5 * 3 * 2], (5, 3, 2), AABB::unit()).expect("valid grid");
        assert_eq!(vol.voxel_size(), Some(0.25));
    }
}
