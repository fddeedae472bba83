// Copyright @yucwang 2026

use crate::core::sensor::Sensor;
use crate::math::bitmap::Bitmap;
use crate::math::constants::{Float, Vector2f, Vector3f};
use crate::math::ray::Ray3f;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraConfig {
    pub target: Vector3f,
    pub radius: Float,
    /// Eye height above `target`.
    pub height: Float,
    /// Radians per second of elapsed time.
    pub angular_speed: Float,
    pub phase: Float,
    pub fov_y_degrees: Float,
    pub up: Vector3f,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            target: Vector3f::zeros(),
            radius: 3.0,
            height: 1.0,
            angular_speed: 0.5,
            phase: 0.0,
            fov_y_degrees: 45.0,
            up: Vector3f::new(0.0, 1.0, 0.0),
        }
    }
}

// World axis along which `v` has its smallest component.
fn least_parallel_axis(v: &Vector3f) -> Vector3f {
    let a = v.abs();
    if a.x <= a.y && a.x <= a.z {
        Vector3f::x()
    } else if a.y <= a.z {
        Vector3f::y()
    } else {
        Vector3f::z()
    }
}

/// Perspective camera circling its target as time passes.
pub struct OrbitCamera {
    origin: Vector3f,
    forward: Vector3f,
    right: Vector3f,
    up: Vector3f,
    tan_half_fov_y: Float,
    aspect: Float,
    bitmap: Bitmap,
}

impl OrbitCamera {
    pub fn new(config: &CameraConfig, time: Float, width: usize, height: usize) -> Self {
        let angle = config.angular_speed * time + config.phase;
        let origin = config.target + Vector3f::new(
            config.radius * angle.sin(),
            config.height,
            config.radius * angle.cos(),
        );
        Self::look_at(origin, config.target, config.up, config.fov_y_degrees.to_radians(), width, height)
    }

    pub fn look_at(origin: Vector3f,
                   target: Vector3f,
                   up: Vector3f,
                   fov_y_radians: Float,
                   width: usize,
                   height: usize) -> Self {
        let forward = (target - origin).try_normalize(1e-8).unwrap_or_else(|| Vector3f::new(0.0, 0.0, -1.0));
        let right = forward
            .cross(&up)
            .try_normalize(1e-8)
            .unwrap_or_else(|| forward.cross(&least_parallel_axis(&forward)).normalize());
        let up = right.cross(&forward).normalize();
        let aspect = if height > 0 { width as Float / height as Float } else { 1.0 };

        Self {
            origin,
            forward,
            right,
            up,
            tan_half_fov_y: (0.5 * fov_y_radians).tan(),
            aspect,
            bitmap: Bitmap::new(width, height),
        }
    }

    pub fn width(&self) -> usize {
        self.bitmap.width()
    }

    pub fn height(&self) -> usize {
        self.bitmap.height()
    }
}

impl Sensor for OrbitCamera {
    fn sample_ray(&self, u: &Vector2f) -> Ray3f {
        let px = (2.0 * u.x - 1.0) * self.aspect * self.tan_half_fov_y;
        let py = (1.0 - 2.0 * u.y) * self.tan_half_fov_y;
        let dir = self.right * px + self.up * py + self.forward;
        Ray3f::new(self.origin, dir)
    }

    fn position(&self) -> Vector3f {
        self.origin
    }

    fn bitmap(&self) -> &Bitmap {
        &self.bitmap
    }

    fn bitmap_mut(&mut self) -> &mut Bitmap {
        &mut self.bitmap
    }

    fn describe(&self) -> String {
        format!("OrbitCamera at ({:.3}, {:.3}, {:.3}), {}x{}",
                self.origin.x, self.origin.y, self.origin.z, self.width(), self.height())
    }
}
