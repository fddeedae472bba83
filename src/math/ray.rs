// Copyright 2020 @TwoCookingMice

use super::constants::{Float, Vector3f};

/// A viewing ray with a unit direction. Created once per pixel.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray3f {
    origin: Vector3f,
    dir: Vector3f,
}

impl Ray3f {
    pub fn new(o: Vector3f, d: Vector3f) -> Self {
        let norm = d.norm();
        let dir = if norm > 0.0 { d / norm } else { Vector3f::new(0.0, 0.0, -1.0) };
        Self { origin: o, dir }
    }

    pub fn origin(&self) -> Vector3f {
        self.origin
    }

    pub fn dir(&self) -> Vector3f {
        self.dir
    }

    pub fn at(&self, t: Float) -> Vector3f {
        self.origin + self.dir * t
    }
}

#[cfg(test)]
mod tests {
    use super::{Ray3f, Vector3f};

    #[test]
    fn test_ray3f_normalizes_direction() {
        let o = Vector3f::new(0.0, 0.0, 0.0);
        let ray = Ray3f::new(o, Vector3f::new(1.0, 0.0, 1.0));
        assert_eq!(o, ray.origin());
        assert!((ray.dir().norm() - 1.0).abs() < 1e-6);

        let p = ray.at(2.0);
        assert!((p.x - std::f32::consts::SQRT_2).abs() < 1e-5);
        assert!(p.y.abs() < 1e-6);
        assert!((p.z - std::f32::consts::SQRT_2).abs() < 1e-5);
    }

    #[test]
    fn test_ray3f_degenerate_direction() {
        let ray = Ray3f::new(Vector3f::zeros(), Vector3f::zeros());
        assert!(ray.dir().iter().all(|c| c.is_finite()));
        assert!((ray.dir().norm() - 1.0).abs() < 1e-6);
    }
}
