// Copyright @yucwang 2026

use crate::core::scene::Scene;
use crate::core::sensor::Sensor;
use crate::math::constants::{Vector2f, Vector4f};

pub trait Integrator: Sync {
    /// Final RGBA colour of the pixel at integer coordinates `pixel`.
    fn trace_ray_forward(&self, scene: &Scene, sensor: &dyn Sensor, pixel: Vector2f) -> Vector4f;
    fn describe(&self) -> String {
        String::from("Integrator")
    }
}
