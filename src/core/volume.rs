// Copyright @yucwang 2026

use crate::math::aabb::AABB;
use crate::math::constants::{Float, Vector3f};

/// A read-only scalar density field.
pub trait Volume: Send + Sync {
    fn bbox(&self) -> AABB;

    /// Density at a world position. Positions outside the field yield `0.0`.
    fn eval(&self, p_world: Vector3f) -> Float;

    /// World-space edge length of one voxel, if the field is sampled data.
    fn voxel_size(&self) -> Option<Float> {
        None
    }

    fn describe(&self) -> String {
        String::from("Volume")
    }
}
