// Copyright 2020 @TwoCookingMice

// Colours are carried as plain nalgebra vectors: `Vector3f` for rgb and
// `Vector4f` for rgba. Unless a name says otherwise, rgba is straight alpha.

use super::constants::{Float, Vector3f, Vector4f};

pub fn rgba(rgb: Vector3f, alpha: Float) -> Vector4f {
    Vector4f::new(rgb.x, rgb.y, rgb.z, alpha)
}

pub fn rgb(c: &Vector4f) -> Vector3f {
    Vector3f::new(c.x, c.y, c.z)
}

pub fn transparent() -> Vector4f {
    Vector4f::zeros()
}

pub fn premultiply(c: Vector4f) -> Vector4f {
    Vector4f::new(c.x * c.w, c.y * c.w, c.z * c.w, c.w)
}

pub fn clamp_unit(v: Vector3f) -> Vector3f {
    v.map(|c| c.max(0.0).min(1.0))
}

pub fn lerp3(a: &Vector3f, b: &Vector3f, t: Float) -> Vector3f {
    a * (1.0 - t) + b * t
}
