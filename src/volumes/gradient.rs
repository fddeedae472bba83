// Copyright @yucwang 2026

use crate::core::volume::Volume;
use crate::math::constants::{Float, Vector3f};

/// Gradients shorter than this are treated as flat: no shading normal.
pub const GRADIENT_EPSILON: Float = 1e-6;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GradientMode {
    /// `(f(p + h) - f(p - h)) / 2h`
    Central,
    /// `(f(p + h) - f(p)) / h`
    Forward,
}

pub fn estimate_gradient(volume: &dyn Volume, p: Vector3f, h: Float, mode: GradientMode) -> Vector3f {
    if h <= 0.0 {
        return Vector3f::zeros();
    }

    let axes = [Vector3f::x(), Vector3f::y(), Vector3f::z()];
    match mode {
        GradientMode::Central => {
            let inv = 1.0 / (2.0 * h);
            Vector3f::from_fn(|idx, _| {
                (volume.eval(p + axes[idx] * h) - volume.eval(p - axes[idx] * h)) * inv
            })
        }
        GradientMode::Forward => {
            let center = volume.eval(p);
            Vector3f::from_fn(|idx, _| (volume.eval(p + axes[idx] * h) - center) / h)
        }
    }
}

/// Normal pointing against the gradient, towards lower density.
pub fn shading_normal(gradient: &Vector3f) -> Option<Vector3f> {
    let len = gradient.norm();
    if len.is_finite() && len > GRADIENT_EPSILON {
        Some(-gradient / len)
    } else {
        None
    }
}
