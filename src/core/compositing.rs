// Copyright @yucwang 2026

//! Blending of ordered, semi-transparent samples. All colours entering and
//! leaving these functions are premultiplied by their own alpha.

use crate::math::constants::{Float, Vector3f, Vector4f};

/// Rescales an opacity defined for a reference step to a step `ratio` times
/// as long, so the accumulated opacity does not depend on the sampling rate.
pub fn opacity_correction(alpha: Float, ratio: Float) -> Float {
    if ratio == 1.0 {
        return alpha;
    }
    1.0 - (1.0 - alpha.max(0.0).min(1.0)).powf(ratio.max(0.0))
}

/// Applies `opacity_correction` to a premultiplied colour, keeping its hue.
pub fn correct_premultiplied(c: Vector4f, ratio: Float) -> Vector4f {
    if c.w <= 0.0 {
        return Vector4f::zeros();
    }
    let alpha = opacity_correction(c.w, ratio);
    let scale = alpha / c.w;
    Vector4f::new(c.x * scale, c.y * scale, c.z * scale, alpha)
}

/// `acc` is in front of `c`.
pub fn composite_front_to_back(acc: Vector4f, c: Vector4f) -> Vector4f {
    acc + c * (1.0 - acc.w)
}

/// `c` is in front of `acc`.
pub fn composite_back_to_front(acc: Vector4f, c: Vector4f) -> Vector4f {
    c + acc * (1.0 - c.w)
}

/// Opaque pixel colour of `acc` laid over `background`.
pub fn blend_over_background(acc: Vector4f, background: Vector3f) -> Vector4f {
    let rest = 1.0 - acc.w;
    Vector4f::new(
        acc.x + background.x * rest,
        acc.y + background.y * rest,
        acc.z + background.z * rest,
        1.0,
    )
}
