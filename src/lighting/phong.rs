// Copyright @yucwang 2026

use crate::math::constants::{Float, Vector3f};
use crate::math::spectrum::clamp_unit;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhongParams {
    pub ambient: Float,
    pub diffuse: Float,
    pub specular: Float,
    pub shininess: Float,
    /// Direction from the shaded point towards the light. Ignored when
    /// `headlight` is set, in which case the light sits at the eye.
    pub light_dir: Vector3f,
    pub headlight: bool,
    pub light_color: Vector3f,
    pub specular_color: Vector3f,
}

impl Default for PhongParams {
    fn default() -> Self {
        Self {
            ambient: 0.3,
            diffuse: 0.7,
            specular: 0.2,
            shininess: 16.0,
            light_dir: Vector3f::new(0.0, 1.0, 1.0).normalize(),
            headlight: true,
            light_color: Vector3f::new(1.0, 1.0, 1.0),
            specular_color: Vector3f::new(1.0, 1.0, 1.0),
        }
    }
}

impl PhongParams {
    pub fn to_light(&self, to_eye: &Vector3f) -> Vector3f {
        if self.headlight {
            *to_eye
        } else {
            self.light_dir
        }
    }
}

fn reflect(v: &Vector3f, n: &Vector3f) -> Vector3f {
    v - n * (2.0 * v.dot(n))
}

/// Phong shading of `material`. A missing normal means a flat region and
/// yields the ambient term alone.
pub fn shade(params: &PhongParams,
             material: &Vector3f,
             normal: Option<Vector3f>,
             to_light: &Vector3f,
             to_eye: &Vector3f) -> Vector3f {
    let ambient = material * params.ambient;
    let n = match normal {
        Some(n) => n,
        None => return clamp_unit(ambient),
    };

    let l = to_light.try_normalize(1e-8).unwrap_or_else(Vector3f::zeros);
    let e = to_eye.try_normalize(1e-8).unwrap_or_else(Vector3f::zeros);
    // Volumes have no inside: face the normal towards the viewer.
    let n = if n.dot(&e) < 0.0 { -n } else { n };

    let n_dot_l = n.dot(&l).max(0.0);
    let diffuse = params.light_color.component_mul(material) * (params.diffuse * n_dot_l);

    let r_dot_e = reflect(&(-l), &n).dot(&e).max(0.0);
    let specular = params.specular_color * (params.specular * r_dot_e.powf(params.shininess));

    clamp_unit(ambient + diffuse + specular)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_normal_is_ambient_only() {
        let params = PhongParams::default();
        let material = Vector3f::new(1.0, 0.5, 0.0);
        let c = shade(&params, &material, None, &Vector3f::z(), &Vector3f::z());
        assert_eq!(c, material * params.ambient);
        assert!(c.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_head_on_light_is_full_intensity() {
        let params = PhongParams { ambient: 0.1, diffuse: 0.6, specular: 0.3, shininess: 8.0, ..PhongParams::default() };
        let material = Vector3f::new(1.0, 1.0, 1.0);
        let n = Vector3f::z();
        let c = shade(&params, &material, Some(n), &n, &n);
        assert!((c - Vector3f::new(1.0, 1.0, 1.0)).norm() < 1e-6);
    }

    #[test]
    fn test_grazing_light_keeps_ambient() {
        let params = PhongParams::default();
        let material = Vector3f::new(0.5, 0.5, 0.5);
        let c = shade(&params, &material, Some(Vector3f::z()), &Vector3f::x(), &Vector3f::z());
        assert!((c - material * params.ambient).norm() < 1e-6);
    }

    #[test]
    fn test_specular_without_diffuse() {
        // Light below the surface still reflects towards a grazing eye.
        let params = PhongParams { specular: 1.0, shininess: 1.0, ..PhongParams::default() };
        let c = shade(&params,
                      &Vector3f::zeros(),
                      Some(Vector3f::z()),
                      &Vector3f::new(0.6, 0.0, -0.8),
                      &Vector3f::new(-1.0, 0.0, 0.0));
        assert!((c - Vector3f::new(0.6, 0.6, 0.6)).norm() < 1e-5);
    }

    #[test]
    fn test_result_is_clamped() {
        let params = PhongParams { ambient: 2.0, ..PhongParams::default() };
        let c = shade(&params, &Vector3f::new(1.0, 1.0, 1.0), Some(Vector3f::z()), &Vector3f::z(), &Vector3f::z());
        assert!(c.iter().all(|v| *v <= 1.0 && *v >= 0.0));
    }

    #[test]
    fn test_normal_faces_viewer() {
        let params = PhongParams::default();
        let material = Vector3f::new(1.0, 1.0, 1.0);
        let front = shade(&params, &material, Some(Vector3f::z()), &Vector3f::z(), &Vector3f::z());
        let back = shade(&params, &material, Some(-Vector3f::z()), &Vector3f::z(), &Vector3f::z());
        assert_eq!(front, back);
    }
}
