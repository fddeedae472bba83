// Copyright @yucwang 2026

use crate::core::compositing::{
    blend_over_background, composite_back_to_front, composite_front_to_back, correct_premultiplied,
    opacity_correction,
};
use crate::core::integrator::Integrator;
use crate::core::scene::Scene;
use crate::core::sensor::Sensor;
use crate::core::volume::Volume;
use crate::lighting::phong::{shade, PhongParams};
use crate::math::constants::{Float, Vector2f, Vector3f, Vector4f};
use crate::math::ray::Ray3f;
use crate::math::spectrum::{premultiply, rgb, rgba};
use crate::transfer::piecewise::TransferFunction;
use crate::transfer::preintegration::{PreIntegrationTable, DEFAULT_INTEGRATION_STEPS};
use crate::volumes::gradient::{estimate_gradient, shading_normal, GradientMode};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompositeOrder {
    FrontToBack,
    BackToFront,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Classification {
    /// Classify each sample through the transfer function.
    PostClassification,
    /// Look up whole segments between consecutive samples.
    PreIntegrated,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MarchConfig {
    pub max_samples: usize,
    pub order: CompositeOrder,
    /// Front-to-back marching stops once accumulated alpha exceeds this.
    pub early_exit: Option<Float>,
    /// Step length the transfer function opacities are defined for. `None`
    /// disables opacity correction.
    pub reference_step: Option<Float>,
    pub classification: Classification,
    pub preintegration_dim: usize,
    pub lighting: bool,
    pub gradient_mode: GradientMode,
    /// Finite-difference offset. Defaults to the voxel size of sampled
    /// fields and to the march step otherwise.
    pub gradient_step: Option<Float>,
}

impl Default for MarchConfig {
    fn default() -> Self {
        Self {
            max_samples: 256,
            order: CompositeOrder::FrontToBack,
            early_exit: Some(0.99),
            reference_step: Some(1.0 / 128.0),
            classification: Classification::PostClassification,
            preintegration_dim: 128,
            lighting: true,
            gradient_mode: GradientMode::Central,
            gradient_step: None,
        }
    }
}

/// Premultiplied colour accumulated along one ray, before the background.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MarchResult {
    pub color: Vector4f,
    pub samples: usize,
    pub terminated_early: bool,
}

impl MarchResult {
    fn empty() -> Self {
        Self { color: Vector4f::zeros(), samples: 0, terminated_early: false }
    }
}

pub struct RaymarchingIntegrator {
    config: MarchConfig,
    transfer: TransferFunction,
    phong: PhongParams,
    preintegrated: Option<PreIntegrationTable>,
}

impl RaymarchingIntegrator {
    pub fn new(config: MarchConfig, transfer: TransferFunction, phong: PhongParams) -> Self {
        let preintegrated = match config.classification {
            Classification::PreIntegrated => Some(PreIntegrationTable::build(
                &transfer,
                config.preintegration_dim,
                DEFAULT_INTEGRATION_STEPS,
            )),
            Classification::PostClassification => None,
        };

        Self { config, transfer, phong, preintegrated }
    }

    pub fn config(&self) -> &MarchConfig {
        &self.config
    }

    pub fn march(&self, field: &dyn Volume, ray: &Ray3f) -> MarchResult {
        let bbox = field.bbox();
        let hit = bbox.ray_intersect(ray);
        if !hit.hit() {
            return MarchResult::empty();
        }

        // Camera inside the box starts marching at the eye.
        let t_start = hit.t_near.max(0.0);
        let t_end = hit.t_far;
        let max_samples = self.config.max_samples.max(1);
        let dt = bbox.widest_edge() / max_samples as Float;
        if !(t_end > t_start) || !(dt > 0.0) {
            return MarchResult::empty();
        }

        let steps = (((t_end - t_start) / dt).ceil() as usize).max(1).min(max_samples);
        let ratio = self.config.reference_step.filter(|r| *r > 0.0).map(|r| dt / r);
        let gradient_step = self.config.gradient_step
            .or_else(|| field.voxel_size())
            .unwrap_or(dt);

        let mut acc = Vector4f::zeros();
        let mut result = MarchResult::empty();

        match self.config.order {
            CompositeOrder::FrontToBack => {
                for k in 0..steps {
                    let t = t_start + k as Float * dt;
                    let c = self.sample_color(field, ray, t, dt, ratio, gradient_step);
                    acc = composite_front_to_back(acc, c);
                    result.samples += 1;

                    if let Some(threshold) = self.config.early_exit {
                        if acc.w > threshold {
                            result.terminated_early = true;
                            break;
                        }
                    }
                }
            }
            CompositeOrder::BackToFront => {
                for k in (0..steps).rev() {
                    let t = t_start + k as Float * dt;
                    let c = self.sample_color(field, ray, t, dt, ratio, gradient_step);
                    acc = composite_back_to_front(acc, c);
                    result.samples += 1;
                }
            }
        }

        result.color = acc;
        result
    }

    /// Premultiplied, opacity-corrected and shaded colour of the sample at `t`.
    fn sample_color(&self,
                    field: &dyn Volume,
                    ray: &Ray3f,
                    t: Float,
                    dt: Float,
                    ratio: Option<Float>,
                    gradient_step: Float) -> Vector4f {
        let p = ray.at(t);
        let s = field.eval(p);

        let c = match &self.preintegrated {
            Some(table) => {
                let s_back = field.eval(ray.at(t + dt));
                correct_premultiplied(table.lookup(s, s_back), ratio.unwrap_or(1.0))
            }
            None => {
                let mut c = self.transfer.classify(s);
                if let Some(ratio) = ratio {
                    c.w = opacity_correction(c.w, ratio);
                }
                premultiply(c)
            }
        };

        if c.w <= 0.0 {
            return Vector4f::zeros();
        }
        if !self.config.lighting {
            return c;
        }

        let material = rgb(&c) / c.w;
        let to_eye = -ray.dir();
        let to_light = self.phong.to_light(&to_eye);
        let gradient = estimate_gradient(field, p, gradient_step, self.config.gradient_mode);
        let shaded: Vector3f = shade(&self.phong, &material, shading_normal(&gradient), &to_light, &to_eye);

        rgba(shaded * c.w, c.w)
    }
}

impl Integrator for RaymarchingIntegrator {
    fn trace_ray_forward(&self, scene: &Scene, sensor: &dyn Sensor, pixel: Vector2f) -> Vector4f {
        let color = match sensor.pixel_ray(&pixel) {
            Some(ray) => self.march(scene.field(), &ray).color,
            None => Vector4f::zeros(),
        };
        blend_over_background(color, scene.background())
    }

    fn describe(&self) -> String {
        format!("RaymarchingIntegrator ({:?}, {:?}, {} samples)",
                self.config.order, self.config.classification, self.config.max_samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::constants::Vector3f;
    use crate::sensors::orbit::OrbitCamera;
    use crate::volumes::{Primitive, ProceduralVolume, ScalarField, Shape};

    fn unlit(order: CompositeOrder) -> MarchConfig {
        MarchConfig { order, lighting: false, ..MarchConfig::default() }
    }

    fn cube(center: Vector3f, half: Float, density: Float) -> Primitive {
        Primitive {
            shape: Shape::Cuboid { center, half_extent: Vector3f::new(half, half, half) },
            density,
        }
    }

    fn looking_down_z() -> Ray3f {
        Ray3f::new(Vector3f::new(0.0, 0.0, 5.0), Vector3f::new(0.0, 0.0, -1.0))
    }

    #[test]
    fn test_miss_returns_background_exactly() {
        let background = Vector3f::new(0.2, 0.1, 0.2);
        let field = ScalarField::Procedural(ProceduralVolume::default_scene());
        let cam = OrbitCamera::look_at(Vector3f::new(0.0, 0.0, 5.0),
                                       Vector3f::new(0.0, 0.0, 10.0),
                                       Vector3f::new(0.0, 1.0, 0.0), 0.5, 4, 4);
        let scene = Scene::new(field, Box::new(cam), background);
        let integrator = RaymarchingIntegrator::new(MarchConfig::default(), TransferFunction::rainbow(), PhongParams::default());

        let sensor = scene.camera().expect("scene has a camera");
        let c = integrator.trace_ray_forward(&scene, sensor, Vector2f::new(1.0, 2.0));
        assert_eq!(c, Vector4f::new(0.2, 0.1, 0.2, 1.0));
    }

    #[test]
    fn test_box_behind_camera_is_not_marched() {
        let field = ProceduralVolume::new(vec![cube(Vector3f::new(0.0, 0.0, 8.0), 0.5, 1.0)]);
        let integrator = RaymarchingIntegrator::new(unlit(CompositeOrder::FrontToBack), TransferFunction::rainbow(), PhongParams::default());
        let result = integrator.march(&field, &looking_down_z());
        assert_eq!(result.samples, 0);
        assert_eq!(result.color, Vector4f::zeros());
    }

    #[test]
    fn test_empty_space_yields_background() {
        // Densities stay below the transfer threshold everywhere.
        let field = ProceduralVolume::new(vec![cube(Vector3f::zeros(), 1.0, 0.1)]);
        let integrator = RaymarchingIntegrator::new(unlit(CompositeOrder::FrontToBack), TransferFunction::rainbow(), PhongParams::default());
        let result = integrator.march(&field, &looking_down_z());
        assert!(result.samples > 0);
        let background = Vector3f::new(0.3, 0.3, 0.3);
        assert_eq!(blend_over_background(result.color, background), Vector4f::new(0.3, 0.3, 0.3, 1.0));
    }

    #[test]
    fn test_opaque_primitive_terminates_early() {
        let tf = TransferFunction::rainbow();
        let expected = premultiply(tf.classify(0.8));
        let integrator = RaymarchingIntegrator::new(unlit(CompositeOrder::FrontToBack), tf, PhongParams::default());

        let near = cube(Vector3f::zeros(), 0.5, 0.8);
        let alone = ProceduralVolume::new(vec![near, cube(Vector3f::new(0.0, 0.0, -0.9), 0.1, 0.0)]);
        let hidden = ProceduralVolume::new(vec![near, cube(Vector3f::new(0.0, 0.0, -0.9), 0.1, 0.3)]);

        let a = integrator.march(&alone, &looking_down_z());
        let b = integrator.march(&hidden, &looking_down_z());
        assert!(a.terminated_early);
        assert!((a.color - expected).norm() < 1e-3);
        assert_eq!(a.color, b.color);
        assert!(a.samples < integrator.config().max_samples);
    }

    #[test]
    fn test_compositing_orders_agree_without_early_exit() {
        let field = ProceduralVolume::default_scene();
        let ray = Ray3f::new(Vector3f::new(0.1, -0.1, 4.0), Vector3f::new(0.0, 0.02, -1.0));
        let front = RaymarchingIntegrator::new(
            MarchConfig { early_exit: None, ..unlit(CompositeOrder::FrontToBack) },
            TransferFunction::ramp(),
            PhongParams::default(),
        );
        let back = RaymarchingIntegrator::new(unlit(CompositeOrder::BackToFront), TransferFunction::ramp(), PhongParams::default());

        let a = front.march(&field, &ray);
        let b = back.march(&field, &ray);
        assert_eq!(a.samples, b.samples);
        assert!(a.color.w > 0.0);
        assert!((a.color - b.color).norm() < 1e-4);
    }

    #[test]
    fn test_accumulated_alpha_is_bounded() {
        let field = ProceduralVolume::default_scene();
        for order in [CompositeOrder::FrontToBack, CompositeOrder::BackToFront].iter() {
            let integrator = RaymarchingIntegrator::new(unlit(*order), TransferFunction::rainbow(), PhongParams::default());
            let result = integrator.march(&field, &looking_down_z());
            assert!(result.color.w >= 0.0 && result.color.w <= 1.0);
        }
    }

    #[test]
    fn test_opacity_correction_makes_sampling_rate_irrelevant() {
        let field = ProceduralVolume::new(vec![cube(Vector3f::zeros(), 1.0, 0.3)]);
        let march = |samples: usize| {
            let config = MarchConfig { max_samples: samples, early_exit: None, reference_step: Some(0.5), ..unlit(CompositeOrder::FrontToBack) };
            RaymarchingIntegrator::new(config, TransferFunction::ramp(), PhongParams::default())
                .march(&field, &looking_down_z())
                .color
        };
        let coarse = march(40);
        let fine = march(160);
        // Four reference lengths at alpha 0.15 each.
        let expected = 1.0 - 0.85f32.powi(4);
        assert!((coarse.w - expected).abs() < 1e-3);
        assert!((fine.w - expected).abs() < 1e-3);
    }

    #[test]
    fn test_lighting_in_flat_region_is_finite() {
        let field = ProceduralVolume::new(vec![cube(Vector3f::zeros(), 1.0, 0.8)]);
        let config = MarchConfig { lighting: true, ..MarchConfig::default() };
        let phong = PhongParams::default();
        let integrator = RaymarchingIntegrator::new(config, TransferFunction::rainbow(), phong);

        // Start inside the cube so the first samples see a flat field.
        let ray = Ray3f::new(Vector3f::new(0.0, 0.0, 0.5), Vector3f::new(0.0, 0.0, -1.0));
        let result = integrator.march(&field, &ray);
        assert!(result.color.iter().all(|c| c.is_finite()));

        let material = rgb(&TransferFunction::rainbow().classify(0.8));
        let ambient = material * phong.ambient;
        assert!((rgb(&result.color) - ambient).norm() < 1e-4);
    }

    #[test]
    fn test_preintegrated_matches_post_classification_on_constant_field() {
        let field = ProceduralVolume::new(vec![cube(Vector3f::zeros(), 1.0, 0.7)]);
        let post = RaymarchingIntegrator::new(
            MarchConfig { early_exit: None, reference_step: Some(0.5), ..unlit(CompositeOrder::FrontToBack) },
            TransferFunction::ramp(),
            PhongParams::default(),
        );
        let pre = RaymarchingIntegrator::new(
            MarchConfig {
                early_exit: None,
                reference_step: Some(0.5),
                classification: Classification::PreIntegrated,
                preintegration_dim: 101,
                ..unlit(CompositeOrder::FrontToBack)
            },
            TransferFunction::ramp(),
            PhongParams::default(),
        );

        let ray = Ray3f::new(Vector3f::new(0.0, 0.0, 0.9), Vector3f::new(0.0, 0.0, -1.0));
        let a = post.march(&field, &ray);
        let b = pre.march(&field, &ray);
        assert!(a.color.w > 0.5);
        assert!((a.color.w - b.color.w).abs() < 0.05);
    }
}
