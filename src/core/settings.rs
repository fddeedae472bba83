// Copyright @yucwang 2026

use crate::core::scene::Scene;
use crate::integrators::raymarching::{MarchConfig, RaymarchingIntegrator};
use crate::lighting::phong::PhongParams;
use crate::math::aabb::AABB;
use crate::math::constants::{Float, Vector3f};
use crate::preprocess::divergence::backward_divergence;
use crate::preprocess::flow::swirling_source;
use crate::preprocess::{PreprocessSettings, Preprocessor};
use crate::sensors::orbit::{CameraConfig, OrbitCamera};
use crate::transfer::piecewise::TransferFunction;
use crate::volumes::{GridVolume, ProceduralVolume, ScalarField};

/// Seconds of simulated time between two stacked flow frames.
pub const FLOW_FRAME_INTERVAL: Float = 0.1;

/// Where the scalar field of a frame comes from.
#[derive(Clone, Debug)]
pub enum FieldSpec {
    Procedural(ProceduralVolume),
    /// The procedural field sampled into a grid, rendered as a texture.
    Voxelized { source: ProceduralVolume, resolution: usize },
    /// Divergence of the swirling-source flow, preprocessed frame by frame
    /// and stacked over time into a `dim x dim x frames` texture.
    Flow { dim: usize, frames: usize, preprocess: PreprocessSettings },
}

impl Default for FieldSpec {
    fn default() -> Self {
        FieldSpec::Procedural(ProceduralVolume::default_scene())
    }
}

impl FieldSpec {
    pub fn build(&self, time: Float) -> Result<ScalarField, String> {
        match self {
            FieldSpec::Procedural(volume) => Ok(ScalarField::Procedural(volume.clone())),
            FieldSpec::Voxelized { source, resolution } => {
                Ok(ScalarField::Textured(GridVolume::voxelize(source, *resolution)))
            }
            FieldSpec::Flow { dim, frames, preprocess } => {
                if *dim < 2 || *frames == 0 {
                    return Err(format!("flow field needs dim >= 2 and frames >= 1, got {} and {}", dim, frames));
                }
                // The volume stacks the whole history, so slicing does not apply.
                let settings = PreprocessSettings { history_window: *frames, slicing: None, ..*preprocess };
                let mut preprocessor = Preprocessor::new(settings);
                let cell = 2.0 / (*dim as Float + 1.0);
                for k in 0..*frames {
                    let t = time - (*frames - 1 - k) as Float * FLOW_FRAME_INTERVAL;
                    let (vx, vy) = swirling_source(*dim, t);
                    preprocessor.apply(backward_divergence(&vx, &vy, cell, cell)?);
                }
                let bbox = AABB::new(Vector3f::new(-1.0, -1.0, -1.0), Vector3f::new(1.0, 1.0, 1.0));
                Ok(ScalarField::Textured(preprocessor.history().to_volume(bbox)?))
            }
        }
    }
}

/// Immutable inputs of one rendered frame.
#[derive(Clone, Debug)]
pub struct RenderSettings {
    pub width: usize,
    pub height: usize,
    /// Elapsed time in seconds; drives the camera orbit and the flow field.
    pub time: Float,
    pub background: Vector3f,
    pub camera: CameraConfig,
    pub march: MarchConfig,
    pub transfer: TransferFunction,
    pub phong: PhongParams,
    pub field: FieldSpec,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            time: 0.0,
            background: Vector3f::new(0.2, 0.1, 0.2),
            camera: CameraConfig::default(),
            march: MarchConfig::default(),
            transfer: TransferFunction::default(),
            phong: PhongParams::default(),
            field: FieldSpec::default(),
        }
    }
}

impl RenderSettings {
    pub fn build_scene(&self) -> Result<Scene, String> {
        let field = self.field.build(self.time)?;
        let camera = OrbitCamera::new(&self.camera, self.time, self.width, self.height);
        Ok(Scene::new(field, Box::new(camera), self.background))
    }

    pub fn build_integrator(&self) -> RaymarchingIntegrator {
        RaymarchingIntegrator::new(self.march, self.transfer.clone(), self.phong)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::volume::Volume;
    use crate::preprocess::slicing::SlicingDirection;

    #[test]
    fn test_default_scene_builds() {
        let settings = RenderSettings { width: 8, height: 6, ..RenderSettings::default() };
        let scene = settings.build_scene().expect("default scene");
        let camera = scene.camera().expect("camera");
        assert_eq!((camera.bitmap().width(), camera.bitmap().height()), (8, 6));
        assert!(scene.bbox().is_valid());
    }

    #[test]
    fn test_voxelized_field_is_textured() {
        let spec = FieldSpec::Voxelized { source: ProceduralVolume::default_scene(), resolution: 16 };
        match spec.build(0.0).expect("voxelized field") {
            ScalarField::Textured(grid) => assert_eq!(grid.resolution(), (16, 16, 16)),
            ScalarField::Procedural(_) => panic!("expected a textured field"),
        }
    }

    #[test]
    fn test_flow_field_stacks_frames() {
        let spec = FieldSpec::Flow { dim: 12, frames: 5, preprocess: PreprocessSettings::default() };
        let field = spec.build(1.0).expect("flow field");
        assert!(field.voxel_size().is_some());
        match field {
            ScalarField::Textured(grid) => assert_eq!(grid.resolution(), (12, 12, 5)),
            ScalarField::Procedural(_) => panic!("expected a textured field"),
        }

        let sliced = PreprocessSettings { slicing: Some((SlicingDirection::X, 3)), ..PreprocessSettings::default() };
        let spec = FieldSpec::Flow { dim: 12, frames: 5, preprocess: sliced };
        match spec.build(1.0).expect("flow field with slicing") {
            ScalarField::Textured(grid) => assert_eq!(grid.resolution(), (12, 12, 5)),
            ScalarField::Procedural(_) => panic!("expected a textured field"),
        }

        let bad = FieldSpec::Flow { dim: 1, frames: 5, preprocess: PreprocessSettings::default() };
        assert!(bad.build(0.0).is_err());
    }
}
