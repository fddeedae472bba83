// Copyright @yucwang 2026

pub mod gradient;
pub mod grid_volume;
pub mod procedural;

use crate::core::volume::Volume;
use crate::math::aabb::AABB;
use crate::math::constants::{Float, Vector3f};

pub use self::grid_volume::GridVolume;
pub use self::procedural::{Primitive, ProceduralVolume, Shape};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VolumeFilterMode {
    Nearest,
    Trilinear,
}

/// The two interchangeable density sources a frame can be rendered from.
pub enum ScalarField {
    Textured(GridVolume),
    Procedural(ProceduralVolume),
}

impl Volume for ScalarField {
    fn bbox(&self) -> AABB {
        match self {
            ScalarField::Textured(v) => v.bbox(),
            ScalarField::Procedural(v) => v.bbox(),
        }
    }

    fn eval(&self, p_world: Vector3f) -> Float {
        match self {
            ScalarField::Textured(v) => v.eval(p_world),
            ScalarField::Procedural(v) => v.eval(p_world),
        }
    }

    fn voxel_size(&self) -> Option<Float> {
        match self {
            ScalarField::Textured(v) => v.voxel_size(),
            ScalarField::Procedural(v) => v.voxel_size(),
        }
    }

    fn describe(&self) -> String {
        match self {
            ScalarField::Textured(v) => v.describe(),
            ScalarField::Procedural(v) => v.describe(),
        }
    }
}
