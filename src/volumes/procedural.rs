// Copyright @yucwang 2026

use crate::core::volume::Volume;
use crate::math::aabb::AABB;
use crate::math::constants::{Float, Vector3f};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    Cuboid { center: Vector3f, half_extent: Vector3f },
    Sphere { center: Vector3f, radius: Float },
}

impl Shape {
    pub fn contains(&self, p: &Vector3f) -> bool {
        match self {
            Shape::Cuboid { center, half_extent } => {
                let d = (p - center).abs();
                d.x <= half_extent.x && d.y <= half_extent.y && d.z <= half_extent.z
            }
            Shape::Sphere { center, radius } => (p - center).norm_squared() <= radius * radius,
        }
    }

    pub fn center(&self) -> Vector3f {
        match self {
            Shape::Cuboid { center, .. } | Shape::Sphere { center, .. } => *center,
        }
    }

    pub fn bbox(&self) -> AABB {
        match self {
            Shape::Cuboid { center, half_extent } => AABB::new(center - half_extent, center + half_extent),
            Shape::Sphere { center, radius } => {
                let r = Vector3f::new(*radius, *radius, *radius);
                AABB::new(center - r, center + r)
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Primitive {
    pub shape: Shape,
    pub density: Float,
}

/// Analytic density field: a union of primitives whose densities add up
/// where they overlap.
#[derive(Clone, Debug, Default)]
pub struct ProceduralVolume {
    primitives: Vec<Primitive>,
}

impl ProceduralVolume {
    pub fn new(primitives: Vec<Primitive>) -> Self {
        Self { primitives }
    }

    /// Two overlapping boxes and a sphere inside the `[-1, 1]^3` cube.
    pub fn default_scene() -> Self {
        Self::new(vec![
            Primitive {
                shape: Shape::Cuboid {
                    center: Vector3f::new(-0.35, -0.2, 0.0),
                    half_extent: Vector3f::new(0.35, 0.35, 0.35),
                },
                density: 0.35,
            },
            Primitive {
                shape: Shape::Cuboid {
                    center: Vector3f::new(0.3, 0.3, 0.1),
                    half_extent: Vector3f::new(0.3, 0.2, 0.45),
                },
                density: 0.55,
            },
            Primitive {
                shape: Shape::Sphere { center: Vector3f::new(0.1, -0.15, -0.2), radius: 0.4 },
                density: 0.8,
            },
        ])
    }

    pub fn push(&mut self, primitive: Primitive) {
        self.primitives.push(primitive);
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }
}

impl Volume for ProceduralVolume {
    fn bbox(&self) -> AABB {
        let mut out = AABB::default();
        for primitive in &self.primitives {
            out.expand_by_aabb(&primitive.shape.bbox());
        }
        out
    }

    fn eval(&self, p_world: Vector3f) -> Float {
        self.primitives
            .iter()
            .filter(|primitive| primitive.shape.contains(&p_world))
            .map(|primitive| primitive.density)
            .sum()
    }

    fn describe(&self) -> String {
        format!("ProceduralVolume ({} primitives)", self.primitives.len())
    }
}
