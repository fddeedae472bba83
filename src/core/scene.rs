// Copyright @yucwang 2026

use crate::core::sensor::Sensor;
use crate::core::volume::Volume;
use crate::math::aabb::AABB;
use crate::math::constants::Vector3f;
use crate::volumes::ScalarField;

/// Everything a frame reads: the scalar field, the viewing sensor and the
/// background the marched colour is blended over.
pub struct Scene {
    field: ScalarField,
    sensor: Option<Box<dyn Sensor>>,
    background: Vector3f,
}

impl Scene {
    pub fn new(field: ScalarField, sensor: Box<dyn Sensor>, background: Vector3f) -> Self {
        Self { field, sensor: Some(sensor), background }
    }

    pub fn field(&self) -> &ScalarField {
        &self.field
    }

    pub fn bbox(&self) -> AABB {
        self.field.bbox()
    }

    pub fn background(&self) -> Vector3f {
        self.background
    }

    pub fn camera(&self) -> Option<&dyn Sensor> {
        self.sensor.as_deref()
    }

    pub fn take_sensor(&mut self) -> Option<Box<dyn Sensor>> {
        self.sensor.take()
    }

    pub fn insert_sensor(&mut self, sensor: Box<dyn Sensor>) {
        self.sensor = Some(sensor);
    }
}
