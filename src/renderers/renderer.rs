// Copyright @yucwang 2021

use crate::core::scene::Scene;
use crate::math::bitmap::Bitmap;

pub trait Renderer {
    /// Produces one opaque RGBA frame of `scene` as seen by its sensor. The
    /// sensor is returned to the scene afterwards.
    fn render(&self, scene: &mut Scene) -> Bitmap;
}
