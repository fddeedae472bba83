// Copyright @yucwang 2026

use crate::math::bitmap::Bitmap;
use crate::math::constants::{Float, Vector2f, Vector3f};
use crate::math::ray::Ray3f;

pub trait Sensor: Sync + Send {
    /// `u` is the viewport coordinate in `[0, 1]^2`, y pointing down.
    fn sample_ray(&self, u: &Vector2f) -> Ray3f;
    fn position(&self) -> Vector3f;
    fn bitmap(&self) -> &Bitmap;
    fn bitmap_mut(&mut self) -> &mut Bitmap;
    fn describe(&self) -> String {
        String::from("Sensor")
    }

    /// Ray through the centre of pixel `(x, y)`, `None` for an empty viewport.
    fn pixel_ray(&self, pixel: &Vector2f) -> Option<Ray3f> {
        let bmp = self.bitmap();
        if bmp.width() == 0 || bmp.height() == 0 {
            return None;
        }
        let u = (pixel.x + 0.5) / (bmp.width() as Float);
        let v = (pixel.y + 0.5) / (bmp.height() as Float);
        Some(self.sample_ray(&Vector2f::new(u, v)))
    }
}
