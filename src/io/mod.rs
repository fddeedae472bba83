// Copyright @yucwang 2026

pub mod exr_utils;
pub mod image_utils;

use crate::math::bitmap::Bitmap;
use std::path::Path;

/// Picks the writer from the extension: `.exr` keeps floats, anything the
/// `image` crate understands is written as 8-bit RGBA.
pub fn write_bitmap(bitmap: &Bitmap, file_path: &str) -> Result<(), String> {
    let ext = Path::new(file_path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("exr") => exr_utils::write_exr_to_file(bitmap, file_path),
        Some(_) => image_utils::write_png_to_file(bitmap, file_path),
        None => Err(format!("cannot infer image format of {}", file_path)),
    }
}
