// Copyright @yucwang 2026

use crate::math::bitmap::Bitmap;
use crate::math::constants::Float;

fn to_u8(v: Float) -> u8 {
    (v.max(0.0).min(1.0) * 255.0).round() as u8
}

/// Writes an 8-bit RGBA image; the format follows the file extension.
pub fn write_png_to_file(bitmap: &Bitmap, file_path: &str) -> Result<(), String> {
    log::info!("Starting writing 8-bit image: {}.", file_path);

    let width = bitmap.width();
    let image = image::RgbaImage::from_fn(width as u32, bitmap.height() as u32, |x, y| {
        let c = bitmap.pixels()[y as usize * width + x as usize];
        image::Rgba([to_u8(c.x), to_u8(c.y), to_u8(c.z), to_u8(c.w)])
    });

    image
        .save(file_path)
        .map_err(|e| format!("failed to write {}: {}", file_path, e))?;
    log::info!("Image written to: {}.", file_path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::constants::Vector4f;

    #[test]
    fn test_to_u8_clamps() {
        assert_eq!(to_u8(-1.0), 0);
        assert_eq!(to_u8(0.5), 128);
        assert_eq!(to_u8(3.0), 255);
    }

    #[test]
    fn test_png_round_trip_pixel() {
        let mut bitmap = Bitmap::new(4, 3);
        bitmap[(1, 2)] = Vector4f::new(1.0, 0.0, 0.2, 1.0);
        let mut path = std::env::temp_dir();
        path.push("scivis_write_png_test.png");
        let path = path.to_string_lossy().to_string();

        write_png_to_file(&bitmap, &path).expect("write png");
        let loaded = image::open(&path).expect("read png").to_rgba8();
        assert_eq!(loaded.dimensions(), (4, 3));
        assert_eq!(loaded.get_pixel(1, 2).0, [255, 0, 51, 255]);
    }
}
