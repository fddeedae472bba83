/* Copyright 2020 @TwoCookingMice */

use crate::math::bitmap::Bitmap;

use exr::prelude::*;

// Write an RGBA bitmap as a linear float OpenEXR image.
pub fn write_exr_to_file(bitmap: &Bitmap, file_path: &str) -> std::result::Result<(), String> {
    log::info!("Starting writing openexr images: {}.", file_path);

    let width = bitmap.width();
    let write_result = write_rgba_file(file_path, width, bitmap.height(), |x, y| {
        let c = bitmap.pixels()[y * width + x];
        (c.x, c.y, c.z, c.w)
    });

    write_result.map_err(|e| format!("failed to write {}: {}", file_path, e))?;
    log::info!("EXR written to: {}.", file_path);
    Ok(())
}
